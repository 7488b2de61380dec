use std::error::Error;

use tracing::{error, info, span, Instrument, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;
use crate::database::db_connection;
use crate::error::OptimizerError;
use crate::fixtures::seed_if_empty;
use crate::optimizer::optimize_stored_routes;
use crate::report::{print_comparison, save_to_csv, to_json};

/// Initialize tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .init();
}

/// Load the stored branches, compute the solver and greedy routes, and render them.
pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let config = AppConfig::from_env();

    let pool = async {
        let pool = db_connection(&config.database_url).await?;
        seed_if_empty(&pool, config.branch_csv_path.as_deref()).await?;
        Ok::<_, OptimizerError>(pool)
    }
    .instrument(span!(Level::INFO, "setup"))
    .await?;

    let comparison = match optimize_stored_routes(&pool, &config.solver).await {
        Ok(comparison) => comparison,
        Err(e) => {
            error!("Route optimization failed: {}", e);
            return Err(e.into());
        }
    };

    print_comparison(&comparison);
    save_to_csv(&comparison, &config.route_csv_path)?;
    if config.print_json {
        println!("{}", to_json(&comparison)?);
    }

    info!("Done");
    Ok(())
}
