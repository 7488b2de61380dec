use colored::*;
use csv::Writer;
use tracing::info;

use crate::domain::types::{Route, RouteComparison, RouteOutcome};
use crate::error::Result;

/// Render both routes to stdout, solver first.
pub fn print_comparison(comparison: &RouteComparison) {
    println!(
        "{}",
        format!(
            "Routes over {} branches (computed {})",
            comparison.branch_count,
            comparison.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .bold()
    );

    println!();
    match &comparison.solver {
        RouteOutcome::Solved(route) => {
            let line = format!(
                "Solver route: {:.2} km round trip ({:.2} km one way)",
                route.closed_km, route.open_km
            );
            if route.closed_km <= comparison.greedy.closed_km + 1e-9 {
                println!("{}", line.green());
            } else {
                println!("{}", line.yellow());
            }
            print_stops(route);
        }
        RouteOutcome::NoBranches => println!("{}", "Solver route: no branches stored".dimmed()),
        RouteOutcome::NoSolutionFound => {
            println!("{}", "Solver route: no solution found within the time limit".red())
        }
    }

    println!();
    println!(
        "Greedy route: {:.2} km one way ({:.2} km round trip)",
        comparison.greedy.open_km, comparison.greedy.closed_km
    );
    print_stops(&comparison.greedy);
}

fn print_stops(route: &Route) {
    if route.is_empty() {
        println!("  {}", "(empty)".dimmed());
        return;
    }
    for (position, branch) in route.stops.iter().enumerate() {
        println!(
            "  {:>3}. {} [{}] ({:.4}, {:.4})",
            position + 1,
            branch.name,
            branch.id,
            branch.latitude,
            branch.longitude
        );
    }
}

/// Write both routes as `strategy,position,branch_id,name,latitude,longitude` rows.
/// A solver outcome without a route contributes a single row with its status and empty fields.
pub fn save_to_csv(comparison: &RouteComparison, filename: &str) -> Result<()> {
    let mut wtr = Writer::from_path(filename)?;
    write_rows(&mut wtr, comparison)?;
    wtr.flush()?;
    info!("Saved routes to {}", filename);
    Ok(())
}

pub fn to_csv_string(comparison: &RouteComparison) -> Result<String> {
    let mut wtr = Writer::from_writer(vec![]);
    write_rows(&mut wtr, comparison)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_rows<W: std::io::Write>(wtr: &mut Writer<W>, comparison: &RouteComparison) -> Result<()> {
    wtr.write_record(["strategy", "position", "branch_id", "name", "latitude", "longitude"])?;

    match &comparison.solver {
        RouteOutcome::Solved(route) => write_route(wtr, "solver", route)?,
        RouteOutcome::NoBranches => wtr.write_record(["solver:no_branches", "", "", "", "", ""])?,
        RouteOutcome::NoSolutionFound => {
            wtr.write_record(["solver:no_solution_found", "", "", "", "", ""])?
        }
    }
    write_route(wtr, "greedy", &comparison.greedy)?;
    Ok(())
}

fn write_route<W: std::io::Write>(wtr: &mut Writer<W>, strategy: &str, route: &Route) -> Result<()> {
    for (position, branch) in route.stops.iter().enumerate() {
        wtr.write_record([
            strategy.to_string(),
            (position + 1).to_string(),
            branch.id.to_string(),
            branch.name.clone(),
            branch.latitude.to_string(),
            branch.longitude.to_string(),
        ])?;
    }
    Ok(())
}

pub fn to_json(comparison: &RouteComparison) -> Result<String> {
    Ok(serde_json::to_string_pretty(comparison)?)
}
