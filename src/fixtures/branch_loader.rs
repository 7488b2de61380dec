use std::io::Read;

use csv::ReaderBuilder;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::branches::{count_branches, insert_branch};
use crate::domain::types::NewBranch;
use crate::error::{OptimizerError, Result};

/// Reads `name,latitude,longitude` rows from a CSV file.
/// Accepts files with or without a header; blank rows are skipped.
pub fn read_branches_from_csv(csv_path: &str) -> Result<Vec<NewBranch>> {
    let file = std::fs::File::open(csv_path)?;
    read_branches_from_reader(file)
}

pub fn read_branches_from_reader<R: Read>(reader: R) -> Result<Vec<NewBranch>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut branches = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let record = row?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let name = record.get(0).unwrap_or_default();
        let raw_lat = record.get(1).unwrap_or_default();
        let raw_lon = record.get(2).unwrap_or_default();

        // Treat a first row whose coordinates are not numbers as a header.
        if idx == 0 && raw_lat.parse::<f64>().is_err() {
            continue;
        }

        let latitude = parse_coordinate(name, "latitude", raw_lat)?;
        let longitude = parse_coordinate(name, "longitude", raw_lon)?;
        let branch = NewBranch::new(name, latitude, longitude);
        branch.validate()?;
        branches.push(branch);
    }

    Ok(branches)
}

fn parse_coordinate(name: &str, field: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| {
        OptimizerError::InvalidBranch(format!("branch '{}' has non-numeric {} {:?}", name, field, raw))
    })
}

/// A handful of Dhaka branches, used when the database starts out empty.
pub fn demo_branches() -> Vec<NewBranch> {
    vec![
        NewBranch::new("Gulshan Avenue", 23.7925, 90.4078),
        NewBranch::new("Motijheel", 23.7330, 90.4172),
        NewBranch::new("Dhanmondi", 23.7461, 90.3742),
        NewBranch::new("Uttara Sector 7", 23.8759, 90.3795),
        NewBranch::new("Mirpur 10", 23.8069, 90.3687),
        NewBranch::new("Banani", 23.7937, 90.4066),
        NewBranch::new("Mohammadpur", 23.7662, 90.3589),
        NewBranch::new("Bashundhara", 23.8193, 90.4526),
        NewBranch::new("Farmgate", 23.7561, 90.3872),
        NewBranch::new("Badda", 23.7806, 90.4261),
    ]
}

/// Fill an empty branch table from `csv_path`, or from [`demo_branches`] when no CSV is given
/// or it cannot be read. Returns how many branches were inserted.
pub async fn seed_if_empty(pool: &SqlitePool, csv_path: Option<&str>) -> Result<usize> {
    let existing = count_branches(pool).await?;
    if existing > 0 {
        info!("Branch table already holds {} branches, not seeding", existing);
        return Ok(0);
    }

    let branches = match csv_path {
        Some(path) => match read_branches_from_csv(path) {
            Ok(list) => {
                info!("Loaded {} branches from CSV {}", list.len(), path);
                list
            }
            Err(err) => {
                warn!(
                    "Failed to read branch CSV at {}: {}. Falling back to demo branches.",
                    path, err
                );
                demo_branches()
            }
        },
        None => demo_branches(),
    };

    for branch in &branches {
        insert_branch(pool, branch).await?;
    }
    info!("Seeded {} branches", branches.len());
    Ok(branches.len())
}
