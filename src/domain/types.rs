use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OptimizerError, Result};

pub const MAX_NAME_LEN: usize = 100;

/// A stored bank branch. Coordinates are signed decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Branch {
    pub fn new(id: i64, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn has_valid_coordinates(&self) -> bool {
        valid_coordinates(self.latitude, self.longitude)
    }
}

/// Branch fields as submitted for insert or update, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBranch {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewBranch {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(OptimizerError::InvalidBranch("name must not be empty".into()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(OptimizerError::InvalidBranch(format!(
                "name is longer than {} characters",
                MAX_NAME_LEN
            )));
        }
        if !valid_coordinates(self.latitude, self.longitude) {
            return Err(OptimizerError::InvalidCoordinates {
                name: name.to_string(),
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        Ok(())
    }
}

fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// A visiting order over branches.
///
/// `open_km` sums consecutive legs; `closed_km` adds the leg from the last stop back to the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Route {
    pub stops: Vec<Branch>,
    pub open_km: f64,
    pub closed_km: f64,
}

impl Route {
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.stops.iter().map(|b| b.id).collect()
    }
}

/// Result of the solver-backed optimizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "route", rename_all = "snake_case")]
pub enum RouteOutcome {
    Solved(Route),
    NoBranches,
    NoSolutionFound,
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Solved(route) => Some(route),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, RouteOutcome::Solved(_))
    }
}

/// Both routes computed for one request, side by side.
#[derive(Debug, Clone, Serialize)]
pub struct RouteComparison {
    pub branch_count: usize,
    pub solver: RouteOutcome,
    pub greedy: Route,
    pub computed_at: DateTime<Utc>,
}
