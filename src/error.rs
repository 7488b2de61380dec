use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("branch '{name}' has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        name: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("invalid branch: {0}")]
    InvalidBranch(String),

    #[error("only single-vehicle routing is supported, got {0} vehicles")]
    UnsupportedVehicleCount(usize),

    #[error("depot index {depot} is out of range for {size} branches")]
    DepotOutOfRange { depot: usize, size: usize },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("solver task failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
