pub mod branches;
pub mod sqlx;

pub use self::branches::*;
pub use self::sqlx::db_connection;
