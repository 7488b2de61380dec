use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::domain::types::{Branch, NewBranch};
use crate::error::Result;

/// All branches, ordered by id. This is the fixed enumeration the distance matrix is built over.
pub async fn list_branches(pool: &SqlitePool) -> Result<Vec<Branch>> {
    let branches = sqlx::query_as::<_, Branch>(
        "SELECT id, name, latitude, longitude FROM branches ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;
    debug!("Loaded {} branches", branches.len());
    Ok(branches)
}

pub async fn get_branch(pool: &SqlitePool, id: i64) -> Result<Option<Branch>> {
    let branch = sqlx::query_as::<_, Branch>(
        "SELECT id, name, latitude, longitude FROM branches WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(branch)
}

pub async fn insert_branch(pool: &SqlitePool, new_branch: &NewBranch) -> Result<Branch> {
    new_branch.validate()?;
    let name = new_branch.name.trim();

    let result = sqlx::query(
        r#"
        INSERT INTO branches (name, latitude, longitude, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(name)
    .bind(new_branch.latitude)
    .bind(new_branch.longitude)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    info!("Stored branch {} '{}'", id, name);
    Ok(Branch::new(id, name, new_branch.latitude, new_branch.longitude))
}

/// Replace a branch's fields. Returns `None` when no branch has this id.
pub async fn update_branch(
    pool: &SqlitePool,
    id: i64,
    changes: &NewBranch,
) -> Result<Option<Branch>> {
    changes.validate()?;
    let name = changes.name.trim();

    let result = sqlx::query(
        "UPDATE branches SET name = ?1, latitude = ?2, longitude = ?3 WHERE id = ?4",
    )
    .bind(name)
    .bind(changes.latitude)
    .bind(changes.longitude)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    info!("Updated branch {}", id);
    Ok(Some(Branch::new(id, name, changes.latitude, changes.longitude)))
}

pub async fn delete_branch(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM branches WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_branches(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM branches")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
