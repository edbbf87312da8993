//! Meal Size/Cost Repository

use super::{RepoError, RepoResult};
use shared::models::MealSizeCost;
use sqlx::{Executor, Sqlite, SqlitePool};

const COLUMNS: &str = "id, meal_id, size, cost, number_of_pieces";

pub async fn find_by_meal(pool: &SqlitePool, meal_id: i64) -> RepoResult<Vec<MealSizeCost>> {
    let rows = sqlx::query_as::<_, MealSizeCost>(&format!(
        "SELECT {COLUMNS} FROM meal_size_cost WHERE meal_id = ? ORDER BY id"
    ))
    .bind(meal_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Variant `id` of `meal_id`; variants of other meals are not visible
pub async fn find_for_meal(
    pool: &SqlitePool,
    meal_id: i64,
    id: i64,
) -> RepoResult<Option<MealSizeCost>> {
    let row = sqlx::query_as::<_, MealSizeCost>(&format!(
        "SELECT {COLUMNS} FROM meal_size_cost WHERE meal_id = ? AND id = ?"
    ))
    .bind(meal_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_size(
    pool: &SqlitePool,
    meal_id: i64,
    size: i64,
) -> RepoResult<Option<MealSizeCost>> {
    let row = sqlx::query_as::<_, MealSizeCost>(&format!(
        "SELECT {COLUMNS} FROM meal_size_cost WHERE meal_id = ? AND size = ? LIMIT 1"
    ))
    .bind(meal_id)
    .bind(size)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert<'e, E>(
    executor: E,
    meal_id: i64,
    size: i64,
    cost: f64,
    number_of_pieces: Option<i64>,
) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO meal_size_cost (meal_id, size, cost, number_of_pieces) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(meal_id)
    .bind(size)
    .bind(cost)
    .bind(number_of_pieces)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Sparse update; `None` keeps the stored value
///
/// `number_of_pieces` is `Some(None)` to clear the column.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    size: Option<i64>,
    cost: Option<f64>,
    number_of_pieces: Option<Option<i64>>,
) -> RepoResult<MealSizeCost> {
    let rows = sqlx::query(
        "UPDATE meal_size_cost SET size = COALESCE(?1, size), cost = COALESCE(?2, cost), number_of_pieces = CASE WHEN ?3 THEN ?4 ELSE number_of_pieces END WHERE id = ?5",
    )
    .bind(size)
    .bind(cost)
    .bind(number_of_pieces.is_some())
    .bind(number_of_pieces.flatten())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Size cost {id} not found")));
    }
    let row = sqlx::query_as::<_, MealSizeCost>(&format!(
        "SELECT {COLUMNS} FROM meal_size_cost WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn delete_by_meal<'e, E>(executor: E, meal_id: i64) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM meal_size_cost WHERE meal_id = ?")
        .bind(meal_id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}
