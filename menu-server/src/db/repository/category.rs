//! Category Repository
//!
//! Categories are provisioned out of band; meals only reference them.

use super::RepoResult;
use shared::models::Category;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM category WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    Ok(find_by_id(pool, id).await?.is_some())
}
