//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTablePatch};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, num, size, floor, status, qr_code, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

pub async fn find_by_floor_and_num(
    pool: &SqlitePool,
    floor: i64,
    num: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE floor = ? AND num = ? LIMIT 1"
    ))
    .bind(floor)
    .bind(num)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO dining_table (num, size, floor, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.num)
    .bind(data.size)
    .bind(data.floor)
    .bind(data.status)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiningTablePatch) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET floor = COALESCE(?1, floor), size = COALESCE(?2, size), num = COALESCE(?3, num), status = COALESCE(?4, status), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.floor)
    .bind(data.size)
    .bind(data.num)
    .bind(data.status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining table {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dining table {id} not found")))
}

/// Record the relative path of the generated QR image
pub async fn set_qr_code(pool: &SqlitePool, id: i64, path: &str) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE dining_table SET qr_code = ? WHERE id = ?")
        .bind(path)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining table {id} not found")));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn table(floor: i64, num: i64) -> DiningTableCreate {
        DiningTableCreate {
            num,
            size: 4,
            floor,
            status: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let created = create(&pool, table(1, 7)).await.unwrap();
        assert_eq!(created.num, 7);
        assert!(created.qr_code.is_none());

        let found = find_by_floor_and_num(&pool, 1, 7).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(find_by_floor_and_num(&pool, 2, 7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_floor_num() {
        let pool = test_pool().await;
        create(&pool, table(1, 7)).await.unwrap();
        let err = create(&pool, table(1, 7)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_sparse_update() {
        let pool = test_pool().await;
        let created = create(&pool, table(1, 7)).await.unwrap();

        let patch = DiningTablePatch {
            size: Some(6),
            status: Some(false),
            ..Default::default()
        };
        let updated = update(&pool, created.id, patch).await.unwrap();
        assert_eq!(updated.size, 6);
        assert!(!updated.status);
        assert_eq!(updated.floor, 1);
        assert_eq!(updated.num, 7);
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let pool = test_pool().await;
        let err = update(&pool, 99, DiningTablePatch::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_qr_code_and_delete() {
        let pool = test_pool().await;
        let created = create(&pool, table(2, 3)).await.unwrap();
        set_qr_code(&pool, created.id, "qr_codes/table-1.png").await.unwrap();
        let found = find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(found.qr_code.as_deref(), Some("qr_codes/table-1.png"));

        assert!(delete(&pool, created.id).await.unwrap());
        assert!(!delete(&pool, created.id).await.unwrap());
        assert!(find_all(&pool).await.unwrap().is_empty());
    }
}
