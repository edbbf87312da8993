//! Meal Repository
//!
//! Row access for meals plus the read projections used by the listing
//! endpoints. Every read takes `include_inactive`; when false only meals with
//! `status = 1` are returned.

use super::{RepoError, RepoResult};
use shared::models::{FilteredMeal, Meal, MealCreate, MealFilter, MealPatch, MealSummary, MealType};
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};

const COLUMNS: &str =
    "id, name, description, type, category_id, image, status, created_at, updated_at";

/// Summary projection; the variant columns come from the cheapest variant (ties by id)
const SUMMARY_SELECT: &str = "SELECT m.id, m.name, m.description, m.image, m.type, m.status, \
     m.category_id, c.name AS category_name, v.cost, v.size, v.number_of_pieces \
     FROM meal m \
     LEFT JOIN category c ON c.id = m.category_id \
     LEFT JOIN meal_size_cost v ON v.id = (\
         SELECT s.id FROM meal_size_cost s WHERE s.meal_id = m.id ORDER BY s.cost ASC, s.id ASC LIMIT 1\
     )";

/// Subset of meals addressed by the paginated listings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MealScope {
    All,
    Category(i64),
    Type(MealType),
    Status(bool),
}

fn push_scope(qb: &mut QueryBuilder<'_, Sqlite>, scope: MealScope, include_inactive: bool) {
    qb.push(" WHERE 1 = 1");
    match scope {
        MealScope::All => {}
        MealScope::Category(id) => {
            qb.push(" AND m.category_id = ").push_bind(id);
        }
        MealScope::Type(meal_type) => {
            qb.push(" AND m.type = ").push_bind(meal_type.as_str());
        }
        MealScope::Status(status) => {
            qb.push(" AND m.status = ").push_bind(status);
        }
    }
    if !include_inactive {
        qb.push(" AND m.status = 1");
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>(&format!("SELECT {COLUMNS} FROM meal WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(meal)
}

/// Whether `name` is used by a meal other than `except_id`
pub async fn name_taken(pool: &SqlitePool, name: &str, except_id: Option<i64>) -> RepoResult<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM meal WHERE name = ?1 AND (?2 IS NULL OR id != ?2)",
    )
    .bind(name)
    .bind(except_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn find_summary(
    pool: &SqlitePool,
    id: i64,
    include_inactive: bool,
) -> RepoResult<Option<MealSummary>> {
    let mut qb = QueryBuilder::<Sqlite>::new(SUMMARY_SELECT);
    push_scope(&mut qb, MealScope::All, include_inactive);
    qb.push(" AND m.id = ").push_bind(id);
    let summary = qb.build_query_as::<MealSummary>().fetch_optional(pool).await?;
    Ok(summary)
}

pub async fn list_summaries(pool: &SqlitePool, include_inactive: bool) -> RepoResult<Vec<MealSummary>> {
    let mut qb = QueryBuilder::<Sqlite>::new(SUMMARY_SELECT);
    push_scope(&mut qb, MealScope::All, include_inactive);
    qb.push(" ORDER BY m.id");
    let summaries = qb.build_query_as::<MealSummary>().fetch_all(pool).await?;
    Ok(summaries)
}

pub async fn count(pool: &SqlitePool, scope: MealScope, include_inactive: bool) -> RepoResult<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM meal m");
    push_scope(&mut qb, scope, include_inactive);
    let total = qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(total)
}

pub async fn page_summaries(
    pool: &SqlitePool,
    scope: MealScope,
    include_inactive: bool,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<MealSummary>> {
    let mut qb = QueryBuilder::<Sqlite>::new(SUMMARY_SELECT);
    push_scope(&mut qb, scope, include_inactive);
    qb.push(" ORDER BY m.id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let summaries = qb.build_query_as::<MealSummary>().fetch_all(pool).await?;
    Ok(summaries)
}

/// Multi-field filter
///
/// Each numeric criterion requires some variant matching it; the reported
/// `cost` is the first variant (by id) matching all of them. The name
/// criterion is matched after the query with Unicode case folding, since
/// SQLite's `LOWER` only folds ASCII.
pub async fn filter(
    pool: &SqlitePool,
    filter: &MealFilter,
    include_inactive: bool,
) -> RepoResult<Vec<FilteredMeal>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT m.id, m.name, m.description, (SELECT v.cost FROM meal_size_cost v WHERE v.meal_id = m.id",
    );
    if let Some(cost) = filter.cost {
        qb.push(" AND v.cost = ").push_bind(cost);
    }
    if let Some(size) = filter.size {
        qb.push(" AND v.size = ").push_bind(size);
    }
    if let Some(pieces) = filter.number_of_pieces {
        qb.push(" AND v.number_of_pieces = ").push_bind(pieces);
    }
    qb.push(
        " ORDER BY v.id LIMIT 1) AS cost, m.type, m.category_id, c.name AS category_name, m.status, m.image \
         FROM meal m LEFT JOIN category c ON c.id = m.category_id WHERE 1 = 1",
    );

    if let Some(cost) = filter.cost {
        qb.push(" AND EXISTS (SELECT 1 FROM meal_size_cost v WHERE v.meal_id = m.id AND v.cost = ")
            .push_bind(cost)
            .push(")");
    }
    if let Some(size) = filter.size {
        qb.push(" AND EXISTS (SELECT 1 FROM meal_size_cost v WHERE v.meal_id = m.id AND v.size = ")
            .push_bind(size)
            .push(")");
    }
    if let Some(pieces) = filter.number_of_pieces {
        qb.push(
            " AND EXISTS (SELECT 1 FROM meal_size_cost v WHERE v.meal_id = m.id AND v.number_of_pieces = ",
        )
        .push_bind(pieces)
        .push(")");
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND m.category_id = ").push_bind(category_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND m.status = ").push_bind(status);
    }
    if let Some(meal_type) = filter.meal_type {
        qb.push(" AND m.type = ").push_bind(meal_type.as_str());
    }
    if !include_inactive {
        qb.push(" AND m.status = 1");
    }
    qb.push(" ORDER BY m.id");

    let mut meals = qb.build_query_as::<FilteredMeal>().fetch_all(pool).await?;
    if let Some(name) = &filter.name {
        let needle = name.to_lowercase();
        meals.retain(|m| m.name.to_lowercase().contains(&needle));
    }
    Ok(meals)
}

pub async fn insert<'e, E>(executor: E, data: &MealCreate) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO meal (name, description, type, category_id, image, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.meal_type.as_str())
    .bind(data.category_id)
    .bind(&data.image)
    .bind(data.status)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Sparse update; `None` fields keep their stored value
pub async fn update(pool: &SqlitePool, id: i64, data: &MealPatch) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE meal SET name = COALESCE(?1, name), description = COALESCE(?2, description), type = COALESCE(?3, type), category_id = COALESCE(?4, category_id), image = COALESCE(?5, image), status = COALESCE(?6, status), updated_at = ?7 WHERE id = ?8",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.meal_type.map(|t| t.as_str()))
    .bind(data.category_id)
    .bind(&data.image)
    .bind(data.status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Meal {id} not found")));
    }
    Ok(())
}

pub async fn delete<'e, E>(executor: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("DELETE FROM meal WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::meal_size_cost;
    use crate::db::repository::test_support::{seed_category, test_pool};

    fn meal(name: &str, meal_type: MealType, status: bool) -> MealCreate {
        MealCreate {
            name: name.to_string(),
            description: "A dish worth describing".to_string(),
            meal_type,
            category_id: 1,
            image: Some("meals/dish.png".to_string()),
            status,
            size: 1,
            cost: 10.0,
            number_of_pieces: None,
        }
    }

    async fn seeded() -> SqlitePool {
        let pool = test_pool().await;
        seed_category(&pool, 1, "Mains").await;
        seed_category(&pool, 2, "Desserts").await;
        pool
    }

    #[tokio::test]
    async fn test_summary_uses_cheapest_variant() {
        let pool = seeded().await;
        let id = insert(&pool, &meal("Curry", MealType::NonVegetarian, true))
            .await
            .unwrap();
        meal_size_cost::insert(&pool, id, 3, 14.0, None).await.unwrap();
        meal_size_cost::insert(&pool, id, 1, 8.0, Some(4)).await.unwrap();
        meal_size_cost::insert(&pool, id, 2, 8.0, None).await.unwrap();

        let summary = find_summary(&pool, id, false).await.unwrap().unwrap();
        assert_eq!(summary.cost, Some(8.0));
        assert_eq!(summary.size, Some(1));
        assert_eq!(summary.number_of_pieces, Some(4));
        assert_eq!(summary.category_name.as_deref(), Some("Mains"));
    }

    #[tokio::test]
    async fn test_summary_without_variants() {
        let pool = seeded().await;
        let id = insert(&pool, &meal("Soup", MealType::Vegetarian, true))
            .await
            .unwrap();
        let summary = find_summary(&pool, id, false).await.unwrap().unwrap();
        assert!(summary.cost.is_none());
        assert!(summary.size.is_none());
    }

    #[tokio::test]
    async fn test_visibility() {
        let pool = seeded().await;
        insert(&pool, &meal("Curry", MealType::NonVegetarian, true))
            .await
            .unwrap();
        let hidden = insert(&pool, &meal("Stew", MealType::NonVegetarian, false))
            .await
            .unwrap();

        assert_eq!(list_summaries(&pool, false).await.unwrap().len(), 1);
        assert_eq!(list_summaries(&pool, true).await.unwrap().len(), 2);
        assert!(find_summary(&pool, hidden, false).await.unwrap().is_none());
        assert!(find_summary(&pool, hidden, true).await.unwrap().is_some());
        assert_eq!(count(&pool, MealScope::Status(false), false).await.unwrap(), 0);
        assert_eq!(count(&pool, MealScope::Status(false), true).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_paging_by_type() {
        let pool = seeded().await;
        for name in ["Aloo", "Baigan", "Chana"] {
            insert(&pool, &meal(name, MealType::Vegetarian, true))
                .await
                .unwrap();
        }
        insert(&pool, &meal("Duck", MealType::NonVegetarian, true))
            .await
            .unwrap();

        let scope = MealScope::Type(MealType::Vegetarian);
        assert_eq!(count(&pool, scope, false).await.unwrap(), 3);
        let page = page_summaries(&pool, scope, false, 2, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Chana");
    }

    #[tokio::test]
    async fn test_name_taken() {
        let pool = seeded().await;
        let id = insert(&pool, &meal("Curry", MealType::NonVegetarian, true))
            .await
            .unwrap();
        assert!(name_taken(&pool, "Curry", None).await.unwrap());
        assert!(!name_taken(&pool, "Curry", Some(id)).await.unwrap());
        assert!(!name_taken(&pool, "Korma", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_filter_variant_criteria() {
        let pool = seeded().await;
        let curry = insert(&pool, &meal("Green Curry", MealType::NonVegetarian, true))
            .await
            .unwrap();
        meal_size_cost::insert(&pool, curry, 1, 9.0, None).await.unwrap();
        meal_size_cost::insert(&pool, curry, 2, 12.0, Some(2)).await.unwrap();
        let salad = insert(&pool, &meal("Curry Salad", MealType::Vegetarian, true))
            .await
            .unwrap();
        meal_size_cost::insert(&pool, salad, 1, 6.0, None).await.unwrap();

        let by_name = MealFilter {
            name: Some("CURRY".into()),
            ..Default::default()
        };
        assert_eq!(filter(&pool, &by_name, false).await.unwrap().len(), 2);

        let by_size = MealFilter {
            size: Some(2),
            ..Default::default()
        };
        let found = filter(&pool, &by_size, false).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, curry);
        assert_eq!(found[0].cost, Some(12.0));

        let mixed = MealFilter {
            size: Some(1),
            number_of_pieces: Some(2),
            ..Default::default()
        };
        let found = filter(&pool, &mixed, false).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].cost.is_none());
    }

    #[tokio::test]
    async fn test_filter_name_is_literal() {
        let pool = seeded().await;
        insert(&pool, &meal("Curry", MealType::NonVegetarian, true))
            .await
            .unwrap();
        let wildcard = MealFilter {
            name: Some("%".into()),
            ..Default::default()
        };
        assert!(filter(&pool, &wildcard, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_name_folds_non_ascii_case() {
        let pool = seeded().await;
        let id = insert(&pool, &meal("CRÈME BRÛLÉE", MealType::Vegetarian, true))
            .await
            .unwrap();
        insert(&pool, &meal("Creme Caramel", MealType::Vegetarian, true))
            .await
            .unwrap();

        for needle in ["crème", "CRÈME", "brûlée"] {
            let by_name = MealFilter {
                name: Some(needle.into()),
                ..Default::default()
            };
            let found = filter(&pool, &by_name, false).await.unwrap();
            assert_eq!(found.len(), 1, "{needle}");
            assert_eq!(found[0].id, id);
        }
    }

    #[tokio::test]
    async fn test_sparse_update_and_delete() {
        let pool = seeded().await;
        let id = insert(&pool, &meal("Curry", MealType::NonVegetarian, true))
            .await
            .unwrap();
        let patch = MealPatch {
            category_id: Some(2),
            status: Some(false),
            ..Default::default()
        };
        update(&pool, id, &patch).await.unwrap();

        let stored = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.category_id, 2);
        assert!(!stored.status);
        assert_eq!(stored.name, "Curry");
        assert_eq!(stored.image.as_deref(), Some("meals/dish.png"));

        assert!(delete(&pool, id).await.unwrap());
        assert!(matches!(
            update(&pool, id, &patch).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
