//! Meal service
//!
//! Owns the meal aggregate: a meal row, its size/cost variants and its image.
//! Read operations take `caller_is_admin`; non-admin callers never see
//! inactive meals, and a hidden meal is reported exactly like a missing one.

use std::sync::Arc;

use shared::Pagination;
use shared::models::{
    FilteredMeal, MealCreate, MealFilter, MealPatch, MealSizeCostView, MealSummary, MealType,
};
use shared::request::DEFAULT_PER_PAGE;
use sqlx::SqlitePool;

use super::{AssetStorage, UploadedFile, storage::IMAGE_EXTENSIONS};
use crate::db::repository::meal::MealScope;
use crate::db::repository::{RepoError, RepoResult, category, meal, meal_size_cost};
use crate::utils::validation::{Input, Rule, Validated, Validation, Validator, is_meal_name, is_non_blank};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Directory of meal images inside the asset storage
pub const MEAL_IMAGE_DIR: &str = "meals";

const NAME_CREATE: &[Rule] = &[Rule::Required, Rule::String, Rule::Format(is_meal_name)];
const NAME_UPDATE: &[Rule] = &[Rule::Sometimes, Rule::String, Rule::Format(is_meal_name)];
const DESCRIPTION_CREATE: &[Rule] = &[
    Rule::Required,
    Rule::String,
    Rule::MinLen(10),
    Rule::MaxLen(255),
    Rule::Format(is_non_blank),
];
const DESCRIPTION_UPDATE: &[Rule] = &[
    Rule::Sometimes,
    Rule::String,
    Rule::MinLen(10),
    Rule::MaxLen(255),
    Rule::Format(is_non_blank),
];
const TYPE_CREATE: &[Rule] = &[Rule::Required, Rule::In(&MealType::VALUES)];
const TYPE_UPDATE: &[Rule] = &[Rule::Sometimes, Rule::In(&MealType::VALUES)];
const CATEGORY_CREATE: &[Rule] = &[Rule::Required, Rule::Integer];
const CATEGORY_UPDATE: &[Rule] = &[Rule::Sometimes, Rule::Integer];
const STATUS: &[Rule] = &[Rule::Sometimes, Rule::Boolean];
const SIZE_REQUIRED: &[Rule] = &[Rule::Required, Rule::Integer, Rule::Min(1.0), Rule::Max(4.0)];
const SIZE_UPDATE: &[Rule] = &[Rule::Sometimes, Rule::Integer, Rule::Min(1.0), Rule::Max(4.0)];
const COST_REQUIRED: &[Rule] = &[Rule::Required, Rule::Numeric, Rule::Min(1.0)];
const COST_UPDATE: &[Rule] = &[Rule::Sometimes, Rule::Numeric, Rule::Min(1.0)];
const PIECES: &[Rule] = &[Rule::Nullable, Rule::Integer, Rule::Min(1.0)];
const SIZE_COST_ID: &[Rule] = &[Rule::Sometimes, Rule::Integer, Rule::Min(1.0)];

const FILTER_TEXT: &[Rule] = &[Rule::Nullable, Rule::String];
const FILTER_INT: &[Rule] = &[Rule::Nullable, Rule::Integer];
const FILTER_NUMBER: &[Rule] = &[Rule::Nullable, Rule::Numeric];
const FILTER_BOOL: &[Rule] = &[Rule::Nullable, Rule::Boolean];

/// Variant fields of a meal update
const VARIANT_FIELDS: [&str; 3] = ["size", "cost", "number_of_pieces"];

/// One page of meal summaries
#[derive(Debug, Clone)]
pub struct MealPage {
    pub meals: Vec<MealSummary>,
    pub pagination: Pagination,
}

pub struct MealService {
    pool: SqlitePool,
    storage: Arc<dyn AssetStorage>,
}

fn meal_not_found() -> AppError {
    AppError::new(ErrorCode::MealNotFound)
}

/// Image rule messages; `None` when the upload is acceptable
fn image_error(file: &UploadedFile) -> Option<String> {
    let known_ext = file
        .extension()
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
    if !known_ext {
        return Some(format!(
            "The image must be a file of type: {}.",
            IMAGE_EXTENSIONS.join(", ")
        ));
    }
    if !file.is_image() {
        return Some("The image must be an image.".to_string());
    }
    None
}

fn has_value(input: &Input, field: &str) -> bool {
    input.get(field).is_some_and(|v| match v {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

impl MealService {
    pub fn new(pool: SqlitePool, storage: Arc<dyn AssetStorage>) -> Self {
        Self { pool, storage }
    }

    // ==================== Reads ====================

    pub async fn list(&self, caller_is_admin: bool) -> AppResult<Vec<MealSummary>> {
        Ok(meal::list_summaries(&self.pool, caller_is_admin).await?)
    }

    pub async fn get_by_id(&self, id: i64, caller_is_admin: bool) -> AppResult<MealSummary> {
        meal::find_summary(&self.pool, id, caller_is_admin)
            .await?
            .ok_or_else(meal_not_found)
    }

    pub async fn list_size_costs(&self, meal_id: i64) -> AppResult<Vec<MealSizeCostView>> {
        self.ensure_meal(meal_id).await?;
        let rows = meal_size_cost::find_by_meal(&self.pool, meal_id).await?;
        Ok(rows.into_iter().map(MealSizeCostView::from).collect())
    }

    pub async fn filter_by_category(
        &self,
        category_id: i64,
        page: i64,
        caller_is_admin: bool,
    ) -> AppResult<MealPage> {
        if !category::exists(&self.pool, category_id).await? {
            return Err(AppError::new(ErrorCode::CategoryNotFound));
        }
        self.paginate(
            MealScope::Category(category_id),
            page,
            caller_is_admin,
            "No meals found for this category",
        )
        .await
    }

    pub async fn filter_by_type(
        &self,
        meal_type: &str,
        page: i64,
        caller_is_admin: bool,
    ) -> AppResult<MealPage> {
        let meal_type: MealType = meal_type
            .parse()
            .map_err(|_| AppError::new(ErrorCode::InvalidMealType))?;
        self.paginate(
            MealScope::Type(meal_type),
            page,
            caller_is_admin,
            "No meals found for this type",
        )
        .await
    }

    /// `active` or `inactive`; visibility still applies, so non-admin
    /// callers asking for inactive meals get an empty result
    pub async fn filter_by_status(
        &self,
        status: &str,
        page: i64,
        caller_is_admin: bool,
    ) -> AppResult<MealPage> {
        let status = match status {
            "active" => true,
            "inactive" => false,
            _ => return Err(AppError::new(ErrorCode::InvalidMealStatus)),
        };
        self.paginate(
            MealScope::Status(status),
            page,
            caller_is_admin,
            "No meals found for this status",
        )
        .await
    }

    /// Multi-field filter over query parameters
    pub async fn filter(&self, input: &Input, caller_is_admin: bool) -> AppResult<Vec<FilteredMeal>> {
        let data = Validator::new(input)
            .rule("name", FILTER_TEXT)
            .rule("cost", FILTER_NUMBER)
            .rule("size", FILTER_INT)
            .rule("number_of_pieces", FILTER_INT)
            .rule("category_id", FILTER_INT)
            .rule("status", FILTER_BOOL)
            .rule("type", FILTER_TEXT)
            .validate()?;

        let no_results =
            || AppError::with_message(ErrorCode::NoResults, "No meals found with the given filters");

        let meal_type = match data.str("type") {
            Some(raw) => Some(raw.parse::<MealType>().map_err(|_| no_results())?),
            None => None,
        };
        let filter = MealFilter {
            name: data.string("name"),
            cost: data.float("cost"),
            size: data.int("size"),
            number_of_pieces: data.int("number_of_pieces"),
            category_id: data.int("category_id"),
            status: data.bool("status"),
            meal_type,
        };

        let meals = meal::filter(&self.pool, &filter, caller_is_admin).await?;
        if meals.is_empty() {
            return Err(no_results());
        }
        Ok(meals)
    }

    // ==================== Writes ====================

    /// Create a meal with its first variant
    ///
    /// The image is stored first; the meal and variant rows are written in
    /// one transaction. Returns the new meal id.
    pub async fn create(&self, input: &Input, image: Option<&UploadedFile>) -> AppResult<i64> {
        let mut check = Validator::new(input)
            .rule("name", NAME_CREATE)
            .rule("description", DESCRIPTION_CREATE)
            .rule("type", TYPE_CREATE)
            .rule("category_id", CATEGORY_CREATE)
            .rule("status", STATUS)
            .rule("size", SIZE_REQUIRED)
            .rule("cost", COST_REQUIRED)
            .rule("number_of_pieces", PIECES)
            .run();
        self.check_references(&mut check, None).await?;
        match image.filter(|f| !f.data.is_empty()) {
            None => check.fail("image", "The image field is required."),
            Some(file) => {
                if let Some(message) = image_error(file) {
                    check.fail("image", message);
                }
            }
        }
        let data = check.finish()?;

        let mut payload = MealCreate {
            name: data.required("name", Validated::string)?,
            description: data.required("description", Validated::string)?,
            meal_type: data
                .required("type", Validated::string)?
                .parse()
                .map_err(|_| AppError::new(ErrorCode::InvalidMealType))?,
            category_id: data.required("category_id", Validated::int)?,
            image: None,
            status: data.bool("status").unwrap_or(true),
            size: data.required("size", Validated::int)?,
            cost: data.required("cost", Validated::float)?,
            number_of_pieces: data.int("number_of_pieces"),
        };

        let Some(file) = image else {
            return Err(AppError::validation("The image field is required."));
        };
        let path = self.storage.store(MEAL_IMAGE_DIR, file).await?;
        payload.image = Some(path.clone());

        match self.insert_with_variant(&payload).await {
            Ok(id) => {
                tracing::info!(meal_id = id, name = %payload.name, "Meal created");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Meal creation rolled back");
                self.storage.delete(&path).await;
                Err(AppError::internal(e.to_string()))
            }
        }
    }

    async fn insert_with_variant(&self, payload: &MealCreate) -> RepoResult<i64> {
        let mut tx = self.pool.begin().await?;
        let id = meal::insert(&mut *tx, payload).await?;
        meal_size_cost::insert(
            &mut *tx,
            id,
            payload.size,
            payload.cost,
            payload.number_of_pieces,
        )
        .await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Sparse update of a meal, optionally replacing its image and
    /// upserting the variant keyed by `size`
    pub async fn update(
        &self,
        id: i64,
        input: &Input,
        image: Option<&UploadedFile>,
    ) -> AppResult<()> {
        let current = meal::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(meal_not_found)?;

        let mut check = Validator::new(input)
            .rule("name", NAME_UPDATE)
            .rule("description", DESCRIPTION_UPDATE)
            .rule("type", TYPE_UPDATE)
            .rule("category_id", CATEGORY_UPDATE)
            .rule("status", STATUS)
            .rule("size", SIZE_UPDATE)
            .rule("cost", COST_UPDATE)
            .rule("number_of_pieces", PIECES)
            .run();
        self.check_references(&mut check, Some(id)).await?;
        let image = image.filter(|f| !f.data.is_empty());
        if let Some(message) = image.and_then(image_error) {
            check.fail("image", message);
        }

        let variant_supplied = VARIANT_FIELDS.iter().any(|f| input.contains_key(*f));
        if variant_supplied && !has_value(input, "size") {
            check.fail(
                "size",
                "The size field is required when cost / number of pieces is present.",
            );
        }

        // A new size needs a cost
        let mut existing_variant = None;
        if variant_supplied
            && check.passed("size")
            && let Some(size) = check.data().int("size")
        {
            existing_variant = meal_size_cost::find_by_size(&self.pool, id, size).await?;
            if existing_variant.is_none() && !has_value(input, "cost") {
                check.fail("cost", "The cost field is required when adding a new size.");
            }
        }
        let data = check.finish()?;

        let mut patch = MealPatch {
            name: data.string("name"),
            description: data.string("description"),
            meal_type: data.str("type").and_then(|t| t.parse().ok()),
            category_id: data.int("category_id"),
            image: None,
            status: data.bool("status"),
        };

        if let Some(file) = image {
            if let Some(old) = current.image.as_deref() {
                self.storage.delete(old).await;
            }
            patch.image = Some(self.storage.store(MEAL_IMAGE_DIR, file).await?);
        }

        if !patch.is_empty() {
            meal::update(&self.pool, id, &patch)
                .await
                .map_err(|e| match e {
                    RepoError::NotFound(_) => meal_not_found(),
                    RepoError::Duplicate(_) => AppError::invalid_fields(
                        [("name".to_string(), vec!["The name has already been taken.".to_string()])]
                            .into(),
                    ),
                    other => other.into(),
                })?;
        }

        if variant_supplied && let Some(size) = data.int("size") {
            let cost = data.float("cost");
            let pieces = data.nullable_int("number_of_pieces");
            match existing_variant {
                Some(variant) => {
                    meal_size_cost::update(&self.pool, variant.id, None, cost, pieces).await?;
                }
                None => {
                    let cost = data.required("cost", Validated::float)?;
                    meal_size_cost::insert(&self.pool, id, size, cost, pieces.flatten())
                        .await
                        .map_err(|e| match e {
                            RepoError::Duplicate(_) => AppError::new(ErrorCode::SizeCostExists),
                            other => other.into(),
                        })?;
                }
            }
        }

        tracing::info!(meal_id = id, "Meal updated");
        Ok(())
    }

    /// Update a variant by explicit `id`, or add one for a new size
    pub async fn update_size_cost(&self, meal_id: i64, input: &Input) -> AppResult<()> {
        self.ensure_meal(meal_id).await?;

        let data = Validator::new(input)
            .rule("id", SIZE_COST_ID)
            .rule("number_of_pieces", PIECES)
            .rule("size", SIZE_REQUIRED)
            .rule("cost", COST_REQUIRED)
            .validate()?;
        let size = data.required("size", Validated::int)?;
        let cost = data.required("cost", Validated::float)?;
        let pieces = data.int("number_of_pieces");

        match data.int("id") {
            Some(variant_id) => {
                let variant = meal_size_cost::find_for_meal(&self.pool, meal_id, variant_id)
                    .await?
                    .ok_or_else(|| AppError::new(ErrorCode::SizeCostNotFound))?;
                let taken = meal_size_cost::find_by_size(&self.pool, meal_id, size)
                    .await?
                    .is_some_and(|other| other.id != variant.id);
                if taken {
                    return Err(AppError::new(ErrorCode::SizeCostExistsOther));
                }
                meal_size_cost::update(
                    &self.pool,
                    variant.id,
                    Some(size),
                    Some(cost),
                    pieces.map(Some),
                )
                .await
                .map_err(|e| match e {
                    RepoError::Duplicate(_) => AppError::new(ErrorCode::SizeCostExistsOther),
                    RepoError::NotFound(_) => AppError::new(ErrorCode::SizeCostNotFound),
                    other => other.into(),
                })?;
            }
            None => {
                if meal_size_cost::find_by_size(&self.pool, meal_id, size)
                    .await?
                    .is_some()
                {
                    return Err(AppError::new(ErrorCode::SizeCostExists));
                }
                meal_size_cost::insert(&self.pool, meal_id, size, cost, pieces)
                    .await
                    .map_err(|e| match e {
                        RepoError::Duplicate(_) => AppError::new(ErrorCode::SizeCostExists),
                        other => other.into(),
                    })?;
            }
        }
        Ok(())
    }

    /// Remove the image, then the variants and the meal in one transaction
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let current = meal::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(meal_not_found)?;
        if let Some(path) = current.image.as_deref() {
            self.storage.delete(path).await;
        }

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        meal_size_cost::delete_by_meal(&mut *tx, id).await?;
        meal::delete(&mut *tx, id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(meal_id = id, "Meal deleted");
        Ok(())
    }

    // ==================== Helpers ====================

    async fn ensure_meal(&self, id: i64) -> AppResult<()> {
        match meal::find_by_id(&self.pool, id).await? {
            Some(_) => Ok(()),
            None => Err(meal_not_found()),
        }
    }

    /// Name uniqueness and category existence for fields that passed so far
    async fn check_references(&self, check: &mut Validation, except_id: Option<i64>) -> AppResult<()> {
        if check.passed("name")
            && let Some(name) = check.data().string("name")
            && meal::name_taken(&self.pool, &name, except_id).await?
        {
            check.fail("name", "The name has already been taken.");
        }
        if check.passed("category_id")
            && let Some(category_id) = check.data().int("category_id")
            && !category::exists(&self.pool, category_id).await?
        {
            check.fail("category_id", "The selected category id is invalid.");
        }
        Ok(())
    }

    async fn paginate(
        &self,
        scope: MealScope,
        page: i64,
        caller_is_admin: bool,
        empty_message: &str,
    ) -> AppResult<MealPage> {
        let total = meal::count(&self.pool, scope, caller_is_admin).await?;
        let pagination = Pagination::new(total, DEFAULT_PER_PAGE, page.max(1));
        if pagination.is_out_of_range() {
            return Err(AppError::new(ErrorCode::PageOutOfRange));
        }

        let meals = meal::page_summaries(
            &self.pool,
            scope,
            caller_is_admin,
            pagination.per_page,
            pagination.offset(),
        )
        .await?;
        if meals.is_empty() {
            return Err(AppError::with_message(ErrorCode::NoResults, empty_message));
        }
        Ok(MealPage { meals, pagination })
    }
}
