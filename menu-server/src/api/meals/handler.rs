//! Meal API Handlers

use axum::extract::{Path, Query, State};
use http::StatusCode;
use shared::models::{FilteredMeal, MealSizeCostView, MealSummary};
use shared::request::PageQuery;

use super::form::MealForm;
use crate::api::extract::{IdPath, JsonInput, QueryInput};
use crate::auth::Caller;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

const MEAL_UPDATED: &str = "The meal has been updated successfully";

/// GET /api/meals
pub async fn list(
    State(state): State<ServerState>,
    caller: Caller,
) -> AppResult<ApiResponse<Vec<MealSummary>>> {
    let meals = state.meal_service().list(caller.is_admin()).await?;
    Ok(ApiResponse::success(meals))
}

/// GET /api/meals/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    caller: Caller,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<MealSummary>> {
    let meal = state.meal_service().get_by_id(id, caller.is_admin()).await?;
    Ok(ApiResponse::success(meal))
}

/// GET /api/meals/{id}/size-costs
pub async fn list_size_costs(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<Vec<MealSizeCostView>>> {
    let costs = state.meal_service().list_size_costs(id).await?;
    Ok(ApiResponse::success(costs))
}

/// GET /api/meals/category/{category_id}?page=
pub async fn filter_by_category(
    State(state): State<ServerState>,
    caller: Caller,
    IdPath(category_id): IdPath,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<MealSummary>>> {
    let page = state
        .meal_service()
        .filter_by_category(category_id, query.page, caller.is_admin())
        .await?;
    Ok(ApiResponse::success(page.meals).with_pagination(page.pagination))
}

/// GET /api/meals/type/{meal_type}?page=
pub async fn filter_by_type(
    State(state): State<ServerState>,
    caller: Caller,
    Path(meal_type): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<MealSummary>>> {
    let page = state
        .meal_service()
        .filter_by_type(&meal_type, query.page, caller.is_admin())
        .await?;
    Ok(ApiResponse::success(page.meals).with_pagination(page.pagination))
}

/// GET /api/meals/status/{status}?page=
pub async fn filter_by_status(
    State(state): State<ServerState>,
    caller: Caller,
    Path(status): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<MealSummary>>> {
    let page = state
        .meal_service()
        .filter_by_status(&status, query.page, caller.is_admin())
        .await?;
    Ok(ApiResponse::success(page.meals).with_pagination(page.pagination))
}

/// GET /api/meals/filter?name=&cost=&size=&number_of_pieces=&category_id=&status=&type=
pub async fn filter(
    State(state): State<ServerState>,
    caller: Caller,
    QueryInput(input): QueryInput,
) -> AppResult<ApiResponse<Vec<FilteredMeal>>> {
    let meals = state.meal_service().filter(&input, caller.is_admin()).await?;
    Ok(ApiResponse::success(meals))
}

/// POST /api/meals - multipart with an `image` part
pub async fn create(
    State(state): State<ServerState>,
    form: MealForm,
) -> AppResult<(StatusCode, ApiResponse<()>)> {
    state
        .meal_service()
        .create(&form.input, form.image.as_ref())
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::<()>::message("The meal has been added successfully"),
    ))
}

/// POST /api/meals/{id} - sparse update, optional new image and variant upsert
pub async fn update(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
    form: MealForm,
) -> AppResult<ApiResponse<()>> {
    state
        .meal_service()
        .update(id, &form.input, form.image.as_ref())
        .await?;
    Ok(ApiResponse::<()>::message(MEAL_UPDATED))
}

/// POST /api/meals/{id}/size-costs
pub async fn update_size_cost(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
    JsonInput(input): JsonInput,
) -> AppResult<ApiResponse<()>> {
    state.meal_service().update_size_cost(id, &input).await?;
    Ok(ApiResponse::<()>::message(MEAL_UPDATED))
}

/// DELETE /api/meals/{id}
pub async fn delete(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<()>> {
    state.meal_service().delete(id).await?;
    Ok(ApiResponse::<()>::message("Meal deleted successfully"))
}
