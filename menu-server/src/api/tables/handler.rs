//! Dining Table API Handlers

use axum::extract::State;
use http::StatusCode;
use shared::models::DiningTable;

use crate::api::extract::{IdPath, JsonInput};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/dining-tables
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<DiningTable>>> {
    let tables = state.dining_table_service().list_all().await?;
    Ok(ApiResponse::success(tables))
}

/// GET /api/dining-tables/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<DiningTable>> {
    let table = state.dining_table_service().get_by_id(id).await?;
    Ok(ApiResponse::success(table))
}

/// POST /api/dining-tables - create and generate the QR code
pub async fn create(
    State(state): State<ServerState>,
    JsonInput(input): JsonInput,
) -> AppResult<(StatusCode, ApiResponse<DiningTable>)> {
    let created = state.dining_table_service().create(&input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(created.table).with_qr_code_url(created.qr_code_url),
    ))
}

/// PUT /api/dining-tables/{id}
pub async fn update(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
    JsonInput(input): JsonInput,
) -> AppResult<ApiResponse<DiningTable>> {
    let table = state.dining_table_service().update(id, &input).await?;
    Ok(ApiResponse::success(table))
}

/// DELETE /api/dining-tables/{id}
pub async fn delete(
    State(state): State<ServerState>,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<()>> {
    state.dining_table_service().delete(id).await?;
    Ok(ApiResponse::<()>::message("Dining table deleted successfully"))
}
