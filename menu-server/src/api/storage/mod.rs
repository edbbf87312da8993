//! Stored asset downloads
//!
//! `GET /storage/{*path}` serves meal images and QR codes. Paths are the
//! relative paths kept in the database, e.g. `qr_codes/table_1_floor_1_num_4.png`.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/storage/{*path}", get(serve_asset))
}

async fn serve_asset(
    State(state): State<ServerState>,
    Path(path): Path<String>,
) -> AppResult<impl IntoResponse> {
    let content = state.storage.read(&path).await?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    tracing::debug!(path = %path, size = content.len(), "Serving asset");

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        Bytes::from(content),
    ))
}
