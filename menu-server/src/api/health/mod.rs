//! Health check
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | none |
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "database": true, "uptime_seconds": 42 }
//! ```

use std::sync::OnceLock;
use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

static START_TIME: OnceLock<Instant> = OnceLock::new();

pub fn router() -> Router<ServerState> {
    START_TIME.get_or_init(Instant::now);
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    database: bool,
    uptime_seconds: u64,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .is_ok();
    if !database {
        tracing::warn!("Health check: database unreachable");
    }

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        uptime_seconds: START_TIME.get_or_init(Instant::now).elapsed().as_secs(),
    })
}
