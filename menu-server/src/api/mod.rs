//! HTTP API
//!
//! - [`health`] - liveness and database check
//! - [`tables`] - dining table management (admin)
//! - [`meals`] - meal catalogue, public reads and admin writes
//! - [`storage`] - stored asset downloads
//! - [`extract`] - request extractors shared by the handlers

pub mod extract;
pub mod health;
pub mod meals;
pub mod storage;
pub mod tables;

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, without global middleware
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Public
        .merge(health::router())
        .merge(storage::router())
        // Public reads, admin writes
        .merge(meals::router(state))
        // Admin only
        .merge(tables::router(state))
}

/// Fully configured application, used by the server and the integration tests
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);
    let body_limit = state.config.max_upload_bytes;

    build_router(&state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state)
}
