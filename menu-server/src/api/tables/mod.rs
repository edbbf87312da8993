//! Dining table API
//!
//! Every route requires an admin token.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/dining-tables", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
}
