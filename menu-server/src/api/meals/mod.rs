//! Meal API
//!
//! Reads are public; an admin token additionally reveals inactive meals.
//! Writes require an admin token.

mod form;
mod handler;

pub use form::MealForm;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/meals", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/filter", get(handler::filter))
        .route("/category/{category_id}", get(handler::filter_by_category))
        .route("/type/{meal_type}", get(handler::filter_by_type))
        .route("/status/{status}", get(handler::filter_by_status))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/size-costs", get(handler::list_size_costs));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", post(handler::update).delete(handler::delete))
        .route("/{id}/size-costs", post(handler::update_size_cost))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    read_routes.merge(manage_routes)
}
