//! Caller extractors
//!
//! [`Caller`] resolves the caller's capability for public read endpoints
//! without ever rejecting the request. Admin routes are guarded by
//! [`require_admin`](crate::auth::require_admin) instead.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;

/// Capability of the caller on a public endpoint
///
/// Missing or invalid credentials yield a guest caller.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user: Option<CurrentUser>,
}

impl Caller {
    pub fn guest() -> Self {
        Self { user: None }
    }

    pub fn admin(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    /// Administrators see inactive meals
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(CurrentUser::is_admin)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
}

impl FromRequestParts<ServerState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(Self {
                user: Some(user.clone()),
            });
        }

        let Some(token) = bearer_token(parts) else {
            return Ok(Self::guest());
        };

        match state.get_jwt_service().validate_token(token) {
            Ok(claims) => Ok(Self {
                user: Some(CurrentUser::from(claims)),
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid token on public route");
                Ok(Self::guest())
            }
        }
    }
}
