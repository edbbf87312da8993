//! Authentication middleware
//!
//! Guards the administrative routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::ErrorCode;

/// Admin middleware
///
/// Validates `Authorization: Bearer <token>`, requires the `admin` role and
/// injects [`CurrentUser`] into the request extensions.
///
/// | Failure | Status |
/// |---------|--------|
/// | missing header | 401 |
/// | expired / invalid token | 401 |
/// | non-admin role | 403 |
pub async fn require_admin(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::not_authenticated());
        }
    };

    let user = match state.get_jwt_service().validate_token(token) {
        Ok(claims) => CurrentUser::from(claims),
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            return match e {
                JwtError::Expired => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            username = user.username.clone(),
            user_role = user.role.clone()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
