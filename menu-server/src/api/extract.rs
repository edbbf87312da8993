//! Request extractors
//!
//! Thin wrappers over axum's extractors that reject with [`AppError`] so
//! malformed requests still answer with the JSON envelope.

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde_json::Value;

use crate::utils::AppError;
use crate::utils::validation::Input;

/// JSON object body as a raw field bag
#[derive(Debug, Clone, Default)]
pub struct JsonInput(pub Input);

impl<S: Send + Sync> FromRequest<S> for JsonInput {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(input) = Json::<Input>::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid_request(format!("Invalid JSON body: {}", e.body_text())))?;
        Ok(Self(input))
    }
}

/// Query string as a raw field bag; every value is a string
#[derive(Debug, Clone, Default)]
pub struct QueryInput(pub Input);

impl<S: Send + Sync> FromRequestParts<S> for QueryInput {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::invalid_request(format!("Invalid query string: {}", e.body_text())))?;
        Ok(Self(
            params
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        ))
    }
}

/// Numeric `{id}` path segment
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for IdPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::invalid_request(format!("Invalid id: {}", e.body_text())))?;
        Ok(Self(id))
    }
}
