//! Meal write bodies
//!
//! Create and update accept `multipart/form-data` (the only way to send an
//! image), JSON objects, or url-encoded forms. Text parts become a raw
//! field bag; the `image` part becomes an [`UploadedFile`].

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Form, FromRequest, Multipart, Request};
use http::{StatusCode, header};
use serde_json::Value;

use crate::services::UploadedFile;
use crate::utils::validation::Input;
use crate::utils::{AppError, ErrorCode};

/// Multipart field carrying the meal image
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Default)]
pub struct MealForm {
    pub input: Input,
    pub image: Option<UploadedFile>,
}

impl MealForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD || field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                if name == IMAGE_FIELD {
                    form.image = Some(UploadedFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
                continue;
            }

            let text = field.text().await.map_err(multipart_error)?;
            form.input.insert(name, Value::String(text));
        }

        Ok(form)
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::with_message(
            ErrorCode::InvalidRequest,
            "The uploaded file exceeds the maximum allowed size",
        );
    }
    AppError::invalid_request(format!("Invalid multipart body: {}", e.body_text()))
}

impl<S: Send + Sync> FromRequest<S> for MealForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_request(e.body_text()))?;
            return Self::from_multipart(multipart).await;
        }

        if content_type.starts_with("application/json") {
            let Json(input) = Json::<Input>::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_request(format!("Invalid JSON body: {}", e.body_text())))?;
            return Ok(Self { input, image: None });
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::invalid_request(e.body_text()))?;
            let input = fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            return Ok(Self { input, image: None });
        }

        // Bodiless requests validate as an empty bag
        Ok(Self::default())
    }
}
