//! Handler error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use super::validation::{FieldViolation, Source, ValidationError};
use crate::store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input, rejected before any domain logic.
    Validation(ValidationError),
    /// The bearer identifier does not name an ONG.
    Unauthorized(&'static str),
    NotFound(&'static str),
    /// Ownership mismatch.
    Forbidden(&'static str),
    Storage(StoreError),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationDetails {
    pub source: Source,
    pub keys: Vec<String>,
    pub errors: Vec<FieldViolation>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationDetails>,
}

impl ErrorBody {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message: message.into(),
            validation: None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err)
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    /// Storage failures are logged server-side and surfaced as `500` without
    /// leaking details.
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(err) => {
                let mut body = ErrorBody::new(status, err.message());
                body.validation = Some(ValidationDetails {
                    source: err.source,
                    keys: err.keys().into_iter().map(str::to_string).collect(),
                    errors: err.violations,
                });
                body
            }
            Self::Unauthorized(message) | Self::NotFound(message) | Self::Forbidden(message) => {
                ErrorBody::new(status, message)
            }
            Self::Storage(err) => {
                error!("Storage error: {err}");
                ErrorBody::new(status, "An internal server error occurred")
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::Unauthorized("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Storage(StoreError::Constraint("fk".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_body_uses_camel_case() {
        let body = ErrorBody::new(StatusCode::FORBIDDEN, "Operation not permitted.");
        let value = serde_json::to_value(&body).unwrap_or_default();
        assert_eq!(value["statusCode"], 403);
        assert_eq!(value["error"], "Forbidden");
        assert!(value.get("validation").is_none());
    }
}
