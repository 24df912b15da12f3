use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::intake::collector::Rejected;
use crate::session::store::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Generation failures are not errors at this level: they travel in-band as
/// `GenerationResult::Failure`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<Rejected> for AppError {
    fn from(rejected: Rejected) -> Self {
        AppError::Validation(rejected.reason)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => AppError::NotFound(e.to_string()),
            SessionError::InFlight(_) => AppError::Conflict(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "GENERATION_IN_PROGRESS",
                msg.clone(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::models::IntakePath;
    use uuid::Uuid;

    #[test]
    fn test_rejected_maps_to_bad_request() {
        let err: AppError = Rejected {
            reason: "zip required".to_string(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_session_errors_map_to_404_and_409() {
        let not_found: AppError = SessionError::NotFound(Uuid::new_v4()).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let in_flight: AppError = SessionError::InFlight(IntakePath::Strategy).into();
        assert_eq!(in_flight.into_response().status(), StatusCode::CONFLICT);
    }
}
