use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Everything a handler can fail with, mapped onto the three failure shapes
/// of the API contract.
///
/// Validation is checked before any store call, so a 400 guarantees nothing
/// was written. Store failures are surfaced once with the operation's
/// message plus the underlying error text; they are never retried.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MissingFields(String),

    #[error("{0}")]
    NotFound(&'static str),

    /// Body the extractor could not read at all (malformed JSON, wrong
    /// content type). Keeps the rejection's status but renders the body in
    /// the same `{message}` shape as every other failure.
    #[error("{message}")]
    InvalidBody {
        status: StatusCode,
        message: String,
    },

    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        source: StoreError,
    },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingFields(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message,
                    error: None,
                },
            ),
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message: message.to_string(),
                    error: None,
                },
            ),
            AppError::InvalidBody { status, message } => (
                status,
                ErrorBody {
                    message,
                    error: None,
                },
            ),
            AppError::Store { message, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    message: message.to_string(),
                    error: Some(source.to_string()),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_maps_to_400() {
        let response =
            AppError::MissingFields("Title and description are required".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound("Project not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_body_keeps_the_rejection_status() {
        let response = AppError::InvalidBody {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn store_failure_maps_to_500() {
        let response = AppError::Store {
            message: "Failed to fetch projects",
            source: StoreError::Encode("bad document".to_string()),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
