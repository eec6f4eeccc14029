//! Conversion of pipeline failures into JSON error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tessera_components::StoreError;
use tessera_render::{ExportError, PipelineError};

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// An error on its way to becoming a `{ "error": ... }` response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let status = match &err {
            PipelineError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            PipelineError::Export(ExportError::InvalidFilename(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        } else {
            tracing::warn!("{}", self.message);
        }

        let body = ApiErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_missing_directory_to_not_found() {
        let err: ApiError = PipelineError::Store(StoreError::NotFound("components".into())).into();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Components directory not found: components");
    }

    #[test]
    fn maps_bad_filename_to_bad_request() {
        let err: ApiError =
            PipelineError::Export(ExportError::InvalidFilename("../x".into())).into();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_collisions_to_server_error() {
        let err: ApiError = PipelineError::Store(StoreError::Collision {
            identifier: "hero".into(),
            first: "hero.css".into(),
            second: "hero.html".into(),
        })
        .into();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
