use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Error, Debug)]
pub enum QrServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl QrServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Encoding(_) | Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

impl IntoResponse for QrServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
            return json_error(status, INTERNAL_ERROR_MESSAGE);
        }
        json_error(status, &self.to_string())
    }
}

pub type QrResult<T> = Result<T, QrServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(QrServiceError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(QrServiceError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            QrServiceError::encoding("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            QrServiceError::from(StoreError::Backend("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn client_errors_keep_their_message() {
        assert_eq!(
            QrServiceError::validation("Text is required").to_string(),
            "Text is required"
        );
    }
}
