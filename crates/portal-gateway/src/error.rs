//! Mapping of service failures onto HTTP responses.
//!
//! Invalid input and unknown codes keep their message. Anything else is
//! logged with full detail and answered with a generic 500 body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portal_shortener::ShortenerError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    /// A request the router or an extractor refused before any handler ran.
    #[error("{1}")]
    Rejected(StatusCode, String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(ShortenerError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            AppError::Shortener(ShortenerError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Rejected(status, _) => *status,
            AppError::Shortener(ShortenerError::Storage(_)) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Shortener(e @ ShortenerError::InvalidUrl(_))
            | AppError::Shortener(e @ ShortenerError::NotFound(_)) => e.to_string(),
            AppError::Rejected(_, m) => m.clone(),
            AppError::Shortener(ShortenerError::Storage(e)) => {
                error!(error = %e, "storage error");
                INTERNAL_MESSAGE.to_owned()
            }
            AppError::Internal(m) => {
                error!(message = %m, "internal server error");
                INTERNAL_MESSAGE.to_owned()
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
