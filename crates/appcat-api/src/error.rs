//! API error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::requests::store::StoreError;
use crate::search::engine::EngineError;
use crate::search::query::QueryError;

/// Errors surfaced to API callers with a stable kind and message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range caller input.
    #[error("{0}")]
    InvalidInput(String),
    /// The actor lacks the role required for the operation.
    #[error("{0}")]
    Forbidden(&'static str),
    /// A referenced app or app request does not exist.
    #[error("{0}")]
    NotFound(&'static str),
    /// Attempted transition on a request that is no longer pending.
    #[error("{0}")]
    Conflict(&'static str),
    /// The index engine or database is unreachable or failing.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    /// Stable machine-readable kind carried in the response body.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Upstream(_) => "upstream_unavailable",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// JSON body rendered for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<appcat_core::request::ValidationError> for ApiError {
    fn from(e: appcat_core::request::ValidationError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        error!("store error: {e}");
        Self::Upstream("storage temporarily unavailable".to_owned())
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        error!("search engine error: {e}");
        Self::Upstream("search temporarily unavailable".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(ApiError::InvalidInput(String::new()).kind(), "invalid_input");
        assert_eq!(ApiError::Forbidden("x").kind(), "forbidden");
        assert_eq!(ApiError::NotFound("x").kind(), "not_found");
        assert_eq!(ApiError::Conflict("x").kind(), "conflict");
        assert_eq!(ApiError::Upstream(String::new()).kind(), "upstream_unavailable");
    }

    #[test]
    fn validation_error_maps_to_invalid_input() {
        let e: ApiError = appcat_core::request::ValidationError::TooShort { min: 10, got: 2 }.into();
        assert_eq!(e.kind(), "invalid_input");
    }
}
