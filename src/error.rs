//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its HTTP surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A write carried a negative TTL
    #[error("Invalid TTL: {0} (must be non-negative seconds)")]
    InvalidTtl(i64),

    /// Construction parameters were rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed request at the HTTP boundary
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key not found in cache (HTTP surface only, the engine reports `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Operation attempted after the adapter was torn down
    #[error("Cache adapter has been disconnected")]
    Disconnected,
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidTtl(_)
            | CacheError::InvalidConfig(_)
            | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Disconnected => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
