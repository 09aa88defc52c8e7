//! API Handlers
//!
//! HTTP request handlers mapping each endpoint onto the `CacheAdapter`
//! contract.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::{CacheAdapter, HealthReport, MemoryAdapter, StatsSnapshot};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, MgetRequest, MgetResponse, MsetRequest, MsetResponse,
    SetRequest, SetResponse,
};

/// Application state shared across all handlers.
///
/// Handlers only see the adapter contract, never a concrete backend.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheAdapter>,
}

impl AppState {
    /// Creates a new AppState around any adapter.
    pub fn new(cache: impl CacheAdapter + 'static) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates an in-memory AppState from configuration.
    ///
    /// Must be called inside a tokio runtime because it starts the
    /// expiration sweeper.
    pub fn from_config(config: &Config) -> Result<Self> {
        let adapter = MemoryAdapter::from_config(config)?.with_sweeper(config.sweep_interval());
        Ok(Self::new(adapter))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.set(&req.key, req.value, req.ttl).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Not-found and expired keys both answer 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Deleting an absent key is not an error; `deleted` reports whether it
/// existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.cache.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for POST /mget
pub async fn mget_handler(
    State(state): State<AppState>,
    Json(req): Json<MgetRequest>,
) -> Result<Json<MgetResponse>> {
    let values = state.cache.mget(&req.keys).await?;

    Ok(Json(MgetResponse::new(req.keys, values)))
}

/// Handler for PUT /mset
pub async fn mset_handler(
    State(state): State<AppState>,
    Json(req): Json<MsetRequest>,
) -> Result<Json<MsetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let count = req.entries.len();
    state.cache.mset(req.entries).await?;

    Ok(Json(MsetResponse::new(count)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsSnapshot>> {
    Ok(Json(state.cache.stats().await?))
}

/// Handler for GET /health
///
/// Answers 503 when the adapter reports itself unhealthy.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.cache.health_check().await;
    let status = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}
