//! Remote collector: accepts posted batches from agents.

use crate::config::CollectorConfig;
use crate::error::{ServerError, ServerResult};
use crate::page::{self, PageMode};
use crate::server::{serve, ServerHandle};
use crate::store::LogStore;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use mlwatch_core::LogRecord;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
struct CollectorState {
    store: Arc<LogStore>,
    page: Arc<str>,
}

/// Body of `POST /post_logs`.
#[derive(Debug, Deserialize)]
struct PostLogs {
    #[serde(default)]
    log: Option<Vec<LogRecord>>,
}

/// Builds the collector routes over `store`.
pub fn collector_router(store: Arc<LogStore>, config: &CollectorConfig) -> Router {
    let state = CollectorState {
        store,
        page: page::render(config.poll_interval, PageMode::Replace).into(),
    };
    Router::new()
        .route("/", get(index))
        .route("/post_logs", post(post_logs))
        .route("/logs", get(list_logs))
        .with_state(state)
}

async fn index(State(state): State<CollectorState>) -> Html<String> {
    Html(state.page.to_string())
}

async fn post_logs(
    State(state): State<CollectorState>,
    body: Result<Json<PostLogs>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let Json(body) = body.map_err(|e| ServerError::InvalidRequest(e.body_text()))?;
    if let Some(batch) = body.log.filter(|b| !b.is_empty()) {
        debug!(count = batch.len(), "received batch");
        state.store.append(batch);
    }
    Ok((StatusCode::CREATED, Json(json!({ "status": "success" }))))
}

async fn list_logs(State(state): State<CollectorState>) -> Json<Vec<LogRecord>> {
    Json(state.store.all())
}

/// The remote collector server.
pub struct CollectorServer;

impl CollectorServer {
    /// Binds `config.bind_addr` and serves the collector over `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address is unavailable.
    pub async fn start(config: &CollectorConfig, store: Arc<LogStore>) -> ServerResult<ServerHandle> {
        serve(collector_router(store, config), config.bind_addr, "collector").await
    }
}
