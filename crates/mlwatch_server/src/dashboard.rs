//! Local dashboard: serves the page and hands out buffered records.

use crate::config::DashboardConfig;
use crate::error::ServerResult;
use crate::page::{self, PageMode};
use crate::server::{serve, ServerHandle};
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use mlwatch_core::{EntryQueue, LogRecord};
use std::sync::Arc;

#[derive(Clone)]
struct DashboardState {
    queue: Arc<EntryQueue>,
    page: Arc<str>,
}

/// Builds the dashboard routes over `queue`.
///
/// `GET /logs` drains the queue: each record is returned to exactly one
/// request.
pub fn dashboard_router(queue: Arc<EntryQueue>, config: &DashboardConfig) -> Router {
    let state = DashboardState {
        queue,
        page: page::render(config.poll_interval, PageMode::Append).into(),
    };
    Router::new()
        .route("/", get(index))
        .route("/logs", get(drain_logs))
        .with_state(state)
}

async fn index(State(state): State<DashboardState>) -> Html<String> {
    Html(state.page.to_string())
}

async fn drain_logs(State(state): State<DashboardState>) -> Json<Vec<LogRecord>> {
    Json(state.queue.drain())
}

/// The local dashboard server.
pub struct DashboardServer;

impl DashboardServer {
    /// Binds `config.bind_addr` and serves the dashboard over `queue`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ServerError::Bind`] if the address is unavailable.
    pub async fn start(config: &DashboardConfig, queue: Arc<EntryQueue>) -> ServerResult<ServerHandle> {
        serve(dashboard_router(queue, config), config.bind_addr, "dashboard").await
    }
}
