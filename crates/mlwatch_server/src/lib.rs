//! # mlwatch Server
//!
//! HTTP surfaces and process wiring for mlwatch.
//!
//! This crate provides:
//! - The local dashboard: `GET /` page, draining `GET /logs`
//! - The remote collector: `POST /post_logs`, non-draining `GET /logs`
//! - [`Agent`], which runs tailing, forwarding and (in local mode) the
//!   dashboard, and shuts them all down together
//!
//! # Delivery
//!
//! In local mode records reach the browser at most once: the dashboard
//! drains its buffer on every `GET /logs`, so two open tabs split the
//! stream between them. The collector keeps everything it was sent.
//!
//! ```rust,no_run
//! use mlwatch_server::{Agent, AgentConfig, DashboardConfig};
//!
//! # async fn run() -> mlwatch_server::ServerResult<()> {
//! let agent = Agent::start(AgentConfig::local("logs/train.bin", DashboardConfig::default())).await?;
//! tokio::signal::ctrl_c().await?;
//! agent.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod agent;
mod collector;
mod config;
mod dashboard;
mod error;
mod page;
mod server;
mod store;

pub use agent::{Agent, AgentReport};
pub use collector::{collector_router, CollectorServer};
pub use config::{AgentConfig, AgentMode, CollectorConfig, DashboardConfig};
pub use dashboard::{dashboard_router, DashboardServer};
pub use error::{ServerError, ServerResult};
pub use server::{serve, ServerHandle};
pub use store::LogStore;
