//! # mlwatch Forward
//!
//! Periodic relay of tailed records to their destination.
//!
//! A [`Forwarder`] wakes every interval, drains the shared
//! [`EntryQueue`](mlwatch_core::EntryQueue) in one step and hands the batch
//! to a [`Sink`]:
//!
//! - [`LocalSink`] buffers records for the in-process dashboard
//! - [`RemoteSink`] posts them to a collector over HTTP
//!
//! ## Delivery guarantees
//!
//! At most once. A batch the collector rejects, or that fails in transit,
//! is logged and dropped; there is no retry queue. On a clean stop the
//! forwarder drains and delivers one last time.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod forwarder;
mod http;
mod sink;

pub use config::ForwarderConfig;
pub use error::{ForwardError, ForwardResult};
pub use forwarder::{Forwarder, ForwarderHandle, ForwarderStats};
pub use http::{HttpClient, ReqwestClient};
pub use sink::{LocalSink, RemoteSink, Sink};
