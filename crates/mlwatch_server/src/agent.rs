//! Agent: tail + forward + optional dashboard in one process.

use crate::config::{AgentConfig, AgentMode};
use crate::dashboard::DashboardServer;
use crate::error::ServerResult;
use crate::server::ServerHandle;
use mlwatch_core::{EntryQueue, LogTailer, TailHandle, TailTask};
use mlwatch_forward::{
    Forwarder, ForwarderHandle, ForwarderStats, HttpClient, LocalSink, ReqwestClient, RemoteSink,
    Sink,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Final state of an agent after shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentReport {
    /// Tailer cursor when it stopped.
    pub offset: u64,
    /// Forwarder counters.
    pub forwarded: ForwarderStats,
}

/// A running agent.
///
/// Owns the tail task, the forwarder and, in local mode, the dashboard
/// listener. [`Agent::shutdown`] stops and joins all of them.
pub struct Agent {
    tail: TailHandle,
    forwarder: ForwarderHandle,
    dashboard: Option<ServerHandle>,
}

impl Agent {
    /// Starts an agent, using a reqwest client in remote mode.
    ///
    /// # Errors
    ///
    /// - [`crate::ServerError::Bind`] if the dashboard address is unavailable
    /// - [`crate::ServerError::Forward`] if the collector is unreachable
    pub async fn start(config: AgentConfig) -> ServerResult<Self> {
        Self::start_with_client(config, None).await
    }

    /// Starts an agent with an explicit HTTP client for remote mode.
    ///
    /// `None` builds a [`ReqwestClient`] from the forwarder configuration.
    ///
    /// # Errors
    ///
    /// See [`Agent::start`].
    pub async fn start_with_client(
        config: AgentConfig,
        client: Option<Arc<dyn HttpClient>>,
    ) -> ServerResult<Self> {
        let ingest = Arc::new(EntryQueue::new());

        let (sink, dashboard): (Arc<dyn Sink>, Option<ServerHandle>) = match &config.mode {
            AgentMode::Local(dashboard) => {
                let buffer = Arc::new(EntryQueue::new());
                let server = DashboardServer::start(dashboard, Arc::clone(&buffer)).await?;
                (Arc::new(LocalSink::new(buffer)) as Arc<dyn Sink>, Some(server))
            }
            AgentMode::Remote { url } => {
                let client = match client {
                    Some(client) => client,
                    None => {
                        Arc::new(ReqwestClient::from_config(&config.forwarder)?) as Arc<dyn HttpClient>
                    }
                };
                (Arc::new(RemoteSink::connect(url, client).await?) as Arc<dyn Sink>, None)
            }
        };

        let tailer = LogTailer::from_config(&config.log_path, &config.tail);
        let tail = TailTask::spawn(tailer, &config.tail, Arc::clone(&ingest));
        let forwarder = Forwarder::spawn(&config.forwarder, ingest, sink);

        info!(path = %config.log_path.display(), "agent started");
        Ok(Self {
            tail,
            forwarder,
            dashboard,
        })
    }

    /// Address of the local dashboard, if running.
    pub fn dashboard_addr(&self) -> Option<SocketAddr> {
        self.dashboard.as_ref().map(ServerHandle::local_addr)
    }

    /// Returns true if the tail task has exited on its own (for example on
    /// a corrupt log).
    pub fn tail_finished(&self) -> bool {
        self.tail.is_finished()
    }

    /// Stops tailing, flushes the forwarder, then stops the dashboard.
    ///
    /// All tasks are joined even if one of them failed; the first failure
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the tail task (e.g. a corrupt log) or a
    /// task failure.
    pub async fn shutdown(self) -> ServerResult<AgentReport> {
        // Tail first so its last batch is in the queue for the final drain.
        let tail = self.tail.stop().await;
        let forwarded = self.forwarder.stop().await;
        let dashboard = match self.dashboard {
            Some(server) => server.shutdown().await,
            None => Ok(()),
        };

        let tailer = tail?;
        let forwarded = forwarded?;
        dashboard?;

        info!(
            offset = tailer.offset(),
            delivered = forwarded.records_delivered,
            "agent stopped"
        );
        Ok(AgentReport {
            offset: tailer.offset(),
            forwarded,
        })
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("dashboard", &self.dashboard_addr())
            .finish_non_exhaustive()
    }
}
