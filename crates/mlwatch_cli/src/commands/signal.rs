//! Process signal handling for long-running commands.

use tokio::signal;
use tracing::info;

/// Resolves on SIGINT (Ctrl+C) or SIGTERM.
pub async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received SIGINT, starting graceful shutdown");
            }
            _ = terminate.recv() => info!("Received SIGTERM, starting graceful shutdown"),
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, starting graceful shutdown");
    }

    Ok(())
}
