//! Server startup helper for the engine binary.
//!
//! Provides [`spawn_server`] which launches the HTTP + `WebSocket` server
//! on a background Tokio task and returns its handle.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the server on a background Tokio task.
///
/// The task ends when the server shuts down (on `Ctrl-C`) or fails. The
/// caller should await the returned handle.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address does not
/// parse. This is checked before the task is spawned; bind failures are
/// reported from inside the task.
pub fn spawn_server(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<Result<(), ServerError>>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move { crate::server::start_server(&config, state).await });

    tracing::info!(%addr, "Server spawned on background task");

    Ok(handle)
}
