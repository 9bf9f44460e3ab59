//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and shutdown
//! so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: bingo_core::config::ConfigError,
    },

    /// The server could not be spawned.
    #[error("startup error: {source}")]
    Startup {
        /// The underlying startup error.
        #[from]
        source: bingo_server::startup::StartupError,
    },

    /// The server failed while running.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: bingo_server::ServerError,
    },

    /// The server task panicked or was cancelled.
    #[error("server task failed: {message}")]
    Join {
        /// Description of the join failure.
        message: String,
    },
}
