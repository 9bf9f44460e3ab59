//! Bingo engine binary.
//!
//! Wires configuration, logging, the game coordinator, and the HTTP +
//! `WebSocket` server together, then serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `bingo-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the coordinator and its draw loop handle
//! 4. Spawn the server and wait for it to shut down

mod error;

use std::path::Path;
use std::sync::Arc;

use bingo_core::broadcast::ChannelBroadcaster;
use bingo_core::config::BingoConfig;
use bingo_core::game::Game;
use bingo_core::runner::GameHandle;
use bingo_server::server::ServerConfig;
use bingo_server::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_FILE: &str = "bingo-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = BingoConfig::load(Path::new(CONFIG_FILE)).map_err(EngineError::from)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        host = config.server.host,
        port = config.server.port,
        draw_interval_ms = config.game.draw_interval_ms,
        seeded = config.game.seed.is_some(),
        "Configuration loaded"
    );

    // 3. Build the coordinator.
    let game = Game::from_config(ChannelBroadcaster::new(), &config.game);
    let handle = GameHandle::new(game, config.game.draw_interval());
    let state = Arc::new(AppState::new(handle));
    info!("Game coordinator ready");

    // 4. Serve until shutdown.
    let server = bingo_server::startup::spawn_server(ServerConfig::from(&config.server), state)
        .map_err(EngineError::from)?;

    server
        .await
        .map_err(|e| EngineError::Join {
            message: e.to_string(),
        })?
        .map_err(EngineError::from)?;

    info!("bingo-engine shutdown complete");
    Ok(())
}
