//! Shared application state for the server.

use bingo_core::broadcast::ChannelBroadcaster;
use bingo_core::runner::GameHandle;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The coordinator and its draw loop.
    pub game: GameHandle<ChannelBroadcaster>,
}

impl AppState {
    /// Wrap an existing game handle.
    pub const fn new(game: GameHandle<ChannelBroadcaster>) -> Self {
        Self { game }
    }
}
