//! Read-only projection of the coordinator for the operator API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{GameOutcome, GamePhase};

/// Snapshot of the game as seen by an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameStatus {
    /// Whether a game is currently running.
    pub phase: GamePhase,
    /// Number of connected players.
    pub players: usize,
    /// How many balls have been drawn in the current (or most recent) game.
    pub drawn: usize,
    /// Numbers drawn in the current (or most recent) game, in order.
    pub history: Vec<u8>,
    /// Outcome of the most recently finished game, if any.
    pub last_outcome: Option<GameOutcome>,
    /// When the current (or most recent) game started.
    pub started_at: Option<DateTime<Utc>>,
}
