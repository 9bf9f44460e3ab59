//! Game lifecycle enumerations.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whether a game is currently being drawn.
///
/// At most one game runs per process; a new game can only begin from
/// [`GamePhase::Idle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GamePhase {
    /// No game is running; a start command will begin one.
    #[default]
    Idle,
    /// Balls are being drawn.
    Running,
}

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GameOutcome {
    /// A participant completed a row or column.
    Won {
        /// Display name of the sole winner.
        winner: String,
    },
    /// All 75 balls were drawn without a win.
    Exhausted,
    /// An operator stopped the game before it finished.
    Stopped,
}

impl GameOutcome {
    /// The text carried by the `game_over` event for this outcome.
    pub fn game_over_message(&self) -> String {
        match self {
            Self::Won { winner } => format!("Game finished. Winner: {winner}."),
            Self::Exhausted => "No balls left. Game over (no winner).".to_owned(),
            Self::Stopped => "Game stopped by operator.".to_owned(),
        }
    }

    /// The text carried by the `winner` event, only for a won game.
    pub fn winner_message(&self) -> Option<String> {
        match self {
            Self::Won { winner } => Some(format!("{winner} has BINGO!")),
            Self::Exhausted | Self::Stopped => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_won_game_has_a_winner_message() {
        let won = GameOutcome::Won {
            winner: "Player 2".to_owned(),
        };
        assert_eq!(won.winner_message().as_deref(), Some("Player 2 has BINGO!"));
        assert!(GameOutcome::Exhausted.winner_message().is_none());
        assert!(GameOutcome::Stopped.winner_message().is_none());
    }

    #[test]
    fn game_over_messages_distinguish_outcomes() {
        let won = GameOutcome::Won {
            winner: "Player 1".to_owned(),
        }
        .game_over_message();
        let exhausted = GameOutcome::Exhausted.game_over_message();
        assert!(won.contains("Winner: Player 1"));
        assert!(exhausted.contains("no winner"));
        assert_ne!(won, exhausted);
    }

    #[test]
    fn outcome_is_tagged_by_kind() {
        let json = serde_json::to_value(GameOutcome::Exhausted).ok();
        assert_eq!(json, Some(serde_json::json!({ "kind": "exhausted" })));
    }
}
