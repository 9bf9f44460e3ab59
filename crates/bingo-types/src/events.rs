//! Messages exchanged with connected clients.
//!
//! Both directions are internally tagged JSON objects keyed by `"type"`.
//! A player receives its card once at join time, then the shared stream of
//! balls and game announcements; admins receive the shared stream only.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ball::{Ball, BallLetter};

/// An event pushed from the coordinator to one or all connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ServerEvent {
    /// The participant's card, sent once when it joins.
    Card {
        /// Display name assigned to the participant.
        name: String,
        /// The card in its text form (header plus five rows).
        card: String,
    },
    /// Numbers drawn so far, sent to a connection joining a running game.
    History {
        /// Drawn numbers in draw order.
        numbers: Vec<u8>,
    },
    /// A newly drawn ball.
    Ball {
        /// Band letter of the ball.
        letter: BallLetter,
        /// The drawn number.
        number: u8,
    },
    /// Announces the sole winner of the game.
    Winner {
        /// Human-readable announcement.
        message: String,
    },
    /// The game has ended, with or without a winner.
    GameOver {
        /// Human-readable summary of the outcome.
        message: String,
    },
    /// Number of connected players changed.
    PlayersCount {
        /// Current number of players holding a card.
        count: usize,
    },
    /// A new game has begun.
    GameStarted,
    /// A command from this connection was rejected.
    Error {
        /// Why the command was rejected.
        message: String,
    },
}

impl From<Ball> for ServerEvent {
    fn from(ball: Ball) -> Self {
        Self::Ball {
            letter: ball.letter,
            number: ball.number,
        }
    }
}

/// A command sent by a client.
///
/// Joining and leaving are implicit in connecting and disconnecting;
/// `leave` lets a client end its session without closing the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ClientCommand {
    /// Begin a new game if none is running.
    Start,
    /// End the running game.
    Stop,
    /// End this connection's session.
    Leave,
}
