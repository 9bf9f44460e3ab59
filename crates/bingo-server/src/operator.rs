//! Operator REST API handlers for game control.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/start` | Start a game (ignored while one runs) |
//! | `POST` | `/api/operator/stop` | Stop the running game |
//! | `GET` | `/api/operator/status` | Current game status |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tracing::info;

use crate::state::AppState;

/// Response body for start and stop.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the command changed the game.
    ok: bool,
    /// Human-readable message.
    message: String,
}

// ---------------------------------------------------------------------------
// POST /api/operator/start
// ---------------------------------------------------------------------------

/// Start a new game and its draw loop.
///
/// A start while a game is running changes nothing and reports
/// `ok: false`.
pub async fn start(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Operator start requested");
    let started = state.game.start().await.is_some();

    Json(OperatorResponse {
        ok: started,
        message: if started {
            "Game started".to_owned()
        } else {
            "Game already running".to_owned()
        },
    })
}

// ---------------------------------------------------------------------------
// POST /api/operator/stop
// ---------------------------------------------------------------------------

/// Stop the running game.
///
/// Players receive a `game_over` event; the draw loop exits before its
/// next tick.
pub async fn stop(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Operator stop requested");
    let stopped = state.game.stop().await;

    Json(OperatorResponse {
        ok: stopped,
        message: if stopped {
            "Game stopped".to_owned()
        } else {
            "No game running".to_owned()
        },
    })
}

// ---------------------------------------------------------------------------
// GET /api/operator/status
// ---------------------------------------------------------------------------

/// Return the current [`GameStatus`](bingo_types::GameStatus).
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = state.game.lock().await.status();
    Json(status)
}
