//! Read-only REST handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use bingo_core::card::GRID_SIZE;
use bingo_types::ConnectionId;

use crate::error::ApiError;
use crate::state::AppState;

/// A player's authoritative card.
#[derive(Debug, serde::Serialize)]
pub struct CardView {
    /// Display name.
    pub name: String,
    /// Card in its text form.
    pub card: String,
    /// Marks by row then column; the centre is always `true`.
    pub marked: [[bool; GRID_SIZE]; GRID_SIZE],
}

// ---------------------------------------------------------------------------
// GET /api/cards/{id}
// ---------------------------------------------------------------------------

/// Look up the card held by connection `id`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidUuid`] for a malformed id and
/// [`ApiError::NotFound`] when no player holds that id.
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ConnectionId = id_str
        .parse()
        .map_err(|e| ApiError::InvalidUuid(format!("'{id_str}': {e}")))?;

    let game = state.game.lock().await;
    let participant = game
        .registry()
        .get(id)
        .ok_or_else(|| ApiError::NotFound(format!("player {id}")))?;

    Ok(Json(CardView {
        name: participant.name().to_owned(),
        card: participant.state().serialize(),
        marked: *participant.state().marks().rows(),
    }))
}
