//! Axum router construction.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for browser clients served elsewhere.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /ws/play` -- player `WebSocket`
/// - `GET /ws/admin` -- admin `WebSocket`
/// - `POST /api/operator/start` -- start a game
/// - `POST /api/operator/stop` -- stop the running game
/// - `GET /api/operator/status` -- game status
/// - `GET /api/cards/{id}` -- one player's card and marks
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/play", get(ws::ws_play))
        .route("/ws/admin", get(ws::ws_admin))
        // Operator
        .route("/api/operator/start", post(operator::start))
        .route("/api/operator/stop", post(operator::stop))
        .route("/api/operator/status", get(operator::status))
        // Cards
        .route("/api/cards/{id}", get(handlers::get_card))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
