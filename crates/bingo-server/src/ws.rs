//! `WebSocket` handlers for players and the admin console.
//!
//! Clients connect to `GET /ws/play` (player) or `GET /ws/admin`
//! (admin). Each connection gets a [`ConnectionId`] on upgrade and an
//! outbox channel attached to the coordinator's broadcaster; the handler
//! forwards that channel to the socket as JSON text frames and parses
//! inbound text frames as [`ClientCommand`]s.
//!
//! A player joins on connect and leaves on disconnect. Only the admin may
//! start or stop a game; a player that tries gets an `error` event.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use bingo_types::{ClientCommand, ConnectionId, ServerEvent};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// What a connection is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Holds a card and counts towards the player total.
    Player,
    /// Observes every broadcast and controls the game.
    Admin,
}

/// Whether the socket loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Leave,
}

/// Upgrade to a player connection.
///
/// # Route
///
/// `GET /ws/play`
pub async fn ws_play(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state, Role::Player))
}

/// Upgrade to an admin connection.
///
/// # Route
///
/// `GET /ws/admin`
pub async fn ws_admin(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state, Role::Admin))
}

/// Handle the `WebSocket` lifecycle: attach, greet, pump events and
/// commands until either side goes away, then leave.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, role: Role) {
    let Some((id, mut outbox)) = connect(&state, role).await else {
        return;
    };
    debug!(connection = %id, ?role, "WebSocket client connected");

    loop {
        tokio::select! {
            // Forward an event from the coordinator.
            event = outbox.recv() => {
                let Some(event) = event else {
                    debug!(connection = %id, "Outbox closed, shutting down WebSocket");
                    break;
                };
                let json = match serde_json::to_string(&event) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!("Failed to serialize server event: {e}");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    debug!(connection = %id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // Read a command, a close frame, or a disconnect.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if handle_command(&state, id, role, text.as_str()).await == Flow::Leave {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(connection = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(connection = %id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(connection = %id, "WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Binary and pong frames carry no commands.
                    }
                }
            }
        }
    }

    disconnect(&state, id).await;
}

/// Mint an id, attach its outbox, and greet it for `role`: a player joins
/// with a fresh card, an admin only observes.
///
/// Returns `None` if the join is rejected; nothing stays attached then.
async fn connect(
    state: &AppState,
    role: Role,
) -> Option<(ConnectionId, UnboundedReceiver<ServerEvent>)> {
    let id = ConnectionId::new();
    let mut game = state.game.lock().await;
    let outbox = game.broadcaster_mut().attach(id);
    match role {
        Role::Player => {
            if let Err(e) = game.join(id) {
                warn!(connection = %id, error = %e, "Join rejected");
                game.leave(id);
                return None;
            }
        }
        Role::Admin => game.observe(id),
    }
    Some((id, outbox))
}

/// Detach `id` and, for a player, free its card and announce the new count.
async fn disconnect(state: &AppState, id: ConnectionId) {
    if state.game.lock().await.leave(id) {
        debug!(connection = %id, "Player removed on disconnect");
    }
}

/// Parse and apply one inbound text frame.
///
/// Protocol errors are answered with an `error` event to this connection
/// only.
async fn handle_command(state: &AppState, id: ConnectionId, role: Role, text: &str) -> Flow {
    let command = match serde_json::from_str::<ClientCommand>(text) {
        Ok(command) => command,
        Err(e) => {
            warn!(connection = %id, error = %e, "Unrecognized command");
            reject(state, id, format!("unrecognized command: {e}")).await;
            return Flow::Continue;
        }
    };

    match (command, role) {
        (ClientCommand::Leave, _) => {
            debug!(connection = %id, "Client asked to leave");
            Flow::Leave
        }
        (ClientCommand::Start, Role::Admin) => {
            info!(connection = %id, "Start requested over WebSocket");
            // The draw loop runs detached; its handle is not needed here.
            drop(state.game.start().await);
            Flow::Continue
        }
        (ClientCommand::Stop, Role::Admin) => {
            info!(connection = %id, "Stop requested over WebSocket");
            state.game.stop().await;
            Flow::Continue
        }
        (ClientCommand::Start | ClientCommand::Stop, Role::Player) => {
            warn!(connection = %id, ?command, "Command not allowed for players");
            reject(state, id, "only the admin can start or stop a game".to_owned()).await;
            Flow::Continue
        }
    }
}

async fn reject(state: &AppState, id: ConnectionId, message: String) {
    state
        .game
        .lock()
        .await
        .send_to(id, &ServerEvent::Error { message });
}
