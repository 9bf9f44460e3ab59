//! HTTP and `WebSocket` boundary for the bingo coordination engine.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Player socket** (`/ws/play`): connecting joins the game with a
//!   fresh card; disconnecting leaves it.
//! - **Admin socket** (`/ws/admin`): an observer that receives every
//!   broadcast and may start or stop games.
//! - **Operator REST endpoints** for start, stop, and status.
//! - **Card lookup** (`/api/cards/{id}`) returning a player's
//!   authoritative card and marks.
//!
//! # Architecture
//!
//! Every handler goes through the one [`GameHandle`] held by
//! [`AppState`]. Socket tasks lock it only to join, leave, or issue a
//! command; outbound events reach each socket through its own channel, so
//! a slow client never holds the coordinator.
//!
//! [`GameHandle`]: bingo_core::runner::GameHandle

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
