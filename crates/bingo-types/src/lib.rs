//! Shared wire and data types for the bingo coordination engine.
//!
//! Every crate in the workspace speaks these types. They are serialized as
//! JSON on the WebSocket boundary, and `ts-rs` exports matching
//! `TypeScript` definitions for browser clients.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for connection identities
//! - [`ball`] -- Balls, band letters, and the pool constants
//! - [`enums`] -- Game phase and outcome
//! - [`events`] -- Server events and client commands
//! - [`status`] -- Operator status snapshot

pub mod ball;
pub mod enums;
pub mod events;
pub mod ids;
pub mod status;

// Re-export all public types at crate root for convenience.
pub use ball::{BAND_WIDTH, Ball, BallLetter, POOL_SIZE};
pub use enums::{GameOutcome, GamePhase};
pub use events::{ClientCommand, ServerEvent};
pub use ids::ConnectionId;
pub use status::GameStatus;

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files into `bindings/` relative to the crate
        // root when the types are exported.
        use ts_rs::TS;

        let _ = crate::ids::ConnectionId::export_all();
        let _ = crate::ball::BallLetter::export_all();
        let _ = crate::ball::Ball::export_all();
        let _ = crate::enums::GamePhase::export_all();
        let _ = crate::enums::GameOutcome::export_all();
        let _ = crate::events::ServerEvent::export_all();
        let _ = crate::events::ClientCommand::export_all();
        let _ = crate::status::GameStatus::export_all();
    }
}
