//! Game logic and draw loop for the bingo coordination engine.
//!
//! This crate owns everything between the transport and the rules: card
//! generation and marking, the draw pool, the session registry, event
//! delivery, and the coordinator that ties them into one exclusion domain.
//!
//! # Modules
//!
//! - [`card`] -- 5x5 cards, the band-per-column generator, and the text
//!   codec.
//! - [`card_state`] -- A card plus its marks; row/column win detection.
//! - [`pool`] -- The shuffled 1..=75 draw sequence.
//! - [`registry`] -- Connected players in registration order.
//! - [`broadcast`] -- [`Broadcaster`] trait and the channel-backed
//!   implementation.
//! - [`game`] -- The [`Game`] coordinator state machine.
//! - [`runner`] -- [`GameHandle`] and the paced, cancellable draw loop.
//! - [`config`] -- Configuration loading from `bingo-config.yaml`.
//!
//! [`Broadcaster`]: broadcast::Broadcaster
//! [`Game`]: game::Game
//! [`GameHandle`]: runner::GameHandle

pub mod broadcast;
pub mod card;
pub mod card_state;
pub mod config;
pub mod game;
pub mod pool;
pub mod registry;
pub mod runner;
