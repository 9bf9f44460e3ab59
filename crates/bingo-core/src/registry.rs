//! Connected participants and their cards.
//!
//! The registry keeps participants in registration order. That order is
//! the tie-break for win detection: when several cards complete a line on
//! the same draw, the participant registered first is the sole winner.

use bingo_types::ConnectionId;
use rand::Rng;

use crate::card::Card;
use crate::card_state::CardState;

/// Errors produced by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The connection already holds a card.
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),
}

/// A connected player and the card it exclusively owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: ConnectionId,
    name: String,
    state: CardState,
}

impl Participant {
    /// Connection identity.
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Display name (`Player N`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Card and marks.
    pub const fn state(&self) -> &CardState {
        &self.state
    }
}

/// Participants keyed by connection, in registration order.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    participants: Vec<Participant>,
    next_player_number: u32,
}

impl SessionRegistry {
    /// An empty registry. The first participant is named `Player 1`.
    pub const fn new() -> Self {
        Self {
            participants: Vec::new(),
            next_player_number: 1,
        }
    }

    /// Register `id` with a freshly generated card.
    ///
    /// Returns a copy of the new entry so the caller can deliver the card.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if `id` already holds a
    /// card.
    pub fn register(
        &mut self,
        id: ConnectionId,
        rng: &mut impl Rng,
    ) -> Result<Participant, RegistryError> {
        if self.contains(id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        self.register_with_card(id, Card::generate(rng))
    }

    /// Register `id` with a pre-built card.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if `id` already holds a
    /// card.
    pub fn register_with_card(
        &mut self,
        id: ConnectionId,
        card: Card,
    ) -> Result<Participant, RegistryError> {
        if self.contains(id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }

        let participant = Participant {
            id,
            name: format!("Player {}", self.next_player_number),
            state: CardState::new(card),
        };
        self.next_player_number = self.next_player_number.saturating_add(1);
        self.participants.push(participant.clone());
        Ok(participant)
    }

    /// Remove `id`, returning its entry if it was registered.
    pub fn deregister(&mut self, id: ConnectionId) -> Option<Participant> {
        let index = self.participants.iter().position(|p| p.id == id)?;
        Some(self.participants.remove(index))
    }

    /// Whether `id` holds a card.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.participants.iter().any(|p| p.id == id)
    }

    /// Look up a participant.
    pub fn get(&self, id: ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Number of registered participants.
    pub fn count(&self) -> usize {
        self.participants.len()
    }

    /// Participants in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Apply a drawn number to every card. Returns how many cards held it.
    pub fn mark_all(&mut self, number: u8) -> usize {
        self.participants
            .iter_mut()
            .map(|p| p.state.mark(number))
            .filter(|hit| *hit)
            .count()
    }

    /// The earliest-registered participant whose card has a winning line.
    pub fn first_winner(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.state.has_win())
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
