//! The game coordinator.
//!
//! [`Game`] owns everything that changes while people play: the phase,
//! the draw sequence and history, the session registry, and the
//! broadcaster. Every mutation goes through `&mut self`, so wrapping one
//! `Game` in a single mutex is enough to guarantee that a join, a leave
//! and a draw tick never interleave.
//!
//! # State machine
//!
//! ```text
//! Idle --start--> Running --tick--> Running
//!                    |
//!                    +-- win / exhaustion / stop --> Idle
//! ```
//!
//! Each start bumps a generation counter. A draw loop carries the
//! generation it was started for, and [`Game::tick`] refuses to draw for
//! any other generation, so a loop that outlives its game can never draw
//! into the next one.

use bingo_types::{Ball, ConnectionId, GameOutcome, GamePhase, GameStatus, ServerEvent};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::broadcast::Broadcaster;
use crate::card::Card;
use crate::config::GameConfig;
use crate::pool::DrawSequence;
use crate::registry::{Participant, RegistryError, SessionRegistry};

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new game began. Its draw loop must tick with this generation.
    Started {
        /// Generation of the new game.
        generation: u64,
    },
    /// A game was already running; nothing changed.
    AlreadyRunning,
}

/// Result of one draw tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A ball was drawn and nobody has won yet.
    Drew(Ball),
    /// The game ended on this tick.
    Finished {
        /// The ball drawn on this tick, if any (`None` when the pool was
        /// already empty).
        last_ball: Option<Ball>,
        /// How the game ended.
        outcome: GameOutcome,
    },
    /// The game this tick was scheduled for is no longer running.
    Inactive,
}

/// The single coordination boundary for one process.
#[derive(Debug)]
pub struct Game<B> {
    phase: GamePhase,
    generation: u64,
    sequence: DrawSequence,
    history: Vec<u8>,
    registry: SessionRegistry,
    broadcaster: B,
    rng: SmallRng,
    last_outcome: Option<GameOutcome>,
    started_at: Option<DateTime<Utc>>,
}

impl<B: Broadcaster> Game<B> {
    /// An idle game delivering through `broadcaster`, drawing randomness
    /// from `rng` for cards and draw order.
    pub fn new(broadcaster: B, rng: SmallRng) -> Self {
        Self {
            phase: GamePhase::Idle,
            generation: 0,
            sequence: DrawSequence::default(),
            history: Vec::new(),
            registry: SessionRegistry::new(),
            broadcaster,
            rng,
            last_outcome: None,
            started_at: None,
        }
    }

    /// An idle game seeded from `config.seed`, or from OS entropy when no
    /// seed is configured.
    pub fn from_config(broadcaster: B, config: &GameConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(SmallRng::from_os_rng, SmallRng::seed_from_u64);
        Self::new(broadcaster, rng)
    }

    /// Current phase.
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Generation of the current (or most recent) game. Zero before the
    /// first start.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Numbers drawn in the current (or most recent) game, in draw order.
    pub fn history(&self) -> &[u8] {
        &self.history
    }

    /// The session registry.
    pub const fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// The broadcaster.
    pub const fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    /// Mutable access to the broadcaster, for attaching new connections.
    pub const fn broadcaster_mut(&mut self) -> &mut B {
        &mut self.broadcaster
    }

    /// Outcome of the most recently finished game.
    pub const fn last_outcome(&self) -> Option<&GameOutcome> {
        self.last_outcome.as_ref()
    }

    /// Register `id` as a player with a freshly generated card.
    ///
    /// The new player receives its card and, when a game is under way, the
    /// history drawn so far. The card is not marked against that history.
    /// Everyone then receives the new player count.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if `id` already plays.
    pub fn join(&mut self, id: ConnectionId) -> Result<Participant, RegistryError> {
        let participant = self.registry.register(id, &mut self.rng)?;
        self.welcome(&participant);
        Ok(participant)
    }

    /// Register `id` as a player holding `card`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if `id` already plays.
    pub fn join_with_card(
        &mut self,
        id: ConnectionId,
        card: Card,
    ) -> Result<Participant, RegistryError> {
        let participant = self.registry.register_with_card(id, card)?;
        self.welcome(&participant);
        Ok(participant)
    }

    fn welcome(&mut self, participant: &Participant) {
        let id = participant.id();
        info!(
            connection = %id,
            name = participant.name(),
            players = self.registry.count(),
            "Player joined"
        );

        self.broadcaster.send_to(
            id,
            &ServerEvent::Card {
                name: participant.name().to_owned(),
                card: participant.state().serialize(),
            },
        );
        self.send_history(id);
        self.broadcast_players_count();
    }

    /// Greet an observer (admin) connection without giving it a card.
    ///
    /// Observers receive the current player count and, during a game, the
    /// history drawn so far.
    pub fn observe(&mut self, id: ConnectionId) {
        debug!(connection = %id, "Observer attached");
        self.send_history(id);
        let count = self.registry.count();
        self.broadcaster
            .send_to(id, &ServerEvent::PlayersCount { count });
    }

    fn send_history(&mut self, id: ConnectionId) {
        if self.phase == GamePhase::Running && !self.history.is_empty() {
            self.broadcaster.send_to(
                id,
                &ServerEvent::History {
                    numbers: self.history.clone(),
                },
            );
        }
    }

    /// Drop connection `id`, player or observer.
    ///
    /// Returns whether `id` was a registered player. Removing a player
    /// broadcasts the new player count. Safe to call more than once.
    pub fn leave(&mut self, id: ConnectionId) -> bool {
        self.broadcaster.disconnect(id);
        let Some(participant) = self.registry.deregister(id) else {
            return false;
        };
        info!(
            connection = %id,
            name = participant.name(),
            players = self.registry.count(),
            "Player left"
        );
        self.broadcast_players_count();
        true
    }

    /// Deliver `event` to one connection only.
    pub fn send_to(&mut self, id: ConnectionId, event: &ServerEvent) -> bool {
        self.broadcaster.send_to(id, event)
    }

    fn broadcast_players_count(&mut self) {
        let count = self.registry.count();
        self.broadcaster
            .broadcast(&ServerEvent::PlayersCount { count });
    }

    /// Begin a new game with a freshly shuffled pool.
    ///
    /// Ignored (and logged) while a game is running.
    pub fn start(&mut self) -> StartOutcome {
        if self.phase == GamePhase::Running {
            info!(generation = self.generation, "Start ignored: game already running");
            return StartOutcome::AlreadyRunning;
        }
        let sequence = DrawSequence::shuffled(&mut self.rng);
        self.begin(sequence)
    }

    /// Begin a new game drawing `sequence` in order.
    ///
    /// Ignored (and logged) while a game is running.
    pub fn start_with_sequence(&mut self, sequence: DrawSequence) -> StartOutcome {
        if self.phase == GamePhase::Running {
            info!(generation = self.generation, "Start ignored: game already running");
            return StartOutcome::AlreadyRunning;
        }
        self.begin(sequence)
    }

    fn begin(&mut self, sequence: DrawSequence) -> StartOutcome {
        self.generation = self.generation.saturating_add(1);
        self.phase = GamePhase::Running;
        self.sequence = sequence;
        self.history.clear();
        self.started_at = Some(Utc::now());

        info!(
            generation = self.generation,
            players = self.registry.count(),
            balls = self.sequence.remaining(),
            "Game started"
        );
        self.broadcaster.broadcast(&ServerEvent::GameStarted);

        StartOutcome::Started {
            generation: self.generation,
        }
    }

    /// Run one draw for game `generation`.
    ///
    /// Pulls the next ball, records it, marks every card, broadcasts the
    /// ball, then checks cards in registration order for a winner. Marking
    /// and broadcasting happen inside the same call, so no observer holding
    /// the coordinator lock can see one without the other.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if self.phase != GamePhase::Running || generation != self.generation {
            return TickOutcome::Inactive;
        }

        let Some(ball) = self.sequence.next() else {
            let outcome = GameOutcome::Exhausted;
            self.finish(outcome.clone());
            return TickOutcome::Finished {
                last_ball: None,
                outcome,
            };
        };

        self.history.push(ball.number);
        let hits = self.registry.mark_all(ball.number);
        self.broadcaster.broadcast(&ServerEvent::from(ball));
        debug!(
            generation,
            ball = %ball,
            drawn = self.history.len(),
            hits,
            "Ball drawn"
        );

        let Some(winner) = self.registry.first_winner().map(|p| p.name().to_owned()) else {
            return TickOutcome::Drew(ball);
        };

        let outcome = GameOutcome::Won { winner };
        self.finish(outcome.clone());
        TickOutcome::Finished {
            last_ball: Some(ball),
            outcome,
        }
    }

    /// Stop the running game on operator request.
    ///
    /// Returns `false` (and changes nothing) when no game is running.
    pub fn stop(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            info!("Stop ignored: no game running");
            return false;
        }
        self.finish(GameOutcome::Stopped);
        true
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.phase = GamePhase::Idle;
        self.sequence = DrawSequence::default();

        info!(
            generation = self.generation,
            drawn = self.history.len(),
            outcome = ?outcome,
            "Game over"
        );

        if let Some(message) = outcome.winner_message() {
            self.broadcaster.broadcast(&ServerEvent::Winner { message });
        }
        self.broadcaster.broadcast(&ServerEvent::GameOver {
            message: outcome.game_over_message(),
        });
        self.last_outcome = Some(outcome);
    }

    /// Snapshot for the operator API.
    pub fn status(&self) -> GameStatus {
        GameStatus {
            phase: self.phase,
            players: self.registry.count(),
            drawn: self.history.len(),
            history: self.history.clone(),
            last_outcome: self.last_outcome.clone(),
            started_at: self.started_at,
        }
    }
}
