//! Draw loop runner with operator controls.
//!
//! [`GameHandle`] is the shareable front of one [`Game`]: connection tasks
//! lock it to join and leave, and [`GameHandle::start`] spawns the paced
//! draw loop. The loop takes the lock once per tick, so every tick's
//! pull/mark/broadcast/check sequence is atomic with respect to joins and
//! leaves. The inter-draw delay is the only point where the loop waits.
//!
//! A stop request ends the game under the lock and wakes the sleeping
//! loop, whose next tick then finds its generation inactive and exits
//! without drawing.

use std::sync::Arc;
use std::time::Duration;

use bingo_types::GameOutcome;
use tokio::sync::{Mutex, MutexGuard, Notify};
use tokio::task::JoinHandle;
use tracing::info;

use crate::broadcast::Broadcaster;
use crate::game::{Game, StartOutcome, TickOutcome};
use crate::pool::DrawSequence;

/// Summary of one finished draw loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawLoopReport {
    /// Generation the loop drew for.
    pub generation: u64,
    /// Balls this loop drew.
    pub draws: usize,
    /// How the game ended, when this loop ended it. `None` means the game
    /// was ended from outside (operator stop).
    pub outcome: Option<GameOutcome>,
}

/// Shared handle to the coordinator plus draw loop pacing.
#[derive(Debug)]
pub struct GameHandle<B> {
    game: Arc<Mutex<Game<B>>>,
    draw_interval: Duration,
    wake: Arc<Notify>,
}

impl<B> Clone for GameHandle<B> {
    fn clone(&self) -> Self {
        Self {
            game: Arc::clone(&self.game),
            draw_interval: self.draw_interval,
            wake: Arc::clone(&self.wake),
        }
    }
}

impl<B: Broadcaster + 'static> GameHandle<B> {
    /// Wrap `game`, pacing draws `draw_interval` apart.
    pub fn new(game: Game<B>, draw_interval: Duration) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
            draw_interval,
            wake: Arc::new(Notify::new()),
        }
    }

    /// Lock the coordinator.
    pub async fn lock(&self) -> MutexGuard<'_, Game<B>> {
        self.game.lock().await
    }

    /// Delay between two draws.
    pub const fn draw_interval(&self) -> Duration {
        self.draw_interval
    }

    /// Start a game with a freshly shuffled pool and spawn its draw loop.
    ///
    /// Returns `None` when a game was already running; in that case no
    /// second loop is spawned.
    pub async fn start(&self) -> Option<JoinHandle<DrawLoopReport>> {
        let outcome = self.game.lock().await.start();
        self.spawn_for(outcome)
    }

    /// Start a game drawing `sequence` in order and spawn its draw loop.
    pub async fn start_with_sequence(
        &self,
        sequence: DrawSequence,
    ) -> Option<JoinHandle<DrawLoopReport>> {
        let outcome = self.game.lock().await.start_with_sequence(sequence);
        self.spawn_for(outcome)
    }

    fn spawn_for(&self, outcome: StartOutcome) -> Option<JoinHandle<DrawLoopReport>> {
        match outcome {
            StartOutcome::Started { generation } => {
                let handle = self.clone();
                Some(tokio::spawn(async move {
                    handle.run_draw_loop(generation).await
                }))
            }
            StartOutcome::AlreadyRunning => None,
        }
    }

    /// End the running game, if any, and cut the draw loop's sleep short.
    ///
    /// Returns whether a game was running.
    pub async fn stop(&self) -> bool {
        let stopped = self.game.lock().await.stop();
        if stopped {
            self.wake.notify_waiters();
        }
        stopped
    }

    /// Draw for `generation` until the game ends.
    ///
    /// The first ball is drawn immediately; later balls follow after the
    /// configured delay. Every tick re-checks that `generation` is still
    /// the running game before drawing.
    pub async fn run_draw_loop(&self, generation: u64) -> DrawLoopReport {
        let mut draws: usize = 0;

        info!(
            generation,
            draw_interval_ms = u64::try_from(self.draw_interval.as_millis()).unwrap_or(u64::MAX),
            "Draw loop starting"
        );

        loop {
            let tick = self.game.lock().await.tick(generation);
            match tick {
                TickOutcome::Drew(_) => {
                    draws = draws.saturating_add(1);
                }
                TickOutcome::Finished { last_ball, outcome } => {
                    if last_ball.is_some() {
                        draws = draws.saturating_add(1);
                    }
                    info!(generation, draws, "Draw loop finished");
                    return DrawLoopReport {
                        generation,
                        draws,
                        outcome: Some(outcome),
                    };
                }
                TickOutcome::Inactive => {
                    info!(generation, draws, "Draw loop cancelled");
                    return DrawLoopReport {
                        generation,
                        draws,
                        outcome: None,
                    };
                }
            }

            tokio::select! {
                () = tokio::time::sleep(self.draw_interval) => {}
                () = self.wake.notified() => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bingo_types::{ConnectionId, ServerEvent};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::broadcast::ChannelBroadcaster;
    use crate::card::Card;

    const CARD: &str = "B  I  N  G  O\n\
                        3 17 33 50 70\n\
                        1 16 31 46 61\n\
                        2 18 * 47 62\n\
                        4 19 34 48 63\n\
                        5 20 35 49 64";

    const INTERVAL: Duration = Duration::from_millis(1500);

    async fn handle_with_observer() -> (
        GameHandle<ChannelBroadcaster>,
        UnboundedReceiver<ServerEvent>,
    ) {
        let game = Game::new(ChannelBroadcaster::new(), SmallRng::seed_from_u64(3));
        let handle = GameHandle::new(game, INTERVAL);
        let id = ConnectionId::new();
        let rx = {
            let mut game = handle.lock().await;
            let rx = game.broadcaster_mut().attach(id);
            game.observe(id);
            rx
        };
        (handle, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn count_balls(events: &[ServerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, ServerEvent::Ball { .. }))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn loop_runs_until_a_win() {
        let (handle, mut rx) = handle_with_observer().await;
        {
            let mut game = handle.lock().await;
            let id = ConnectionId::new();
            game.join_with_card(id, Card::from_text(CARD).unwrap()).unwrap();
        }

        let sequence = DrawSequence::from_numbers([75, 3, 17, 33, 50, 70, 1]).unwrap();
        let task = handle.start_with_sequence(sequence).await.unwrap();
        let report = task.await.unwrap();

        assert_eq!(report.generation, 1);
        assert_eq!(report.draws, 6);
        assert_eq!(
            report.outcome,
            Some(GameOutcome::Won {
                winner: "Player 1".to_owned()
            })
        );

        let events = drain(&mut rx);
        assert_eq!(count_balls(&events), 6);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, ServerEvent::GameOver { .. }))
                .count(),
            1
        );
        assert_eq!(handle.lock().await.phase(), bingo_types::GamePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_paces_draws() {
        let (handle, mut rx) = handle_with_observer().await;
        let started = tokio::time::Instant::now();
        let sequence = DrawSequence::from_numbers([10, 20, 30]).unwrap();
        let report = handle
            .start_with_sequence(sequence)
            .await
            .unwrap()
            .await
            .unwrap();

        // Three draws, then the empty-pool tick after one more delay.
        assert_eq!(report.draws, 3);
        assert_eq!(report.outcome, Some(GameOutcome::Exhausted));
        assert_eq!(handle.draw_interval(), INTERVAL);
        assert!(started.elapsed() >= handle.draw_interval() * 3);
        assert_eq!(count_balls(&drain(&mut rx)), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_starts_run_one_game() {
        let (handle, mut rx) = handle_with_observer().await;
        drain(&mut rx);

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.start().await })
            })
            .collect();

        let mut loops = Vec::new();
        for attempt in attempts {
            if let Some(task) = attempt.await.unwrap() {
                loops.push(task);
            }
        }
        assert_eq!(loops.len(), 1);

        let report = loops.pop().unwrap().await.unwrap();
        assert_eq!(report.outcome, Some(GameOutcome::Exhausted));

        let events = drain(&mut rx);
        let started = events
            .iter()
            .filter(|e| matches!(e, ServerEvent::GameStarted))
            .count();
        assert_eq!(started, 1);

        let mut numbers: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                ServerEvent::Ball { number, .. } => Some(*number),
                _ => None,
            })
            .collect();
        assert_eq!(numbers.len(), 75);
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), 75);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_the_pending_tick() {
        let (handle, mut rx) = handle_with_observer().await;
        let task = handle.start().await.unwrap();

        tokio::time::sleep(INTERVAL * 2 + INTERVAL / 2).await;
        assert!(handle.stop().await);
        let report = task.await.unwrap();

        assert_eq!(report.outcome, None);
        assert_eq!(report.draws, 3);

        let events = drain(&mut rx);
        let game_over_at = events
            .iter()
            .position(|e| matches!(e, ServerEvent::GameOver { .. }))
            .unwrap();
        assert!(
            !events[game_over_at..]
                .iter()
                .any(|e| matches!(e, ServerEvent::Ball { .. }))
        );
        assert!(!handle.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop_runs_a_fresh_loop() {
        let (handle, _rx) = handle_with_observer().await;
        let first = handle.start().await.unwrap();
        assert!(handle.stop().await);
        assert_eq!(first.await.unwrap().generation, 1);

        let second = handle
            .start_with_sequence(DrawSequence::from_numbers([8]).unwrap())
            .await
            .unwrap();
        let report = second.await.unwrap();
        assert_eq!(report.generation, 2);
        assert_eq!(report.draws, 1);
        assert_eq!(handle.lock().await.history(), &[8]);
    }
}
