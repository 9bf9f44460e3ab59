//! Event delivery to connected clients.
//!
//! The coordinator talks to clients only through the [`Broadcaster`]
//! trait, so the transport (WebSocket, raw socket, in-process channel) is
//! a detail of the implementation. Delivery is fire-and-forget: a failed
//! send to one recipient never aborts delivery to the others.

use std::collections::BTreeMap;

use bingo_types::{ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tracing::debug;

/// Delivers typed events to one or all connections.
pub trait Broadcaster: Send {
    /// Deliver `event` to a single connection.
    ///
    /// Returns whether the event was handed to the transport. An unknown
    /// or closed connection yields `false`, never an error.
    fn send_to(&mut self, id: ConnectionId, event: &ServerEvent) -> bool;

    /// Deliver `event` to every connection.
    ///
    /// Returns how many connections accepted it.
    fn broadcast(&mut self, event: &ServerEvent) -> usize;

    /// Stop delivering to `id`.
    fn disconnect(&mut self, id: ConnectionId);
}

/// A [`Broadcaster`] that hands events to per-connection channels.
///
/// Each attached connection owns the receiving half and forwards events to
/// its transport at its own pace. The channels are unbounded, so sending
/// never waits on a slow client.
#[derive(Debug, Default)]
pub struct ChannelBroadcaster {
    outboxes: BTreeMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
}

impl ChannelBroadcaster {
    /// An empty broadcaster.
    pub const fn new() -> Self {
        Self {
            outboxes: BTreeMap::new(),
        }
    }

    /// Attach a connection and return the receiver for its events.
    ///
    /// Attaching an id twice replaces the earlier channel.
    pub fn attach(&mut self, id: ConnectionId) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outboxes.insert(id, tx);
        rx
    }

    /// Whether `id` is attached.
    pub fn is_attached(&self, id: ConnectionId) -> bool {
        self.outboxes.contains_key(&id)
    }

    /// Number of attached connections.
    pub fn connection_count(&self) -> usize {
        self.outboxes.len()
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn send_to(&mut self, id: ConnectionId, event: &ServerEvent) -> bool {
        let Some(tx) = self.outboxes.get(&id) else {
            debug!(connection = %id, "Send skipped: connection not attached");
            return false;
        };
        if tx.send(event.clone()).is_err() {
            debug!(connection = %id, "Send failed: receiver dropped, detaching");
            self.outboxes.remove(&id);
            return false;
        }
        true
    }

    fn broadcast(&mut self, event: &ServerEvent) -> usize {
        let mut delivered: usize = 0;
        let mut closed = Vec::new();

        for (id, tx) in &self.outboxes {
            if tx.send(event.clone()).is_ok() {
                delivered = delivered.saturating_add(1);
            } else {
                closed.push(*id);
            }
        }

        for id in closed {
            debug!(connection = %id, "Broadcast skipped closed connection, detaching");
            self.outboxes.remove(&id);
        }

        delivered
    }

    fn disconnect(&mut self, id: ConnectionId) {
        self.outboxes.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_to_reaches_only_the_target() {
        let mut broadcaster = ChannelBroadcaster::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        let mut rx_a = broadcaster.attach(a);
        let mut rx_b = broadcaster.attach(b);

        assert!(broadcaster.send_to(a, &ServerEvent::GameStarted));
        assert_eq!(rx_a.try_recv().ok(), Some(ServerEvent::GameStarted));
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn send_to_unknown_connection_is_not_an_error() {
        let mut broadcaster = ChannelBroadcaster::new();
        assert!(!broadcaster.send_to(ConnectionId::new(), &ServerEvent::GameStarted));
    }

    #[test]
    fn broadcast_reaches_every_connection() {
        let mut broadcaster = ChannelBroadcaster::new();
        let mut receivers: Vec<_> = (0..3)
            .map(|_| broadcaster.attach(ConnectionId::new()))
            .collect();

        let event = ServerEvent::PlayersCount { count: 3 };
        assert_eq!(broadcaster.broadcast(&event), 3);
        for rx in &mut receivers {
            assert_eq!(rx.try_recv().ok(), Some(event.clone()));
        }
    }

    #[test]
    fn dropped_receiver_does_not_block_the_rest() {
        let mut broadcaster = ChannelBroadcaster::new();
        let gone = ConnectionId::new();
        let alive = ConnectionId::new();
        drop(broadcaster.attach(gone));
        let mut rx = broadcaster.attach(alive);

        assert_eq!(broadcaster.broadcast(&ServerEvent::GameStarted), 1);
        assert_eq!(rx.try_recv().ok(), Some(ServerEvent::GameStarted));
        assert!(!broadcaster.is_attached(gone));
        assert!(broadcaster.is_attached(alive));
    }

    #[test]
    fn failed_targeted_send_detaches() {
        let mut broadcaster = ChannelBroadcaster::new();
        let id = ConnectionId::new();
        drop(broadcaster.attach(id));
        assert!(!broadcaster.send_to(id, &ServerEvent::GameStarted));
        assert_eq!(broadcaster.connection_count(), 0);
    }

    #[test]
    fn disconnect_stops_delivery() {
        let mut broadcaster = ChannelBroadcaster::new();
        let id = ConnectionId::new();
        let mut rx = broadcaster.attach(id);
        broadcaster.disconnect(id);

        assert_eq!(broadcaster.broadcast(&ServerEvent::GameStarted), 0);
        assert!(rx.try_recv().is_err());
    }
}
