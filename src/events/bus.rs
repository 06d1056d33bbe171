//! # Event bus for broadcasting lifecycle events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]. Controllers, the state machine and
//! termination requests publish; the container's listener forwards everything
//! to the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ```text
//! Publishers (many):                   Consumer (one):
//!   Machine     ──┐
//!   Controller  ──┼──────► Bus ───────► Container listener ────► SubscriberSet
//!   Terminator  ──┘  (broadcast chan)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and never fails.
//! - **Bounded capacity**: slow receivers observe `RecvError::Lagged(n)` and skip `n` events.
//! - **No persistence**: with no receiver attached, events are dropped.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for lifecycle events.
///
/// Cheap to clone (internally an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus holding up to `capacity` undelivered events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to every attached receiver.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Attaches a receiver that observes events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of attached receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_reaches_existing_receivers_only() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::StateChanged)); // nobody listening

        let mut rx = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);
        bus.publish(Event::new(EventKind::ComponentRegistered).with_component("a"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ComponentRegistered);
        assert!(rx.try_recv().is_err());
    }
}
