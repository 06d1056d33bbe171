//! # SubscriberSet: ordered fan-out over multiple subscribers
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO: subscriber `i` is topic `i` of the executor.
//! - Panics inside subscribers are caught and logged by the executor.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No bound on a slow subscriber's backlog.

use std::sync::Arc;

use crate::events::Event;
use crate::executor::TopicExecutor;

use super::Subscribe;

/// Fan-out of events to a fixed list of subscribers.
pub struct SubscriberSet {
    subscribers: Vec<Arc<dyn Subscribe>>,
    executor: TopicExecutor<usize>,
}

impl SubscriberSet {
    /// Creates a set delivering through `executor`.
    #[must_use]
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>, executor: TopicExecutor<usize>) -> Self {
        Self {
            subscribers,
            executor,
        }
    }

    /// Emits an event to all subscribers (one `Arc` shared by every delivery).
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a pre-allocated `Arc<Event>` to all subscribers.
    pub fn emit_arc(&self, event: Arc<Event>) {
        for (topic, sub) in self.subscribers.iter().enumerate() {
            let sub = Arc::clone(sub);
            let ev = Arc::clone(&event);
            self.executor
                .execute_on(topic, async move { sub.on_event(&ev).await });
        }
    }

    /// Names of the subscribers, in delivery-topic order.
    pub fn names(&self) -> Vec<&'static str> {
        self.subscribers.iter().map(|s| s.name()).collect()
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns true if there is nobody to deliver to.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
