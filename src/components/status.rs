//! # Read-only view of every component's status.
//!
//! Each controller publishes its [`LifecycleStatus`] through a
//! [`tokio::sync::watch`] cell. [`StatusBoard`] holds the receiving ends, so
//! statuses can be read (or awaited) concurrently with lifecycle progression
//! without touching the container's locks.
//!
//! ## Rules
//! - Reads are **lock-per-component**: one slow reader never blocks progression.
//! - The board is built once, when the container seals its registry.
//! - [`StatusBoard::snapshot`] lists components in registration order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::components::ComponentId;
use crate::lifecycle::LifecycleStatus;

/// Shared, cloneable status view.
#[derive(Clone, Default)]
pub struct StatusBoard {
    order: Arc<Vec<ComponentId>>,
    cells: Arc<HashMap<ComponentId, watch::Receiver<LifecycleStatus>>>,
}

impl StatusBoard {
    /// Builds a board from `(id, receiver)` pairs in registration order.
    pub(crate) fn new(entries: Vec<(ComponentId, watch::Receiver<LifecycleStatus>)>) -> Self {
        let order = entries.iter().map(|(id, _)| id.clone()).collect();
        let cells = entries.into_iter().collect();
        Self {
            order: Arc::new(order),
            cells: Arc::new(cells),
        }
    }

    /// Current status of `id`, or `None` if no such component is registered.
    pub fn status(&self, id: &str) -> Option<LifecycleStatus> {
        self.cells.get(id).map(|rx| *rx.borrow())
    }

    /// Every component with its current status, in registration order.
    pub fn snapshot(&self) -> Vec<(ComponentId, LifecycleStatus)> {
        self.order
            .iter()
            .filter_map(|id| self.status(id.as_str()).map(|s| (id.clone(), s)))
            .collect()
    }

    /// Waits until `id` reaches at least `status`.
    ///
    /// Returns the reached status, or `None` if the component is unknown or its
    /// controller was dropped first.
    pub async fn wait_for(&self, id: &str, status: LifecycleStatus) -> Option<LifecycleStatus> {
        let mut rx = self.cells.get(id)?.clone();
        rx.wait_for(|s| *s >= status).await.ok().map(|s| *s)
    }

    /// Number of components on the board.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no component is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Debug for StatusBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_board_reflects_sender_updates() {
        let (tx_a, rx_a) = watch::channel(LifecycleStatus::New);
        let (_tx_b, rx_b) = watch::channel(LifecycleStatus::New);
        let board = StatusBoard::new(vec![("a".into(), rx_a), ("b".into(), rx_b)]);

        tx_a.send_replace(LifecycleStatus::Started);

        assert_eq!(board.status("a"), Some(LifecycleStatus::Started));
        assert_eq!(board.status("b"), Some(LifecycleStatus::New));
        assert_eq!(board.status("missing"), None);
        assert_eq!(
            board.snapshot(),
            vec![
                ("a".into(), LifecycleStatus::Started),
                ("b".into(), LifecycleStatus::New)
            ]
        );
    }

    #[tokio::test]
    async fn test_wait_for_status() {
        let (tx, rx) = watch::channel(LifecycleStatus::New);
        let board = StatusBoard::new(vec![("a".into(), rx)]);

        let waiter = {
            let board = board.clone();
            tokio::spawn(async move { board.wait_for("a", LifecycleStatus::Started).await })
        };
        tx.send_replace(LifecycleStatus::Initialized);
        tx.send_replace(LifecycleStatus::Started);

        assert_eq!(waiter.await.unwrap(), Some(LifecycleStatus::Started));
        assert_eq!(board.wait_for("nope", LifecycleStatus::New).await, None);
    }
}
