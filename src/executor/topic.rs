use std::collections::VecDeque;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;

/// A queued unit of work, error already rendered as text.
pub(super) type Job = BoxFuture<'static, Result<(), String>>;

/// State of a single topic.
pub(super) struct TopicQueue {
    /// Whether a job of this topic is on the pool right now.
    pub status: TopicStatus,

    /// Jobs waiting for the active one to finish (FIFO order).
    pub queue: VecDeque<Job>,
}

/// Status of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TopicStatus {
    /// Nothing running, the next submission is spawned immediately.
    Idle,

    /// One job submitted to the pool.
    Running {
        /// When the active job was submitted.
        since: Instant,
    },
}

impl TopicQueue {
    /// Creates a new idle topic.
    pub fn new() -> Self {
        Self {
            status: TopicStatus::Idle,
            queue: VecDeque::new(),
        }
    }

    /// How long the active job has been on the pool, `None` when idle.
    pub fn running_for(&self) -> Option<Duration> {
        match self.status {
            TopicStatus::Idle => None,
            TopicStatus::Running { since } => Some(since.elapsed()),
        }
    }

    /// Jobs queued plus the active one.
    pub fn pending(&self) -> usize {
        let active = usize::from(self.status != TopicStatus::Idle);
        self.queue.len() + active
    }
}
