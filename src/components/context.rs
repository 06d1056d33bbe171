//! # Per-component runtime context.
//!
//! Handed to [`Component::init`](crate::Component::init). A component may keep
//! a clone for later use; every handle inside is cheap to clone.

use std::error::Error as StdError;

use crate::components::{ComponentId, StatusBoard};
use crate::core::Terminator;
use crate::executor::TopicExecutor;
use crate::lifecycle::LifecycleStatus;

/// What a component can see and do from inside the container.
#[derive(Clone, Debug)]
pub struct ComponentContext {
    id: ComponentId,
    board: StatusBoard,
    terminator: Terminator,
    executor: TopicExecutor,
}

impl ComponentContext {
    pub(crate) fn new(
        id: ComponentId,
        board: StatusBoard,
        terminator: Terminator,
        executor: TopicExecutor,
    ) -> Self {
        Self {
            id,
            board,
            terminator,
            executor,
        }
    }

    /// Identifier this component was registered under.
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    /// This component's current status.
    pub fn status(&self) -> LifecycleStatus {
        self.board.status(self.id.as_str()).unwrap_or_default()
    }

    /// Current status of another component, `None` if unknown.
    pub fn status_of(&self, id: &str) -> Option<LifecycleStatus> {
        self.board.status(id)
    }

    /// Every component's status, in registration order.
    pub fn statuses(&self) -> &StatusBoard {
        &self.board
    }

    /// Asks the host to shut the container down.
    ///
    /// Logs the request, publishes a `TerminationRequested` event, signals
    /// [`Container::terminated`](crate::Container::terminated) and invokes the
    /// host's `on_terminate` callback. Nothing is stopped directly.
    pub fn request_termination(&self, reason: &str, cause: Option<&(dyn StdError + 'static)>) {
        self.terminator.request(&self.id, reason, cause);
    }

    /// Shared executor for ordered asynchronous notifications.
    pub fn executor(&self) -> &TopicExecutor {
        &self.executor
    }
}
