//! # ContainerBuilder: wires a [`Container`] from a [`Config`].
//!
//! ```text
//! Config ──► bus (bus_capacity) ──► SubscriberSet (own executor, pool limit)
//!        └─► Terminator (latch + on_terminate hook) ──► Container
//! ```

use std::sync::Arc;

use crate::{
    config::Config,
    core::{Container, Terminator},
    events::Bus,
    executor::TopicExecutor,
    subscribers::{Subscribe, SubscriberSet},
    sync::Latch,
};

use super::terminator::TerminateHook;

/// Builder for constructing a [`Container`] with optional features.
pub struct ContainerBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    on_terminate: Option<TerminateHook>,
}

impl ContainerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            on_terminate: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Each subscriber receives every lifecycle event in publication order,
    /// on its own topic of the subscriber executor.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the host callback invoked whenever a component requests termination.
    ///
    /// Called on the requesting component's task; keep it short and non-blocking.
    pub fn on_terminate<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_terminate = Some(Arc::new(hook));
        self
    }

    /// Builds the container.
    ///
    /// Consumes the builder and wires the runtime pieces:
    /// - event bus sized by [`Config::bus_capacity_clamped`]
    /// - subscriber fan-out and component executor, limited by [`Config::concurrency_limit`]
    /// - termination latch and host callback
    pub fn build(self) -> Container {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let limit = self.cfg.concurrency_limit();

        let subs = Arc::new(SubscriberSet::new(
            self.subscribers,
            TopicExecutor::with_limit(limit),
        ));
        let terminator = Terminator::new(Arc::new(Latch::new()), self.on_terminate, bus.clone());

        Container::from_parts(
            self.cfg,
            bus,
            subs,
            terminator,
            TopicExecutor::with_limit(limit),
        )
    }
}
