//! # Machine: drives the container through its states.
//!
//! Entering a state runs its activity over the components in the current
//! processing order, then follows the transition table until the machine parks
//! (`Running`) or lands on `Destroyed`.
//!
//! Processing order is registration order until dependency resolution
//! succeeds, the resolved order afterwards. Teardown walks the same order as
//! startup.

use std::sync::Arc;

use tokio::sync::watch;

use crate::components::ComponentContext;
use crate::core::controller::Controller;
use crate::events::{Bus, Event, EventKind};
use crate::lifecycle::{Outcome, Phase, State};
use crate::resolver::{Node, Resolver};

pub(crate) struct Machine {
    state: State,
    controllers: Vec<Arc<Controller>>,
    contexts: Vec<ComponentContext>,
    order: Vec<usize>,
    state_tx: watch::Sender<State>,
    bus: Bus,
}

impl Machine {
    pub(crate) fn new(state_tx: watch::Sender<State>, bus: Bus) -> Self {
        Self {
            state: State::New,
            controllers: Vec::new(),
            contexts: Vec::new(),
            order: Vec::new(),
            state_tx,
            bus,
        }
    }

    pub(crate) fn state(&self) -> State {
        self.state
    }

    /// Installs the sealed component set; `contexts[i]` belongs to `controllers[i]`.
    pub(crate) fn load(&mut self, controllers: Vec<Arc<Controller>>, contexts: Vec<ComponentContext>) {
        self.order = (0..controllers.len()).collect();
        self.controllers = controllers;
        self.contexts = contexts;
    }

    /// Runs from the current state until the machine parks or finishes.
    pub(crate) async fn drive(&mut self) -> State {
        while self.state != State::Running && !self.state.is_finished() {
            let outcome = self.activity().await;
            match self.state.next(outcome) {
                Some(next) => self.enter(next),
                None => break,
            }
        }
        self.state
    }

    /// Jumps to `state` (an explicit stop request), then drives.
    pub(crate) async fn drive_from(&mut self, state: State) -> State {
        self.enter(state);
        self.drive().await
    }

    fn enter(&mut self, state: State) {
        tracing::debug!(from = ?self.state, to = ?state, "container state changed");
        self.state = state;
        self.state_tx.send_replace(state);
        self.bus.publish(Event::state_changed(state));
    }

    async fn activity(&mut self) -> Outcome {
        match self.state {
            State::Initializing => self.run_phase(Phase::Init).await,
            State::Initialized => self.resolve(),
            State::Starting => self.run_phase(Phase::Start).await,
            State::Stopping => self.run_phase(Phase::Stop).await,
            State::Destroying => self.run_phase(Phase::Destroy).await,
            State::New | State::Started | State::Running | State::Stopped | State::Destroyed => {
                Outcome::Success
            }
        }
    }

    /// Calls `phase` on every component in processing order.
    ///
    /// Init and start abort on the first failure; teardown phases visit everyone.
    async fn run_phase(&self, phase: Phase) -> Outcome {
        for &idx in &self.order {
            let ctl = &self.controllers[idx];
            if let Err(err) = ctl.invoke(phase, &self.contexts[idx]).await {
                if phase.is_teardown() {
                    tracing::warn!(component = %ctl.id(), phase = %phase, error = %err.source, "teardown callback failed");
                } else {
                    tracing::error!(component = %ctl.id(), phase = %phase, error = %err.source, label = err.as_label(), "lifecycle callback failed");
                    return Outcome::Failure;
                }
            }
        }
        Outcome::Success
    }

    /// Computes the dependency order, replacing the registration order.
    fn resolve(&mut self) -> Outcome {
        let nodes: Vec<Arc<dyn Node>> = self
            .controllers
            .iter()
            .map(|c| Arc::clone(c) as Arc<dyn Node>)
            .collect();

        match Resolver::new(nodes).resolve() {
            Ok(order) => {
                let ids: Vec<&str> = order
                    .iter()
                    .map(|&i| self.controllers[i].id().as_str())
                    .collect();
                let joined = ids.join(",");
                tracing::debug!(order = %joined, "dependencies resolved");
                self.bus
                    .publish(Event::new(EventKind::DependenciesResolved).with_reason(joined));
                self.order = order;
                Outcome::Success
            }
            Err(err) => {
                tracing::error!(error = %err, label = err.as_label(), "dependency resolution failed");
                self.bus.publish(
                    Event::new(EventKind::ResolutionFailed)
                        .with_reason(err.as_label())
                        .with_error(err.to_string()),
                );
                Outcome::Failure
            }
        }
    }
}
