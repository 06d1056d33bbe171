//! # Lifecycle events emitted by the container and its controllers.
//!
//! [`EventKind`] classifies events in three groups:
//! - **Container events**: registration, state changes, ignored requests
//! - **Component events**: a phase callback began, completed or failed
//! - **Resolution / termination events**: dependency order outcome, termination requests
//!
//! [`Event`] carries the optional metadata (component, phase, state, error, ...).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use lifevisor::{Event, EventKind, Phase};
//!
//! let ev = Event::new(EventKind::PhaseFailed)
//!     .with_component("db")
//!     .with_phase(Phase::Start)
//!     .with_error("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::PhaseFailed);
//! assert_eq!(ev.component.as_ref().map(|c| c.as_str()), Some("db"));
//! assert_eq!(ev.error.as_deref(), Some("connection refused"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::components::ComponentId;
use crate::lifecycle::{LifecycleStatus, Phase, State};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Container events ===
    /// A component was added to the container.
    ///
    /// Sets:
    /// - `component`: component id
    ComponentRegistered,

    /// The container entered a new state.
    ///
    /// Sets:
    /// - `state`: the entered state
    StateChanged,

    /// `start()` or `stop()` was called when it had nothing to do.
    ///
    /// Sets:
    /// - `state`: state at the time of the call
    /// - `reason`: which request was ignored and why
    RequestIgnored,

    // === Component events ===
    /// A component callback is about to run.
    ///
    /// Sets:
    /// - `component`, `phase`, `status` (the status entered)
    PhaseEntered,

    /// A component callback returned successfully.
    ///
    /// Sets:
    /// - `component`, `phase`, `status` (the status reached)
    PhaseCompleted,

    /// A component callback failed or panicked.
    ///
    /// Sets:
    /// - `component`, `phase`
    /// - `error`: failure message
    /// - `reason`: stable label of the failure
    PhaseFailed,

    // === Resolution events ===
    /// The dependency order was computed.
    ///
    /// Sets:
    /// - `reason`: resolved order, ids joined with `,`
    DependenciesResolved,

    /// Dependency resolution failed; startup is aborted.
    ///
    /// Sets:
    /// - `error`: the violation
    /// - `reason`: stable label of the violation
    ResolutionFailed,

    // === Termination events ===
    /// A component asked its host to terminate.
    ///
    /// Sets:
    /// - `component`: requesting component
    /// - `reason`: reason given by the component
    /// - `error`: cause, if any
    TerminationRequested,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Component concerned, if applicable.
    pub component: Option<ComponentId>,
    /// Callback phase, if applicable.
    pub phase: Option<Phase>,
    /// Component status entered or reached, if applicable.
    pub status: Option<LifecycleStatus>,
    /// Container state, if applicable.
    pub state: Option<State>,
    /// Human-readable reason or detail.
    pub reason: Option<Arc<str>>,
    /// Error message, if applicable.
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            component: None,
            phase: None,
            status: None,
            state: None,
            reason: None,
            error: None,
        }
    }

    /// Attaches a component id.
    #[inline]
    pub fn with_component(mut self, id: impl Into<ComponentId>) -> Self {
        self.component = Some(id.into());
        self
    }

    /// Attaches a callback phase.
    #[inline]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attaches a component status.
    #[inline]
    pub fn with_status(mut self, status: LifecycleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a container state.
    #[inline]
    pub fn with_state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an error message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Creates a [`EventKind::StateChanged`] event.
    #[inline]
    pub fn state_changed(state: State) -> Self {
        Event::new(EventKind::StateChanged).with_state(state)
    }

    /// Returns true for events describing a failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::PhaseFailed | EventKind::ResolutionFailed
        )
    }
}
