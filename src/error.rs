//! Error types used by the lifevisor container, resolver and components.
//!
//! This module defines four error types:
//!
//! - [`ComponentError`] failures raised by a component's lifecycle callback.
//! - [`LifecycleError`] a [`ComponentError`] tagged with the component and phase it came from.
//! - [`DependencyError`] violations found while computing the dependency order.
//! - [`ContainerError`] misuse of the container API (duplicate ids, late registration).
//!
//! Each type provides `as_label` (stable snake_case for logs and events).
//! Phase-fatal errors never escape [`Container::start`](crate::Container::start):
//! they are logged, published as events and turned into a state-machine failure.

use thiserror::Error;

use crate::components::ComponentId;
use crate::lifecycle::{Phase, State};

/// # Errors produced by component callbacks.
///
/// Returned by [`Component`](crate::Component) `init`/`start`/`stop`/`destroy`.
/// Panics inside a callback are caught by the controller and reported as
/// [`ComponentError::Panicked`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// The callback returned an error.
    #[error("component failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The callback panicked; the panic was caught.
    #[error("component panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ComponentError {
    /// Convenience constructor for [`ComponentError::Failed`].
    ///
    /// # Example
    /// ```
    /// use lifevisor::ComponentError;
    ///
    /// let err = ComponentError::failed("port 8080 in use");
    /// assert_eq!(err.to_string(), "component failed: port 8080 in use");
    /// ```
    pub fn failed(error: impl std::fmt::Display) -> Self {
        ComponentError::Failed {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        match self {
            ComponentError::Failed { .. } => "component_failed",
            ComponentError::Panicked { .. } => "component_panicked",
        }
    }
}

impl From<anyhow::Error> for ComponentError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on one line.
        ComponentError::Failed {
            error: format!("{err:#}"),
        }
    }
}

/// # A component failure tagged with where it happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{phase} of component '{id}' failed: {source}")]
pub struct LifecycleError {
    /// Component whose callback failed.
    pub id: ComponentId,
    /// Lifecycle phase of the failing callback.
    pub phase: Phase,
    /// The wrapped failure.
    #[source]
    pub source: ComponentError,
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        match self.phase {
            Phase::Init => "init_failed",
            Phase::Start => "start_failed",
            Phase::Stop => "stop_failed",
            Phase::Destroy => "destroy_failed",
        }
    }
}

/// # Errors produced while computing the dependency order.
///
/// All of them are fatal to startup: the container moves to its teardown path.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    /// A mandatory dependency was not registered.
    #[error("{requester} requires {}{capability} but none is registered", fmt_scope(.id))]
    Missing {
        /// Element that issued the lookup.
        requester: ComponentId,
        /// Requested capability (type name).
        capability: &'static str,
        /// Identifier the lookup was scoped to, if any.
        id: Option<ComponentId>,
    },

    /// A bare-type lookup matched more than one element.
    #[error("{requester} requires {capability} but it is ambiguous between {}", fmt_ids(.candidates))]
    Ambiguous {
        /// Element that issued the lookup.
        requester: ComponentId,
        /// Requested capability (type name).
        capability: &'static str,
        /// Every element exposing the capability, in registration order.
        candidates: Vec<ComponentId>,
    },

    /// The element registered under the requested id does not expose the capability.
    #[error("{requester} requires '{id}' as {capability} but '{id}' does not provide it")]
    Incompatible {
        /// Element that issued the lookup.
        requester: ComponentId,
        /// Identifier the lookup was scoped to.
        id: ComponentId,
        /// Requested capability (type name).
        capability: &'static str,
    },

    /// The dependency relation contains a cycle.
    ///
    /// `path` starts at the first occurrence of the re-encountered element and ends with it again.
    #[error("dependency cycle: {}", fmt_path(.path))]
    Cycle {
        /// Elements on the cycle, closing element repeated at the end.
        path: Vec<ComponentId>,
    },

    /// The element refused resolution for its own reasons.
    #[error("{id} rejected resolution: {reason}")]
    Rejected {
        /// Element that refused.
        id: ComponentId,
        /// Human-readable reason.
        reason: String,
    },
}

impl DependencyError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        match self {
            DependencyError::Missing { .. } => "dependency_missing",
            DependencyError::Ambiguous { .. } => "dependency_ambiguous",
            DependencyError::Incompatible { .. } => "dependency_incompatible",
            DependencyError::Cycle { .. } => "dependency_cycle",
            DependencyError::Rejected { .. } => "dependency_rejected",
        }
    }
}

/// # Errors produced by container API misuse.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// A component with the same id is already registered.
    #[error("component '{id}' is already registered")]
    Duplicate {
        /// The clashing identifier.
        id: ComponentId,
    },

    /// The container has already left its initial state.
    #[error("cannot register '{id}': container already left the initial state (now {state:?})")]
    RegistrationClosed {
        /// Identifier that was being registered.
        id: ComponentId,
        /// Container state observed at registration time.
        state: State,
    },
}

impl ContainerError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use lifevisor::{ComponentId, ContainerError};
    ///
    /// let err = ContainerError::Duplicate { id: ComponentId::new("db") };
    /// assert_eq!(err.as_label(), "container_duplicate");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ContainerError::Duplicate { .. } => "container_duplicate",
            ContainerError::RegistrationClosed { .. } => "container_registration_closed",
        }
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn fmt_scope(id: &Option<ComponentId>) -> String {
    match id {
        Some(id) => format!("'{id}' as "),
        None => String::new(),
    }
}

fn fmt_ids(ids: &[ComponentId]) -> String {
    ids.iter()
        .map(|id| format!("'{id}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_path(path: &[ComponentId]) -> String {
    path.iter()
        .map(ComponentId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
