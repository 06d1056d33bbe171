//! # LogWriter: events as tracing records
//!
//! Renders every [`Event`] through the `tracing` facade under the
//! `lifevisor::events` target. Failures are `warn`, everything else `info`
//! (`debug` for per-phase chatter).
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO lifevisor::events: [registered] component=db
//! INFO lifevisor::events: [state] state=initializing
//! DEBUG lifevisor::events: [phase-entered] component=db phase=init
//! WARN lifevisor::events: [phase-failed] component=db phase=start err="connection refused"
//! WARN lifevisor::events: [resolution-failed] err="dependency cycle: a -> b -> a"
//! WARN lifevisor::events: [termination-requested] component=web reason="listener died"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let component = e.component.as_ref().map(|c| c.as_str()).unwrap_or("-");
        let phase = e.phase.map(|p| p.as_label()).unwrap_or("-");
        let error = e.error.as_deref().unwrap_or("");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::ComponentRegistered => {
                tracing::info!(target: "lifevisor::events", "[registered] component={component}");
            }
            EventKind::StateChanged => {
                let state = e.state.map(|s| s.as_label()).unwrap_or("-");
                tracing::info!(target: "lifevisor::events", "[state] state={state}");
            }
            EventKind::RequestIgnored => {
                tracing::info!(target: "lifevisor::events", "[ignored] reason={reason:?}");
            }
            EventKind::PhaseEntered => {
                tracing::debug!(target: "lifevisor::events", "[phase-entered] component={component} phase={phase}");
            }
            EventKind::PhaseCompleted => {
                tracing::debug!(target: "lifevisor::events", "[phase-completed] component={component} phase={phase}");
            }
            EventKind::PhaseFailed => {
                tracing::warn!(target: "lifevisor::events", "[phase-failed] component={component} phase={phase} err={error:?}");
            }
            EventKind::DependenciesResolved => {
                tracing::info!(target: "lifevisor::events", "[resolved] order={reason}");
            }
            EventKind::ResolutionFailed => {
                tracing::warn!(target: "lifevisor::events", "[resolution-failed] err={error:?}");
            }
            EventKind::TerminationRequested => {
                tracing::warn!(
                    target: "lifevisor::events",
                    "[termination-requested] component={component} reason={reason:?} cause={error:?}"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
