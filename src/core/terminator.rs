//! # Terminator: the narrow capability a component uses to stop its host.
//!
//! Controllers never hold the container. They hold a [`Terminator`], which can
//! only record a termination request:
//! ```text
//! ComponentContext::request_termination(reason, cause)
//!     └─► Terminator::request(id, reason, cause)
//!            ├─► tracing::warn!
//!            ├─► Bus.publish(TerminationRequested)
//!            ├─► Latch::signal()            (Container::run / terminated() wake up)
//!            └─► on_terminate hook           (host-supplied, every request)
//! ```
//! The request does not stop anything by itself; the host decides what to do.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::components::ComponentId;
use crate::events::{Bus, Event, EventKind};
use crate::sync::Latch;

/// Host callback invoked on every termination request.
pub(crate) type TerminateHook = Arc<dyn Fn() + Send + Sync>;

/// Cloneable handle that records termination requests.
#[derive(Clone)]
pub(crate) struct Terminator {
    latch: Arc<Latch>,
    hook: Option<TerminateHook>,
    bus: Bus,
}

impl Terminator {
    pub(crate) fn new(latch: Arc<Latch>, hook: Option<TerminateHook>, bus: Bus) -> Self {
        Self { latch, hook, bus }
    }

    /// Records a request coming from component `id`.
    pub(crate) fn request(
        &self,
        id: &ComponentId,
        reason: &str,
        cause: Option<&(dyn StdError + 'static)>,
    ) {
        let cause = cause.map(render_chain);
        tracing::warn!(
            component = %id,
            reason,
            cause = cause.as_deref().unwrap_or("-"),
            "component requested termination"
        );

        let mut ev = Event::new(EventKind::TerminationRequested)
            .with_component(id)
            .with_reason(reason);
        if let Some(cause) = cause {
            ev = ev.with_error(cause);
        }
        self.bus.publish(ev);

        self.latch.signal();
        if let Some(hook) = &self.hook {
            hook();
        }
    }

    /// Latch signalled by the first request.
    pub(crate) fn latch(&self) -> &Arc<Latch> {
        &self.latch
    }
}

impl fmt::Debug for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminator")
            .field("requested", &self.latch.is_signalled())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// Renders an error with its `source()` chain on one line.
fn render_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(next) = cur {
        out.push_str(": ");
        out.push_str(&next.to_string());
        cur = next.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_request_signals_publishes_and_calls_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let hook: TerminateHook = {
            let calls = Arc::clone(&calls);
            Arc::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let term = Terminator::new(Arc::new(Latch::new()), Some(hook), bus);

        let cause = std::io::Error::other("socket closed");
        term.request(&"web".into(), "listener died", Some(&cause));
        term.request(&"web".into(), "again", None);

        assert!(term.latch().is_signalled());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::TerminationRequested);
        assert_eq!(ev.reason.as_deref(), Some("listener died"));
        assert_eq!(ev.error.as_deref(), Some("socket closed"));
    }
}
