//! # Controller: one component under management.
//!
//! Wraps a registered component with its id, capabilities and status cell, and
//! runs its callbacks:
//! ```text
//! invoke(phase)
//!   ├─► status = phase.entering()        (only forward)
//!   ├─► publish PhaseEntered
//!   ├─► callback under catch_unwind      (panic → ComponentError::Panicked)
//!   ├─ Ok  ─► status = phase.completed(), publish PhaseCompleted
//!   └─ Err ─► publish PhaseFailed; teardown phases still complete the status
//! ```
//! A controller never holds the container; the only outward capability a
//! component receives is its [`ComponentContext`].

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::watch;

use crate::components::{Capabilities, ComponentContext, ComponentId, ComponentRef, Registration};
use crate::error::{ComponentError, DependencyError, LifecycleError, panic_message};
use crate::events::{Bus, Event, EventKind};
use crate::lifecycle::{LifecycleStatus, Phase};
use crate::resolver::{Dependencies, Node};

pub(crate) struct Controller {
    id: ComponentId,
    component: ComponentRef,
    capabilities: Capabilities,
    status: watch::Sender<LifecycleStatus>,
    bus: Bus,
}

impl Controller {
    pub(crate) fn new(reg: Registration, bus: Bus) -> Self {
        let (id, component, capabilities) = reg.into_parts();
        let (status, _) = watch::channel(LifecycleStatus::New);
        Self {
            id,
            component,
            capabilities,
            status,
            bus,
        }
    }

    pub(crate) fn id(&self) -> &ComponentId {
        &self.id
    }

    pub(crate) fn status(&self) -> LifecycleStatus {
        *self.status.borrow()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<LifecycleStatus> {
        self.status.subscribe()
    }

    /// Runs the `phase` callback and tracks the status around it.
    pub(crate) async fn invoke(
        &self,
        phase: Phase,
        ctx: &ComponentContext,
    ) -> Result<(), LifecycleError> {
        let entering = phase.entering();
        self.advance(entering);
        self.bus.publish(
            Event::new(EventKind::PhaseEntered)
                .with_component(&self.id)
                .with_phase(phase)
                .with_status(entering),
        );

        let fut = match phase {
            Phase::Init => self.component.init(ctx),
            Phase::Start => self.component.start(),
            Phase::Stop => self.component.stop(),
            Phase::Destroy => self.component.destroy(),
        };
        let res = AssertUnwindSafe(fut)
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(ComponentError::Panicked {
                    info: panic_message(&*payload),
                })
            });

        match res {
            Ok(()) => {
                let completed = phase.completed();
                self.advance(completed);
                self.bus.publish(
                    Event::new(EventKind::PhaseCompleted)
                        .with_component(&self.id)
                        .with_phase(phase)
                        .with_status(completed),
                );
                Ok(())
            }
            Err(source) => {
                let err = LifecycleError {
                    id: self.id.clone(),
                    phase,
                    source,
                };
                if phase.is_teardown() {
                    self.advance(phase.completed());
                }
                self.bus.publish(
                    Event::new(EventKind::PhaseFailed)
                        .with_component(&self.id)
                        .with_phase(phase)
                        .with_status(self.status())
                        .with_reason(err.source.as_label())
                        .with_error(err.source.to_string()),
                );
                Err(err)
            }
        }
    }

    /// Moves the status to `next` unless it is already there or beyond.
    fn advance(&self, next: LifecycleStatus) {
        self.status.send_if_modified(|cur| {
            if next > *cur {
                *cur = next;
                true
            } else {
                false
            }
        });
    }
}

impl Node for Controller {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn resolve(&self, deps: &mut Dependencies<'_>) -> Result<(), DependencyError> {
        std::panic::catch_unwind(AssertUnwindSafe(|| self.component.resolve(deps))).unwrap_or_else(
            |payload| {
                Err(DependencyError::Rejected {
                    id: self.id.clone(),
                    reason: format!("resolve panicked: {}", panic_message(&*payload)),
                })
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, StatusBoard};
    use crate::core::Terminator;
    use crate::executor::TopicExecutor;
    use crate::sync::Latch;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Flaky;

    #[async_trait]
    impl Component for Flaky {
        async fn start(&self) -> Result<(), ComponentError> {
            Err(ComponentError::failed("port in use"))
        }

        async fn stop(&self) -> Result<(), ComponentError> {
            let explode = true;
            if explode {
                panic!("stop exploded");
            }
            Ok(())
        }
    }

    fn context(bus: &Bus) -> ComponentContext {
        let terminator = Terminator::new(Arc::new(Latch::new()), None, bus.clone());
        ComponentContext::new(
            "flaky".into(),
            StatusBoard::default(),
            terminator,
            TopicExecutor::new(),
        )
    }

    #[tokio::test]
    async fn test_status_tracks_phases() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let ctl = Controller::new(Registration::new(Arc::new(Flaky)).with_id("flaky"), bus.clone());
        let ctx = context(&bus);

        ctl.invoke(Phase::Init, &ctx).await.unwrap();
        assert_eq!(ctl.status(), LifecycleStatus::Initialized);

        let err = ctl.invoke(Phase::Start, &ctx).await.unwrap_err();
        assert_eq!(err.phase, Phase::Start);
        assert_eq!(err.source, ComponentError::failed("port in use"));
        // A failed start leaves the component in `Starting`.
        assert_eq!(ctl.status(), LifecycleStatus::Starting);

        let err = ctl.invoke(Phase::Stop, &ctx).await.unwrap_err();
        assert_eq!(
            err.source,
            ComponentError::Panicked {
                info: "stop exploded".into()
            }
        );
        assert_eq!(ctl.status(), LifecycleStatus::Stopped);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::PhaseEntered,
                EventKind::PhaseCompleted,
                EventKind::PhaseEntered,
                EventKind::PhaseFailed,
                EventKind::PhaseEntered,
                EventKind::PhaseFailed,
            ]
        );
    }

    #[tokio::test]
    async fn test_status_never_moves_backwards() {
        let bus = Bus::new(8);
        let ctl = Controller::new(Registration::new(Arc::new(Flaky)), bus.clone());
        let ctx = context(&bus);

        ctl.invoke(Phase::Destroy, &ctx).await.unwrap();
        ctl.invoke(Phase::Init, &ctx).await.unwrap();
        assert_eq!(ctl.status(), LifecycleStatus::Destroyed);
    }
}
