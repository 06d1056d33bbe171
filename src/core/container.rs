//! # Container: registration, lifecycle progression and status queries.
//!
//! ## Architecture
//! ```text
//! add / register ──► Registry (std Mutex)     ──► Controller per component
//!                        │ sealed by start()
//!                        ▼
//! start / stop  ──► Machine (tokio Mutex)    ──► Controller::invoke(phase)
//!                        │                              │
//!                        ├─► watch<State>               ├─► watch<LifecycleStatus>
//!                        └─► Bus ◄──────────────────────┘
//!                             │
//!                             └─► listener ──► SubscriberSet::emit(&Event)
//!
//! run():  start ─► wait(termination latch | OS signal) ─► stop
//! ```
//!
//! ## Rules
//! - Registration is accepted only before the first `start()`.
//! - Concurrent `start`/`stop` calls serialize on the machine lock.
//! - `start()` and `stop()` never fail; callback failures steer the machine
//!   onto its teardown path and are reported through logs and events.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};

use crate::components::{
    Component, ComponentContext, ComponentId, Registration, StatusBoard,
};
use crate::config::Config;
use crate::core::builder::ContainerBuilder;
use crate::core::controller::Controller;
use crate::core::machine::Machine;
use crate::core::shutdown::{self, Wakeup};
use crate::core::Terminator;
use crate::error::ContainerError;
use crate::events::{Bus, Event, EventKind};
use crate::executor::TopicExecutor;
use crate::lifecycle::{LifecycleStatus, State};
use crate::subscribers::SubscriberSet;
use crate::sync::Latch;

#[derive(Default)]
struct Registry {
    sealed: bool,
    controllers: Vec<Arc<Controller>>,
    ids: HashSet<ComponentId>,
}

/// Lifecycle container for a set of interdependent components.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use lifevisor::{Component, Config, Container, State};
///
/// struct Db;
/// impl Component for Db {}
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut cfg = Config::default();
/// cfg.listen_os_signals = false;
/// let container = Container::builder(cfg).build();
///
/// container.add_with_id("db", Arc::new(Db)).unwrap();
/// assert_eq!(container.start().await, State::Running);
/// assert_eq!(container.stop().await, State::Destroyed);
/// assert!(!container.is_running());
/// # }
/// ```
pub struct Container {
    cfg: Config,
    registry: Mutex<Registry>,
    machine: tokio::sync::Mutex<Machine>,
    state: watch::Receiver<State>,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    listener: Mutex<Option<broadcast::Receiver<Event>>>,
    terminator: Terminator,
    executor: TopicExecutor,
}

impl Container {
    /// Container with the default configuration and no subscribers.
    pub fn new() -> Self {
        Self::builder(Config::default()).build()
    }

    /// Starts building a container.
    pub fn builder(cfg: Config) -> ContainerBuilder {
        ContainerBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: Config,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        terminator: Terminator,
        executor: TopicExecutor,
    ) -> Self {
        let (state_tx, state) = watch::channel(State::New);
        // Subscribed now so registration events reach subscribers once the listener runs.
        let listener = (!subs.is_empty()).then(|| bus.subscribe());
        Self {
            cfg,
            registry: Mutex::new(Registry::default()),
            machine: tokio::sync::Mutex::new(Machine::new(state_tx, bus.clone())),
            state,
            bus,
            subs,
            listener: Mutex::new(listener),
            terminator,
            executor,
        }
    }

    /// Registers `component` under its concrete type name.
    pub fn add<C: Component>(&self, component: Arc<C>) -> Result<ComponentId, ContainerError> {
        self.register(Registration::new(component))
    }

    /// Registers `component` under `id`.
    pub fn add_with_id<C: Component>(
        &self,
        id: impl Into<ComponentId>,
        component: Arc<C>,
    ) -> Result<ComponentId, ContainerError> {
        self.register(Registration::new(component).with_id(id))
    }

    /// Registers a fully described component.
    ///
    /// # Errors
    /// [`ContainerError::Duplicate`] if the id is taken, [`ContainerError::RegistrationClosed`]
    /// once `start()` has been called. The container is left unchanged on error.
    pub fn register(&self, reg: Registration) -> Result<ComponentId, ContainerError> {
        let id = reg.id().clone();
        let mut registry = self.registry();
        if registry.sealed {
            return Err(ContainerError::RegistrationClosed {
                id,
                state: self.state(),
            });
        }
        if registry.ids.contains(&id) {
            return Err(ContainerError::Duplicate { id });
        }

        registry.ids.insert(id.clone());
        registry
            .controllers
            .push(Arc::new(Controller::new(reg, self.bus.clone())));
        drop(registry);

        tracing::debug!(component = %id, "component registered");
        self.bus
            .publish(Event::new(EventKind::ComponentRegistered).with_component(&id));
        Ok(id)
    }

    /// Brings the container from `New` to `Running`.
    ///
    /// Returns the state reached: `Running`, or `Destroyed` when a callback or the
    /// dependency resolution failed. Calling it again is a logged no-op.
    pub async fn start(&self) -> State {
        let mut machine = self.machine.lock().await;
        if machine.state() != State::New {
            return self.ignore(machine.state(), "start: container already left the initial state");
        }

        let controllers = self.seal();
        let board = StatusBoard::new(
            controllers
                .iter()
                .map(|c| (c.id().clone(), c.watch()))
                .collect(),
        );
        let contexts = controllers
            .iter()
            .map(|c| {
                ComponentContext::new(
                    c.id().clone(),
                    board.clone(),
                    self.terminator.clone(),
                    self.executor.clone(),
                )
            })
            .collect();
        machine.load(controllers, contexts);
        self.spawn_listener();

        tracing::debug!(components = board.len(), "starting container");
        machine.drive().await
    }

    /// Tears a running container down to `Destroyed`.
    ///
    /// A no-op (logged) if the container never started or already finished.
    pub async fn stop(&self) -> State {
        let mut machine = self.machine.lock().await;
        match machine.state().stop_target() {
            Some(target) => {
                tracing::debug!("stopping container");
                machine.drive_from(target).await
            }
            None => self.ignore(machine.state(), "stop: container is not running"),
        }
    }

    /// Starts, waits for a termination request (or an OS signal when
    /// [`Config::listen_os_signals`] is set), then stops.
    ///
    /// Returns right after startup if it did not reach `Running`.
    pub async fn run(&self) -> State {
        let reached = self.start().await;
        if reached != State::Running {
            return reached;
        }

        match shutdown::wait_for_termination(self.terminator.latch(), self.cfg.listen_os_signals).await {
            Wakeup::Requested => tracing::info!("termination requested, stopping container"),
            Wakeup::Signal => tracing::info!("shutdown signal received, stopping container"),
        }
        self.stop().await
    }

    /// True until the container reaches `Destroyed`.
    pub fn is_running(&self) -> bool {
        self.state() != State::Destroyed
    }

    /// Current container state.
    pub fn state(&self) -> State {
        *self.state.borrow()
    }

    /// Status of the component registered as `id`.
    pub fn status(&self, id: &str) -> Option<LifecycleStatus> {
        self.registry()
            .controllers
            .iter()
            .find(|c| c.id().as_str() == id)
            .map(|c| c.status())
    }

    /// Every component with its status, in registration order.
    pub fn statuses(&self) -> Vec<(ComponentId, LifecycleStatus)> {
        self.registry()
            .controllers
            .iter()
            .map(|c| (c.id().clone(), c.status()))
            .collect()
    }

    /// Latch signalled by the first termination request.
    pub fn terminated(&self) -> Arc<Latch> {
        Arc::clone(self.terminator.latch())
    }

    /// Raw event stream (receives events published from now on).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Executor shared with every component.
    pub fn executor(&self) -> &TopicExecutor {
        &self.executor
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Closes registration and returns the component set in registration order.
    fn seal(&self) -> Vec<Arc<Controller>> {
        let mut registry = self.registry();
        registry.sealed = true;
        registry.controllers.clone()
    }

    fn ignore(&self, state: State, reason: &'static str) -> State {
        tracing::info!(state = ?state, "{reason}");
        self.bus.publish(
            Event::new(EventKind::RequestIgnored)
                .with_state(state)
                .with_reason(reason),
        );
        state
    }

    /// Forwards bus events to the subscribers (fire-and-forget).
    fn spawn_listener(&self) {
        let taken = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(mut rx) = taken else {
            return;
        };
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit_arc(Arc::new(ev)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "subscriber listener lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ComponentError, DependencyError};
    use crate::lifecycle::Phase;
    use crate::resolver::Dependencies;
    use crate::subscribers::Subscribe;
    use async_trait::async_trait;
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Journal = Arc<Mutex<Vec<String>>>;

    trait Store: Send + Sync {}

    struct Probe {
        name: &'static str,
        journal: Journal,
        needs: Vec<&'static str>,
        optional_store: bool,
        fail: Option<Phase>,
        panic_on: Option<Phase>,
        quit_on_start: bool,
        ctx: OnceLock<ComponentContext>,
    }

    impl Probe {
        fn new(name: &'static str, journal: &Journal) -> Self {
            Self {
                name,
                journal: Arc::clone(journal),
                needs: Vec::new(),
                optional_store: false,
                fail: None,
                panic_on: None,
                quit_on_start: false,
                ctx: OnceLock::new(),
            }
        }

        fn needs(mut self, deps: &[&'static str]) -> Self {
            self.needs = deps.to_vec();
            self
        }

        fn failing(mut self, phase: Phase) -> Self {
            self.fail = Some(phase);
            self
        }

        fn panicking(mut self, phase: Phase) -> Self {
            self.panic_on = Some(phase);
            self
        }

        fn hit(&self, phase: Phase) -> Result<(), ComponentError> {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:{}", phase, self.name));
            if self.panic_on == Some(phase) {
                panic!("{} blew up", self.name);
            }
            match self.fail {
                Some(p) if p == phase => Err(ComponentError::failed("boom")),
                _ => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Component for Probe {
        fn resolve(&self, deps: &mut Dependencies<'_>) -> Result<(), DependencyError> {
            for dep in &self.needs {
                deps.require_id::<Probe>(dep)?;
            }
            if self.optional_store {
                deps.optional::<dyn Store>()?;
            }
            self.journal
                .lock()
                .unwrap()
                .push(format!("resolve:{}", self.name));
            Ok(())
        }

        async fn init(&self, ctx: &ComponentContext) -> Result<(), ComponentError> {
            let _ = self.ctx.set(ctx.clone());
            self.hit(Phase::Init)
        }

        async fn start(&self) -> Result<(), ComponentError> {
            if let Some(ctx) = self.ctx.get() {
                for dep in &self.needs {
                    // Dependencies are started first.
                    assert_eq!(ctx.status_of(dep), Some(LifecycleStatus::Started));
                }
                if self.quit_on_start {
                    let cause = std::io::Error::other("upstream closed");
                    ctx.request_termination("lost upstream", Some(&cause));
                }
            }
            self.hit(Phase::Start)
        }

        async fn stop(&self) -> Result<(), ComponentError> {
            self.hit(Phase::Stop)
        }

        async fn destroy(&self) -> Result<(), ComponentError> {
            self.hit(Phase::Destroy)
        }
    }

    fn container() -> Container {
        let mut cfg = Config::default();
        cfg.listen_os_signals = false;
        Container::builder(cfg).build()
    }

    fn add(c: &Container, probe: Probe) {
        let name = probe.name;
        c.register(Registration::new(Arc::new(probe)).with_id(name))
            .unwrap();
    }

    /// Names recorded for `phase`, in call order.
    fn calls(journal: &Journal, phase: &str) -> Vec<String> {
        let prefix = format!("{phase}:");
        journal
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| e.strip_prefix(&prefix).map(str::to_owned))
            .collect()
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal
            .lock()
            .unwrap()
            .iter()
            .filter(|e| !e.starts_with("resolve:"))
            .cloned()
            .collect()
    }

    #[tokio::test]
    async fn test_dependency_order_drives_every_phase() {
        let j = Journal::default();
        let c = container();
        // D <- C <- B <- A, D <- E, {A, E} <- F
        add(&c, Probe::new("a", &j).needs(&["b"]));
        add(&c, Probe::new("b", &j).needs(&["c"]));
        add(&c, Probe::new("c", &j).needs(&["d"]));
        add(&c, Probe::new("d", &j));
        add(&c, Probe::new("e", &j).needs(&["d"]));
        add(&c, Probe::new("f", &j).needs(&["a", "e"]));

        assert_eq!(c.start().await, State::Running);
        assert!(c.is_running());
        assert_eq!(calls(&j, "init"), ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(calls(&j, "resolve"), ["d", "c", "b", "a", "e", "f"]);
        assert_eq!(calls(&j, "start"), ["d", "c", "b", "a", "e", "f"]);
        assert!(c.statuses().iter().all(|(_, s)| *s == LifecycleStatus::Started));

        assert_eq!(c.stop().await, State::Destroyed);
        assert!(!c.is_running());
        // Teardown walks the startup order.
        assert_eq!(calls(&j, "stop"), ["d", "c", "b", "a", "e", "f"]);
        assert_eq!(calls(&j, "destroy"), ["d", "c", "b", "a", "e", "f"]);
        assert_eq!(c.status("a"), Some(LifecycleStatus::Destroyed));
    }

    #[tokio::test]
    async fn test_cycle_ends_destroyed_without_start() {
        let j = Journal::default();
        let c = container();
        add(&c, Probe::new("a", &j).needs(&["b"]));
        add(&c, Probe::new("b", &j).needs(&["a"]));

        let mut rx = c.subscribe();
        assert_eq!(c.start().await, State::Destroyed);
        assert_eq!(
            entries(&j),
            ["init:a", "init:b", "destroy:a", "destroy:b"]
        );

        let failed = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|e| e.kind == EventKind::ResolutionFailed)
            .unwrap();
        assert_eq!(failed.error.as_deref(), Some("dependency cycle: a -> b -> a"));
    }

    #[tokio::test]
    async fn test_init_failure_skips_start_and_stop() {
        let j = Journal::default();
        let c = container();
        add(&c, Probe::new("a", &j));
        add(&c, Probe::new("b", &j).failing(Phase::Init));
        add(&c, Probe::new("c", &j));

        assert_eq!(c.start().await, State::Destroyed);
        assert_eq!(
            entries(&j),
            ["init:a", "init:b", "destroy:a", "destroy:b", "destroy:c"]
        );
        assert_eq!(c.status("c"), Some(LifecycleStatus::Destroyed));
    }

    #[tokio::test]
    async fn test_start_failure_stops_and_destroys_everyone() {
        let j = Journal::default();
        let c = container();
        add(&c, Probe::new("a", &j));
        add(&c, Probe::new("b", &j).failing(Phase::Start));
        add(&c, Probe::new("c", &j).failing(Phase::Stop));

        assert_eq!(c.start().await, State::Destroyed);
        assert_eq!(
            entries(&j),
            [
                "init:a", "init:b", "init:c", "start:a", "start:b", "stop:a", "stop:b", "stop:c",
                "destroy:a", "destroy:b", "destroy:c",
            ]
        );
    }

    #[tokio::test]
    async fn test_panicking_callback_is_a_failure() {
        let j = Journal::default();
        let c = container();
        add(&c, Probe::new("a", &j).panicking(Phase::Start));
        add(&c, Probe::new("b", &j).panicking(Phase::Destroy));

        assert_eq!(c.start().await, State::Destroyed);
        assert_eq!(calls(&j, "start"), ["a"]);
        assert_eq!(calls(&j, "destroy"), ["a", "b"]);
        assert_eq!(c.status("b"), Some(LifecycleStatus::Destroyed));
    }

    #[tokio::test]
    async fn test_optional_dependency_failure_propagates() {
        let j = Journal::default();
        let c = container();

        let mut web = Probe::new("web", &j);
        web.optional_store = true;
        add(&c, web);

        c.register(
            Registration::new(Arc::new(Probe::new("db", &j).needs(&["missing"])))
                .with_id("db")
                .provides::<dyn Store>(Arc::new(Backend)),
        )
        .unwrap();

        assert_eq!(c.start().await, State::Destroyed);
        assert!(calls(&j, "start").is_empty());
    }

    struct Backend;
    impl Store for Backend {}

    #[tokio::test]
    async fn test_registration_rules() {
        let j = Journal::default();
        let c = container();
        add(&c, Probe::new("a", &j));

        let dup = c.register(Registration::new(Arc::new(Probe::new("a", &j))).with_id("a"));
        assert_eq!(dup, Err(ContainerError::Duplicate { id: "a".into() }));
        assert_eq!(c.statuses().len(), 1);

        c.start().await;
        let late = c.add_with_id("b", Arc::new(Probe::new("b", &j)));
        assert_eq!(
            late,
            Err(ContainerError::RegistrationClosed {
                id: "b".into(),
                state: State::Running
            })
        );
    }

    #[tokio::test]
    async fn test_default_id_is_type_name() {
        struct Plain;
        impl Component for Plain {}

        let c = container();
        let id = c.add(Arc::new(Plain)).unwrap();
        assert_eq!(id.as_str(), std::any::type_name::<Plain>());
        assert_eq!(c.status(id.as_str()), Some(LifecycleStatus::New));
    }

    #[tokio::test]
    async fn test_repeated_requests_are_ignored() {
        let j = Journal::default();
        let c = container();
        add(&c, Probe::new("a", &j));

        assert_eq!(c.stop().await, State::New);
        assert_eq!(c.start().await, State::Running);
        assert_eq!(c.start().await, State::Running);
        assert_eq!(c.stop().await, State::Destroyed);
        assert_eq!(c.stop().await, State::Destroyed);
        assert_eq!(
            entries(&j),
            ["init:a", "start:a", "stop:a", "destroy:a"]
        );
    }

    #[tokio::test]
    async fn test_termination_request_ends_run() {
        let j = Journal::default();
        let hooks = Arc::new(AtomicUsize::new(0));
        let mut cfg = Config::default();
        cfg.listen_os_signals = false;
        let c = {
            let hooks = Arc::clone(&hooks);
            Container::builder(cfg)
                .on_terminate(move || {
                    hooks.fetch_add(1, Ordering::SeqCst);
                })
                .build()
        };
        let mut quitter = Probe::new("quitter", &j);
        quitter.quit_on_start = true;
        add(&c, quitter);

        let finished = tokio::time::timeout(Duration::from_secs(5), c.run()).await;
        assert_eq!(finished, Ok(State::Destroyed));
        assert!(c.terminated().is_signalled());
        assert_eq!(hooks.load(Ordering::SeqCst), 1);
        assert_eq!(calls(&j, "stop"), ["quitter"]);
    }

    struct StateRecorder {
        seen: Mutex<Vec<State>>,
        done: Latch,
    }

    #[async_trait]
    impl Subscribe for StateRecorder {
        async fn on_event(&self, ev: &Event) {
            if let (EventKind::StateChanged, Some(state)) = (ev.kind, ev.state) {
                self.seen.lock().unwrap().push(state);
                if state == State::Destroyed {
                    self.done.signal();
                }
            }
        }
    }

    #[tokio::test]
    async fn test_subscribers_see_every_transition() {
        let rec = Arc::new(StateRecorder {
            seen: Mutex::new(Vec::new()),
            done: Latch::new(),
        });
        let mut cfg = Config::default();
        cfg.listen_os_signals = false;
        let c = Container::builder(cfg)
            .with_subscribers(vec![rec.clone() as Arc<dyn Subscribe>])
            .build();
        add(&c, Probe::new("a", &Journal::default()));

        c.start().await;
        c.stop().await;

        assert!(rec.done.wait_timeout(Duration::from_secs(5)).await);
        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec![
                State::Initializing,
                State::Initialized,
                State::Starting,
                State::Started,
                State::Running,
                State::Stopping,
                State::Stopped,
                State::Destroying,
                State::Destroyed,
            ]
        );
    }
}
