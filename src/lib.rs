//! # lifevisor
//!
//! **Lifevisor** is a component lifecycle engine for async Rust.
//!
//! A [`Container`] manages a set of interdependent components through ordered
//! lifecycle phases (`init`, `start`, `stop`, `destroy`). It computes a
//! dependency-respecting processing order from what each component pulls in its
//! [`resolve`](Component::resolve) hook, and coordinates the run through an
//! explicit ten-state machine.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ Registration │   │ Registration │   │ Registration │
//!     │ (component + │   │ (component + │   │ (component + │
//!     │ capabilities)│   │ capabilities)│   │ capabilities)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Container                                                        │
//! │  - Registry (std Mutex, sealed by start)                          │
//! │  - Machine (tokio Mutex, walks the state table)                   │
//! │  - Terminator (termination latch + host callback)                 │
//! │  - TopicExecutor (shared with components)                         │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │  Controller  │   │  Controller  │   │  Controller  │   │
//!     │ (status cell)│   │ (status cell)│   │ (status cell)│   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ PhaseEntered     │ PhaseCompleted   │ PhaseFailed     │ StateChanged
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                        (one executor topic each)
//!                          ┌─────────┼─────────┐
//!                          ▼         ▼         ▼
//!                       sub1.on   sub2.on   subN.on
//!                        _event()  _event()  _event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! New ─► Initializing ─► Initialized ─► Starting ─► Started ─► Running
//!             │ init() each   │ resolve      │ start() each        │ stop()
//!             │ failure       │ failure      │ failure             ▼
//!             ▼               ▼              └──────────────► Stopping ─► Stopped
//!        Destroying ◄─────────┘                                              │
//!             │ destroy() each ◄─────────────────────────────────────────────┘
//!             ▼
//!        Destroyed
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Components**    | Implement callbacks, declare capabilities and dependencies.   | [`Component`], [`Registration`]             |
//! | **Resolution**    | Pull-based dependency lookups with cycle/ambiguity detection. | [`Dependencies`], [`DependencyError`]       |
//! | **Container**     | Register, start, stop, query statuses, run until terminated.  | [`Container`], [`ContainerBuilder`]         |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, health).        | [`Subscribe`], [`Event`]                    |
//! | **Primitives**    | One-shot latch, per-topic ordered executor.                   | [`Latch`], [`TopicExecutor`]                |
//! | **Configuration** | Centralize runtime settings.                                  | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber (enabled by default).
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, OnceLock};
//! use async_trait::async_trait;
//! use lifevisor::{
//!     Component, ComponentError, Config, Container, Dependencies, DependencyError,
//!     Registration, State,
//! };
//!
//! trait Storage: Send + Sync {
//!     fn url(&self) -> &str;
//! }
//!
//! struct Postgres;
//! impl Storage for Postgres {
//!     fn url(&self) -> &str { "postgres://localhost" }
//! }
//! impl Component for Postgres {}
//!
//! #[derive(Default)]
//! struct Api {
//!     storage: OnceLock<Arc<dyn Storage>>,
//! }
//!
//! #[async_trait]
//! impl Component for Api {
//!     fn resolve(&self, deps: &mut Dependencies<'_>) -> Result<(), DependencyError> {
//!         let _ = self.storage.set(deps.require::<dyn Storage>()?);
//!         Ok(())
//!     }
//!
//!     async fn start(&self) -> Result<(), ComponentError> {
//!         let storage = self.storage.get().ok_or_else(|| ComponentError::failed("unresolved"))?;
//!         assert_eq!(storage.url(), "postgres://localhost");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.listen_os_signals = false;
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn lifevisor::Subscribe>> = vec![Arc::new(lifevisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn lifevisor::Subscribe>> = Vec::new();
//!
//!     let container = Container::builder(cfg).with_subscribers(subs).build();
//!
//!     // Registered first, started second: the order comes from `resolve`.
//!     container.add_with_id("api", Arc::new(Api::default()))?;
//!     let pg = Arc::new(Postgres);
//!     container.register(Registration::new(pg.clone()).with_id("db").provides::<dyn Storage>(pg))?;
//!
//!     assert_eq!(container.start().await, State::Running);
//!     assert_eq!(container.stop().await, State::Destroyed);
//!     Ok(())
//! }
//! ```
mod components;
mod config;
mod core;
mod error;
mod events;
mod executor;
mod lifecycle;
mod resolver;
mod subscribers;
mod sync;

// ---- Public re-exports ----

pub use crate::core::{Container, ContainerBuilder};
pub use components::{
    Capabilities, Component, ComponentContext, ComponentId, ComponentRef, Registration,
    StatusBoard,
};
pub use config::Config;
pub use error::{ComponentError, ContainerError, DependencyError, LifecycleError};
pub use events::{Bus, Event, EventKind};
pub use executor::{TaskOutput, TopicExecutor};
pub use lifecycle::{LifecycleStatus, Outcome, Phase, State};
pub use resolver::Dependencies;
pub use subscribers::{Subscribe, SubscriberSet};
pub use sync::{Interrupted, Latch};

// Optional: expose the built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
