//! Runtime core: the container and its lifecycle machinery.
//!
//! The only public API from this module is [`Container`] and its
//! [`ContainerBuilder`].
//!
//! Internal modules:
//! - [`controller`]: wraps one component, runs its callbacks and tracks its status;
//! - [`machine`]: walks the state table, runs each state's activity;
//! - [`container`]: registration, start/stop, status queries;
//! - [`terminator`]: the termination capability handed to components;
//! - [`shutdown`]: termination latch and OS signal handling.

mod builder;
mod container;
mod controller;
mod machine;
mod shutdown;
mod terminator;

pub use builder::ContainerBuilder;
pub use container::Container;
pub(crate) use terminator::Terminator;
