//! Synchronization primitives used to coordinate shutdown.
//!
//! - [`Latch`] one-shot broadcast condition (async and blocking waits)
//! - [`Interrupted`] returned by the cancellable wait

mod latch;

pub use latch::{Interrupted, Latch};
