//! Lifecycle vocabulary shared by the container, controllers and events.
//!
//! ## Contents
//! - [`State`] the container's position in the ten-state machine, with its transition table
//! - [`LifecycleStatus`] one component's position (monotonic)
//! - [`Phase`] the four component callbacks
//!
//! ## Quick wiring
//! ```text
//! Container ── State::New ─► ... ─► State::Running ─► ... ─► State::Destroyed
//!                 │ activity per state
//!                 ▼
//! Controller ── Phase::Init / Start / Stop / Destroy ─► LifecycleStatus
//! ```

mod phase;
mod state;
mod status;

pub use phase::Phase;
pub use state::{Outcome, State};
pub use status::LifecycleStatus;
