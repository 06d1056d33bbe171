//! # Event subscribers.
//!
//! The [`Subscribe`] trait is the extension point for observing lifecycle
//! events (logging, metrics, health endpoints). [`SubscriberSet`] delivers every
//! event to every subscriber through the [`TopicExecutor`](crate::TopicExecutor),
//! one topic per subscriber.
//!
//! ## Architecture
//! ```text
//! Bus ──► Container listener ──► SubscriberSet::emit(&Event)
//!                                     │
//!                       ┌─────────────┼─────────────┐
//!                       ▼             ▼             ▼
//!                   [topic 0]     [topic 1]     [topic N]      (TopicExecutor)
//!                       │             │             │
//!                 sub0.on_event  sub1.on_event  subN.on_event
//! ```

mod embedded;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
