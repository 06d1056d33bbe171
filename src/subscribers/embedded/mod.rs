//! # Built-in subscribers
//!
//! - [`LogWriter`]: renders events as `tracing` records.

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogWriter;
