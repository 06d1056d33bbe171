//! Per-topic ordered execution on a shared pool.
//!
//! [`TopicExecutor`] runs tasks that share a topic strictly in submission order,
//! one at a time, while tasks of different topics run concurrently on the Tokio
//! runtime. It is how asynchronous notifications keep per-key order without a
//! dedicated worker per key.
//!
//! ## Contents
//! - [`TopicExecutor`] the executor handle (cheap to clone)
//! - [`TaskOutput`] what a submitted future may return (`()` or `Result<(), E>`)
//!
//! ## Architecture
//! ```text
//! execute(topic, task)
//!     │
//!     ├─ topic idle?  ──► mark running ──► tokio::spawn(job)  (permit from pool limit)
//!     └─ topic busy?  ──► push_back(job)                      (FIFO per topic)
//!
//! job finished (Ok / Err / panic)
//!     └─► pop_front(topic) ──► Some(next) ──► tokio::spawn(next)
//!                          └─► None       ──► mark idle
//! ```

mod pool;
mod topic;

pub use pool::{TaskOutput, TopicExecutor};
