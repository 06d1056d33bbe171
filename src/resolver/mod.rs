//! # Dependency resolution.
//!
//! The dependency graph is never built explicitly. Each element declares its
//! dependencies by pulling them through [`Dependencies`] from inside its
//! `resolve` hook; every lookup recursively resolves the match first, so the
//! processing order emerges from call order (post-order depth-first walk).
//!
//! ```text
//! for root in registration order (not yet finished):
//!     visit(root)
//!
//! visit(x):
//!     x on in-progress stack? ─► Cycle { stack[first x ..] + x }
//!     push x
//!     x.resolve(deps)     ── deps.require::<T>() ─► visit(match) ─► handle
//!     pop x, append x to order
//! ```
//!
//! Ties are broken by registration order, so the result is deterministic.

mod dependencies;
mod walk;

pub use dependencies::Dependencies;
pub(crate) use walk::{Node, Resolver};
