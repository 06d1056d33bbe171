//! # Component contract.
//!
//! A [`Component`] is a unit managed through four async callbacks
//! (`init`, `start`, `stop`, `destroy`) plus one synchronous declaration hook,
//! [`resolve`](Component::resolve), through which it pulls its dependencies.
//! Every method has a no-op default, so a component only implements what it needs.
//!
//! ## Call order (per container run)
//! ```text
//! init(ctx)      registration order, before dependencies are known
//! resolve(deps)  exactly once, dependencies resolved first
//! start()        dependency order
//! stop()         dependency order (same direction as start)
//! destroy()      dependency order
//! ```
//!
//! Callbacks run sequentially on the task driving the container; a callback that
//! never returns blocks the whole lifecycle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::components::ComponentContext;
use crate::error::{ComponentError, DependencyError};
use crate::resolver::Dependencies;

/// Shared handle to a component.
pub type ComponentRef = Arc<dyn Component>;

/// # Lifecycle-managed unit.
///
/// # Example
/// ```
/// use std::sync::{Arc, OnceLock};
/// use async_trait::async_trait;
/// use lifevisor::{Component, ComponentContext, ComponentError, Dependencies, DependencyError};
///
/// trait Storage: Send + Sync {}
///
/// struct Api {
///     storage: OnceLock<Arc<dyn Storage>>,
/// }
///
/// #[async_trait]
/// impl Component for Api {
///     fn resolve(&self, deps: &mut Dependencies<'_>) -> Result<(), DependencyError> {
///         let _ = self.storage.set(deps.require::<dyn Storage>()?);
///         Ok(())
///     }
///
///     async fn start(&self) -> Result<(), ComponentError> {
///         // bind listener...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Declares dependencies by looking them up through `deps`.
    ///
    /// Every successful lookup returns a live handle and guarantees the
    /// dependency is ordered before this component.
    fn resolve(&self, deps: &mut Dependencies<'_>) -> Result<(), DependencyError> {
        let _ = deps;
        Ok(())
    }

    /// First phase. Runs before the dependency order exists.
    async fn init(&self, ctx: &ComponentContext) -> Result<(), ComponentError> {
        let _ = ctx;
        Ok(())
    }

    /// Second phase. Runs after every component is initialized and resolved.
    async fn start(&self) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Teardown phase. Errors are logged and never abort teardown.
    async fn stop(&self) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Final phase. Errors are logged and never abort teardown.
    async fn destroy(&self) -> Result<(), ComponentError> {
        Ok(())
    }
}
