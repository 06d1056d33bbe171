//! # Component registration.
//!
//! Bundles everything the container needs to manage one component:
//! - the component itself ([`ComponentRef`])
//! - its identifier (defaults to the concrete type name)
//! - the capabilities it exposes to the resolver
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use lifevisor::{Component, ComponentId, Registration};
//!
//! trait Storage: Send + Sync {}
//!
//! struct Postgres;
//! impl Storage for Postgres {}
//! impl Component for Postgres {}
//!
//! let pg = Arc::new(Postgres);
//! let reg = Registration::new(pg.clone())
//!     .with_id("primary-db")
//!     .provides::<dyn Storage>(pg);
//!
//! assert_eq!(reg.id(), &ComponentId::new("primary-db"));
//! assert!(reg.capabilities().contains::<dyn Storage>());
//! assert!(reg.capabilities().contains::<Postgres>());
//! ```

use std::sync::Arc;

use crate::components::{Capabilities, Component, ComponentId, ComponentRef};

/// Everything needed to add one component to a container.
pub struct Registration {
    id: ComponentId,
    component: ComponentRef,
    capabilities: Capabilities,
}

impl Registration {
    /// Registers `component` under its type name, exposing its concrete type.
    pub fn new<C: Component>(component: Arc<C>) -> Self {
        let mut capabilities = Capabilities::new();
        capabilities.provide::<C>(component.clone());
        Self {
            id: ComponentId::of::<C>(),
            component,
            capabilities,
        }
    }

    /// Registers an already type-erased component.
    ///
    /// Nothing is exposed automatically; declare capabilities with [`provides`](Self::provides).
    pub fn from_ref(id: impl Into<ComponentId>, component: ComponentRef) -> Self {
        Self {
            id: id.into(),
            component,
            capabilities: Capabilities::new(),
        }
    }

    /// Overrides the identifier.
    pub fn with_id(mut self, id: impl Into<ComponentId>) -> Self {
        self.id = id.into();
        self
    }

    /// Exposes `handle` as capability `T`.
    pub fn provides<T>(mut self, handle: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.provide(handle);
        self
    }

    /// Returns the identifier.
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    /// Returns the declared capabilities.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub(crate) fn into_parts(self) -> (ComponentId, ComponentRef, Capabilities) {
        (self.id, self.component, self.capabilities)
    }
}
