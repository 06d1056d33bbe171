//! # Explicit capability registry.
//!
//! A component declares at registration which capabilities it exposes. A
//! capability is any `'static` type, usually a trait object, paired with a live
//! `Arc` handle to the component seen through that type. The resolver matches
//! lookups against this declared set; nothing is discovered by introspection.
//!
//! ```text
//! Registration::new(Arc<Postgres>)          exposes Postgres (always)
//!     .provides::<dyn Storage>(pg.clone())  exposes dyn Storage
//!     .provides::<dyn Health>(pg.clone())   exposes dyn Health
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One declared capability: the handle boxed as `Arc<T>` plus its type name.
struct Provided {
    name: &'static str,
    handle: Box<dyn Any + Send + Sync>,
}

/// Set of capabilities exposed by one component.
#[derive(Default)]
pub struct Capabilities {
    by_type: HashMap<TypeId, Provided>,
}

impl Capabilities {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes `handle` as capability `T`, replacing a previous handle for the same type.
    pub fn provide<T>(&mut self, handle: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.by_type.insert(
            TypeId::of::<T>(),
            Provided {
                name: std::any::type_name::<T>(),
                handle: Box::new(handle),
            },
        );
    }

    /// Returns the handle exposed as `T`, if any.
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.by_type
            .get(&TypeId::of::<T>())
            .and_then(|p| p.handle.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// Returns true if capability `T` is exposed.
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Number of exposed capabilities.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Returns true if nothing is exposed.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Type names of every exposed capability, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_type.values().map(|p| p.name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
