//! The facade seen by [`Component::resolve`](crate::Component::resolve).

use std::any::type_name;
use std::sync::Arc;

use crate::components::ComponentId;
use crate::error::DependencyError;

use super::Resolver;

/// Dependency lookups available while an element resolves.
///
/// Every lookup that returns a handle has already resolved the matched element,
/// which is therefore ordered before the requester. Looking up a capability
/// the requester itself provides is reported as a cycle.
pub struct Dependencies<'a> {
    walk: &'a mut Resolver,
    requester: usize,
}

impl<'a> Dependencies<'a> {
    pub(super) fn new(walk: &'a mut Resolver, requester: usize) -> Self {
        Self { walk, requester }
    }

    /// Identifier of the element currently resolving.
    pub fn requester(&self) -> &ComponentId {
        self.walk.node(self.requester).id()
    }

    /// The single element exposing `T`.
    ///
    /// # Errors
    /// [`DependencyError::Missing`] when none does, [`DependencyError::Ambiguous`]
    /// when several do, or any error raised while resolving the match.
    pub fn require<T>(&mut self) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.optional::<T>()? {
            Some(handle) => Ok(handle),
            None => Err(self.missing::<T>(None)),
        }
    }

    /// Like [`require`](Self::require), but absence yields `Ok(None)`.
    ///
    /// A match that exists is still resolved first; its resolution errors propagate.
    pub fn optional<T>(&mut self) -> Result<Option<Arc<T>>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let providers = self.walk.providers::<T>();
        match providers.as_slice() {
            [] => Ok(None),
            [idx] => self.fetch::<T>(*idx).map(Some),
            _ => Err(DependencyError::Ambiguous {
                requester: self.requester().clone(),
                capability: type_name::<T>(),
                candidates: providers
                    .iter()
                    .map(|&i| self.walk.node(i).id().clone())
                    .collect(),
            }),
        }
    }

    /// The element registered as `id`, viewed as `T`.
    ///
    /// # Errors
    /// [`DependencyError::Missing`] when `id` is unknown,
    /// [`DependencyError::Incompatible`] when it does not expose `T`.
    pub fn require_id<T>(&mut self, id: &str) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let Some(idx) = self.walk.position(id) else {
            return Err(self.missing::<T>(Some(id)));
        };
        if !self.walk.node(idx).capabilities().contains::<T>() {
            return Err(DependencyError::Incompatible {
                requester: self.requester().clone(),
                id: self.walk.node(idx).id().clone(),
                capability: type_name::<T>(),
            });
        }
        self.fetch::<T>(idx)
    }

    /// Like [`require_id`](Self::require_id), but an unknown `id`, or one not
    /// exposing `T`, yields `Ok(None)`.
    pub fn optional_id<T>(&mut self, id: &str) -> Result<Option<Arc<T>>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.walk.position(id) {
            Some(idx) if self.walk.node(idx).capabilities().contains::<T>() => {
                self.fetch::<T>(idx).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Every element exposing `T`, each resolved first.
    ///
    /// Treat the result as a set; its order is not part of the contract.
    pub fn all<T>(&mut self) -> Result<Vec<Arc<T>>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.walk
            .providers::<T>()
            .into_iter()
            .map(|idx| self.fetch::<T>(idx))
            .collect()
    }

    /// Resolves `idx`, then hands out its `T`.
    fn fetch<T>(&mut self, idx: usize) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.walk.visit(idx)?;
        let node = self.walk.node(idx);
        node.capabilities()
            .get::<T>()
            .ok_or_else(|| DependencyError::Incompatible {
                requester: self.requester().clone(),
                id: node.id().clone(),
                capability: type_name::<T>(),
            })
    }

    fn missing<T: ?Sized>(&self, id: Option<&str>) -> DependencyError {
        DependencyError::Missing {
            requester: self.requester().clone(),
            capability: type_name::<T>(),
            id: id.map(|id| ComponentId::new(id.to_owned())),
        }
    }
}
