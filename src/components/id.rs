//! # Component identifier.
//!
//! [`ComponentId`] is the single key type of the container. It compares by
//! value, so ids built from a `&'static str`, a `String` or a type name are
//! interchangeable as long as the text matches.

use std::borrow::{Borrow, Cow};
use std::fmt;

/// Structurally-equal component identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(Cow<'static, str>);

impl ComponentId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// The default identifier of a component: its concrete type name.
    ///
    /// # Example
    /// ```
    /// use lifevisor::ComponentId;
    ///
    /// struct Cache;
    /// assert!(ComponentId::of::<Cache>().as_str().ends_with("Cache"));
    /// ```
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// Returns the identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ComponentId {
    fn from(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&ComponentId> for ComponentId {
    fn from(id: &ComponentId) -> Self {
        id.clone()
    }
}
