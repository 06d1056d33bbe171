//! Component contract and registration.
//!
//! ## Contents
//! - [`Component`], [`ComponentRef`] what users implement
//! - [`ComponentId`] the single key type
//! - [`Capabilities`], [`Registration`] what a component exposes to others
//! - [`ComponentContext`], [`StatusBoard`] what a component sees at runtime

mod capabilities;
mod component;
mod context;
mod id;
mod registration;
mod status;

pub use capabilities::Capabilities;
pub use component::{Component, ComponentRef};
pub use context::ComponentContext;
pub use id::ComponentId;
pub use registration::Registration;
pub use status::StatusBoard;
