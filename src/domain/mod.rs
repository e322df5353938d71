//! Domain model for managed entity collections
//!
//! Contains the entity contract, identifiers, lifecycle, and the action
//! vocabulary, without any I/O concerns.

mod action;
mod id;
mod item;

pub use action::Action;
pub use id::{IdError, ItemId};
pub use item::{Entity, Lifecycle};
