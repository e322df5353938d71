//! API adapter and transform contract
//!
//! The only external seam of the engine. An [`ApiAdapter`] speaks the wire
//! representation `W` to whatever remote source backs the collection; a
//! [`DataTransforms`] converts between `W` and the internal entity shape.
//! All failures are values — the engine branches on them deterministically
//! and never retries on its own.

mod memory;

pub use memory::InMemoryAdapter;

use thiserror::Error;

use crate::domain::{Entity, ItemId};

#[derive(Debug, Error)]
pub enum AdapterError {
    /// The remote source could not be reached
    #[error("Remote source unavailable: {0}")]
    Unavailable(String),

    /// The remote source refused the payload
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The remote source does not know the ID
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// The wire payload could not be encoded or decoded
    #[error("Wire format error: {0}")]
    Wire(#[from] serde_json::Error),
}

/// Remote CRUD surface over the wire representation `W`
///
/// Implementations own transport concerns (HTTP verbs, retries, auth); the
/// engine only sees the discriminated results.
pub trait ApiAdapter<W>: Send + Sync {
    /// Loads every wire item for the given context (e.g., a document ID)
    fn fetch(&self, context: &str) -> Result<Vec<W>, AdapterError>;

    /// Creates one item, returning the stored wire shape (with the
    /// server-assigned ID)
    fn create(&self, context: &str, payload: W) -> Result<W, AdapterError>;

    /// Replaces one item's fields, returning the stored wire shape
    fn update(&self, id: &ItemId, payload: W) -> Result<W, AdapterError>;

    /// Deletes one item
    fn delete(&self, id: &ItemId) -> Result<(), AdapterError>;
}

/// Bidirectional transforms between the entity shape and the wire shape
///
/// `for_update` carries the deletion-wins policy: a `StagedDeletion`
/// lifecycle must survive an edit in the outgoing payload, anything else is
/// promoted to `StagedEdition`.
pub trait DataTransforms<T: Entity, W>: Send + Sync {
    /// Encodes an item for creation, defaulting required-on-create fields
    fn for_create(&self, item: &T) -> Result<W, AdapterError>;

    /// Encodes an item for update
    fn for_update(&self, item: &T) -> Result<W, AdapterError>;

    /// Decodes a wire item into the entity shape
    fn from_wire(&self, wire: W) -> Result<T, AdapterError>;
}
