//! Stagehand - a behavior-composable state engine for staged CRUD
//!
//! Stagehand manages a collection of domain entities split into persisted
//! (server-confirmed) and draft (locally staged) items, drives each item
//! through an explicit lifecycle, and composes its feature set from
//! pluggable behaviors: CRUD, change tracking, undo/redo history, batch
//! coalescing, focus tracking, and bulk operations. Reconciliation with a
//! remote source goes through a declarative adapter + transform contract
//! that returns results as values.
//!
//! ```no_run
//! use stagehand::{create_domain_manager, DomainManagerConfig};
//! # use stagehand::{ApiAdapter, DataTransforms};
//! # fn demo<T: stagehand::Entity>(
//! #     api: Box<dyn ApiAdapter<serde_json::Value>>,
//! #     transforms: Box<dyn DataTransforms<T, serde_json::Value>>,
//! # ) -> Result<(), stagehand::ComposeError> {
//! let mut manager = create_domain_manager(DomainManagerConfig::new(
//!     "document_viewer",
//!     "selection",
//!     api,
//!     transforms,
//! ))?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod behavior;
pub mod domain;
pub mod manager;
pub mod state;

#[cfg(test)]
pub(crate) mod fixture;

pub use adapter::{AdapterError, ApiAdapter, DataTransforms, InMemoryAdapter};
pub use behavior::{names, Behavior, BehaviorRegistry, ComposeError, PendingChanges};
pub use domain::{Action, Entity, IdError, ItemId, Lifecycle};
pub use manager::{
    create_domain_manager, CommitFailure, CommitReport, DomainManager, DomainManagerConfig,
};
pub use state::{
    BatchState, ChangeKind, FocusState, HistoryEntry, HistoryState, ItemChange, ListKind, ListSlot,
    State, DEFAULT_MAX_HISTORY,
};
