//! Item lifecycle and the entity contract
//!
//! Every managed item moves through an explicit lifecycle: it starts
//! `Unstaged`, gets staged for creation/edition/deletion while it lives in
//! the draft list, and becomes `Committed` once the remote source confirms
//! it. The [`Entity`] trait is what a domain type implements to be managed:
//! identity, lifecycle access, patch application, scope membership, and
//! content equality.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::ItemId;

/// Commit status of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Constructed locally, never dispatched
    #[default]
    Unstaged,
    /// Created locally, not yet committed
    StagedCreation,
    /// Edited locally, not yet committed
    StagedEdition,
    /// Marked for deletion locally, not yet committed
    StagedDeletion,
    /// Confirmed by the remote source
    Committed,
}

impl Lifecycle {
    /// Returns true if the item belongs in the draft list
    pub fn is_staged(&self) -> bool {
        matches!(
            self,
            Lifecycle::StagedCreation | Lifecycle::StagedEdition | Lifecycle::StagedDeletion
        )
    }

    /// Returns true if the item is pending deletion
    pub fn is_deletion(&self) -> bool {
        matches!(self, Lifecycle::StagedDeletion)
    }

    /// Returns a display label for the lifecycle
    pub fn label(&self) -> &'static str {
        match self {
            Lifecycle::Unstaged => "unstaged",
            Lifecycle::StagedCreation => "staged_creation",
            Lifecycle::StagedEdition => "staged_edition",
            Lifecycle::StagedDeletion => "staged_deletion",
            Lifecycle::Committed => "committed",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Contract a domain type implements to be managed
///
/// The associated types close the action vocabulary over the domain:
/// [`Entity::Patch`] is the partial-update payload of `Action::Update`,
/// [`Entity::Scope`] is the context predicate of `Action::ClearScope`
/// (e.g., a page number).
///
/// `content_eq` compares domain-significant fields only; it must ignore the
/// lifecycle and any derived flags. It is what batch coalescing and fetch
/// deduplication diff with, so a type that includes bookkeeping fields in
/// `PartialEq` still gets correct coalescing through `content_eq`.
pub trait Entity: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Partial-update payload applied by `Action::Update`
    type Patch: Clone + fmt::Debug + Send + Sync;

    /// Context predicate input for scoped bulk operations
    type Scope: Clone + fmt::Debug + Send + Sync;

    /// The item's identifier
    fn id(&self) -> &ItemId;

    /// Replaces the item's identifier (provisional assignment, server
    /// reconciliation)
    fn assign_id(&mut self, id: ItemId);

    /// The item's current lifecycle
    fn lifecycle(&self) -> Lifecycle;

    /// Transitions the item to a new lifecycle
    fn set_lifecycle(&mut self, lifecycle: Lifecycle);

    /// Applies a partial update to the domain fields
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Returns true if the item falls inside the given context scope
    fn in_scope(&self, scope: &Self::Scope) -> bool;

    /// Field-wise equality over domain-significant fields only
    fn content_eq(&self, other: &Self) -> bool;

    /// Derived flag: item is visible across all contexts
    fn is_global(&self) -> bool {
        false
    }

    /// Derived flag: item is a reusable template
    fn is_template(&self) -> bool {
        false
    }
}
