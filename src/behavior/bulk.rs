//! Bulk operations behavior
//!
//! Deliberately a thin facade: page/context-scoped mass deletes compute the
//! matching ID set and go out as a single `DeleteMany`, so they inherit the
//! CRUD, history, and focus guarantees of single-item operations instead of
//! re-implementing them. The manager exposes the convenience methods; this
//! unit exists so the facade's presence is part of the composed, checked
//! configuration.

use super::{names, Behavior};
use crate::domain::{Action, Entity, ItemId, Lifecycle};
use crate::state::State;

pub struct BulkOperationsBehavior;

/// IDs of items inside the scope that are not already staged for deletion
pub fn matching_ids<T: Entity>(state: &State<T>, scope: &T::Scope) -> Vec<ItemId> {
    state
        .persisted
        .iter()
        .chain(state.drafts.iter())
        .filter(|item| item.in_scope(scope) && item.lifecycle() != Lifecycle::StagedDeletion)
        .map(|item| item.id().clone())
        .collect()
}

impl<T: Entity> Behavior<T> for BulkOperationsBehavior {
    fn name(&self) -> &'static str {
        names::BULK_OPERATIONS
    }

    fn priority(&self) -> u32 {
        60
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[names::CRUD]
    }

    fn apply(&self, _state: &mut State<T>, _action: &Action<T>) {}
}
