//! Change tracking behavior
//!
//! Pure derivation over the persisted/draft split: an item is dirty exactly
//! when it sits in the draft list. The behavior stores nothing of its own,
//! so tracking cannot drift out of sync with CRUD — it reads the split, it
//! never owns it.

use super::{names, Behavior};
use crate::domain::{Action, Entity, ItemId, Lifecycle};
use crate::state::State;

pub struct ChangeTrackingBehavior;

impl<T: Entity> Behavior<T> for ChangeTrackingBehavior {
    fn name(&self) -> &'static str {
        names::CHANGE_TRACKING
    }

    fn priority(&self) -> u32 {
        20
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[names::CRUD]
    }

    fn apply(&self, _state: &mut State<T>, _action: &Action<T>) {}
}

/// Draft items partitioned by the kind of pending mutation
#[derive(Debug, Clone)]
pub struct PendingChanges<T> {
    pub created: Vec<T>,
    pub edited: Vec<T>,
    pub deleted: Vec<T>,
}

impl<T> Default for PendingChanges<T> {
    fn default() -> Self {
        Self {
            created: Vec::new(),
            edited: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

impl<T> PendingChanges<T> {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.edited.is_empty() && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.created.len() + self.edited.len() + self.deleted.len()
    }
}

/// Returns true if the item with the given ID has uncommitted changes
pub fn is_dirty<T: Entity>(state: &State<T>, id: &ItemId) -> bool {
    state.drafts.iter().any(|item| item.id() == id)
}

/// Number of uncommitted mutations
pub fn pending_change_count<T: Entity>(state: &State<T>) -> usize {
    state.drafts.len()
}

/// The draft items partitioned by lifecycle
pub fn pending_changes<T: Entity>(state: &State<T>) -> PendingChanges<T> {
    let mut pending = PendingChanges::default();
    for item in &state.drafts {
        match item.lifecycle() {
            Lifecycle::StagedCreation => pending.created.push(item.clone()),
            Lifecycle::StagedDeletion => pending.deleted.push(item.clone()),
            _ => pending.edited.push(item.clone()),
        }
    }
    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{region, Region};

    #[test]
    fn dirty_means_in_drafts() {
        let mut state: State<Region> = State::default();
        state.persisted.push(region("p1", 1));
        state.drafts.push(region("d1", 1));

        assert!(is_dirty(&state, &"d1".parse().unwrap()));
        assert!(!is_dirty(&state, &"p1".parse().unwrap()));
        assert_eq!(pending_change_count(&state), 1);
    }

    #[test]
    fn partitions_by_lifecycle() {
        let mut state: State<Region> = State::default();
        for (id, lifecycle) in [
            ("c1", Lifecycle::StagedCreation),
            ("e1", Lifecycle::StagedEdition),
            ("x1", Lifecycle::StagedDeletion),
        ] {
            let mut item = region(id, 1);
            item.lifecycle = lifecycle;
            state.drafts.push(item);
        }

        let pending = pending_changes(&state);
        assert_eq!(pending.created.len(), 1);
        assert_eq!(pending.edited.len(), 1);
        assert_eq!(pending.deleted.len(), 1);
        assert_eq!(pending.len(), 3);
        assert!(!pending.is_empty());
    }
}
