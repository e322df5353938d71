//! Baseline CRUD behavior
//!
//! Owns the persisted/draft split and drives lifecycle transitions:
//!
//! - `Create` assigns a provisional ID when the item carries the
//!   placeholder, stamps `StagedCreation`, and appends to the drafts.
//! - `Update` on a persisted item clones it into the drafts as
//!   `StagedEdition` with the patch applied; on a `StagedDeletion` draft the
//!   patch is dropped (a deletion is not silently un-deleted by an edit);
//!   otherwise the patch applies in place.
//! - `Delete` removes a `StagedCreation` draft outright (it never reached
//!   the server, there is nothing to reconcile); any other item is staged
//!   for deletion and stays visible until committed.
//! - `DeleteMany`, `ClearAll`, and `ClearScope` run the same per-item
//!   transition inside one action, so downstream behaviors see one logical
//!   operation.

use chrono::Utc;

use super::{names, Behavior};
use crate::domain::{Action, Entity, ItemId, Lifecycle};
use crate::state::{ListKind, State};

pub struct CrudBehavior;

impl CrudBehavior {
    fn create<T: Entity>(&self, state: &mut State<T>, item: &T) {
        let mut item = item.clone();
        // An explicit ID colliding with a managed item would put one ID in
        // both lists; it gets a fresh provisional ID like a placeholder does.
        if item.id().is_placeholder() || state.contains(item.id()) {
            state.draft_seq += 1;
            item.assign_id(ItemId::provisional(state.draft_seq, Utc::now()));
        }
        item.set_lifecycle(Lifecycle::StagedCreation);
        state.last_created = Some(item.id().clone());
        state.drafts.push(item);
    }

    fn update<T: Entity>(&self, state: &mut State<T>, id: &ItemId, patch: &T::Patch) {
        let Some((list, index, item)) = state.find(id) else {
            return;
        };
        match list {
            ListKind::Draft => {
                // Deletion wins over a subsequent edit.
                if item.lifecycle() == Lifecycle::StagedDeletion {
                    return;
                }
                state.drafts[index].apply_patch(patch);
            }
            ListKind::Persisted => {
                let mut edited = state.persisted.remove(index);
                edited.apply_patch(patch);
                edited.set_lifecycle(Lifecycle::StagedEdition);
                state.drafts.push(edited);
            }
        }
    }

    fn delete<T: Entity>(&self, state: &mut State<T>, id: &ItemId) {
        let Some((list, index, item)) = state.find(id) else {
            return;
        };
        match list {
            ListKind::Draft => {
                if item.lifecycle() == Lifecycle::StagedCreation {
                    state.drafts.remove(index);
                } else {
                    state.drafts[index].set_lifecycle(Lifecycle::StagedDeletion);
                }
            }
            ListKind::Persisted => {
                let mut removed = state.persisted.remove(index);
                removed.set_lifecycle(Lifecycle::StagedDeletion);
                state.drafts.push(removed);
            }
        }
    }

    fn delete_where<T: Entity>(&self, state: &mut State<T>, keep_out: impl Fn(&T) -> bool) {
        let targets: Vec<ItemId> = state
            .persisted
            .iter()
            .chain(state.drafts.iter())
            .filter(|item| keep_out(item))
            .map(|item| item.id().clone())
            .collect();
        for id in &targets {
            self.delete(state, id);
        }
    }
}

impl<T: Entity> Behavior<T> for CrudBehavior {
    fn name(&self) -> &'static str {
        names::CRUD
    }

    fn priority(&self) -> u32 {
        10
    }

    fn state_keys(&self) -> &'static [&'static str] {
        &["persisted", "drafts", "draft_seq", "last_created"]
    }

    fn apply(&self, state: &mut State<T>, action: &Action<T>) {
        if action.is_mutation() {
            state.last_created = None;
        }
        match action {
            Action::Create(item) => self.create(state, item),
            Action::Update { id, patch } => self.update(state, id, patch),
            Action::Delete { id } => self.delete(state, id),
            Action::DeleteMany { ids } => {
                for id in ids {
                    self.delete(state, id);
                }
            }
            Action::ClearAll => self.delete_where(state, |_| true),
            Action::ClearScope(scope) => self.delete_where(state, |item| item.in_scope(scope)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::compose::BehaviorRegistry;
    use crate::behavior::Pipeline;
    use crate::fixture::{region, unsaved_region, Region, RegionPatch};

    fn pipeline() -> Pipeline<Region> {
        BehaviorRegistry::with_builtins()
            .compose(&[names::CRUD])
            .unwrap()
    }

    #[test]
    fn create_assigns_provisional_id_and_stages() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();

        pipeline.dispatch(&mut state, &Action::Create(unsaved_region(1)));

        assert_eq!(state.drafts.len(), 1);
        let draft = &state.drafts[0];
        assert!(draft.id.is_provisional());
        assert_eq!(draft.lifecycle, Lifecycle::StagedCreation);
        assert_eq!(state.last_created.as_ref(), Some(&draft.id));
    }

    #[test]
    fn create_keeps_explicit_id() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();

        pipeline.dispatch(&mut state, &Action::Create(region("given", 1)));

        assert_eq!(state.drafts[0].id.as_str(), "given");
    }

    #[test]
    fn create_with_colliding_id_gets_a_fresh_provisional_id() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();
        state.persisted.push(region("sel-1", 1));

        pipeline.dispatch(&mut state, &Action::Create(region("sel-1", 2)));

        assert_eq!(state.persisted.len(), 1);
        assert_eq!(state.drafts.len(), 1);
        assert!(state.drafts[0].id.is_provisional());
        let ids: Vec<_> = state.item_ids().collect();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());

        // Colliding with a draft is repaired the same way
        let duplicate = state.drafts[0].clone();
        pipeline.dispatch(&mut state, &Action::Create(duplicate));
        assert_eq!(state.drafts.len(), 2);
        assert_ne!(state.drafts[0].id, state.drafts[1].id);
    }

    #[test]
    fn update_on_persisted_moves_to_drafts() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();
        state.persisted.push(region("p1", 1));

        pipeline.dispatch(
            &mut state,
            &Action::Update {
                id: "p1".parse().unwrap(),
                patch: RegionPatch::width(25),
            },
        );

        assert!(state.persisted.is_empty());
        assert_eq!(state.drafts[0].width, 25);
        assert_eq!(state.drafts[0].lifecycle, Lifecycle::StagedEdition);
    }

    #[test]
    fn update_on_staged_deletion_is_dropped() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();
        let mut doomed = region("d1", 1);
        doomed.lifecycle = Lifecycle::StagedDeletion;
        state.drafts.push(doomed);

        pipeline.dispatch(
            &mut state,
            &Action::Update {
                id: "d1".parse().unwrap(),
                patch: RegionPatch::width(99),
            },
        );

        assert_eq!(state.drafts[0].width, 10);
        assert_eq!(state.drafts[0].lifecycle, Lifecycle::StagedDeletion);
    }

    #[test]
    fn update_on_unknown_id_is_noop() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();

        pipeline.dispatch(
            &mut state,
            &Action::Update {
                id: "ghost".parse().unwrap(),
                patch: RegionPatch::width(5),
            },
        );

        assert!(state.is_empty());
    }

    #[test]
    fn delete_of_staged_creation_removes_outright() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();
        pipeline.dispatch(&mut state, &Action::Create(unsaved_region(1)));
        let id = state.last_created.clone().unwrap();

        pipeline.dispatch(&mut state, &Action::Delete { id });

        assert!(state.drafts.is_empty());
    }

    #[test]
    fn delete_of_persisted_stages_deletion() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();
        state.persisted.push(region("p1", 1));

        pipeline.dispatch(
            &mut state,
            &Action::Delete {
                id: "p1".parse().unwrap(),
            },
        );

        assert!(state.persisted.is_empty());
        assert_eq!(state.drafts[0].lifecycle, Lifecycle::StagedDeletion);
    }

    #[test]
    fn clear_scope_stages_matching_items_only() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();
        state.persisted.push(region("p1", 1));
        state.persisted.push(region("p2", 2));
        state.persisted.push(region("p3", 1));

        pipeline.dispatch(&mut state, &Action::ClearScope(1));

        assert_eq!(state.persisted.len(), 1);
        assert_eq!(state.persisted[0].id.as_str(), "p2");
        assert_eq!(state.drafts.len(), 2);
        assert!(state
            .drafts
            .iter()
            .all(|r| r.lifecycle == Lifecycle::StagedDeletion));
    }

    #[test]
    fn clear_all_stages_everything() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();
        state.persisted.push(region("p1", 1));
        state.drafts.push({
            let mut r = region("e1", 2);
            r.lifecycle = Lifecycle::StagedEdition;
            r
        });

        pipeline.dispatch(&mut state, &Action::ClearAll);

        assert!(state.persisted.is_empty());
        assert_eq!(state.drafts.len(), 2);
        assert!(state
            .drafts
            .iter()
            .all(|r| r.lifecycle == Lifecycle::StagedDeletion));
    }

    #[test]
    fn split_invariant_holds_after_moves() {
        let pipeline = pipeline();
        let mut state: State<Region> = State::default();
        state.persisted.push(region("p1", 1));

        pipeline.dispatch(
            &mut state,
            &Action::Update {
                id: "p1".parse().unwrap(),
                patch: RegionPatch::width(1),
            },
        );
        pipeline.dispatch(
            &mut state,
            &Action::Delete {
                id: "p1".parse().unwrap(),
            },
        );

        let ids: Vec<_> = state.item_ids().collect();
        assert_eq!(ids.len(), 1);
    }
}
