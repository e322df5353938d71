//! Undo/redo history behavior
//!
//! Keeps two bounded stacks of inverse records. The pre-mutation pass
//! captures the exact slots of every item an action is about to touch; the
//! mutation pass (running after CRUD by priority) diffs captured slots
//! against the post-mutation state and records one entry per logical action.
//! Recording is suppressed while a batch window is open — the batch behavior
//! synthesizes the single coalesced entry itself.
//!
//! Undo and redo on an empty stack are a no-op, not an error.

use chrono::Utc;

use super::{names, Behavior};
use crate::domain::{Action, Entity, ItemId};
use crate::state::{ChangeKind, HistoryEntry, ItemChange, ListSlot, PendingCapture, State};

pub struct HistoryBehavior;

/// Captures the current slots of the given IDs
fn capture_ids<T: Entity>(
    state: &State<T>,
    kind: ChangeKind,
    ids: &[ItemId],
) -> PendingCapture<T> {
    PendingCapture {
        kind,
        previous: ids
            .iter()
            .map(|id| (id.clone(), state.slot_of(id)))
            .collect(),
    }
}

/// Removes every touched item, then restores the recorded slots in
/// ascending index order so positions come out exactly as recorded
fn restore<T: Entity>(state: &mut State<T>, entry: &HistoryEntry<T>, forward: bool) {
    for change in &entry.changes {
        state.remove(&change.id);
    }
    let mut slots: Vec<ListSlot<T>> = entry
        .changes
        .iter()
        .filter_map(|change| {
            if forward {
                change.next.clone()
            } else {
                change.previous.clone()
            }
        })
        .collect();
    slots.sort_by_key(|slot| (slot.list, slot.index));
    for slot in slots {
        state.insert_slot(slot);
    }
}

impl HistoryBehavior {
    fn undo<T: Entity>(&self, state: &mut State<T>) {
        let Some(entry) = state.history.undo_stack.pop_back() else {
            return;
        };
        restore(state, &entry, false);
        state.history.push_redo(entry);
    }

    fn redo<T: Entity>(&self, state: &mut State<T>) {
        let Some(entry) = state.history.redo_stack.pop_back() else {
            return;
        };
        restore(state, &entry, true);
        state.history.push_undo_without_clearing_redo(entry);
    }
}

impl<T: Entity> Behavior<T> for HistoryBehavior {
    fn name(&self) -> &'static str {
        names::HISTORY
    }

    fn priority(&self) -> u32 {
        30
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[names::CRUD]
    }

    fn state_keys(&self) -> &'static [&'static str] {
        &["undo_stack", "redo_stack", "pending"]
    }

    fn before_apply(&self, state: &mut State<T>, action: &Action<T>) {
        if state.batch.suppress_update_history {
            return;
        }
        state.history.pending = match action {
            Action::Create(_) => Some(PendingCapture {
                kind: ChangeKind::Create,
                previous: Vec::new(),
            }),
            Action::Update { id, .. } => Some(capture_ids(
                state,
                ChangeKind::Update,
                std::slice::from_ref(id),
            )),
            Action::Delete { id } => Some(capture_ids(
                state,
                ChangeKind::Delete,
                std::slice::from_ref(id),
            )),
            Action::DeleteMany { ids } => Some(capture_ids(state, ChangeKind::Delete, ids)),
            Action::ClearAll | Action::ClearScope(_) => {
                let ids: Vec<ItemId> = state.item_ids().cloned().collect();
                Some(capture_ids(state, ChangeKind::Delete, &ids))
            }
            _ => None,
        };
    }

    fn apply(&self, state: &mut State<T>, action: &Action<T>) {
        match action {
            Action::Undo => self.undo(state),
            Action::Redo => self.redo(state),
            _ if action.is_mutation() => {
                let Some(capture) = state.history.pending.take() else {
                    return;
                };

                let mut changes: Vec<ItemChange<T>> = Vec::new();
                if capture.kind == ChangeKind::Create {
                    if let Some(id) = state.last_created.clone() {
                        let next = state.slot_of(&id);
                        changes.push(ItemChange {
                            id,
                            previous: None,
                            next,
                        });
                    }
                } else {
                    for (id, previous) in capture.previous {
                        let next = state.slot_of(&id);
                        if previous != next {
                            changes.push(ItemChange { id, previous, next });
                        }
                    }
                }

                if !changes.is_empty() {
                    state.history.record(HistoryEntry {
                        kind: capture.kind,
                        changes,
                        at: Utc::now(),
                    });
                }
            }
            _ => {}
        }
    }
}
