//! Focus management behavior
//!
//! Tracks which items the UI currently has selected: an ordered set plus a
//! singleton that always equals the most-recently-added member. The
//! behavior rides along on every action that can remove items — deletions,
//! undo, redo — to strip IDs whose item is gone or staged for deletion, so
//! focus never dangles.

use chrono::Utc;

use super::{names, Behavior};
use crate::domain::{Action, Entity, ItemId, Lifecycle};
use crate::state::State;

pub struct FocusBehavior;

/// Drops focused IDs whose item no longer exists or is staged for deletion
fn reconcile<T: Entity>(state: &mut State<T>) {
    let alive: Vec<ItemId> = state
        .focus
        .focused_set
        .iter()
        .filter(|id| {
            state
                .get(id)
                .map(|item| item.lifecycle() != Lifecycle::StagedDeletion)
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    state.focus.retain(|id| alive.contains(id));
}

impl<T: Entity> Behavior<T> for FocusBehavior {
    fn name(&self) -> &'static str {
        names::FOCUS
    }

    fn priority(&self) -> u32 {
        50
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[names::CRUD]
    }

    fn state_keys(&self) -> &'static [&'static str] {
        &["focused", "focused_set", "last_focused_at"]
    }

    fn apply(&self, state: &mut State<T>, action: &Action<T>) {
        match action {
            Action::SetFocused(Some(id)) => {
                state.focus.clear();
                state.focus.add(id.clone(), Utc::now());
            }
            Action::SetFocused(None) | Action::ClearFocus => {
                state.focus.clear();
            }
            Action::SetFocusedMany(ids) => {
                state.focus.clear();
                let now = Utc::now();
                for id in ids {
                    state.focus.add(id.clone(), now);
                }
            }
            Action::ToggleFocus(id) => {
                if state.focus.contains(id) {
                    state.focus.remove(id);
                } else {
                    state.focus.add(id.clone(), Utc::now());
                }
            }
            // Undo of a create and redo of a delete also remove items
            Action::Delete { .. }
            | Action::DeleteMany { .. }
            | Action::ClearAll
            | Action::ClearScope(_)
            | Action::Undo
            | Action::Redo => reconcile(state),
            _ => {}
        }
    }
}
