//! Batch-operation behavior
//!
//! A batch window brackets an interactive gesture (drag, resize) that fires
//! many rapid mutations. Mutations inside the window hit state immediately
//! so the UI tracks the gesture live, but none of them is recorded
//! individually: `BeginBatch` snapshots the focused item and raises the
//! suppression flag the history behavior checks, and `EndBatch` diffs the
//! item against the snapshot and synthesizes at most one update entry
//! through the normal recording path.
//!
//! The window tracks a single item — the one focused when it opened. A
//! gesture touches one item; a batch opened with nothing focused records
//! nothing, as does a batch whose item ends up content-equal to the
//! snapshot or deleted before the window closes.

use chrono::Utc;

use super::{names, Behavior};
use crate::domain::{Action, Entity};
use crate::state::{BatchSnapshot, ChangeKind, HistoryEntry, ItemChange, State};

pub struct BatchBehavior;

impl BatchBehavior {
    fn begin<T: Entity>(&self, state: &mut State<T>) {
        state.batch.is_batch_operation = true;
        state.batch.suppress_update_history = true;
        state.batch.snapshot = state.focus.focused.clone().and_then(|id| {
            state.slot_of(&id).map(|previous| BatchSnapshot { id, previous })
        });
    }

    fn end<T: Entity>(&self, state: &mut State<T>) {
        state.batch.is_batch_operation = false;
        state.batch.suppress_update_history = false;

        let Some(snapshot) = state.batch.snapshot.take() else {
            return;
        };
        let Some(next) = state.slot_of(&snapshot.id) else {
            return;
        };
        if next.item.content_eq(&snapshot.previous.item) {
            return;
        }

        state.history.record(HistoryEntry {
            kind: ChangeKind::Update,
            changes: vec![ItemChange {
                id: snapshot.id,
                previous: Some(snapshot.previous),
                next: Some(next),
            }],
            at: Utc::now(),
        });
    }
}

impl<T: Entity> Behavior<T> for BatchBehavior {
    fn name(&self) -> &'static str {
        names::BATCH
    }

    fn priority(&self) -> u32 {
        40
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[names::CRUD, names::HISTORY, names::FOCUS]
    }

    fn state_keys(&self) -> &'static [&'static str] {
        &["is_batch_operation", "suppress_update_history", "batch_snapshot"]
    }

    fn apply(&self, state: &mut State<T>, action: &Action<T>) {
        match action {
            Action::BeginBatch => self.begin(state),
            Action::EndBatch => self.end(state),
            _ => {}
        }
    }
}
