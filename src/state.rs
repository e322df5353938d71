//! The managed state cell
//!
//! [`State`] is the single source of truth for one domain manager instance:
//! the persisted and draft item lists plus one typed slice per built-in
//! behavior (focus, history, batch) and an open map for config-supplied
//! extension behaviors. Each slice is owned and solely mutated by its
//! behavior; other behaviors may read a slice they declare a dependency on.
//!
//! Invariant: an item ID appears in exactly one of the two lists, never both.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, VecDeque};

use crate::domain::{Entity, ItemId};

/// Default cap on the undo and redo stacks
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Which of the two item lists a slot refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListKind {
    Persisted,
    Draft,
}

/// An exact position of an item: list, index, and the item value itself
///
/// History entries record slots rather than bare items so that applying an
/// inverse reproduces the prior state including list membership and ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSlot<T> {
    pub list: ListKind,
    pub index: usize,
    pub item: T,
}

/// The kind of a recorded change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

/// One item's before/after slots inside a history entry
///
/// `previous == None` means the item did not exist before the change;
/// `next == None` means it no longer exists after it.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemChange<T> {
    pub id: ItemId,
    pub previous: Option<ListSlot<T>>,
    pub next: Option<ListSlot<T>>,
}

/// A recorded change with enough data to invert it
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry<T> {
    pub kind: ChangeKind,
    pub changes: Vec<ItemChange<T>>,
    pub at: DateTime<Utc>,
}

/// Pre-mutation capture staged by the history behavior between its
/// `before_apply` and `apply` hooks of one dispatch
#[derive(Debug, Clone)]
pub struct PendingCapture<T> {
    pub kind: ChangeKind,
    pub previous: Vec<(ItemId, Option<ListSlot<T>>)>,
}

/// History behavior slice: two bounded stacks of inverse records
#[derive(Debug, Clone)]
pub struct HistoryState<T> {
    pub undo_stack: VecDeque<HistoryEntry<T>>,
    pub redo_stack: VecDeque<HistoryEntry<T>>,
    pub max_entries: usize,
    pub(crate) pending: Option<PendingCapture<T>>,
}

impl<T> HistoryState<T> {
    fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_entries,
            pending: None,
        }
    }

    /// Records a new entry: pushes onto the undo stack, evicts the oldest
    /// entry past the cap, and clears the redo stack (a new change
    /// invalidates redo history)
    pub fn record(&mut self, entry: HistoryEntry<T>) {
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    pub(crate) fn push_redo(&mut self, entry: HistoryEntry<T>) {
        self.redo_stack.push_back(entry);
        while self.redo_stack.len() > self.max_entries {
            self.redo_stack.pop_front();
        }
    }

    pub(crate) fn push_undo_without_clearing_redo(&mut self, entry: HistoryEntry<T>) {
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.pop_front();
        }
    }
}

/// Batch behavior slice
///
/// While `is_batch_operation` is set, CRUD mutations still apply to state
/// immediately (live drag feedback) but `suppress_update_history` stops the
/// history behavior from recording them individually.
#[derive(Debug, Clone)]
pub struct BatchState<T> {
    pub is_batch_operation: bool,
    pub suppress_update_history: bool,
    pub snapshot: Option<BatchSnapshot<T>>,
}

impl<T> Default for BatchState<T> {
    fn default() -> Self {
        Self {
            is_batch_operation: false,
            suppress_update_history: false,
            snapshot: None,
        }
    }
}

/// Pre-batch slot of the single item tracked by an open batch window
#[derive(Debug, Clone)]
pub struct BatchSnapshot<T> {
    pub id: ItemId,
    pub previous: ListSlot<T>,
}

/// Focus behavior slice
///
/// The singleton always equals either `None` or the most-recently-added
/// member of the set.
#[derive(Debug, Clone, Default)]
pub struct FocusState {
    pub focused: Option<ItemId>,
    pub focused_set: Vec<ItemId>,
    pub last_focused_at: Option<DateTime<Utc>>,
}

impl FocusState {
    /// Adds an ID to the set (moving it to most-recent position) and makes
    /// it the singleton
    pub fn add(&mut self, id: ItemId, at: DateTime<Utc>) {
        self.focused_set.retain(|existing| existing != &id);
        self.focused_set.push(id.clone());
        self.focused = Some(id);
        self.last_focused_at = Some(at);
    }

    /// Removes an ID from the set, repairing the singleton
    pub fn remove(&mut self, id: &ItemId) {
        self.focused_set.retain(|existing| existing != id);
        self.focused = self.focused_set.last().cloned();
    }

    /// Drops every focused ID the predicate rejects, repairing the singleton
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) {
        self.focused_set.retain(|id| keep(id));
        self.focused = self.focused_set.last().cloned();
    }

    /// Clears all focus
    pub fn clear(&mut self) {
        self.focused_set.clear();
        self.focused = None;
    }

    /// Returns true if the ID is focused
    pub fn contains(&self, id: &ItemId) -> bool {
        self.focused_set.iter().any(|existing| existing == id)
    }
}

/// The merged state of one domain manager instance
#[derive(Debug, Clone)]
pub struct State<T: Entity> {
    /// Items confirmed by the remote source
    pub persisted: Vec<T>,
    /// Local creates/edits/deletes not yet committed
    pub drafts: Vec<T>,
    /// Monotonic counter feeding provisional ID generation (CRUD slice)
    pub draft_seq: u64,
    /// ID assigned by the most recent `Create` dispatch (CRUD slice)
    pub last_created: Option<ItemId>,
    /// Focus behavior slice
    pub focus: FocusState,
    /// History behavior slice
    pub history: HistoryState<T>,
    /// Batch behavior slice
    pub batch: BatchState<T>,
    /// Extension behavior slices, keyed by their declared state keys
    pub ext: BTreeMap<String, serde_json::Value>,
}

impl<T: Entity> State<T> {
    /// Creates an empty state with the given history cap
    pub fn new(max_history: usize) -> Self {
        Self {
            persisted: Vec::new(),
            drafts: Vec::new(),
            draft_seq: 0,
            last_created: None,
            focus: FocusState::default(),
            history: HistoryState::new(max_history),
            batch: BatchState::default(),
            ext: BTreeMap::new(),
        }
    }

    fn list(&self, kind: ListKind) -> &Vec<T> {
        match kind {
            ListKind::Persisted => &self.persisted,
            ListKind::Draft => &self.drafts,
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut Vec<T> {
        match kind {
            ListKind::Persisted => &mut self.persisted,
            ListKind::Draft => &mut self.drafts,
        }
    }

    /// Locates an item by ID across both lists
    pub fn find(&self, id: &ItemId) -> Option<(ListKind, usize, &T)> {
        for kind in [ListKind::Persisted, ListKind::Draft] {
            if let Some(index) = self.list(kind).iter().position(|item| item.id() == id) {
                return Some((kind, index, &self.list(kind)[index]));
            }
        }
        None
    }

    /// Returns the item with the given ID, if present in either list
    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.find(id).map(|(_, _, item)| item)
    }

    /// Returns true if the ID is present in either list
    pub fn contains(&self, id: &ItemId) -> bool {
        self.find(id).is_some()
    }

    /// Clones the exact slot of an item, if present
    pub fn slot_of(&self, id: &ItemId) -> Option<ListSlot<T>> {
        self.find(id).map(|(list, index, item)| ListSlot {
            list,
            index,
            item: item.clone(),
        })
    }

    /// Removes an item by ID from whichever list holds it
    pub fn remove(&mut self, id: &ItemId) -> Option<ListSlot<T>> {
        let (list, index, _) = self.find(id)?;
        let item = self.list_mut(list).remove(index);
        Some(ListSlot { list, index, item })
    }

    /// Re-inserts a slot at its recorded position (clamped to the list end)
    pub fn insert_slot(&mut self, slot: ListSlot<T>) {
        let target = self.list_mut(slot.list);
        let index = slot.index.min(target.len());
        target.insert(index, slot.item);
    }

    /// Iterates the IDs of both lists, persisted first
    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.persisted.iter().chain(self.drafts.iter()).map(|item| item.id())
    }

    /// Total number of managed items
    pub fn len(&self) -> usize {
        self.persisted.len() + self.drafts.len()
    }

    /// Returns true if both lists are empty
    pub fn is_empty(&self) -> bool {
        self.persisted.is_empty() && self.drafts.is_empty()
    }
}

impl<T: Entity> Default for State<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
