//! The action vocabulary
//!
//! Actions are a closed tagged union over the domain entity type. Every
//! mutation of a managed state goes through `dispatch` with one of these;
//! behaviors pattern-match on the variants they care about and ignore the
//! rest. Dispatching an action no composed behavior handles is a no-op,
//! never an error.

use super::id::ItemId;
use super::item::Entity;

/// A dispatchable action over a managed entity collection
#[derive(Debug, Clone)]
pub enum Action<T: Entity> {
    /// Stage a new item for creation
    Create(T),
    /// Apply a partial update to an item
    Update { id: ItemId, patch: T::Patch },
    /// Stage one item for deletion (or drop it outright if never committed)
    Delete { id: ItemId },
    /// Stage many items for deletion as one logical operation
    DeleteMany { ids: Vec<ItemId> },
    /// Stage every item for deletion
    ClearAll,
    /// Stage every item matching the scope for deletion
    ClearScope(T::Scope),
    /// Focus one item (or clear focus with `None`)
    SetFocused(Option<ItemId>),
    /// Replace the focused set
    SetFocusedMany(Vec<ItemId>),
    /// Toggle one item's membership in the focused set
    ToggleFocus(ItemId),
    /// Clear all focus
    ClearFocus,
    /// Revert the most recent recorded change
    Undo,
    /// Re-apply the most recently undone change
    Redo,
    /// Open a batch window: mutations apply immediately but history
    /// recording is deferred to `EndBatch`
    BeginBatch,
    /// Close the batch window, synthesizing at most one history entry
    EndBatch,
}

impl<T: Entity> Action<T> {
    /// Returns a stable label for instrumentation
    pub fn label(&self) -> &'static str {
        match self {
            Action::Create(_) => "create",
            Action::Update { .. } => "update",
            Action::Delete { .. } => "delete",
            Action::DeleteMany { .. } => "delete_many",
            Action::ClearAll => "clear_all",
            Action::ClearScope(_) => "clear_scope",
            Action::SetFocused(_) => "set_focused",
            Action::SetFocusedMany(_) => "set_focused_many",
            Action::ToggleFocus(_) => "toggle_focus",
            Action::ClearFocus => "clear_focus",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::BeginBatch => "begin_batch",
            Action::EndBatch => "end_batch",
        }
    }

    /// Returns true if this action mutates the item lists
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Action::Create(_)
                | Action::Update { .. }
                | Action::Delete { .. }
                | Action::DeleteMany { .. }
                | Action::ClearAll
                | Action::ClearScope(_)
        )
    }
}
