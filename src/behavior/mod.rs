//! Composable behaviors
//!
//! A behavior is the unit of composition: a named, prioritized bundle that
//! owns a slice of the managed state and handles the actions it cares about.
//! Behaviors declare dependencies on other behaviors by name; the
//! [`BehaviorRegistry`] resolves a requested list into a priority-ordered
//! [`Pipeline`] and rejects invalid configurations up front.
//!
//! Dispatch runs two passes over the pipeline, both in ascending priority
//! order: `before_apply` lets a behavior observe pre-mutation state (the
//! history behavior captures inverse data here), then `apply` performs the
//! mutations. Because every composed behavior sees every action, one action
//! can carry several concerns: CRUD stages a deletion and the focus behavior
//! rides along to drop the deleted ID from the focused set.

mod batch;
mod bulk;
mod change_tracking;
mod compose;
mod crud;
mod focus;
mod history;

pub use batch::BatchBehavior;
pub use bulk::{matching_ids, BulkOperationsBehavior};
pub use change_tracking::{
    is_dirty, pending_change_count, pending_changes, ChangeTrackingBehavior, PendingChanges,
};
pub use compose::{all_builtin_names, BehaviorRegistry, ComposeError, Pipeline};
pub use crud::CrudBehavior;
pub use focus::FocusBehavior;
pub use history::HistoryBehavior;

use crate::domain::{Action, Entity};
use crate::state::State;

/// Canonical names of the built-in behaviors
pub mod names {
    pub const CRUD: &str = "crud";
    pub const CHANGE_TRACKING: &str = "change_tracking";
    pub const HISTORY: &str = "history";
    pub const BATCH: &str = "batch";
    pub const FOCUS: &str = "focus";
    pub const BULK_OPERATIONS: &str = "bulk_operations";
}

/// The unit of composition
///
/// Implementations must be stateless descriptors: all mutable data lives in
/// the [`State`] slice named by `state_keys`, so one behavior value can be
/// shared across manager instances.
pub trait Behavior<T: Entity>: Send + Sync {
    /// Unique behavior name, used for dependency declarations
    fn name(&self) -> &'static str;

    /// Composition order: lower priority runs first, so higher-priority
    /// behaviors observe already-updated state
    fn priority(&self) -> u32;

    /// Names of behaviors whose state this behavior reads
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    /// State fields owned (and solely mutated) by this behavior; the
    /// composer rejects collisions across behaviors
    fn state_keys(&self) -> &'static [&'static str] {
        &[]
    }

    /// Installs this behavior's initial state (extension behaviors seed
    /// their `State::ext` entries here)
    fn seed(&self, _state: &mut State<T>) {}

    /// Pre-mutation pass: observe the state an action is about to change
    fn before_apply(&self, _state: &mut State<T>, _action: &Action<T>) {}

    /// Mutation pass: handle the action
    fn apply(&self, state: &mut State<T>, action: &Action<T>);
}
