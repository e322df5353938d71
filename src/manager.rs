//! Domain manager instances
//!
//! [`create_domain_manager`] turns a [`DomainManagerConfig`] into one live
//! instance: an owned state cell, a `dispatch` entry point running the
//! composed behavior pipeline, the merged query facade, and the
//! reconciliation paths (`refresh`, `commit`) that talk to the API adapter.
//!
//! One instance is the single writer of its state. Consumers read snapshots
//! through `state()` and the query methods; every mutation goes through
//! `dispatch` or a reconciliation call. Independent instances share nothing
//! and may be driven side by side without coordination.

use std::sync::Arc;

use crate::adapter::{AdapterError, ApiAdapter, DataTransforms};
use crate::behavior::{
    self, all_builtin_names, matching_ids, Behavior, BehaviorRegistry, ComposeError,
    PendingChanges, Pipeline,
};
use crate::domain::{Action, Entity, ItemId, Lifecycle};
use crate::state::{State, DEFAULT_MAX_HISTORY};

/// Configuration for one domain manager instance
pub struct DomainManagerConfig<T: Entity, W> {
    /// Owning domain, for instrumentation (e.g., "document_viewer")
    pub domain: String,
    /// Entity name, for instrumentation (e.g., "selection")
    pub entity_name: String,
    /// Behaviors to compose, by name; defaults to all built-ins
    pub behaviors: Vec<String>,
    /// Remote CRUD surface
    pub api: Box<dyn ApiAdapter<W>>,
    /// Entity/wire transforms
    pub transforms: Box<dyn DataTransforms<T, W>>,
    /// Domain-specific behaviors layered on top of the named set
    pub extensions: Vec<Arc<dyn Behavior<T>>>,
    /// Cap on the undo/redo stacks
    pub max_history: usize,
}

impl<T: Entity, W> DomainManagerConfig<T, W> {
    /// A config with the full built-in behavior set and default history cap
    pub fn new(
        domain: impl Into<String>,
        entity_name: impl Into<String>,
        api: Box<dyn ApiAdapter<W>>,
        transforms: Box<dyn DataTransforms<T, W>>,
    ) -> Self {
        Self {
            domain: domain.into(),
            entity_name: entity_name.into(),
            behaviors: all_builtin_names().iter().map(|s| s.to_string()).collect(),
            api,
            transforms,
            extensions: Vec::new(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    /// Replaces the composed behavior set
    pub fn with_behaviors<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.behaviors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a domain-specific extension behavior
    pub fn with_extension(mut self, behavior: Arc<dyn Behavior<T>>) -> Self {
        self.extensions.push(behavior);
        self
    }

    /// Overrides the undo/redo stack cap
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }
}

/// Per-item commit failure
#[derive(Debug)]
pub struct CommitFailure {
    pub id: ItemId,
    pub error: AdapterError,
}

/// Outcome of one `commit` call: one adapter attempt per draft, failures
/// reported per item with the draft left untouched
#[derive(Debug, Default)]
pub struct CommitReport {
    pub committed: usize,
    pub failures: Vec<CommitFailure>,
}

impl CommitReport {
    /// Returns true if every attempted draft committed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One live domain manager instance
pub struct DomainManager<T: Entity, W> {
    domain: String,
    entity_name: String,
    pipeline: Pipeline<T>,
    api: Box<dyn ApiAdapter<W>>,
    transforms: Box<dyn DataTransforms<T, W>>,
    state: State<T>,
}

/// Builds one instance from its configuration
///
/// Fails with a [`ComposeError`] when the behavior set is invalid; an
/// instance never runs with ambiguous composition semantics.
pub fn create_domain_manager<T: Entity, W>(
    config: DomainManagerConfig<T, W>,
) -> Result<DomainManager<T, W>, ComposeError> {
    let mut registry = BehaviorRegistry::with_builtins();
    let mut requested = config.behaviors.clone();
    for extension in config.extensions {
        let name = extension.name();
        registry.register(extension)?;
        if !requested.iter().any(|existing| existing == name) {
            requested.push(name.to_string());
        }
    }

    let pipeline = registry.compose(&requested)?;
    let mut state = State::new(config.max_history);
    pipeline.seed(&mut state);

    tracing::debug!(
        domain = %config.domain,
        entity = %config.entity_name,
        behaviors = ?pipeline.names(),
        "created domain manager"
    );

    Ok(DomainManager {
        domain: config.domain,
        entity_name: config.entity_name,
        pipeline,
        api: config.api,
        transforms: config.transforms,
        state,
    })
}

impl<T: Entity, W> DomainManager<T, W> {
    /// The current state snapshot (read-only; mutation goes through
    /// `dispatch`)
    pub fn state(&self) -> &State<T> {
        &self.state
    }

    /// The owning domain name
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The managed entity name
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns true if the named behavior is composed into this instance
    pub fn has_behavior(&self, name: &str) -> bool {
        self.pipeline.has(name)
    }

    /// Runs one action through the behavior pipeline
    pub fn dispatch(&mut self, action: Action<T>) {
        tracing::debug!(
            domain = %self.domain,
            entity = %self.entity_name,
            action = action.label(),
            "dispatch"
        );
        self.pipeline.dispatch(&mut self.state, &action);
        debug_assert!(self.split_invariant_holds(), "item present in both lists");
    }

    fn split_invariant_holds(&self) -> bool {
        self.state
            .persisted
            .iter()
            .all(|item| !self.state.drafts.iter().any(|draft| draft.id() == item.id()))
    }

    /// Iterates every managed item, persisted first
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.state.persisted.iter().chain(self.state.drafts.iter())
    }

    /// ID assigned by the most recent `Create` dispatch
    pub fn last_created_id(&self) -> Option<&ItemId> {
        self.state.last_created.as_ref()
    }

    // --- change tracking facade ---

    /// Returns true if the item has uncommitted changes
    pub fn is_dirty(&self, id: &ItemId) -> bool {
        behavior::is_dirty(&self.state, id)
    }

    /// Number of uncommitted mutations
    pub fn pending_change_count(&self) -> usize {
        behavior::pending_change_count(&self.state)
    }

    /// Draft items partitioned by pending mutation kind
    pub fn pending_changes(&self) -> PendingChanges<T> {
        behavior::pending_changes(&self.state)
    }

    // --- focus facade ---

    /// The focused singleton
    pub fn focused(&self) -> Option<&ItemId> {
        self.state.focus.focused.as_ref()
    }

    /// The focused set, oldest first
    pub fn focused_ids(&self) -> &[ItemId] {
        &self.state.focus.focused_set
    }

    // --- history facade ---

    /// Returns true if an undo entry is available
    pub fn can_undo(&self) -> bool {
        !self.state.history.undo_stack.is_empty()
    }

    /// Returns true if a redo entry is available
    pub fn can_redo(&self) -> bool {
        !self.state.history.redo_stack.is_empty()
    }

    /// Reverts the most recent recorded change
    pub fn undo(&mut self) {
        self.dispatch(Action::Undo);
    }

    /// Re-applies the most recently undone change
    pub fn redo(&mut self) {
        self.dispatch(Action::Redo);
    }

    // --- batch facade ---

    /// Opens a batch window around an interactive gesture
    pub fn begin_batch(&mut self) {
        self.dispatch(Action::BeginBatch);
    }

    /// Closes the batch window, synthesizing at most one history entry
    pub fn end_batch(&mut self) {
        self.dispatch(Action::EndBatch);
    }

    // --- bulk operations facade ---

    /// Stages deletion for every item in the scope as one `DeleteMany`,
    /// returning the number of items staged
    pub fn clear_scope(&mut self, scope: &T::Scope) -> usize {
        let ids = matching_ids(&self.state, scope);
        let count = ids.len();
        if count > 0 {
            self.dispatch(Action::DeleteMany { ids });
        }
        count
    }

    /// Stages deletion for every item as one `DeleteMany`
    pub fn clear_everything(&mut self) -> usize {
        let ids: Vec<ItemId> = self
            .items()
            .filter(|item| item.lifecycle() != Lifecycle::StagedDeletion)
            .map(|item| item.id().clone())
            .collect();
        let count = ids.len();
        if count > 0 {
            self.dispatch(Action::DeleteMany { ids });
        }
        count
    }

    // --- reconciliation ---

    /// Reloads the persisted list from the adapter
    ///
    /// Fetched items are deduplicated by ID and content equality; an ID
    /// currently shadowed by a local draft keeps the draft, so the split
    /// invariant holds. Returns the number of persisted items.
    pub fn refresh(&mut self, context: &str) -> Result<usize, AdapterError> {
        let wires = self.api.fetch(context)?;
        let mut fresh: Vec<T> = Vec::with_capacity(wires.len());
        for wire in wires {
            let mut item = self.transforms.from_wire(wire)?;
            item.set_lifecycle(Lifecycle::Committed);
            let duplicate = fresh
                .iter()
                .any(|kept| kept.id() == item.id() || kept.content_eq(&item));
            let shadowed = self
                .state
                .drafts
                .iter()
                .any(|draft| draft.id() == item.id());
            if !duplicate && !shadowed {
                fresh.push(item);
            }
        }

        let count = fresh.len();
        self.state.persisted = fresh;
        tracing::debug!(
            domain = %self.domain,
            entity = %self.entity_name,
            count,
            "refreshed persisted items"
        );
        Ok(count)
    }

    /// Commits every draft: one adapter attempt per item, per call
    ///
    /// Successful creations and editions move into the persisted list as
    /// `Committed` (creations take the server-assigned ID); successful
    /// deletions are removed outright. A failed draft is left exactly as it
    /// was so the caller can retry or edit further.
    pub fn commit(&mut self, context: &str) -> CommitReport {
        let drafts = self.state.drafts.clone();
        let mut report = CommitReport::default();

        for draft in drafts {
            let id = draft.id().clone();
            let outcome = match draft.lifecycle() {
                Lifecycle::StagedCreation => self.commit_create(context, &draft),
                Lifecycle::StagedEdition => self.commit_update(&draft),
                Lifecycle::StagedDeletion => self.commit_delete(&draft),
                // Unstaged or committed items do not belong in the drafts
                _ => continue,
            };
            match outcome {
                Ok(()) => report.committed += 1,
                Err(error) => {
                    tracing::debug!(
                        domain = %self.domain,
                        entity = %self.entity_name,
                        id = %id,
                        error = %error,
                        "commit failure"
                    );
                    report.failures.push(CommitFailure { id, error });
                }
            }
        }
        report
    }

    fn commit_create(&mut self, context: &str, draft: &T) -> Result<(), AdapterError> {
        let payload = self.transforms.for_create(draft)?;
        let wire = self.api.create(context, payload)?;
        let mut stored = self.transforms.from_wire(wire)?;
        stored.set_lifecycle(Lifecycle::Committed);
        self.state.remove(draft.id());
        self.state.persisted.push(stored);
        Ok(())
    }

    fn commit_update(&mut self, draft: &T) -> Result<(), AdapterError> {
        let payload = self.transforms.for_update(draft)?;
        let wire = self.api.update(draft.id(), payload)?;
        let mut stored = self.transforms.from_wire(wire)?;
        stored.set_lifecycle(Lifecycle::Committed);
        self.state.remove(draft.id());
        self.state.persisted.push(stored);
        Ok(())
    }

    fn commit_delete(&mut self, draft: &T) -> Result<(), AdapterError> {
        self.api.delete(draft.id())?;
        self.state.remove(draft.id());
        Ok(())
    }
}
