//! Behavior registry and composer
//!
//! Resolves a requested list of behavior names into a dependency-checked,
//! priority-ordered pipeline. All configuration errors (unknown name,
//! missing dependency, duplicate name, state-key collision, dependency
//! cycle) surface at composition time, never at first dispatch.
//!
//! Dependencies are not pulled in implicitly: requesting `bulk_operations`
//! without `crud` is a configuration error, not a silent expansion of the
//! requested set.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::{
    names, Behavior, BatchBehavior, BulkOperationsBehavior, ChangeTrackingBehavior, CrudBehavior,
    FocusBehavior, HistoryBehavior,
};
use crate::domain::{Action, Entity};
use crate::state::State;

#[derive(Debug, Error, PartialEq)]
pub enum ComposeError {
    #[error("Unknown behavior: '{0}'")]
    UnknownBehavior(String),

    #[error("Behavior requested or registered twice: '{0}'")]
    DuplicateBehavior(String),

    #[error("Behavior '{behavior}' depends on '{dependency}', which is not in the composed set")]
    MissingDependency { behavior: String, dependency: String },

    #[error("Dependency cycle: '{behavior}' -> '{dependency}'")]
    DependencyCycle { behavior: String, dependency: String },

    #[error("State key '{key}' is owned by both '{first}' and '{second}'")]
    StateKeyCollision {
        key: String,
        first: String,
        second: String,
    },
}

/// Table of available behaviors, keyed by name
pub struct BehaviorRegistry<T: Entity> {
    table: HashMap<&'static str, Arc<dyn Behavior<T>>>,
}

impl<T: Entity> BehaviorRegistry<T> {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Creates a registry holding the six built-in behaviors
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for behavior in [
            Arc::new(CrudBehavior) as Arc<dyn Behavior<T>>,
            Arc::new(ChangeTrackingBehavior),
            Arc::new(HistoryBehavior),
            Arc::new(BatchBehavior),
            Arc::new(FocusBehavior),
            Arc::new(BulkOperationsBehavior),
        ] {
            // Built-in names are distinct; registration cannot fail here.
            let _ = registry.register(behavior);
        }
        registry
    }

    /// Registers a behavior under its declared name
    pub fn register(&mut self, behavior: Arc<dyn Behavior<T>>) -> Result<(), ComposeError> {
        let name = behavior.name();
        if self.table.contains_key(name) {
            return Err(ComposeError::DuplicateBehavior(name.to_string()));
        }
        self.table.insert(name, behavior);
        Ok(())
    }

    /// Looks up a behavior by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Behavior<T>>> {
        self.table.get(name)
    }

    /// Resolves the requested names into a priority-ordered pipeline
    pub fn compose<S: AsRef<str>>(&self, requested: &[S]) -> Result<Pipeline<T>, ComposeError> {
        let mut behaviors: Vec<Arc<dyn Behavior<T>>> = Vec::with_capacity(requested.len());
        for name in requested {
            let name = name.as_ref();
            let behavior = self
                .table
                .get(name)
                .ok_or_else(|| ComposeError::UnknownBehavior(name.to_string()))?;
            if behaviors.iter().any(|b| b.name() == name) {
                return Err(ComposeError::DuplicateBehavior(name.to_string()));
            }
            behaviors.push(Arc::clone(behavior));
        }

        check_dependencies(&behaviors)?;
        check_state_keys(&behaviors)?;

        behaviors.sort_by_key(|b| (b.priority(), b.name()));
        tracing::trace!(
            behaviors = ?behaviors.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "composed behavior pipeline"
        );
        Ok(Pipeline { behaviors })
    }
}

impl<T: Entity> Default for BehaviorRegistry<T> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Verifies every declared dependency is present and the dependency graph
/// is acyclic
fn check_dependencies<T: Entity>(behaviors: &[Arc<dyn Behavior<T>>]) -> Result<(), ComposeError> {
    let mut graph: DiGraph<&'static str, ()> = DiGraph::new();
    let mut node_map: HashMap<&'static str, NodeIndex> = HashMap::new();
    for behavior in behaviors {
        let idx = graph.add_node(behavior.name());
        node_map.insert(behavior.name(), idx);
    }

    for behavior in behaviors {
        for dependency in behavior.dependencies() {
            let dep_idx = node_map.get(dependency).ok_or_else(|| {
                ComposeError::MissingDependency {
                    behavior: behavior.name().to_string(),
                    dependency: dependency.to_string(),
                }
            })?;
            graph.add_edge(*dep_idx, node_map[behavior.name()], ());
            if is_cyclic_directed(&graph) {
                return Err(ComposeError::DependencyCycle {
                    behavior: behavior.name().to_string(),
                    dependency: dependency.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Verifies no two behaviors claim the same state field
fn check_state_keys<T: Entity>(behaviors: &[Arc<dyn Behavior<T>>]) -> Result<(), ComposeError> {
    let mut owners: HashMap<&'static str, &'static str> = HashMap::new();
    for behavior in behaviors {
        for key in behavior.state_keys() {
            if let Some(first) = owners.insert(key, behavior.name()) {
                return Err(ComposeError::StateKeyCollision {
                    key: key.to_string(),
                    first: first.to_string(),
                    second: behavior.name().to_string(),
                });
            }
        }
    }
    Ok(())
}

/// A dependency-checked, priority-ordered behavior chain
pub struct Pipeline<T: Entity> {
    behaviors: Vec<Arc<dyn Behavior<T>>>,
}

impl<T: Entity> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("behaviors", &self.names())
            .finish()
    }
}

impl<T: Entity> Pipeline<T> {
    /// Returns true if a behavior with the given name is composed
    pub fn has(&self, name: &str) -> bool {
        self.behaviors.iter().any(|b| b.name() == name)
    }

    /// Behavior names in invocation order
    pub fn names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }

    /// Installs every behavior's initial state
    pub fn seed(&self, state: &mut State<T>) {
        for behavior in &self.behaviors {
            behavior.seed(state);
        }
    }

    /// Runs one action through the chain: a pre-mutation observation pass,
    /// then the mutation pass, both in ascending priority order
    pub fn dispatch(&self, state: &mut State<T>, action: &Action<T>) {
        for behavior in &self.behaviors {
            behavior.before_apply(state, action);
        }
        for behavior in &self.behaviors {
            behavior.apply(state, action);
        }
    }
}

/// Composes the full built-in set
pub fn all_builtin_names() -> Vec<&'static str> {
    vec![
        names::CRUD,
        names::CHANGE_TRACKING,
        names::HISTORY,
        names::BATCH,
        names::FOCUS,
        names::BULK_OPERATIONS,
    ]
}
