//! Visitation and parent bookkeeping, keyed on the quantization grid
//!
//! Both structures must share the same de-duplication grain: a state that
//! the visited set considers seen must resolve to the same history entry,
//! otherwise dedups are missed or parents orphaned. Keys are
//! [`QuantizedState`], so the grain is fixed in one place.

use std::collections::{HashMap, HashSet};

use crate::common::state::{QuantizedState, StateVec};

use super::node::Node;

/// States already expanded, de-duplicated on the quantization grid
#[derive(Debug, Default)]
pub struct VisitedSet {
    states: HashSet<QuantizedState>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if an equivalent state was already present.
    pub fn insert(&mut self, state: StateVec) -> bool {
        self.states.insert(QuantizedState::new(state))
    }

    pub fn contains(&self, state: &StateVec) -> bool {
        self.states.contains(&QuantizedState::new(state.clone()))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Full-precision representatives of every visited state
    pub fn states(&self) -> Vec<StateVec> {
        self.states.iter().map(|q| q.state().clone()).collect()
    }
}

/// Best-known predecessor for one state
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub parent_node: Node,
    pub best_cost: f64,
}

/// Parent and best-cost history used to reconstruct paths
#[derive(Debug, Default)]
pub struct PathHistory {
    entries: HashMap<QuantizedState, HistoryEntry>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best motion cost seen so far for `state`; infinity when unseen.
    pub fn best_cost(&self, state: &StateVec) -> f64 {
        self.entries
            .get(&QuantizedState::new(state.clone()))
            .map(|entry| entry.best_cost)
            .unwrap_or(f64::INFINITY)
    }

    /// Record `parent_node` as the predecessor of `state` at `motion_cost`.
    pub fn record(&mut self, state: &StateVec, parent_node: Node, motion_cost: f64) {
        self.entries.insert(
            QuantizedState::new(state.clone()),
            HistoryEntry {
                parent_node,
                best_cost: motion_cost,
            },
        );
    }

    pub fn parent_of(&self, state: &StateVec) -> Option<&Node> {
        self.entries
            .get(&QuantizedState::new(state.clone()))
            .map(|entry| &entry.parent_node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
