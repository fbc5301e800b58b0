//! A*-style best-first search over a motion-primitive lattice
//!
//! The searcher expands translated primitives out of an immutable
//! [`PrimitiveGraph`], consulting a host-supplied collision checker and
//! heuristic. The open list is a plain binary heap without decrease-key:
//! improved routes re-push the same state and stale copies are skipped on
//! pop via the visited set. Successor generation runs serially or as a
//! rayon parallel-for with per-worker buffers.

use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::collision::CollisionChecker;
use crate::common::state::{positions_within, StateVec};
use crate::graph::{MotionPrimitive, PrimitiveGraph};
use crate::heuristic::Heuristic;

use super::node::{Node, OpenListEntry};
use super::visited::{PathHistory, VisitedSet};

/// Timing counter labels, accumulated in seconds per search
pub const TIMING_POP: &str = "astar_pop";
pub const TIMING_PUSH: &str = "astar_push";
pub const TIMING_EXPAND: &str = "astar_expand";

const TIMING_LABELS: [&str; 3] = [TIMING_POP, TIMING_PUSH, TIMING_EXPAND];

/// Successor buffers start at this capacity to curb reallocation
const SUCCESSOR_RESERVE: usize = 64;

/// Graph search driver.
///
/// The graph, collision checker and heuristic are shared read-only for the
/// lifetime of the searcher; visited states and timing counters are reset
/// at the top of every [`search`](GraphSearch::search) call.
pub struct GraphSearch<'a> {
    graph: &'a PrimitiveGraph,
    collision: &'a dyn CollisionChecker,
    heuristic: &'a dyn Heuristic,
    cancel: Option<Arc<AtomicBool>>,
    visited: VisitedSet,
    timings: HashMap<&'static str, f64>,
}

impl<'a> GraphSearch<'a> {
    pub fn new(
        graph: &'a PrimitiveGraph,
        collision: &'a dyn CollisionChecker,
        heuristic: &'a dyn Heuristic,
    ) -> Self {
        Self {
            graph,
            collision,
            heuristic,
            cancel: None,
            visited: VisitedSet::new(),
            timings: HashMap::new(),
        }
    }

    /// Install a shutdown flag polled at every loop iteration; a `false`
    /// load cancels the search.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_running(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(true)
    }

    /// Shared loop body of the serial and parallel expanders.
    fn make_successor(
        &self,
        node: &Node,
        to_row: usize,
        from_col: usize,
        goal: &StateVec,
    ) -> Option<Node> {
        if self.graph.edge_index(to_row, from_col) < 0 {
            return None;
        }

        let mut mp = self.graph.mp_between_indices(to_row, from_col);
        mp.translate(&node.state);

        // Check if already visited
        if self.visited.contains(mp.end_state()) {
            return None;
        }

        // Then check if it is collision free
        if !self.collision.is_collision_free(&mp) {
            return None;
        }

        Some(Node {
            state_index: to_row,
            state: mp.end_state().clone(),
            motion_cost: node.motion_cost + mp.cost(),
            heuristic_cost: self.heuristic.cost_to_go(mp.end_state(), goal),
        })
    }

    /// Generate the successors of `node` in ascending vertex order.
    ///
    /// Read-only with respect to the visited set; insertion happens in the
    /// driver after the pop.
    pub fn expand(&self, node: &Node, goal: &StateVec) -> Vec<Node> {
        let from_col = self.graph.norm_index(node.state_index);
        let num_states = self.graph.edges_rows();

        let mut nodes = Vec::with_capacity(SUCCESSOR_RESERVE);
        for i in 0..num_states {
            if let Some(next) = self.make_successor(node, i, from_col, goal) {
                nodes.push(next);
            }
        }
        nodes
    }

    /// Parallel [`expand`](GraphSearch::expand): the vertex range is split
    /// across rayon workers, each accumulating into a private buffer, and
    /// the buffers are concatenated in unspecified order. The successor
    /// multiset equals the serial one; the driver's heap re-sorts anyway.
    pub fn expand_par(&self, node: &Node, goal: &StateVec) -> Vec<Node> {
        let from_col = self.graph.norm_index(node.state_index);
        let num_states = self.graph.edges_rows();

        (0..num_states)
            .into_par_iter()
            .fold(
                || Vec::with_capacity(SUCCESSOR_RESERVE),
                |mut local, i| {
                    if let Some(next) = self.make_successor(node, i, from_col, goal) {
                        local.push(next);
                    }
                    local
                },
            )
            .reduce(Vec::new, |mut combined, mut local| {
                combined.append(&mut local);
                combined
            })
    }

    /// Find a lowest-cost primitive sequence from `start_state` into the
    /// goal region around `end_state`.
    ///
    /// Returns an empty path when start and goal are already within
    /// `distance_threshold` of each other, when the open list drains
    /// without reaching the goal, or when the search is cancelled. Goal
    /// and start proximity use position components only.
    ///
    /// The start node is seeded with `state_index` 0, which assumes a
    /// translation-invariant lattice whose row 0 is the canonical origin
    /// vertex.
    pub fn search(
        &mut self,
        start_state: &StateVec,
        end_state: &StateVec,
        distance_threshold: f64,
        parallel: bool,
    ) -> Vec<MotionPrimitive> {
        debug!(
            edges_rows = self.graph.edges_rows(),
            edges_cols = self.graph.edges_cols(),
            num_edges = self.graph.num_edges(),
            num_primitives = self.graph.num_primitives(),
            parallel,
            "starting search"
        );

        self.visited.clear();
        self.timings.clear();
        for label in TIMING_LABELS {
            self.timings.insert(label, 0.0);
        }

        let spatial_dim = self.graph.spatial_dim();

        // Early exit if start and end positions are close
        if positions_within(start_state, end_state, spatial_dim, distance_threshold) {
            return Vec::new();
        }

        let start_node = Node {
            state_index: 0,
            state: start_state.clone(),
            motion_cost: 0.0,
            heuristic_cost: self.heuristic.cost_to_go(start_state, end_state),
        };

        let mut open = BinaryHeap::new();
        open.push(OpenListEntry(start_node));

        let mut history = PathHistory::new();

        while self.is_running() {
            let curr = match open.peek() {
                Some(entry) => entry.0.clone(),
                None => break,
            };

            // Check if we are close enough to the end
            if positions_within(&curr.state, end_state, spatial_dim, distance_threshold) {
                debug!(
                    open = open.len(),
                    history = history.len(),
                    visited = self.visited.len(),
                    "goal region reached"
                );
                return self.recover_path(&history, &curr);
            }

            let timer = Instant::now();
            open.pop();
            *self.timings.entry(TIMING_POP).or_insert(0.0) += timer.elapsed().as_secs_f64();

            // The heap has no decrease-key, so improved routes re-push the
            // same state; any copy popped after the state was expanded is
            // stale and must be skipped.
            if self.visited.contains(&curr.state) {
                continue;
            }
            self.visited.insert(curr.state.clone());

            let timer = Instant::now();
            let successors = if parallel {
                self.expand_par(&curr, end_state)
            } else {
                self.expand(&curr, end_state)
            };
            *self.timings.entry(TIMING_EXPAND).or_insert(0.0) += timer.elapsed().as_secs_f64();

            for next in successors {
                // best motion cost reaching this state so far, infinite if unseen
                let best_cost = history.best_cost(&next.state);
                if next.motion_cost < best_cost {
                    history.record(&next.state, curr.clone(), next.motion_cost);
                    let timer = Instant::now();
                    open.push(OpenListEntry(next));
                    *self.timings.entry(TIMING_PUSH).or_insert(0.0) +=
                        timer.elapsed().as_secs_f64();
                }
            }
        }

        Vec::new()
    }

    /// Primitive realizing the hop from `start_node` to `end_node`,
    /// translated to start at `start_node`'s state.
    pub fn primitive_between(&self, start_node: &Node, end_node: &Node) -> MotionPrimitive {
        let from_col = self.graph.norm_index(start_node.state_index);
        let mut mp = self.graph.mp_between_indices(end_node.state_index, from_col);
        mp.translate(&start_node.state);
        mp
    }

    /// Walk parent pointers from `end_node` back to the zero-cost start
    /// node, re-fetching the connecting primitive for each hop.
    fn recover_path(&self, history: &PathHistory, end_node: &Node) -> Vec<MotionPrimitive> {
        let mut path = Vec::new();
        let mut curr = end_node.clone();

        while curr.motion_cost != 0.0 {
            if !self.is_running() {
                return Vec::new();
            }
            let prev = history
                .parent_of(&curr.state)
                .expect("path history is missing a parent entry")
                .clone();
            path.push(self.primitive_between(&prev, &curr));
            curr = prev;
        }

        path.reverse();
        path
    }

    /// Full-precision states expanded by the last search, for diagnostics.
    pub fn visited_states(&self) -> Vec<StateVec> {
        self.visited.states()
    }

    /// Accumulated wall-clock seconds per timing label for the last search
    pub fn timings(&self) -> &HashMap<&'static str, f64> {
        &self.timings
    }
}
