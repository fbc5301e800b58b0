//! Cost-to-go heuristics for the graph search

use crate::common::state::StateVec;

/// Cost-to-go estimate consulted once per generated successor.
///
/// Implementations must be non-negative and admissible (never overestimate
/// the remaining motion cost) for the search to return lowest-cost paths.
pub trait Heuristic: Sync {
    fn cost_to_go(&self, state: &StateVec, goal: &StateVec) -> f64;
}

/// Always-zero estimate; trivially admissible, degrades the search to
/// uniform-cost expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn cost_to_go(&self, _state: &StateVec, _goal: &StateVec) -> f64 {
        0.0
    }
}

/// Weighted Euclidean distance in position space.
///
/// Admissible whenever every primitive costs at least `weight` times the
/// position distance it covers.
#[derive(Debug, Clone, Copy)]
pub struct EuclideanHeuristic {
    spatial_dim: usize,
    weight: f64,
}

impl EuclideanHeuristic {
    pub fn new(spatial_dim: usize, weight: f64) -> Self {
        Self {
            spatial_dim,
            weight: weight.max(0.0),
        }
    }
}

impl Heuristic for EuclideanHeuristic {
    fn cost_to_go(&self, state: &StateVec, goal: &StateVec) -> f64 {
        let mut sq_dist = 0.0;
        for k in 0..self.spatial_dim {
            let diff = state[k] - goal[k];
            sq_dist += diff * diff;
        }
        self.weight * sq_dist.sqrt()
    }
}
