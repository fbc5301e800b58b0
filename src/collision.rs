//! Collision checking seam for the graph search

use nalgebra::DVector;

use crate::graph::MotionPrimitive;

/// Predicate consulted once per candidate primitive during expansion.
///
/// Implementations must be pure with respect to the obstacle data for the
/// duration of a search; a checker that can fail internally must report the
/// primitive as not collision free.
pub trait CollisionChecker: Sync {
    fn is_collision_free(&self, mp: &MotionPrimitive) -> bool;
}

/// Obstacle-free world; every primitive passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpace;

impl CollisionChecker for FreeSpace {
    fn is_collision_free(&self, _mp: &MotionPrimitive) -> bool {
        true
    }
}

/// Point obstacles inflated by a clearance radius.
///
/// Primitives are sampled at `sample_step` second intervals and rejected
/// when any sampled position comes within `clearance` of an obstacle.
#[derive(Debug, Clone)]
pub struct PointObstacleMap {
    points: Vec<DVector<f64>>,
    clearance: f64,
    sample_step: f64,
}

impl PointObstacleMap {
    pub fn new(points: Vec<DVector<f64>>, clearance: f64, sample_step: f64) -> Self {
        assert!(sample_step > 0.0, "sample step must be positive");
        Self {
            points,
            clearance,
            sample_step,
        }
    }

    /// Build a planar obstacle map from coordinate slices.
    pub fn from_xy(x: &[f64], y: &[f64], clearance: f64, sample_step: f64) -> Self {
        assert_eq!(x.len(), y.len());
        let points = x
            .iter()
            .zip(y.iter())
            .map(|(&px, &py)| DVector::from_row_slice(&[px, py]))
            .collect();
        Self::new(points, clearance, sample_step)
    }

    pub fn push(&mut self, point: DVector<f64>) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl CollisionChecker for PointObstacleMap {
    fn is_collision_free(&self, mp: &MotionPrimitive) -> bool {
        let clearance_sq = self.clearance * self.clearance;
        for position in mp.sampled_positions(self.sample_step) {
            for obstacle in &self.points {
                let dims = position.len().min(obstacle.len());
                let mut sq_dist = 0.0;
                for k in 0..dims {
                    let diff = position[k] - obstacle[k];
                    sq_dist += diff * diff;
                }
                if sq_dist <= clearance_sq {
                    return false;
                }
            }
        }
        true
    }
}
