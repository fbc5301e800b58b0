//! Motion primitive: a short precomputed trajectory between lattice states

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::common::state::StateVec;

/// A short parameterized trajectory connecting two lattice states with a
/// known cost and duration.
///
/// `poly_coeffs` stores one polynomial per spatial dimension, one row each,
/// highest power first, so the constant term sits in the last column.
/// Primitives are stored relative to their lattice endpoints; callers
/// [`translate`](MotionPrimitive::translate) a clone to an absolute start
/// state before use.
#[derive(Debug, Clone)]
pub struct MotionPrimitive {
    spatial_dim: usize,
    start_state: StateVec,
    end_state: StateVec,
    cost: f64,
    traj_time: f64,
    poly_coeffs: DMatrix<f64>,
}

impl MotionPrimitive {
    pub fn new(
        spatial_dim: usize,
        start_state: StateVec,
        end_state: StateVec,
        cost: f64,
        traj_time: f64,
        poly_coeffs: DMatrix<f64>,
    ) -> Self {
        assert_eq!(
            start_state.len(),
            end_state.len(),
            "primitive endpoint states must have equal dimension"
        );
        Self {
            spatial_dim,
            start_state,
            end_state,
            cost,
            traj_time,
            poly_coeffs,
        }
    }

    pub fn start_state(&self) -> &StateVec {
        &self.start_state
    }

    pub fn end_state(&self) -> &StateVec {
        &self.end_state
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn traj_time(&self) -> f64 {
        self.traj_time
    }

    pub fn spatial_dim(&self) -> usize {
        self.spatial_dim
    }

    pub fn poly_coeffs(&self) -> &DMatrix<f64> {
        &self.poly_coeffs
    }

    /// Move the primitive so that it begins at `new_start`.
    ///
    /// Shifts the position components of both endpoint states and the
    /// constant term of each spatial polynomial by the same delta.
    /// Higher-derivative components are untouched, so the operation is
    /// exact and reversible.
    pub fn translate(&mut self, new_start: &StateVec) {
        let cols = self.poly_coeffs.ncols();
        for k in 0..self.spatial_dim {
            let delta = new_start[k] - self.start_state[k];
            self.start_state[k] += delta;
            self.end_state[k] += delta;
            if k < self.poly_coeffs.nrows() && cols > 0 {
                self.poly_coeffs[(k, cols - 1)] += delta;
            }
        }
    }

    /// Position at time `t`, evaluated per spatial dimension.
    ///
    /// Primitives without polynomial coefficients fall back to linear
    /// interpolation of the endpoint positions over `traj_time`.
    pub fn position_at(&self, t: f64) -> DVector<f64> {
        let mut position = DVector::zeros(self.spatial_dim);
        if self.poly_coeffs.ncols() == 0 {
            let s = if self.traj_time > 0.0 {
                (t / self.traj_time).clamp(0.0, 1.0)
            } else {
                0.0
            };
            for k in 0..self.spatial_dim {
                position[k] = self.start_state[k] + s * (self.end_state[k] - self.start_state[k]);
            }
            return position;
        }

        for k in 0..self.spatial_dim {
            // Horner evaluation, highest power first
            let mut value = 0.0;
            for c in 0..self.poly_coeffs.ncols() {
                value = value * t + self.poly_coeffs[(k, c)];
            }
            position[k] = value;
        }
        position
    }

    /// Positions sampled every `step` seconds over the primitive duration,
    /// final time included.
    pub fn sampled_positions(&self, step: f64) -> Vec<DVector<f64>> {
        assert!(step > 0.0, "sample step must be positive");
        let mut positions = Vec::new();
        let mut t = 0.0;
        while t < self.traj_time {
            positions.push(self.position_at(t));
            t += step;
        }
        positions.push(self.position_at(self.traj_time));
        positions
    }
}

impl fmt::Display for MotionPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_state = |s: &StateVec| {
            s.iter()
                .map(|x| format!("{:.3}", x))
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "mp [{}] -> [{}], cost {:.4}, time {:.4}",
            fmt_state(&self.start_state),
            fmt_state(&self.end_state),
            self.cost,
            self.traj_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(components: &[f64]) -> StateVec {
        DVector::from_row_slice(components)
    }

    /// Straight-line primitive over t in [0, 1] with linear polynomials
    fn line_primitive(start: &[f64; 4], end: &[f64; 4], cost: f64) -> MotionPrimitive {
        let coeffs = DMatrix::from_row_slice(
            2,
            2,
            &[
                end[0] - start[0],
                start[0],
                end[1] - start[1],
                start[1],
            ],
        );
        MotionPrimitive::new(2, state(start), state(end), cost, 1.0, coeffs)
    }

    #[test]
    fn test_translate_shifts_positions_only() {
        let mut mp = line_primitive(&[0.0, 0.0, 1.0, -1.0], &[1.0, 2.0, 0.5, 0.5], 1.0);
        mp.translate(&state(&[3.0, -1.0, 9.0, 9.0]));

        assert_eq!(mp.start_state()[0], 3.0);
        assert_eq!(mp.start_state()[1], -1.0);
        assert_eq!(mp.end_state()[0], 4.0);
        assert_eq!(mp.end_state()[1], 1.0);
        // velocities unchanged
        assert_eq!(mp.start_state()[2], 1.0);
        assert_eq!(mp.start_state()[3], -1.0);
        assert_eq!(mp.end_state()[2], 0.5);
        assert_eq!(mp.end_state()[3], 0.5);
    }

    #[test]
    fn test_translate_preserves_displacement() {
        let mut mp = line_primitive(&[0.5, 0.5, 0.0, 0.0], &[1.5, 2.5, 0.0, 0.0], 1.0);
        mp.translate(&state(&[-7.0, 4.0, 0.0, 0.0]));
        let dx = mp.end_state()[0] - mp.start_state()[0];
        let dy = mp.end_state()[1] - mp.start_state()[1];
        assert!((dx - 1.0).abs() < 1e-12);
        assert!((dy - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_translate_is_reversible() {
        let original = line_primitive(&[0.0, 0.0, 0.3, 0.3], &[1.0, 1.0, 0.3, 0.3], 1.0);
        let mut mp = original.clone();
        let start = original.start_state().clone();
        mp.translate(&state(&[10.0, -10.0, 0.0, 0.0]));
        mp.translate(&start);
        for k in 0..4 {
            assert!((mp.start_state()[k] - original.start_state()[k]).abs() < 1e-12);
            assert!((mp.end_state()[k] - original.end_state()[k]).abs() < 1e-12);
        }
        assert_eq!(mp.poly_coeffs(), original.poly_coeffs());
    }

    #[test]
    fn test_translate_shifts_constant_coefficient() {
        let mut mp = line_primitive(&[0.0, 0.0, 0.0, 0.0], &[1.0, 0.0, 0.0, 0.0], 1.0);
        mp.translate(&state(&[2.0, 3.0, 0.0, 0.0]));
        // row 0: [1, 2], row 1: [0, 3]
        assert_eq!(mp.poly_coeffs()[(0, 1)], 2.0);
        assert_eq!(mp.poly_coeffs()[(1, 1)], 3.0);
        assert_eq!(mp.poly_coeffs()[(0, 0)], 1.0);
    }

    #[test]
    fn test_position_at_endpoints() {
        let mut mp = line_primitive(&[0.0, 0.0, 0.0, 0.0], &[2.0, -1.0, 0.0, 0.0], 1.0);
        mp.translate(&state(&[1.0, 1.0, 0.0, 0.0]));
        let p0 = mp.position_at(0.0);
        let p1 = mp.position_at(1.0);
        assert!((p0[0] - 1.0).abs() < 1e-12);
        assert!((p0[1] - 1.0).abs() < 1e-12);
        assert!((p1[0] - 3.0).abs() < 1e-12);
        assert!((p1[1] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_position_at_without_coefficients_interpolates() {
        let mp = MotionPrimitive::new(
            2,
            state(&[0.0, 0.0, 0.0, 0.0]),
            state(&[4.0, 2.0, 0.0, 0.0]),
            1.0,
            2.0,
            DMatrix::zeros(0, 0),
        );
        let mid = mp.position_at(1.0);
        assert!((mid[0] - 2.0).abs() < 1e-12);
        assert!((mid[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sampled_positions_cover_duration() {
        let mp = line_primitive(&[0.0, 0.0, 0.0, 0.0], &[1.0, 0.0, 0.0, 0.0], 1.0);
        let samples = mp.sampled_positions(0.25);
        // t = 0, 0.25, 0.5, 0.75 plus the final time
        assert_eq!(samples.len(), 5);
        assert!((samples[0][0] - 0.0).abs() < 1e-12);
        assert!((samples.last().unwrap()[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_display_summarizes_endpoints() {
        let mp = line_primitive(&[0.0, 0.0, 0.0, 0.0], &[1.0, 0.5, 0.0, 0.0], 1.5);
        let text = format!("{}", mp);
        assert!(text.contains("[0.000, 0.000, 0.000, 0.000]"));
        assert!(text.contains("[1.000, 0.500, 0.000, 0.000]"));
        assert!(text.contains("cost 1.5000"));
    }

    #[test]
    #[should_panic(expected = "equal dimension")]
    fn test_mismatched_endpoints_panic() {
        MotionPrimitive::new(
            2,
            state(&[0.0, 0.0, 0.0, 0.0]),
            state(&[1.0, 0.0]),
            1.0,
            1.0,
            DMatrix::zeros(0, 0),
        );
    }
}
