//! State vectors and the quantized equivalence used for de-duplication
//!
//! A state packs position and its derivatives into one flat vector of
//! length `spatial_dim * control_space_dim`; the first `spatial_dim`
//! components are position. Repeated primitive translations accumulate
//! floating-point drift, so set/map lookups go through [`QuantizedState`],
//! which collapses states onto a 0.01-spaced grid.

use std::hash::{Hash, Hasher};

use nalgebra::DVector;

/// A robot state: position followed by higher derivatives
pub type StateVec = DVector<f64>;

/// Cells are 0.01 wide in every state component
const QUANT_SCALE: f64 = 100.0;

/// Check whether two states are within `d` of each other in position space.
///
/// Only the first `spatial_dim` components participate; velocities and
/// accelerations are ignored.
pub fn positions_within(a: &StateVec, b: &StateVec, spatial_dim: usize, d: f64) -> bool {
    debug_assert!(a.len() >= spatial_dim && b.len() >= spatial_dim);
    let mut sq_dist = 0.0;
    for k in 0..spatial_dim {
        let diff = a[k] - b[k];
        sq_dist += diff * diff;
    }
    sq_dist < d * d
}

/// State vector with coarse-grained equality and hashing.
///
/// Two states compare equal iff their componentwise `(x * 100.0) as i32`
/// integer vectors match (truncation toward zero). The hash folds the same
/// integer vector, so hash and equality always agree. The full-precision
/// state is kept for diagnostics and path reconstruction.
#[derive(Debug, Clone)]
pub struct QuantizedState(StateVec);

impl QuantizedState {
    pub fn new(state: StateVec) -> Self {
        Self(state)
    }

    /// The full-precision state this key was built from
    pub fn state(&self) -> &StateVec {
        &self.0
    }

    fn cells(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().map(|&x| (x * QUANT_SCALE) as i32)
    }
}

impl PartialEq for QuantizedState {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.cells().eq(other.cells())
    }
}

impl Eq for QuantizedState {}

impl Hash for QuantizedState {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        // Fold the quantized cells so that states in the same cell vector
        // always land in the same bucket.
        let mut seed: u64 = 0;
        for cell in self.cells() {
            let elem = cell as i64 as u64;
            seed ^= elem
                .wrapping_add(0x9e37_79b9)
                .wrapping_add(seed << 6)
                .wrapping_add(seed >> 2);
        }
        hasher.write_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn state(components: &[f64]) -> StateVec {
        DVector::from_row_slice(components)
    }

    fn hash_of(key: &QuantizedState) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_positions_within() {
        let a = state(&[0.0, 0.0, 5.0, 5.0]);
        let b = state(&[0.3, 0.4, -5.0, -5.0]);
        // position distance is 0.5; velocities must not matter
        assert!(positions_within(&a, &b, 2, 0.51));
        assert!(!positions_within(&a, &b, 2, 0.5));
    }

    #[test]
    fn test_quantized_equality_collapses_drift() {
        let a = QuantizedState::new(state(&[1.0, 2.0, 0.5, 0.5]));
        let b = QuantizedState::new(state(&[1.001, 2.004, 0.501, 0.509]));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_quantized_equality_separates_cells() {
        let a = QuantizedState::new(state(&[1.0, 2.0]));
        let b = QuantizedState::new(state(&[1.0, 2.01]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_dimension_mismatch_is_never_equal() {
        let a = QuantizedState::new(state(&[1.0, 2.0]));
        let b = QuantizedState::new(state(&[1.0, 2.0, 0.0]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_negative_components_truncate_toward_zero() {
        // -0.004 and 0.004 both quantize to cell 0
        let a = QuantizedState::new(state(&[-0.004]));
        let b = QuantizedState::new(state(&[0.004]));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_random_drift_within_cell() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let base: Vec<f64> = (0..4).map(|_| rng.gen_range(0.0..10.0)).collect();
            // drift small enough to stay in the same cell for interior points
            let drifted: Vec<f64> = base
                .iter()
                .map(|&x| ((x * QUANT_SCALE) as i32) as f64 / QUANT_SCALE + 0.004)
                .collect();
            let a = QuantizedState::new(state(&base));
            let b = QuantizedState::new(state(&drifted));
            assert_eq!(a, b);
            assert_eq!(hash_of(&a), hash_of(&b));
        }
    }
}
