//! Search node and priority-queue ordering

use std::cmp::Ordering;

use crate::common::state::StateVec;

/// Transient record for one lattice state reached during search
#[derive(Debug, Clone)]
pub struct Node {
    /// Row into the graph's vertex table
    pub state_index: usize,
    /// Absolute state after translation
    pub state: StateVec,
    /// Accumulated edge cost from the start
    pub motion_cost: f64,
    /// Heuristic estimate at `state`
    pub heuristic_cost: f64,
}

impl Node {
    pub fn total_cost(&self) -> f64 {
        self.motion_cost + self.heuristic_cost
    }
}

/// Open-list adapter: `BinaryHeap` is a max-heap, so comparisons are
/// reversed to pop the lowest total cost first.
#[derive(Debug, Clone)]
pub(crate) struct OpenListEntry(pub Node);

impl PartialEq for OpenListEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cost() == other.0.total_cost()
    }
}

impl Eq for OpenListEntry {}

impl Ord for OpenListEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .total_cost()
            .partial_cmp(&self.0.total_cost())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for OpenListEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;
    use std::collections::BinaryHeap;

    fn node(motion_cost: f64, heuristic_cost: f64) -> Node {
        Node {
            state_index: 0,
            state: DVector::from_row_slice(&[0.0, 0.0]),
            motion_cost,
            heuristic_cost,
        }
    }

    #[test]
    fn test_total_cost() {
        assert_eq!(node(1.5, 2.0).total_cost(), 3.5);
    }

    #[test]
    fn test_heap_pops_lowest_total_cost() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenListEntry(node(3.0, 0.0)));
        heap.push(OpenListEntry(node(1.0, 0.5)));
        heap.push(OpenListEntry(node(2.0, 0.0)));

        assert_eq!(heap.pop().unwrap().0.total_cost(), 1.5);
        assert_eq!(heap.pop().unwrap().0.total_cost(), 2.0);
        assert_eq!(heap.pop().unwrap().0.total_cost(), 3.0);
    }
}
