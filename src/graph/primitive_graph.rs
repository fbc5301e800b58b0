//! Translation-invariant lattice of states and motion primitives

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::common::error::{PlannerError, PlannerResult};
use crate::common::state::StateVec;

use super::motion_primitive::MotionPrimitive;

/// Immutable lattice graph: vertex states, an edge table, and the bank of
/// motion primitives realizing each edge.
///
/// `edges` has shape `(V, V_norm)`; entry `(i, j) >= 0` names the primitive
/// connecting normalized source column `j` to vertex `i`, a negative entry
/// means no edge. When the lattice tiles under translation, `V_norm =
/// V / num_tiles` and outgoing edges of any vertex are found by normalizing
/// its index; otherwise `V_norm = V`.
#[derive(Debug, Clone)]
pub struct PrimitiveGraph {
    vertices: DMatrix<f64>,
    edges: DMatrix<i32>,
    mps: Vec<MotionPrimitive>,
    max_state: DVector<f64>,
    dispersion: f64,
    rho: f64,
    spatial_dim: usize,
    control_space_dim: usize,
    state_dim: usize,
    num_tiles: usize,
    tiling: bool,
}

/// Lattice parameters carried alongside the graph structure
#[derive(Debug, Clone)]
pub struct GraphParams {
    pub dispersion: f64,
    pub rho: f64,
    pub spatial_dim: usize,
    pub control_space_dim: usize,
    pub max_state: DVector<f64>,
    pub num_tiles: usize,
    pub tiling: bool,
}

impl PrimitiveGraph {
    /// Build a graph from its parts, validating shapes and indices.
    pub fn new(
        params: GraphParams,
        vertices: DMatrix<f64>,
        edges: DMatrix<i32>,
        mps: Vec<MotionPrimitive>,
    ) -> PlannerResult<Self> {
        let state_dim = params.spatial_dim * params.control_space_dim;
        if params.spatial_dim == 0 || params.control_space_dim == 0 {
            return Err(PlannerError::InvalidParameter(
                "spatial_dim and control_space_dim must be positive".to_string(),
            ));
        }
        if params.num_tiles == 0 {
            return Err(PlannerError::InvalidParameter(
                "num_tiles must be positive".to_string(),
            ));
        }
        if params.max_state.len() != state_dim {
            return Err(PlannerError::MalformedGraph(format!(
                "max_state has length {}, expected {}",
                params.max_state.len(),
                state_dim
            )));
        }

        let num_vertices = vertices.nrows();
        if num_vertices == 0 {
            return Err(PlannerError::MalformedGraph(
                "graph has no vertices".to_string(),
            ));
        }
        if vertices.ncols() != state_dim {
            return Err(PlannerError::MalformedGraph(format!(
                "vertex rows have length {}, expected state_dim {}",
                vertices.ncols(),
                state_dim
            )));
        }

        let norm_vertices = if params.tiling {
            if num_vertices % params.num_tiles != 0 {
                return Err(PlannerError::MalformedGraph(format!(
                    "{} vertices do not tile into {} tiles",
                    num_vertices, params.num_tiles
                )));
            }
            num_vertices / params.num_tiles
        } else {
            num_vertices
        };
        if edges.nrows() != num_vertices || edges.ncols() != norm_vertices {
            return Err(PlannerError::MalformedGraph(format!(
                "edge table is {}x{}, expected {}x{}",
                edges.nrows(),
                edges.ncols(),
                num_vertices,
                norm_vertices
            )));
        }

        for entry in edges.iter() {
            if *entry >= 0 && *entry as usize >= mps.len() {
                return Err(PlannerError::MalformedGraph(format!(
                    "edge references primitive {} but only {} are loaded",
                    entry,
                    mps.len()
                )));
            }
        }
        for (index, mp) in mps.iter().enumerate() {
            if mp.start_state().len() != state_dim || mp.end_state().len() != state_dim {
                return Err(PlannerError::MalformedGraph(format!(
                    "primitive {} has endpoint dimension {}, expected {}",
                    index,
                    mp.start_state().len(),
                    state_dim
                )));
            }
            if mp.cost() < 0.0 || mp.traj_time() < 0.0 {
                return Err(PlannerError::MalformedGraph(format!(
                    "primitive {} has negative cost or duration",
                    index
                )));
            }
            let coeff_rows = mp.poly_coeffs().nrows();
            if coeff_rows != 0 && coeff_rows != params.spatial_dim {
                return Err(PlannerError::MalformedGraph(format!(
                    "primitive {} has {} polynomial rows, expected {}",
                    index, coeff_rows, params.spatial_dim
                )));
            }
        }

        Ok(Self {
            vertices,
            edges,
            mps,
            max_state: params.max_state,
            dispersion: params.dispersion,
            rho: params.rho,
            spatial_dim: params.spatial_dim,
            control_space_dim: params.control_space_dim,
            state_dim,
            num_tiles: params.num_tiles,
            tiling: params.tiling,
        })
    }

    pub fn edges_rows(&self) -> usize {
        self.edges.nrows()
    }

    pub fn edges_cols(&self) -> usize {
        self.edges.ncols()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.nrows()
    }

    pub fn num_primitives(&self) -> usize {
        self.mps.len()
    }

    /// Number of present edges (non-negative entries)
    pub fn num_edges(&self) -> usize {
        self.edges.iter().filter(|&&e| e >= 0).count()
    }

    pub fn spatial_dim(&self) -> usize {
        self.spatial_dim
    }

    pub fn control_space_dim(&self) -> usize {
        self.control_space_dim
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn dispersion(&self) -> f64 {
        self.dispersion
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn max_state(&self) -> &DVector<f64> {
        &self.max_state
    }

    pub fn tiling(&self) -> bool {
        self.tiling
    }

    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    /// Lattice state of vertex `index` as an owned vector
    pub fn vertex_state(&self, index: usize) -> StateVec {
        self.vertices.row(index).transpose()
    }

    /// Map a state index to its canonical edge-table column.
    pub fn norm_index(&self, state_index: usize) -> usize {
        if self.tiling {
            state_index % self.edges.ncols()
        } else {
            state_index
        }
    }

    /// Raw edge-table entry; negative means no edge.
    pub fn edge_index(&self, to_row: usize, from_col_norm: usize) -> i32 {
        self.edges[(to_row, from_col_norm)]
    }

    /// Clone of the primitive connecting normalized column `from_col_norm`
    /// to vertex `to_row`. Callers must guard with
    /// [`edge_index`](Self::edge_index); the entry must be non-negative.
    pub fn mp_between_indices(&self, to_row: usize, from_col_norm: usize) -> MotionPrimitive {
        let index = self.edges[(to_row, from_col_norm)];
        debug_assert!(
            index >= 0,
            "no edge from column {} to vertex {}",
            from_col_norm,
            to_row
        );
        self.mps[index as usize].clone()
    }

    /// Convenience lookup that normalizes `from_index` first.
    pub fn mp_between(&self, from_index: usize, to_index: usize) -> MotionPrimitive {
        self.mp_between_indices(to_index, self.norm_index(from_index))
    }
}

impl fmt::Display for PrimitiveGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "primitive graph: {} vertices, {}x{} edge table ({} edges), {} primitives, dispersion {:.3}",
            self.num_vertices(),
            self.edges_rows(),
            self.edges_cols(),
            self.num_edges(),
            self.num_primitives(),
            self.dispersion
        )
    }
}
