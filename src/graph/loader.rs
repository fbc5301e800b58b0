//! JSON ingestion for primitive graphs
//!
//! The on-disk format is one JSON document holding the lattice parameters,
//! the vertex matrix, the edge table (negative entry = no edge) and the
//! primitive bank. Parsing goes through serde mirror structs and all
//! structural validation is delegated to [`PrimitiveGraph::new`].

use std::fs;
use std::path::Path;

use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

use crate::common::error::{PlannerError, PlannerResult};

use super::motion_primitive::MotionPrimitive;
use super::primitive_graph::{GraphParams, PrimitiveGraph};

#[derive(Debug, Deserialize)]
struct GraphJson {
    dispersion: f64,
    rho: f64,
    spatial_dim: usize,
    control_space_dim: usize,
    state_dim: usize,
    max_state: Vec<f64>,
    tiling: bool,
    num_tiles: usize,
    vertices: Vec<Vec<f64>>,
    edges: Vec<Vec<i32>>,
    mps: Vec<PrimitiveJson>,
}

#[derive(Debug, Deserialize)]
struct PrimitiveJson {
    start_state: Vec<f64>,
    end_state: Vec<f64>,
    cost: f64,
    traj_time: f64,
    #[serde(default)]
    poly_coeffs: Vec<Vec<f64>>,
    spatial_dim: usize,
}

fn matrix_from_rows<T: nalgebra::Scalar + Copy>(
    rows: &[Vec<T>],
    what: &str,
) -> PlannerResult<DMatrix<T>> {
    let nrows = rows.len();
    let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(PlannerError::MalformedGraph(format!(
            "{} rows have inconsistent lengths",
            what
        )));
    }
    Ok(DMatrix::from_fn(nrows, ncols, |i, j| rows[i][j]))
}

impl TryFrom<GraphJson> for PrimitiveGraph {
    type Error = PlannerError;

    fn try_from(data: GraphJson) -> PlannerResult<Self> {
        if data.state_dim != data.spatial_dim * data.control_space_dim {
            return Err(PlannerError::MalformedGraph(format!(
                "state_dim {} does not equal spatial_dim {} x control_space_dim {}",
                data.state_dim, data.spatial_dim, data.control_space_dim
            )));
        }

        let vertices = matrix_from_rows(&data.vertices, "vertex")?;
        let edges = matrix_from_rows(&data.edges, "edge")?;

        let mut mps = Vec::with_capacity(data.mps.len());
        for (index, mp) in data.mps.into_iter().enumerate() {
            if mp.start_state.len() != mp.end_state.len() {
                return Err(PlannerError::MalformedGraph(format!(
                    "primitive {} endpoint states have lengths {} and {}",
                    index,
                    mp.start_state.len(),
                    mp.end_state.len()
                )));
            }
            let poly_coeffs = matrix_from_rows(&mp.poly_coeffs, "poly_coeffs")?;
            mps.push(MotionPrimitive::new(
                mp.spatial_dim,
                DVector::from_vec(mp.start_state),
                DVector::from_vec(mp.end_state),
                mp.cost,
                mp.traj_time,
                poly_coeffs,
            ));
        }

        let params = GraphParams {
            dispersion: data.dispersion,
            rho: data.rho,
            spatial_dim: data.spatial_dim,
            control_space_dim: data.control_space_dim,
            max_state: DVector::from_vec(data.max_state),
            num_tiles: data.num_tiles,
            tiling: data.tiling,
        };
        PrimitiveGraph::new(params, vertices, edges, mps)
    }
}

impl PrimitiveGraph {
    /// Parse a graph from its JSON document.
    pub fn from_json_str(json: &str) -> PlannerResult<Self> {
        let data: GraphJson = serde_json::from_str(json)?;
        data.try_into()
    }

    /// Read and parse a graph JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_EDGE_GRAPH: &str = r#"{
        "dispersion": 0.5,
        "rho": 1.0,
        "spatial_dim": 2,
        "control_space_dim": 2,
        "state_dim": 4,
        "max_state": [10.0, 10.0, 5.0, 5.0],
        "tiling": false,
        "num_tiles": 1,
        "vertices": [
            [0.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0]
        ],
        "edges": [
            [-1, -1],
            [0, -1]
        ],
        "mps": [
            {
                "start_state": [0.0, 0.0, 0.0, 0.0],
                "end_state": [1.0, 0.0, 0.0, 0.0],
                "cost": 1.0,
                "traj_time": 1.0,
                "poly_coeffs": [[1.0, 0.0], [0.0, 0.0]],
                "spatial_dim": 2
            }
        ]
    }"#;

    #[test]
    fn test_loads_one_edge_graph() {
        let graph = PrimitiveGraph::from_json_str(ONE_EDGE_GRAPH).unwrap();
        assert_eq!(graph.num_vertices(), 2);
        assert_eq!(graph.edges_rows(), 2);
        assert_eq!(graph.edges_cols(), 2);
        assert_eq!(graph.num_primitives(), 1);
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.spatial_dim(), 2);
        assert!(!graph.tiling());

        let mp = graph.mp_between(0, 1);
        assert_eq!(mp.cost(), 1.0);
        assert_eq!(mp.end_state()[0], 1.0);
    }

    #[test]
    fn test_rejects_truncated_json() {
        let result = PrimitiveGraph::from_json_str("{ \"dispersion\": 0.5");
        assert!(matches!(result, Err(PlannerError::ParseError(_))));
    }

    #[test]
    fn test_rejects_inconsistent_state_dim() {
        let json = ONE_EDGE_GRAPH.replace("\"state_dim\": 4", "\"state_dim\": 6");
        let result = PrimitiveGraph::from_json_str(&json);
        assert!(matches!(result, Err(PlannerError::MalformedGraph(_))));
    }

    #[test]
    fn test_rejects_ragged_vertices() {
        let json = ONE_EDGE_GRAPH.replace("[1.0, 0.0, 0.0, 0.0]", "[1.0, 0.0]");
        let result = PrimitiveGraph::from_json_str(&json);
        assert!(matches!(result, Err(PlannerError::MalformedGraph(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PrimitiveGraph::from_json_file("/nonexistent/graph.json");
        assert!(matches!(result, Err(PlannerError::IoError(_))));
    }
}
