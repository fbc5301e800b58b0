//! Motion-primitive lattice: primitive records, the graph, and JSON loading

mod loader;
pub mod motion_primitive;
pub mod primitive_graph;

pub use motion_primitive::MotionPrimitive;
pub use primitive_graph::{GraphParams, PrimitiveGraph};
