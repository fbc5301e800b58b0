pub mod collision;
pub mod common;
pub mod graph;
pub mod heuristic;
pub mod search;

// Re-exports for convenience
pub use collision::{CollisionChecker, FreeSpace, PointObstacleMap};
pub use common::error::{PlannerError, PlannerResult};
pub use common::state::{positions_within, QuantizedState, StateVec};
pub use graph::{GraphParams, MotionPrimitive, PrimitiveGraph};
pub use heuristic::{EuclideanHeuristic, Heuristic, ZeroHeuristic};
pub use search::{GraphSearch, Node};
