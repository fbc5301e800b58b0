//! A*-style best-first search over motion-primitive lattices

pub mod graph_search;
pub mod node;
pub mod visited;

pub use graph_search::{GraphSearch, TIMING_EXPAND, TIMING_POP, TIMING_PUSH};
pub use node::Node;
pub use visited::{HistoryEntry, PathHistory, VisitedSet};
