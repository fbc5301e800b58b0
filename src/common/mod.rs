//! Common types and error definitions for lattice_planner
//!
//! This module provides the foundational building blocks shared by the
//! primitive graph and the search core.

pub mod error;
pub mod state;

pub use error::*;
pub use state::*;
