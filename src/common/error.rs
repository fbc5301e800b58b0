//! Error types for lattice_planner

use std::fmt;

/// Main error type for graph construction and loading
#[derive(Debug)]
pub enum PlannerError {
    /// Graph JSON could not be parsed
    ParseError(serde_json::Error),
    /// Graph structure is inconsistent (shape mismatch, bad index, negative cost)
    MalformedGraph(String),
    /// Invalid parameter
    InvalidParameter(String),
    /// I/O error
    IoError(std::io::Error),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::ParseError(e) => write!(f, "Parse error: {}", e),
            PlannerError::MalformedGraph(msg) => write!(f, "Malformed graph: {}", msg),
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::ParseError(e) => Some(e),
            PlannerError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(e: std::io::Error) -> Self {
        PlannerError::IoError(e)
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::ParseError(e)
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
