//! Error types for rrt_planning

use std::fmt;

/// Main error type for the planner
#[derive(Debug)]
pub enum PlannerError {
    /// Invalid configuration, reported at construction
    InvalidParameter(String),
    /// No path could be found (trait adapters only)
    PlanningError(String),
    /// Visualization error
    VisualizationError(String),
    /// I/O error
    IoError(std::io::Error),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::PlanningError(msg) => write!(f, "Planning error: {}", msg),
            PlannerError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
            PlannerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
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

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
