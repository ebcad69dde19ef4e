//! rrt_planning - Rapidly-exploring Random Tree path planning in Rust
//!
//! This crate provides a 2D RRT planner with circular obstacles, goal-biased
//! sampling and an optional play area, plus gnuplot helpers to render the
//! grown tree and the resulting path.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Point2D, Path2D, CircleObstacle, AreaBounds, RandArea};
pub use common::{PathPlanner, SamplingBasedPlanner, PlanningObserver, Visualizable};
pub use common::{PlannerError, PlannerResult};
pub use path_planning::rrt::{RRTConfig, RRTPlanner, Tree};
