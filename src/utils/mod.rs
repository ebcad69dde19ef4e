//! Utility modules for rrt_planning

pub mod visualization;

pub use visualization::{Visualizer, PathStyle, PointStyle, colors};
