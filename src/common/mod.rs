//! Common types, traits, and error definitions for rrt_planning
//!
//! This module provides the foundational building blocks shared by the
//! planner core and the visualization utilities.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
