//! RRT (Rapidly-exploring Random Tree) path planning algorithm
//!
//! Sampling-based path planning algorithm that grows a tree of
//! collision-free edges from the start until the goal can be connected.
//! The space is 2D with circular obstacles and an optional rectangular
//! play area.

pub mod node;
pub mod sampler;
pub mod steer;
pub mod validator;
pub mod planner;

pub use node::{Ancestors, RRTNode, Tree};
pub use sampler::Sampler;
pub use steer::steer;
pub use validator::{is_collision_free, is_inside_play_area, is_valid};
pub use planner::{RRTConfig, RRTPlanner};
