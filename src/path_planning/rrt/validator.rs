//! Candidate node validation: play area bounds and obstacle collision

use crate::common::{AreaBounds, CircleObstacle};
use super::node::RRTNode;

/// True when no play area is configured or the node lies inside it (inclusive).
pub fn is_inside_play_area(node: &RRTNode, play_area: Option<&AreaBounds>) -> bool {
    match play_area {
        Some(area) => area.contains(&node.position),
        None => true,
    }
}

/// True when every point of the node's connecting path stays strictly
/// outside every obstacle.
///
/// A missing node is reported as colliding. A node with an empty path has
/// nothing to check and passes.
pub fn is_collision_free(node: Option<&RRTNode>, obstacles: &[CircleObstacle]) -> bool {
    let node = match node {
        Some(node) => node,
        None => return false,
    };

    obstacles.iter().all(|obstacle| {
        node.path.iter().all(|point| !obstacle.collides_with(point))
    })
}

/// Both checks combined, as required before inserting into the tree
pub fn is_valid(node: &RRTNode, obstacles: &[CircleObstacle], play_area: Option<&AreaBounds>) -> bool {
    is_inside_play_area(node, play_area) && is_collision_free(Some(node), obstacles)
}
