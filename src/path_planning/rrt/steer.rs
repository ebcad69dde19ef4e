//! Bounded steering between a tree node and a target point

use nalgebra::Vector2;

use crate::common::Point2D;
use super::node::RRTNode;

/// Advance from `from` toward `to` by whole steps of `path_resolution`,
/// covering at most `extend_length`.
///
/// Every step is recorded in the new node's `path`, which starts at `from`.
/// When the gap left after the last step is within one `path_resolution`
/// the node snaps exactly onto `to`, so the final position may lie up to one
/// step beyond `extend_length`. The returned node carries
/// `parent = Some(from_index)`.
pub fn steer(
    from: &RRTNode,
    from_index: usize,
    to: &Point2D,
    extend_length: f64,
    path_resolution: f64,
) -> RRTNode {
    let (d, theta) = from.position.distance_and_angle(to);

    let mut position = from.position.to_vector();
    let mut path = vec![from.position];

    let extend = extend_length.min(d);
    let n_expand = (extend / path_resolution).floor() as usize;
    let step = Vector2::new(theta.cos(), theta.sin()) * path_resolution;

    for _ in 0..n_expand {
        position += step;
        path.push(Point2D::from(position));
    }

    let mut position = Point2D::from(position);
    let (remaining, _) = position.distance_and_angle(to);
    if remaining <= path_resolution {
        path.push(*to);
        position = *to;
    }

    RRTNode {
        position,
        path,
        parent: Some(from_index),
    }
}
