//! RRT tree storage
//!
//! Nodes live in one insertion-ordered `Vec` and refer to their parent by
//! index. A parent index always points to an earlier slot, so following
//! parents can only move towards the root.

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::common::{Path2D, Point2D};

/// Node of the RRT tree
#[derive(Debug, Clone, PartialEq)]
pub struct RRTNode {
    /// Node position
    pub position: Point2D,
    /// Discretized edge from the parent to this node, used for collision checking
    pub path: Vec<Point2D>,
    /// Index of the parent node, `None` for the root
    pub parent: Option<usize>,
}

impl RRTNode {
    pub fn new(position: Point2D) -> Self {
        RRTNode {
            position,
            path: Vec::new(),
            parent: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Rooted tree grown by the planner
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<RRTNode>,
}

impl Tree {
    /// Create a tree holding only the root
    pub fn new(root: Point2D) -> Self {
        Tree {
            nodes: vec![RRTNode::new(root)],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, the root is inserted at construction
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[RRTNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&RRTNode> {
        self.nodes.get(index)
    }

    pub fn root(&self) -> &RRTNode {
        &self.nodes[0]
    }

    /// Most recently inserted node
    pub fn last(&self) -> &RRTNode {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn last_index(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Append a node whose parent is already in the tree, returning its index.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent or the parent index is not yet present.
    pub(crate) fn push(&mut self, node: RRTNode) -> usize {
        match node.parent {
            Some(parent) if parent < self.nodes.len() => {}
            other => panic!(
                "node parent {:?} is not an existing node (tree size {})",
                other,
                self.nodes.len()
            ),
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Index of the node closest to `point` by squared Euclidean distance.
    ///
    /// Ties resolve to the earliest inserted node.
    pub fn nearest_index(&self, point: &Point2D) -> usize {
        self.nodes
            .iter()
            .position_min_by_key(|node| OrderedFloat(node.position.distance_squared(point)))
            .unwrap_or(0)
    }

    /// Indices from `index` up to and including the root
    pub fn ancestors(&self, index: usize) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.get(index).map(|_| index),
        }
    }

    /// Build the start -> goal path through `index`.
    ///
    /// The goal is prepended before walking parents, then the sequence is
    /// reversed so it begins at the root.
    pub fn extract_path(&self, index: usize, goal: Point2D) -> Path2D {
        let mut points = vec![goal];
        points.extend(self.ancestors(index).map(|i| self.nodes[i].position));
        points.reverse();
        Path2D::from_points(points)
    }
}

/// Iterator over parent links, see [`Tree::ancestors`]
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = self.tree.nodes[current].parent;
        Some(current)
    }
}
