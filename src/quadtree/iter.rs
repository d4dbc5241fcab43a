use super::node::{Children, Node, NodeId};
use super::Quadtree;
use crate::Point;
use std::slice;

/// Read-only view of a single node.
#[derive(Debug)]
pub struct NodeRef<'a, V> {
    id: NodeId,
    node: &'a Node<V>,
}

// derive would require V: Clone
impl<'a, V> Clone for NodeRef<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for NodeRef<'a, V> {}

impl<'a, V> NodeRef<'a, V> {
    pub(crate) fn new(id: NodeId, node: &'a Node<V>) -> Self {
        Self { id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The root is at depth 0
    pub fn depth(&self) -> u32 {
        self.node.depth
    }

    pub fn center(&self) -> Point {
        self.node.center
    }

    pub fn half_extent(&self) -> Point {
        self.node.half_extent
    }

    /// Inclusive lower corner of the node's box
    pub fn bottom_left(&self) -> Point {
        self.node.min
    }

    /// Exclusive upper corner of the node's box
    pub fn top_right(&self) -> Point {
        self.node.max
    }

    pub fn is_leaf(&self) -> bool {
        self.node.leaf
    }

    /// Always empty on stem nodes
    pub fn bucket(&self) -> &'a [(Point, V)] {
        &self.node.bucket
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.node.parent
    }

    /// Children indexed by quadrant code, absent ones were never needed by an insertion
    pub fn children(&self) -> [Option<NodeId>; 4] {
        self.node.children
    }

    pub fn present_children(&self) -> Children {
        self.node.present_children()
    }
}

/// Pre-order iterator over the nodes of a subtree. Children are visited in quadrant order.
#[derive(Debug)]
pub struct Nodes<'a, V> {
    tree: &'a Quadtree<V>,
    stack: Vec<NodeId>,
}

impl<'a, V> Nodes<'a, V> {
    pub(crate) fn new(tree: &'a Quadtree<V>, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a, V> Iterator for Nodes<'a, V> {
    type Item = NodeRef<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.stack
            .extend(node.children.iter().rev().filter_map(|c| *c));
        Some(NodeRef::new(id, node))
    }
}

/// Iterator over every entry of the tree, in node pre-order.
#[derive(Debug)]
pub struct Iter<'a, V> {
    nodes: Nodes<'a, V>,
    bucket: slice::Iter<'a, (Point, V)>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(tree: &'a Quadtree<V>) -> Self {
        Self {
            nodes: Nodes::new(tree, NodeId::ROOT),
            bucket: <&[(Point, V)]>::default().iter(),
            remaining: tree.len(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Point, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((p, v)) = self.bucket.next() {
                self.remaining -= 1;
                return Some((*p, v));
            }
            self.bucket = self.nodes.next()?.bucket().iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

impl<'a, V> IntoIterator for &'a Quadtree<V> {
    type Item = (Point, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
