//! Bucket point Quadtree.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Every stem exclusively owns its
//! children, the parent link is only followed upwards when merging after a removal.
//!
mod enclosure;
mod iter;
mod node;

pub use enclosure::Enclosure;
pub use iter::{Iter, NodeRef, Nodes};
pub use node::{Children, NodeId, BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};

use crate::{Config, Error, Point};
use node::Node;
use std::fmt;
use std::iter::FromIterator;
use std::mem;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct Quadtree<V> {
    nodes: Vec<Node<V>>,
    // vacant slots of `nodes`, reused before growing the arena
    free: Vec<NodeId>,
    config: Config,
    len: usize,
}

impl<V> Default for Quadtree<V> {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl<V> Quadtree<V> {
    /// Empty tree covering `[center - half_extent, center + half_extent)` with the default
    /// bucket capacity and depth.
    pub fn new(center: Point, half_extent: Point) -> Self {
        Self::with_config(Config::new(center, half_extent))
    }

    /// Degenerate parameters are clamped, see [`Config::normalized`].
    pub fn with_config(config: Config) -> Self {
        let config = config.normalized();
        Self {
            nodes: vec![Node::root(config.center, config.half_extent)],
            free: Vec::new(),
            config,
            len: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return [min, max) of the bounds of this tree
    pub fn bounds(&self) -> (Point, Point) {
        let root = self.root();
        (root.min, root.max)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry and every node but the root.
    pub fn clear(&mut self) {
        debug!(
            "clearing {} entries held by {} nodes",
            self.len,
            self.nodes.len() - self.free.len()
        );
        self.nodes.truncate(1);
        self.nodes[0] = Node::root(self.config.center, self.config.half_extent);
        self.free.clear();
        self.len = 0;
    }

    /// Build a tree holding `it`, sized to the minimal bounding box of the input.
    /// Duplicate points after the first occurrence are skipped.
    pub fn from_iterator<It>(it: It) -> Self
    where
        It: IntoIterator<Item = (Point, V)>,
    {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        let values = it
            .into_iter()
            .map(|(p, v)| {
                for axis in 0..2 {
                    min[axis] = min[axis].min(p[axis]);
                    max[axis] = max[axis].max(p[axis]);
                }
                (p, v)
            })
            .collect::<Vec<_>>();
        if values.is_empty() {
            return Self::default();
        }

        // calculate the minimum bounding box to speed up queries by having a more balanced tree
        let mut center = Point::default();
        let mut half_extent = Point::default();
        for axis in 0..2 {
            // the box is half-open, pad it so the maximum lands inside
            let slack = 1e-9 * (1.0 + min[axis].abs().max(max[axis].abs()));
            center.0[axis] = (min[axis] + max[axis]) / 2.0;
            half_extent.0[axis] = (max[axis] - min[axis]) / 2.0 + slack;
        }
        let mut tree = Self::new(center, half_extent);
        tree.extend(values);
        tree
    }

    /// Insert every item, skipping the ones [`Quadtree::insert`] rejects.
    /// Return the number of inserted items.
    pub fn extend<It>(&mut self, it: It) -> usize
    where
        It: IntoIterator<Item = (Point, V)>,
    {
        let mut inserted = 0;
        for (p, v) in it {
            match self.insert(p, v) {
                Ok(_) => inserted += 1,
                Err(err) => trace!("extend skipped an item: {}", err),
            }
        }
        inserted
    }

    /// Return whether point is within the bounds of the tree
    pub fn intersects(&self, point: &Point) -> bool {
        self.root().contains(point)
    }

    /// Insert a new entry. Return the leaf that holds it.
    ///
    /// Full leaves split into four quadrants, unless they already sit at `max_depth`: there the
    /// bucket keeps growing past its capacity, the depth bound wins over the capacity bound.
    pub fn insert(&mut self, point: Point, value: V) -> Result<NodeId, Error> {
        if !self.intersects(&point) {
            return Err(Error::OutOfBounds(point));
        }
        if self.contains(&point) {
            return Err(Error::Duplicate(point));
        }
        let id = self.insert_at(NodeId::ROOT, point, value);
        self.len += 1;
        Ok(id)
    }

    /// Replace the value at `point`, or insert it if absent.
    /// Return the previous value, if any.
    pub fn update(&mut self, point: Point, value: V) -> Result<Option<V>, Error> {
        if !self.intersects(&point) {
            return Err(Error::OutOfBounds(point));
        }
        if let Some(slot) = self.get_mut(&point) {
            return Ok(Some(mem::replace(slot, value)));
        }
        self.insert_at(NodeId::ROOT, point, value);
        self.len += 1;
        Ok(None)
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.get(point).is_some()
    }

    pub fn get(&self, point: &Point) -> Option<&V> {
        let leaf = self.find_leaf(point)?;
        self.node(leaf).get(point, self.config.sorted)
    }

    pub fn get_mut(&mut self, point: &Point) -> Option<&mut V> {
        let leaf = self.find_leaf(point)?;
        let sorted = self.config.sorted;
        self.node_mut(leaf).get_mut(point, sorted)
    }

    /// Remove the entry at `point` and collapse the ancestors that became small enough.
    pub fn remove(&mut self, point: &Point) -> Option<V> {
        let leaf = self.find_leaf(point)?;
        let sorted = self.config.sorted;
        let node = self.node_mut(leaf);
        let ind = node.position(point, sorted).ok()?;
        let (_, value) = node.bucket.remove(ind);
        self.len -= 1;

        let mut current = self.node(leaf).parent;
        while let Some(id) = current {
            if !self.try_merge(id) {
                break;
            }
            current = self.node(id).parent;
        }
        Some(value)
    }

    /// Collect every entry inside `[bottom_left, top_right)`.
    pub fn region_query(&self, bottom_left: &Point, top_right: &Point) -> Vec<(Point, &V)> {
        let mut out = Vec::new();
        self.region_query_into(bottom_left, top_right, &mut out);
        out
    }

    /// Append every entry inside `[bottom_left, top_right)` to `out`.
    pub fn region_query_into<'a>(
        &'a self,
        bottom_left: &Point,
        top_right: &Point,
        out: &mut Vec<(Point, &'a V)>,
    ) {
        self.visit_region(bottom_left, top_right, |p, v| out.push((*p, v)));
    }

    pub fn count_in_region(&self, bottom_left: &Point, top_right: &Point) -> usize {
        let mut count = 0;
        self.visit_region(bottom_left, top_right, |_, _| count += 1);
        count
    }

    /// Every entry of the tree, gathered by a region query over the tree's own bounds.
    pub fn extract_all(&self) -> Vec<(Point, &V)> {
        let (min, max) = self.bounds();
        self.region_query(&min, &max)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Pre-order traversal of every node, stems included
    pub fn nodes(&self) -> Nodes<'_, V> {
        Nodes::new(self, NodeId::ROOT)
    }

    /// Look up a node by handle. `None` if the handle has been released by a merge.
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_, V>> {
        self.nodes
            .get(id.index())
            .filter(|n| !n.vacant)
            .map(|n| NodeRef::new(id, n))
    }

    /// Bucket of the node `id`, typically the handle returned by [`Quadtree::insert`].
    pub fn bucket(&self, id: NodeId) -> Option<&[(Point, V)]> {
        self.node_ref(id).map(|n| n.bucket())
    }

    /// Depth of the deepest node
    pub fn depth(&self) -> u32 {
        self.nodes().map(|n| n.depth()).max().unwrap_or(0)
    }

    /// Human readable structure of the tree, for debugging.
    pub fn dump(&self) -> Dump<'_, V> {
        Dump(self)
    }

    fn root(&self) -> &Node<V> {
        &self.nodes[0]
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.index()]
    }

    /// Descend to the leaf whose box holds `point`.
    /// `None` if the point is out of bounds or its quadrant was never realized.
    fn find_leaf(&self, point: &Point) -> Option<NodeId> {
        if !self.intersects(point) {
            return None;
        }
        let mut id = NodeId::ROOT;
        loop {
            let node = self.node(id);
            if node.leaf {
                return Some(id);
            }
            id = node.children[node.quadrant(point)]?;
        }
    }

    /// Insert below `id` without bounds or duplicate checks. Return the owning leaf.
    fn insert_at(&mut self, mut id: NodeId, point: Point, value: V) -> NodeId {
        loop {
            let node = self.node(id);
            if !node.leaf {
                id = self.child_for(id, &point);
                continue;
            }
            if node.bucket.len() < self.config.bucket_capacity
                || node.depth >= self.config.max_depth
            {
                let sorted = self.config.sorted;
                self.node_mut(id).push_entry(point, value, sorted);
                return id;
            }
            return self.split(id, point, value);
        }
    }

    /// Turn the full leaf `id` into a stem and push its entries, and the new one, down a level.
    fn split(&mut self, id: NodeId, point: Point, value: V) -> NodeId {
        let entries = {
            let node = self.node_mut(id);
            node.leaf = false;
            mem::take(&mut node.bucket)
        };
        trace!(
            "splitting node {} at depth {} with {} entries",
            id,
            self.node(id).depth,
            entries.len() + 1
        );
        for (p, v) in entries {
            self.insert_at(id, p, v);
        }
        // the new entry goes last, so no later split can move it away from the returned leaf
        self.insert_at(id, point, value)
    }

    /// Return the child of `id` covering `point`, creating it if needed.
    fn child_for(&mut self, id: NodeId, point: &Point) -> NodeId {
        let node = self.node(id);
        let quadrant = node.quadrant(point);
        if let Some(child) = node.children[quadrant] {
            return child;
        }
        let child = node.child(id, quadrant);
        let child_id = self.alloc(child);
        self.node_mut(id).children[quadrant] = Some(child_id);
        child_id
    }

    fn alloc(&mut self, node: Node<V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                *self.node_mut(id) = node;
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(node);
                id
            }
        }
    }

    /// Release a leaf and return its entries.
    fn release(&mut self, id: NodeId) -> Vec<(Point, V)> {
        debug_assert!(self.node(id).leaf);
        self.free.push(id);
        let node = self.node_mut(id);
        node.vacant = true;
        node.parent = None;
        mem::take(&mut node.bucket)
    }

    /// Collapse stem `id` into a leaf if its children are all leaves holding at most
    /// `bucket_capacity` entries in total. Return whether it was collapsed.
    fn try_merge(&mut self, id: NodeId) -> bool {
        let children = self.node(id).present_children();
        let mut total = 0;
        for child in children.iter() {
            let child = self.node(*child);
            if !child.leaf {
                return false;
            }
            total += child.bucket.len();
        }
        if total > self.config.bucket_capacity {
            return false;
        }

        let mut entries = Vec::with_capacity(total);
        for child in children {
            entries.append(&mut self.release(child));
        }
        trace!(
            "merging {} entries into node {} at depth {}",
            total,
            id,
            self.node(id).depth
        );
        let sorted = self.config.sorted;
        let node = self.node_mut(id);
        node.children = [None; 4];
        node.leaf = true;
        debug_assert!(node.bucket.is_empty());
        for (p, v) in entries {
            node.push_entry(p, v, sorted);
        }
        true
    }

    /// Classify each visited node once: prune disjoint subtrees, take fully covered ones
    /// wholesale and only test individual entries in partially covered leaves.
    fn visit_region<'a, F>(&'a self, bottom_left: &Point, top_right: &Point, mut f: F)
    where
        F: FnMut(&'a Point, &'a V),
    {
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            match Enclosure::classify(&node.min, &node.max, bottom_left, top_right) {
                Enclosure::InBound => {
                    for n in Nodes::new(self, id) {
                        for (p, v) in n.bucket() {
                            f(p, v);
                        }
                    }
                }
                Enclosure::PartialBound if node.leaf => {
                    for (p, v) in node.bucket.iter() {
                        if p.in_region(bottom_left, top_right) {
                            f(p, v);
                        }
                    }
                }
                Enclosure::PartialBound => {
                    stack.extend(node.present_children());
                }
                Enclosure::OutOfBound => {}
            }
        }
    }
}

impl<V> FromIterator<(Point, V)> for Quadtree<V> {
    fn from_iter<It: IntoIterator<Item = (Point, V)>>(it: It) -> Self {
        Self::from_iterator(it)
    }
}

/// Structural dump of a tree, see [`Quadtree::dump`].
pub struct Dump<'a, V>(&'a Quadtree<V>);

impl<'a, V: fmt::Debug> fmt::Display for Dump<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.0;
        writeln!(
            f,
            "Quadtree with {} entries, bounds {:?}",
            tree.len(),
            tree.bounds()
        )?;
        for node in tree.nodes() {
            let indent = "|   ".repeat(node.depth() as usize);
            write!(
                f,
                "{}|  Node {} at depth {} centered at {}",
                indent,
                node.id(),
                node.depth(),
                node.center()
            )?;
            if let Some(parent) = node.parent() {
                write!(f, " has parent {}", parent)?;
            }
            writeln!(
                f,
                " ({})",
                if node.is_leaf() { "Leaf node" } else { "Stem node" }
            )?;
            for (p, v) in node.bucket() {
                writeln!(f, "{}[  <*> Point {} has data = {:?}", indent, p, v)?;
            }
            if !node.is_leaf() {
                let children = node
                    .children()
                    .iter()
                    .enumerate()
                    .filter_map(|(q, c)| c.map(|c| format!("#{}: {}", q, c)))
                    .collect::<Vec<_>>();
                writeln!(f, "{}|  Children: {}", indent, children.join(", "))?;
            }
        }
        Ok(())
    }
}
