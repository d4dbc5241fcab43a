use crate::Point;
use arrayvec::ArrayVec;
use std::fmt;

pub const BOTTOM_LEFT: usize = 0;
pub const TOP_LEFT: usize = 1;
pub const BOTTOM_RIGHT: usize = 2;
pub const TOP_RIGHT: usize = 3;

/// Stable handle of a node in the tree's arena.
///
/// Handles are reused after the node they point to is merged away, so a handle only stays
/// meaningful until the next removal or `clear`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type Children = ArrayVec<[NodeId; 4]>;

#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub center: Point,
    pub half_extent: Point,
    // [min, max) partition bounds. Derived from the parent's bounds and center so that siblings
    // tile their parent exactly, whatever rounding `center ± half_extent` would introduce.
    pub min: Point,
    pub max: Point,

    pub parent: Option<NodeId>,
    pub children: [Option<NodeId>; 4],
    pub depth: u32,
    pub leaf: bool,
    // set while the slot sits on the free list
    pub vacant: bool,

    pub bucket: Vec<(Point, V)>,
}

impl<V> Node<V> {
    pub fn root(center: Point, half_extent: Point) -> Self {
        Self {
            center,
            half_extent,
            min: center - half_extent,
            max: center + half_extent,
            parent: None,
            children: [None; 4],
            depth: 0,
            leaf: true,
            vacant: false,
            bucket: Vec::new(),
        }
    }

    /// Create the (empty) child node that covers `quadrant` of this node.
    pub fn child(&self, id: NodeId, quadrant: usize) -> Self {
        let half_extent = self.half_extent / 2.0;
        let mut center = self.center;
        let mut min = self.min;
        let mut max = self.max;
        if quadrant & 0b10 != 0 {
            center.0[0] += half_extent[0];
            min.0[0] = self.center[0];
        } else {
            center.0[0] -= half_extent[0];
            max.0[0] = self.center[0];
        }
        if quadrant & 0b01 != 0 {
            center.0[1] += half_extent[1];
            min.0[1] = self.center[1];
        } else {
            center.0[1] -= half_extent[1];
            max.0[1] = self.center[1];
        }
        Self {
            center,
            half_extent,
            min,
            max,
            parent: Some(id),
            children: [None; 4],
            depth: self.depth + 1,
            leaf: true,
            vacant: false,
            bucket: Vec::new(),
        }
    }

    /// 2 bit quadrant code of `point` relative to the center of this node.
    /// bit 1: right half, bit 0: top half.
    #[inline]
    pub fn quadrant(&self, point: &Point) -> usize {
        let x = (point[0] >= self.center[0]) as usize;
        let y = (point[1] >= self.center[1]) as usize;
        (x << 1) | y
    }

    /// Return whether point is within the bounds of this node
    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        point.in_region(&self.min, &self.max)
    }

    pub fn present_children(&self) -> Children {
        self.children.iter().filter_map(|c| *c).collect()
    }

    /// Find the position of `point` in the bucket, or the position where it needs to be inserted
    /// to keep the bucket sorted
    pub fn position(&self, point: &Point, sorted: bool) -> Result<usize, usize> {
        if sorted {
            self.bucket.binary_search_by(|(p, _)| p.cmp_lex(point))
        } else {
            self.bucket
                .iter()
                .position(|(p, _)| p == point)
                .ok_or_else(|| self.bucket.len())
        }
    }

    /// Caller is responsible for the uniqueness of `point`.
    pub fn push_entry(&mut self, point: Point, value: V, sorted: bool) {
        if sorted {
            let ind = self.position(&point, true).unwrap_or_else(|i| i);
            self.bucket.insert(ind, (point, value));
        } else {
            self.bucket.push((point, value));
        }
    }

    pub fn get(&self, point: &Point, sorted: bool) -> Option<&V> {
        self.position(point, sorted)
            .ok()
            .map(|ind| &self.bucket[ind].1)
    }

    pub fn get_mut(&mut self, point: &Point, sorted: bool) -> Option<&mut V> {
        self.position(point, sorted)
            .ok()
            .map(move |ind| &mut self.bucket[ind].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node<()> {
        Node::root(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
    }

    #[test]
    fn quadrant_codes() {
        let n = node();

        assert_eq!(n.quadrant(&Point::new(-1.0, -1.0)), BOTTOM_LEFT);
        assert_eq!(n.quadrant(&Point::new(-1.0, 1.0)), TOP_LEFT);
        assert_eq!(n.quadrant(&Point::new(1.0, -1.0)), BOTTOM_RIGHT);
        assert_eq!(n.quadrant(&Point::new(1.0, 1.0)), TOP_RIGHT);
        // the center belongs to the top right quadrant
        assert_eq!(n.quadrant(&Point::new(0.0, 0.0)), TOP_RIGHT);
    }

    #[test]
    fn children_tile_their_parent() {
        let n = node();

        for q in 0..4 {
            let c = n.child(NodeId::ROOT, q);
            assert_eq!(c.depth, 1);
            assert_eq!(c.parent, Some(NodeId::ROOT));
            assert_eq!(c.half_extent, Point::new(5.0, 5.0));
            assert!(c.contains(&c.center), "{:?} {:?}", q, c.center);
            assert_eq!(n.quadrant(&c.center), q);
        }

        let tr = n.child(NodeId::ROOT, TOP_RIGHT);
        assert_eq!(tr.center, Point::new(5.0, 5.0));
        assert_eq!(tr.min, Point::new(0.0, 0.0));
        assert_eq!(tr.max, Point::new(10.0, 10.0));

        let bl = n.child(NodeId::ROOT, BOTTOM_LEFT);
        assert_eq!(bl.center, Point::new(-5.0, -5.0));
        assert!(!bl.contains(&Point::new(0.0, -1.0)));
    }

    #[test]
    fn sorted_bucket_stays_ordered() {
        let mut n = node();
        for p in &[(3.0, 1.0), (-2.0, 4.0), (3.0, -1.0), (0.0, 0.0)] {
            n.push_entry(Point::new(p.0, p.1), (), true);
        }
        let xs: Vec<_> = n.bucket.iter().map(|(p, _)| *p).collect();
        assert_eq!(
            xs,
            vec![
                Point::new(-2.0, 4.0),
                Point::new(0.0, 0.0),
                Point::new(3.0, -1.0),
                Point::new(3.0, 1.0),
            ]
        );
        assert_eq!(n.position(&Point::new(3.0, -1.0), true), Ok(2));
        assert_eq!(n.position(&Point::new(1.0, 0.0), true), Err(2));
    }
}
