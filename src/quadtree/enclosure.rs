use crate::Point;

/// Relationship of a node's box to a query rectangle.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Enclosure {
    /// No overlap, the subtree contributes nothing
    OutOfBound,
    /// Overlapping, entries have to be checked one by one
    PartialBound,
    /// The whole box lies inside the query, every entry of the subtree matches
    InBound,
}

impl Enclosure {
    /// Classify the half-open box `[min, max)` against the half-open query `[bottom_left, top_right)`.
    ///
    /// The box is `InBound` when all four of its corners are covered by the query. Because both
    /// boxes are half-open the box's upper corners may touch the query's upper edges.
    pub fn classify(min: &Point, max: &Point, bottom_left: &Point, top_right: &Point) -> Self {
        let [x0, y0] = **min;
        let [x1, y1] = **max;
        let [qx0, qy0] = **bottom_left;
        let [qx1, qy1] = **top_right;

        // NaN bounds fail every comparison and end up as OutOfBound
        let non_empty = qx0 < qx1 && qy0 < qy1;
        let overlaps = non_empty && x0 < qx1 && qx0 < x1 && y0 < qy1 && qy0 < y1;
        if !overlaps {
            return Enclosure::OutOfBound;
        }

        let covered = |x: f64, y: f64| qx0 <= x && x <= qx1 && qy0 <= y && y <= qy1;
        let corners = [(x0, y0), (x0, y1), (x1, y0), (x1, y1)];
        if corners.iter().all(|&(x, y)| covered(x, y)) {
            Enclosure::InBound
        } else {
            Enclosure::PartialBound
        }
    }
}
