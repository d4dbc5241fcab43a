//! Construction parameters of a [`Quadtree`](crate::Quadtree).

use crate::Point;
use tracing::debug;

pub const DEFAULT_BUCKET_CAPACITY: usize = 8;
pub const DEFAULT_MAX_DEPTH: u32 = 16;
/// Halving an `f64` extent more often than this stops producing distinct centers.
pub const MAX_DEPTH_LIMIT: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Center of the universe box
    pub center: Point,
    /// Half of the universe box's width and height
    pub half_extent: Point,
    /// Number of entries a leaf holds before it splits
    pub bucket_capacity: usize,
    /// Leaves at this depth never split, their buckets grow past `bucket_capacity` instead
    pub max_depth: u32,
    /// Keep buckets ordered by [`Point::cmp_lex`]
    pub sorted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            center: Point::new(0.0, 0.0),
            half_extent: Point::new(1.0, 1.0),
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            sorted: false,
        }
    }
}

impl Config {
    pub fn new(center: Point, half_extent: Point) -> Self {
        Self {
            center,
            half_extent,
            ..Default::default()
        }
    }

    pub fn with_bucket_capacity(mut self, bucket_capacity: usize) -> Self {
        self.bucket_capacity = bucket_capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Apply the clamping rules:
    /// - a bucket capacity of 0 becomes 1
    /// - a max depth of 0 becomes [`DEFAULT_MAX_DEPTH`], anything above [`MAX_DEPTH_LIMIT`] is
    ///   capped
    /// - negative half extents are mirrored
    pub fn normalized(mut self) -> Self {
        if self.bucket_capacity == 0 {
            debug!("bucket capacity of 0 clamped to 1");
            self.bucket_capacity = 1;
        }
        if self.max_depth == 0 {
            debug!("max depth of 0 clamped to {}", DEFAULT_MAX_DEPTH);
            self.max_depth = DEFAULT_MAX_DEPTH;
        } else if self.max_depth > MAX_DEPTH_LIMIT {
            debug!(
                "max depth of {} capped to {}",
                self.max_depth, MAX_DEPTH_LIMIT
            );
            self.max_depth = MAX_DEPTH_LIMIT;
        }
        self.half_extent = Point::new(self.half_extent[0].abs(), self.half_extent[1].abs());
        self
    }

    pub fn bottom_left(&self) -> Point {
        self.center - self.half_extent
    }

    pub fn top_right(&self) -> Point {
        self.center + self.half_extent
    }
}
