//! Adaptive point Quadtree.
//!
//! Maps 2-D coordinates to payloads. Leaves hold a bucket of entries and split into four lazily
//! created children once full; removals collapse under-full subtrees back into a single leaf.
//!
//! # Contracts:
//! - The universe is the half-open box `[center - half_extent, center + half_extent)`, points
//!   outside of it are rejected
//! - Coordinates are unique within a tree
//!
pub mod config;
pub mod error;
pub mod quadtree;

pub use config::Config;
pub use error::Error;
pub use quadtree::{Enclosure, NodeId, NodeRef, Quadtree};

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// 2-D coordinate. Ordered lexicographically, `x` first.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Point(pub [f64; 2]);

impl Deref for Point {
    type Target = [f64; 2];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

macro_rules! componentwise {
    ($op: ident, $fn: ident, $op_assign: ident, $fn_assign: ident, $sym: tt) => {
        impl $op_assign for Point {
            fn $fn_assign(&mut self, p: Self) {
                self.0[0] $sym p.0[0];
                self.0[1] $sym p.0[1];
            }
        }

        impl $op_assign<f64> for Point {
            fn $fn_assign(&mut self, s: f64) {
                self.0[0] $sym s;
                self.0[1] $sym s;
            }
        }

        impl $op for Point {
            type Output = Self;

            fn $fn(mut self, rhs: Self) -> Self {
                self.$fn_assign(rhs);
                self
            }
        }

        impl $op<f64> for Point {
            type Output = Self;

            fn $fn(mut self, rhs: f64) -> Self {
                self.$fn_assign(rhs);
                self
            }
        }
    };
}

componentwise!(Add, add, AddAssign, add_assign, +=);
componentwise!(Sub, sub, SubAssign, sub_assign, -=);
componentwise!(Mul, mul, MulAssign, mul_assign, *=);
componentwise!(Div, div, DivAssign, div_assign, /=);

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self([-self.0[0], -self.0[1]])
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0[0], self.0[1])
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self([x, y])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    /// Lexicographic total order used to keep buckets sorted.
    ///
    /// `0.0` and `-0.0` compare equal, consistent with `==`. NaN falls back to `f64::total_cmp`
    /// but never enters a tree, the bounds check rejects it.
    pub fn cmp_lex(&self, rhs: &Self) -> Ordering {
        fn axis(a: f64, b: f64) -> Ordering {
            a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
        }
        axis(self.0[0], rhs.0[0]).then_with(|| axis(self.0[1], rhs.0[1]))
    }

    /// Return whether this point is inside `[bottom_left, top_right)`
    pub fn in_region(&self, bottom_left: &Point, top_right: &Point) -> bool {
        let [x, y] = self.0;
        bottom_left[0] <= x && x < top_right[0] && bottom_left[1] <= y && y < top_right[1]
    }
}
