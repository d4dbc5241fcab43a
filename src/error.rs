//! Quadtree error types.

use crate::Point;
use thiserror::Error;

/// Reasons an insertion was rejected. The tree is left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("Point {0} is outside the bounds of the tree")]
    OutOfBounds(Point),

    #[error("Point {0} is already present, use update to replace its value")]
    Duplicate(Point),
}

impl Error {
    /// The rejected point
    pub fn point(&self) -> Point {
        match *self {
            Error::OutOfBounds(p) | Error::Duplicate(p) => p,
        }
    }
}
