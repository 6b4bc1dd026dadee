//! ## Errors for planeidx
//!
//! All failures this crate can produce are input-classification errors: they are detected
//! at the API boundary, before any tree traversal begins, and never leave a tree partially
//! built or a query partially evaluated.

use std::error::Error;
use std::fmt;

/// The error taxonomy for every fallible operation in this crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneIdxError {
    /// A query was issued against a tree built from an empty input sequence.
    EmptyTree,
    /// A k-nearest query was issued with `k == 0`.
    InvalidK {
        /// The rejected value of `k`.
        k: usize,
    },
    /// An R-tree was built with `max_children < 2`.
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
    /// A ball query was issued with a negative radius.
    InvalidRadius {
        /// The rejected radius.
        radius: f64,
    },
    /// A query box had `max < min` on at least one axis.
    InvalidBox {
        /// The box's minimum x bound.
        min_x: f64,
        /// The box's maximum x bound.
        max_x: f64,
        /// The box's minimum y bound.
        min_y: f64,
        /// The box's maximum y bound.
        max_y: f64,
    },
}

impl fmt::Display for PlaneIdxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaneIdxError::EmptyTree => {
                write!(f, "query issued against a tree with no indexed items")
            }
            PlaneIdxError::InvalidK { k } => {
                write!(f, "invalid k for k-nearest query: {k} (must be >= 1)")
            }
            PlaneIdxError::InvalidCapacity { capacity } => {
                write!(
                    f,
                    "invalid R-tree node capacity: {capacity} (must be >= 2)"
                )
            }
            PlaneIdxError::InvalidRadius { radius } => {
                write!(f, "invalid ball query radius: {radius} (must be >= 0)")
            }
            PlaneIdxError::InvalidBox {
                min_x,
                max_x,
                min_y,
                max_y,
            } => {
                write!(
                    f,
                    "invalid query box: min ({min_x}, {min_y}) exceeds max ({max_x}, {max_y}) on some axis"
                )
            }
        }
    }
}

impl Error for PlaneIdxError {}
