//! ## Geometry facade
//!
//! The k-d tree and R-tree in this crate never touch a concrete coordinate type directly;
//! they consume only the small capability set defined here: point/box construction and
//! accessors, squared point-point and point-box distance, and box containment/intersection
//! predicates. All distances are returned pre-squared (never square-rooted) so that every
//! threshold, heap key, and pruning comparison downstream stays in the same monotone,
//! totally-ordered space.
//!
//! [`Point2D`] and [`Box2D`] are the bundled concrete types used by this crate's own tests
//! and examples; callers may index their own point/box types by implementing [`PlanarPoint`]
//! and [`PlanarBox`] instead.

use crate::error::PlaneIdxError;

/// A point in the plane, as seen by the core tree algorithms.
pub trait PlanarPoint {
    /// The point's x coordinate.
    fn x(&self) -> f64;
    /// The point's y coordinate.
    fn y(&self) -> f64;
    /// Constructs a point from its coordinates.
    fn make_point(x: f64, y: f64) -> Self
    where
        Self: Sized;
}

/// An axis-aligned box in the plane, as seen by the core tree algorithms.
///
/// Degenerate boxes (zero width and/or height) are legal: every default method here treats
/// `min == max` on an axis as a single coordinate, not an empty box.
pub trait PlanarBox {
    /// The box's minimum x bound.
    fn min_x(&self) -> f64;
    /// The box's maximum x bound.
    fn max_x(&self) -> f64;
    /// The box's minimum y bound.
    fn min_y(&self) -> f64;
    /// The box's maximum y bound.
    fn max_y(&self) -> f64;
    /// Constructs a box from its four bounds.
    fn make_box(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self
    where
        Self: Sized;

    /// The x coordinate of the box's center, used to sort nodes during STR packing.
    fn center_x(&self) -> f64 {
        (self.min_x() + self.max_x()) / 2.0
    }

    /// The y coordinate of the box's center, used to sort nodes during STR packing.
    fn center_y(&self) -> f64 {
        (self.min_y() + self.max_y()) / 2.0
    }

    /// Returns `true` if this box contains `p`, inclusive of all four edges.
    fn contains_point<P: PlanarPoint + ?Sized>(&self, p: &P) -> bool {
        p.x() >= self.min_x() && p.x() <= self.max_x() && p.y() >= self.min_y() && p.y() <= self.max_y()
    }

    /// Returns `true` if this box fully contains `other`.
    fn contains_box<B: PlanarBox + ?Sized>(&self, other: &B) -> bool {
        other.min_x() >= self.min_x()
            && other.max_x() <= self.max_x()
            && other.min_y() >= self.min_y()
            && other.max_y() <= self.max_y()
    }

    /// Returns `true` if this box and `other` share at least one point.
    fn intersects_box<B: PlanarBox + ?Sized>(&self, other: &B) -> bool {
        self.min_x() <= other.max_x()
            && self.max_x() >= other.min_x()
            && self.min_y() <= other.max_y()
            && self.max_y() >= other.min_y()
    }

    /// Returns the smallest axis-aligned box containing both `self` and `other`.
    fn union<B: PlanarBox>(&self, other: &B) -> Self
    where
        Self: Sized,
    {
        Self::make_box(
            self.min_x().min(other.min_x()),
            self.max_x().max(other.max_x()),
            self.min_y().min(other.min_y()),
            self.max_y().max(other.max_y()),
        )
    }
}

/// Squared Euclidean distance between two points.
///
/// This is the monotone, comparable distance value every query and pruning comparison in
/// this crate operates on; callers see it square-rooted only if they choose to.
pub fn dist_point_point<P: PlanarPoint, Q: PlanarPoint>(p: &P, q: &Q) -> f64 {
    let dx = p.x() - q.x();
    let dy = p.y() - q.y();
    dx * dx + dy * dy
}

/// Squared Euclidean distance from a point to the closest point of a box; zero iff the point
/// lies inside the box.
pub fn dist_point_box<P: PlanarPoint, B: PlanarBox>(p: &P, b: &B) -> f64 {
    let dx = if p.x() < b.min_x() {
        b.min_x() - p.x()
    } else if p.x() > b.max_x() {
        p.x() - b.max_x()
    } else {
        0.0
    };
    let dy = if p.y() < b.min_y() {
        b.min_y() - p.y()
    } else if p.y() > b.max_y() {
        p.y() - b.max_y()
    } else {
        0.0
    };
    dx * dx + dy * dy
}

/// Validates that a query box has `min <= max` on both axes.
pub fn validate_box<B: PlanarBox>(b: &B) -> Result<(), PlaneIdxError> {
    if b.min_x() > b.max_x() || b.min_y() > b.max_y() {
        return Err(PlaneIdxError::InvalidBox {
            min_x: b.min_x(),
            max_x: b.max_x(),
            min_y: b.min_y(),
            max_y: b.max_y(),
        });
    }
    Ok(())
}

/// A bundled concrete 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }
}

impl PlanarPoint for Point2D {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn make_point(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }
}

/// A bundled concrete axis-aligned 2D box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2D {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Box2D {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Box2D {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}

impl PlanarBox for Box2D {
    fn min_x(&self) -> f64 {
        self.min_x
    }
    fn max_x(&self) -> f64 {
        self.max_x
    }
    fn min_y(&self) -> f64 {
        self.min_y
    }
    fn max_y(&self) -> f64 {
        self.max_y
    }
    fn make_box(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Box2D {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }
}
