//! ## planeidx
//!
//! Bulk-loaded, immutable spatial indexes over a finite set of 2D geometric items:
//!
//! - [`kdtree::KdTree`] indexes a set of points and answers nearest, k-nearest, ball,
//!   and box-range queries.
//! - [`rtree::RTree`] indexes a set of axis-aligned boxes, built via sort-tile-recursive
//!   packing, and additionally answers subset/superset queries against a query box.
//!
//! Both structures are built once from the full input sequence and never mutated again;
//! every query is a pure function of the tree and its arguments, so a built tree can be
//! shared across threads and queried concurrently without any coordination.
//!
//! ### Example
//!
//! ```
//! use planeidx::geometry::Point2D;
//! use planeidx::kdtree::KdTree;
//!
//! let points = vec![
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(5.0, 5.0),
//!     Point2D::new(-3.0, 2.0),
//! ];
//! let tree = KdTree::build(points);
//! let nearest = tree.nearest_index(&Point2D::new(4.0, 4.0)).unwrap();
//! assert_eq!(nearest, 1);
//! ```

pub mod error;
pub mod geometry;
pub mod heap;
pub mod kdtree;
mod logging;
pub mod rtree;
pub mod search;

pub use error::PlaneIdxError;
