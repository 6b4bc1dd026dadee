//! ## k-d tree
//!
//! A bulk-loaded, immutable k-d tree over a set of 2D points. The tree is built once from the
//! full input sequence via median splits on alternating axes and never mutated again; every
//! query method below is a pure function of the tree and its arguments.
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

use crate::error::PlaneIdxError;
use crate::geometry::{dist_point_point, validate_box, PlanarBox, PlanarPoint};
use crate::search::{nearest_k, Searchable};
use tracing::{debug, info};

const NULL: u32 = u32::MAX;

#[derive(Debug, Clone)]
struct KdNode {
    item: usize,
    axis: u8,
    left: u32,
    right: u32,
}

/// An immutable, bulk-loaded k-d tree over a set of 2D points.
#[derive(Debug, Clone)]
pub struct KdTree<P> {
    items: Vec<P>,
    nodes: Vec<KdNode>,
    root: u32,
}

struct BuildJob {
    start: usize,
    end: usize,
    axis: u8,
    parent_slot: Option<(u32, bool)>,
}

impl<P: PlanarPoint> KdTree<P> {
    /// Builds a k-d tree from `items`, bulk-loading by iterative median splits on alternating
    /// axes. Each original index refers to `items[index]`; the tree takes ownership of the
    /// sequence and never reorders it. An empty input produces an empty, queryable tree.
    pub fn build(items: Vec<P>) -> Self {
        info!(count = items.len(), "building k-d tree");
        let n = items.len();
        if n == 0 {
            return KdTree {
                items,
                nodes: Vec::new(),
                root: NULL,
            };
        }

        let mut order: Vec<usize> = (0..n).collect();
        let mut nodes: Vec<KdNode> = Vec::with_capacity(n);
        let mut root = NULL;

        let mut stack = vec![BuildJob {
            start: 0,
            end: n,
            axis: 0,
            parent_slot: None,
        }];

        while let Some(job) = stack.pop() {
            let BuildJob {
                start,
                end,
                axis,
                parent_slot,
            } = job;
            let mid = start + (end - start) / 2;

            order[start..end].select_nth_unstable_by(mid - start, |&a, &b| {
                let ca = coord(&items[a], axis);
                let cb = coord(&items[b], axis);
                ca.partial_cmp(&cb)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.cmp(&b))
            });

            let node_idx = nodes.len() as u32;
            nodes.push(KdNode {
                item: order[mid],
                axis,
                left: NULL,
                right: NULL,
            });

            match parent_slot {
                None => root = node_idx,
                Some((parent, is_left)) => {
                    if is_left {
                        nodes[parent as usize].left = node_idx;
                    } else {
                        nodes[parent as usize].right = node_idx;
                    }
                }
            }

            let next_axis = 1 - axis;
            if mid + 1 < end {
                stack.push(BuildJob {
                    start: mid + 1,
                    end,
                    axis: next_axis,
                    parent_slot: Some((node_idx, false)),
                });
            }
            if start < mid {
                stack.push(BuildJob {
                    start,
                    end: mid,
                    axis: next_axis,
                    parent_slot: Some((node_idx, true)),
                });
            }
        }

        KdTree { items, nodes, root }
    }

    /// The number of points indexed.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` if the tree indexes no points.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The original, insertion-order point at `index`.
    pub fn get(&self, index: usize) -> Option<&P> {
        self.items.get(index)
    }

    /// The tree's depth: the length of its longest root-to-leaf path, counting the root itself
    /// as depth 1. An empty tree has depth 0.
    pub fn depth(&self) -> usize {
        if self.root == NULL {
            return 0;
        }
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            let n = &self.nodes[node as usize];
            if n.left != NULL {
                stack.push((n.left, depth + 1));
            }
            if n.right != NULL {
                stack.push((n.right, depth + 1));
            }
        }
        max_depth
    }

    /// The original insertion index of the point nearest to `query`.
    pub fn nearest_index<Q: PlanarPoint>(&self, query: &Q) -> Result<usize, PlaneIdxError> {
        self.n_nearest_indices(query, 1)?
            .into_iter()
            .next()
            .ok_or(PlaneIdxError::EmptyTree)
    }

    /// The point nearest to `query`.
    pub fn nearest_point<Q: PlanarPoint>(&self, query: &Q) -> Result<&P, PlaneIdxError> {
        let idx = self.nearest_index(query)?;
        Ok(&self.items[idx])
    }

    /// The original insertion indices of the `k` points nearest to `query`, in ascending order
    /// of distance.
    pub fn n_nearest_indices<Q: PlanarPoint>(
        &self,
        query: &Q,
        k: usize,
    ) -> Result<Vec<usize>, PlaneIdxError> {
        if k == 0 {
            return Err(PlaneIdxError::InvalidK { k });
        }
        if self.is_empty() {
            return Err(PlaneIdxError::EmptyTree);
        }
        debug!(k, "k-d tree n-nearest query");
        let ctx = KdSearchCtx { tree: self };
        // k may be arbitrarily large (spec: k > N just returns all N); clamp before it
        // reaches the heap's capacity allocation.
        Ok(nearest_k(&ctx, query, k.min(self.len()))
            .into_iter()
            .map(|(_, idx)| idx)
            .collect())
    }

    /// The `k` points nearest to `query`, in ascending order of distance.
    pub fn n_nearest_points<Q: PlanarPoint>(
        &self,
        query: &Q,
        k: usize,
    ) -> Result<Vec<&P>, PlaneIdxError> {
        Ok(self
            .n_nearest_indices(query, k)?
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect())
    }

    /// The original insertion indices of every point within `radius` (inclusive) of `center`.
    pub fn find_ball_indices<Q: PlanarPoint>(
        &self,
        center: &Q,
        radius: f64,
    ) -> Result<Vec<usize>, PlaneIdxError> {
        if radius < 0.0 {
            return Err(PlaneIdxError::InvalidRadius { radius });
        }
        let radius_sq = radius * radius;
        let mut out = Vec::new();
        self.walk_ball(self.root, center, radius_sq, &mut out);
        out.sort_unstable();
        Ok(out)
    }

    /// Every point within `radius` (inclusive) of `center`.
    pub fn find_ball_points<Q: PlanarPoint>(
        &self,
        center: &Q,
        radius: f64,
    ) -> Result<Vec<&P>, PlaneIdxError> {
        Ok(self
            .find_ball_indices(center, radius)?
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect())
    }

    fn walk_ball<Q: PlanarPoint>(&self, node: u32, center: &Q, radius_sq: f64, out: &mut Vec<usize>) {
        if node == NULL {
            return;
        }
        let n = &self.nodes[node as usize];
        let item = &self.items[n.item];
        if dist_point_point(item, center) <= radius_sq {
            out.push(n.item);
        }
        let axis_diff = coord(item, n.axis) - coord(center, n.axis);
        if axis_diff >= 0.0 || axis_diff * axis_diff <= radius_sq {
            self.walk_ball(n.left, center, radius_sq, out);
        }
        if axis_diff <= 0.0 || axis_diff * axis_diff <= radius_sq {
            self.walk_ball(n.right, center, radius_sq, out);
        }
    }

    /// The original insertion indices of every point inside `query_box`, inclusive of its edges.
    pub fn find_box_indices<B: PlanarBox>(
        &self,
        query_box: &B,
    ) -> Result<Vec<usize>, PlaneIdxError> {
        validate_box(query_box)?;
        let mut out = Vec::new();
        self.walk_box(self.root, query_box, &mut out);
        out.sort_unstable();
        Ok(out)
    }

    /// Every point inside `query_box`, inclusive of its edges.
    pub fn find_box_points<B: PlanarBox>(&self, query_box: &B) -> Result<Vec<&P>, PlaneIdxError> {
        Ok(self
            .find_box_indices(query_box)?
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect())
    }

    fn walk_box<B: PlanarBox>(&self, node: u32, query_box: &B, out: &mut Vec<usize>) {
        if node == NULL {
            return;
        }
        let n = &self.nodes[node as usize];
        let item = &self.items[n.item];
        if query_box.contains_point(item) {
            out.push(n.item);
        }
        let c = coord(item, n.axis);
        let (lo, hi) = if n.axis == 0 {
            (query_box.min_x(), query_box.max_x())
        } else {
            (query_box.min_y(), query_box.max_y())
        };
        if lo <= c {
            self.walk_box(n.left, query_box, out);
        }
        if hi >= c {
            self.walk_box(n.right, query_box, out);
        }
    }
}

fn coord<P: PlanarPoint>(p: &P, axis: u8) -> f64 {
    if axis == 0 {
        p.x()
    } else {
        p.y()
    }
}

struct KdSearchCtx<'a, P> {
    tree: &'a KdTree<P>,
}

impl<'a, P: PlanarPoint, Q: PlanarPoint> Searchable<Q> for KdSearchCtx<'a, P> {
    type NodeId = u32;

    fn root(&self) -> Option<u32> {
        if self.tree.root == NULL {
            None
        } else {
            Some(self.tree.root)
        }
    }

    fn own_item(&self, node: u32, target: &Q) -> Option<(f64, usize)> {
        let n = &self.tree.nodes[node as usize];
        let item = &self.tree.items[n.item];
        Some((dist_point_point(item, target), n.item))
    }

    fn children(&self, node: u32, target: &Q) -> Vec<(f64, u32)> {
        let n = &self.tree.nodes[node as usize];
        let item = &self.tree.items[n.item];
        let axis_diff = coord(item, n.axis) - coord(target, n.axis);
        let mut out = Vec::with_capacity(2);
        if n.left != NULL {
            let bound = if axis_diff >= 0.0 { 0.0 } else { axis_diff * axis_diff };
            out.push((bound, n.left));
        }
        if n.right != NULL {
            let bound = if axis_diff <= 0.0 { 0.0 } else { axis_diff * axis_diff };
            out.push((bound, n.right));
        }
        out
    }
}
