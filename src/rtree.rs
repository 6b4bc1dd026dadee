//! ## R-tree
//!
//! A bulk-loaded, immutable R-tree over a set of axis-aligned 2D boxes, packed via
//! sort-tile-recursive (STR) bulk loading. The tree is built once from the full input sequence
//! and never mutated again; every query method below is a pure function of the tree and its
//! arguments.
//!
//! ### Example
//!
//! ```
//! use planeidx::geometry::Box2D;
//! use planeidx::rtree::RTree;
//!
//! let boxes = vec![
//!     Box2D::new(0.0, 1.0, 0.0, 1.0),
//!     Box2D::new(10.0, 11.0, 10.0, 11.0),
//! ];
//! let tree = RTree::build(boxes, 4).unwrap();
//! let query = Box2D::new(-1.0, 2.0, -1.0, 2.0);
//! assert_eq!(tree.find_box_indices(&query).unwrap(), vec![0]);
//! ```

use crate::error::PlaneIdxError;
use crate::geometry::{dist_point_box, validate_box, PlanarBox, PlanarPoint};
use crate::search::{nearest_k, Searchable};
use tracing::{debug, info};

const NULL: u32 = u32::MAX;

enum RNode<B> {
    Leaf { item: usize, bbox: B },
    Internal { bbox: B, children: Vec<u32> },
}

impl<B: PlanarBox> RNode<B> {
    fn bbox(&self) -> &B {
        match self {
            RNode::Leaf { bbox, .. } => bbox,
            RNode::Internal { bbox, .. } => bbox,
        }
    }
}

/// An immutable, bulk-loaded R-tree over a set of axis-aligned boxes.
pub struct RTree<B> {
    items: Vec<B>,
    nodes: Vec<RNode<B>>,
    root: u32,
    max_children: usize,
}

impl<B: PlanarBox + Clone> RTree<B> {
    /// Builds an R-tree from `boxes` using sort-tile-recursive bulk loading, grouping at most
    /// `max_children` entries per node. Each original index refers to `boxes[index]`.
    ///
    /// Returns [`PlaneIdxError::InvalidCapacity`] if `max_children < 2`.
    pub fn build(boxes: Vec<B>, max_children: usize) -> Result<Self, PlaneIdxError> {
        if max_children < 2 {
            return Err(PlaneIdxError::InvalidCapacity {
                capacity: max_children,
            });
        }
        info!(count = boxes.len(), max_children, "building R-tree");

        let n = boxes.len();
        if n == 0 {
            return Ok(RTree {
                items: boxes,
                nodes: Vec::new(),
                root: NULL,
                max_children,
            });
        }

        let mut nodes: Vec<RNode<B>> = Vec::new();
        let mut level: Vec<u32> = (0..n as u32)
            .map(|i| {
                let idx = nodes.len() as u32;
                nodes.push(RNode::Leaf {
                    item: i as usize,
                    bbox: boxes[i as usize].clone(),
                });
                idx
            })
            .collect();

        while level.len() > 1 {
            level = pack_level(&mut nodes, &level, max_children);
        }

        let root = level[0];
        Ok(RTree {
            items: boxes,
            nodes,
            root,
            max_children,
        })
    }

    /// The number of boxes indexed.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` if the tree indexes no boxes.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The configured maximum number of children per internal node.
    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// The original, insertion-order box at `index`.
    pub fn get(&self, index: usize) -> Option<&B> {
        self.items.get(index)
    }

    /// The tree's depth: the number of levels from the root down to a leaf, inclusive. Every
    /// leaf sits at the same depth (a bulk-packed R-tree invariant), so following a single path
    /// down from the root is representative. An empty tree has depth 0.
    pub fn depth(&self) -> usize {
        if self.root == NULL {
            return 0;
        }
        let mut depth = 1;
        let mut node = &self.nodes[self.root as usize];
        loop {
            match node {
                RNode::Leaf { .. } => break,
                RNode::Internal { children, .. } => {
                    depth += 1;
                    node = &self.nodes[children[0] as usize];
                }
            }
        }
        depth
    }

    /// The original insertion index of the box nearest to `query`.
    pub fn nearest_index<Q: PlanarPoint>(&self, query: &Q) -> Result<usize, PlaneIdxError> {
        self.n_nearest_indices(query, 1)?
            .into_iter()
            .next()
            .ok_or(PlaneIdxError::EmptyTree)
    }

    /// The box nearest to `query`.
    pub fn nearest_box<Q: PlanarPoint>(&self, query: &Q) -> Result<&B, PlaneIdxError> {
        let idx = self.nearest_index(query)?;
        Ok(&self.items[idx])
    }

    /// The original insertion indices of the `k` boxes nearest to `query`, in ascending order of
    /// distance. Distance to a box is zero if `query` lies inside it.
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
        debug!(k, "R-tree n-nearest query");
        let ctx = RTreeSearchCtx { tree: self };
        // k may be arbitrarily large (spec: k > N just returns all N); clamp before it
        // reaches the heap's capacity allocation.
        Ok(nearest_k(&ctx, query, k.min(self.len()))
            .into_iter()
            .map(|(_, idx)| idx)
            .collect())
    }

    /// The `k` boxes nearest to `query`, in ascending order of distance.
    pub fn n_nearest_boxes<Q: PlanarPoint>(
        &self,
        query: &Q,
        k: usize,
    ) -> Result<Vec<&B>, PlaneIdxError> {
        Ok(self
            .n_nearest_indices(query, k)?
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect())
    }

    /// The original insertion indices of every indexed box that intersects `query_box`.
    pub fn find_box_indices<Q: PlanarBox>(&self, query_box: &Q) -> Result<Vec<usize>, PlaneIdxError> {
        validate_box(query_box)?;
        let mut out = Vec::new();
        self.walk(self.root, &mut out, &|bbox: &B| bbox.intersects_box(query_box));
        out.sort_unstable();
        Ok(out)
    }

    /// Every indexed box that intersects `query_box`.
    pub fn find_box_boxes<Q: PlanarBox>(&self, query_box: &Q) -> Result<Vec<&B>, PlaneIdxError> {
        Ok(self
            .find_box_indices(query_box)?
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect())
    }

    /// The original insertion indices of every indexed box fully contained within `query_box`.
    pub fn find_subsets_indices<Q: PlanarBox>(
        &self,
        query_box: &Q,
    ) -> Result<Vec<usize>, PlaneIdxError> {
        validate_box(query_box)?;
        let mut out = Vec::new();
        self.walk_subsets(self.root, query_box, &mut out);
        out.sort_unstable();
        Ok(out)
    }

    /// Every indexed box fully contained within `query_box`.
    pub fn find_subsets<Q: PlanarBox>(&self, query_box: &Q) -> Result<Vec<&B>, PlaneIdxError> {
        Ok(self
            .find_subsets_indices(query_box)?
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect())
    }

    /// The original insertion indices of every indexed box that fully contains `query_box`.
    pub fn find_supersets_indices<Q: PlanarBox>(
        &self,
        query_box: &Q,
    ) -> Result<Vec<usize>, PlaneIdxError> {
        validate_box(query_box)?;
        let mut out = Vec::new();
        self.walk(self.root, &mut out, &|bbox: &B| bbox.contains_box(query_box));
        out.sort_unstable();
        Ok(out)
    }

    /// Every indexed box that fully contains `query_box`.
    pub fn find_supersets<Q: PlanarBox>(&self, query_box: &Q) -> Result<Vec<&B>, PlaneIdxError> {
        Ok(self
            .find_supersets_indices(query_box)?
            .into_iter()
            .map(|idx| &self.items[idx])
            .collect())
    }

    fn walk(&self, node: u32, out: &mut Vec<usize>, predicate: &dyn Fn(&B) -> bool) {
        if node == NULL {
            return;
        }
        match &self.nodes[node as usize] {
            RNode::Leaf { item, bbox } => {
                if predicate(bbox) {
                    out.push(*item);
                }
            }
            RNode::Internal { bbox, children } => {
                if !predicate(bbox) {
                    return;
                }
                for &child in children {
                    self.walk(child, out, predicate);
                }
            }
        }
    }

    fn walk_subsets<Q: PlanarBox>(&self, node: u32, query_box: &Q, out: &mut Vec<usize>) {
        if node == NULL {
            return;
        }
        match &self.nodes[node as usize] {
            RNode::Leaf { item, bbox } => {
                if query_box.contains_box(bbox) {
                    out.push(*item);
                }
            }
            RNode::Internal { children, .. } => {
                for &child in children {
                    let child_bbox = self.nodes[child as usize].bbox();
                    if query_box.intersects_box(child_bbox) {
                        self.walk_subsets(child, query_box, out);
                    }
                }
            }
        }
    }
}

fn pack_level<B: PlanarBox + Clone>(
    nodes: &mut Vec<RNode<B>>,
    level: &[u32],
    max_children: usize,
) -> Vec<u32> {
    let p = level.len().div_ceil(max_children);
    let s = (p as f64).sqrt().ceil() as usize;
    let s = s.max(1);
    let slab_size = level.len().div_ceil(s);

    let mut by_x: Vec<u32> = level.to_vec();
    by_x.sort_by(|&a, &b| {
        nodes[a as usize]
            .bbox()
            .center_x()
            .partial_cmp(&nodes[b as usize].bbox().center_x())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut packed: Vec<u32> = Vec::new();
    for slab in by_x.chunks(slab_size.max(1)) {
        let mut by_y: Vec<u32> = slab.to_vec();
        by_y.sort_by(|&a, &b| {
            nodes[a as usize]
                .bbox()
                .center_y()
                .partial_cmp(&nodes[b as usize].bbox().center_y())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for group in by_y.chunks(max_children) {
            let children: Vec<u32> = group.to_vec();
            let mut bbox = nodes[children[0] as usize].bbox().clone();
            for &c in &children[1..] {
                bbox = bbox.union(nodes[c as usize].bbox());
            }
            let idx = nodes.len() as u32;
            nodes.push(RNode::Internal { bbox, children });
            packed.push(idx);
        }
    }
    packed
}

struct RTreeSearchCtx<'a, B> {
    tree: &'a RTree<B>,
}

impl<'a, B: PlanarBox, Q: PlanarPoint> Searchable<Q> for RTreeSearchCtx<'a, B> {
    type NodeId = u32;

    fn root(&self) -> Option<u32> {
        if self.tree.root == NULL {
            None
        } else {
            Some(self.tree.root)
        }
    }

    fn own_item(&self, node: u32, target: &Q) -> Option<(f64, usize)> {
        match &self.tree.nodes[node as usize] {
            RNode::Leaf { item, bbox } => Some((dist_point_box(target, bbox), *item)),
            RNode::Internal { .. } => None,
        }
    }

    fn children(&self, node: u32, target: &Q) -> Vec<(f64, u32)> {
        match &self.tree.nodes[node as usize] {
            RNode::Leaf { .. } => Vec::new(),
            RNode::Internal { children, .. } => children
                .iter()
                .map(|&c| {
                    let child_bbox = self.tree.nodes[c as usize].bbox();
                    (dist_point_box(target, child_bbox), c)
                })
                .collect(),
        }
    }
}
