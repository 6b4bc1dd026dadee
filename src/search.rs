//! ## Shared best-first search scaffolding
//!
//! Both [`crate::kdtree::KdTree`] and [`crate::rtree::RTree`] answer nearest/k-nearest queries
//! with the same best-first, branch-and-bound traversal: expand the frontier entry with the
//! smallest lower bound first, and stop exploring a subtree as soon as its lower bound can no
//! longer beat the current k-th best candidate. [`Searchable`] is the small capability a tree's
//! internal arena must expose for that traversal to run over it; [`nearest_k`] is the traversal
//! itself, written once and shared by both trees.

use crate::heap::TopKHeap;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A reference to a node in a tree's arena, paired with a lower bound on the distance from the
/// query to anything reachable from that node.
struct Frontier<N> {
    lower_bound: OrderedFloat<f64>,
    node: N,
}

impl<N> PartialEq for Frontier<N> {
    fn eq(&self, other: &Self) -> bool {
        self.lower_bound == other.lower_bound
    }
}
impl<N> Eq for Frontier<N> {}
impl<N> PartialOrd for Frontier<N> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<N> Ord for Frontier<N> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.lower_bound.cmp(&other.lower_bound)
    }
}

/// The capability a tree's arena must expose so that [`nearest_k`] can search it.
///
/// `N` is the tree's internal node-reference type (an arena index, typically). Implementors
/// answer two questions: what is the single best candidate (item distance + original index)
/// held directly at a node, and what are the lower-bound-annotated children to expand next.
pub trait Searchable<Target> {
    /// The type used to refer to a node in this tree's arena.
    type NodeId: Copy;

    /// The arena index of the root node, or `None` if the tree holds no items.
    fn root(&self) -> Option<Self::NodeId>;

    /// The item directly stored at `node` (its squared distance to `target` and its original
    /// index), if this node holds an item itself (leaves in an R-tree; every node in a k-d tree).
    fn own_item(&self, node: Self::NodeId, target: &Target) -> Option<(f64, usize)>;

    /// The children of `node`, each paired with a lower bound on the squared distance from
    /// `target` to anything reachable through that child.
    fn children(&self, node: Self::NodeId, target: &Target) -> Vec<(f64, Self::NodeId)>;
}

/// Runs a best-first, branch-and-bound search for the `k` nearest items to `target`, returning
/// `(squared_distance, original_index)` pairs in ascending order.
///
/// Pruning compares a subtree's lower bound against the current worst retained distance using
/// strict `>`: a lower bound equal to the worst retained distance is still explored, since an
/// item at that same distance but with a smaller original index must still displace the current
/// worst entry to keep results deterministic.
pub fn nearest_k<S, T>(source: &S, target: &T, k: usize) -> Vec<(f64, usize)>
where
    S: Searchable<T>,
{
    let mut heap: TopKHeap<()> = TopKHeap::new(k);
    let Some(root) = source.root() else {
        return Vec::new();
    };

    let mut frontier: BinaryHeap<Reverse<Frontier<S::NodeId>>> = BinaryHeap::new();
    frontier.push(Reverse(Frontier {
        lower_bound: OrderedFloat(0.0),
        node: root,
    }));

    while let Some(Reverse(Frontier { lower_bound, node })) = frontier.pop() {
        if let Some(worst) = heap.worst_distance() {
            if lower_bound.into_inner() > worst {
                break;
            }
        }

        if let Some((dist, index)) = source.own_item(node, target) {
            heap.push(dist, index, ());
        }

        for (child_bound, child) in source.children(node, target) {
            let admit = match heap.worst_distance() {
                Some(worst) => child_bound <= worst,
                None => true,
            };
            if admit {
                frontier.push(Reverse(Frontier {
                    lower_bound: OrderedFloat(child_bound),
                    node: child,
                }));
            }
        }
    }

    heap.drain_ascending()
        .into_iter()
        .map(|(dist, index, ())| (dist, index))
        .collect()
}
