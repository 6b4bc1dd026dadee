//! Tests for the universal invariants from the specification's testable-properties
//! section (spec §8, properties 1, 2, 7, 8): build determinism, index fidelity,
//! monotonicity of k, and tree shape bounds. Properties 3-6 are covered by the
//! proptest brute-force equivalence suites in `test_proptest_kdtree.rs` and
//! `test_proptest_rtree.rs`.


use planeidx::geometry::{dist_point_box, Box2D, Point2D};
use planeidx::kdtree::KdTree;
use planeidx::rtree::RTree;
use shared::*;

fn center_of(b: &Box2D) -> Point2D {
    Point2D::new((b.min_x + b.max_x) / 2.0, (b.min_y + b.max_y) / 2.0)
}

// --- Property 1: build determinism ---

#[test]
fn kdtree_build_is_deterministic() {
    let points = sample_points();
    let targets = [
        Point2D::new(1.0, 1.0),
        Point2D::new(-9.0, -9.0),
        Point2D::new(30.0, 30.0),
    ];

    let a = KdTree::build(points.clone());
    let b = KdTree::build(points.clone());

    for t in &targets {
        assert_eq!(a.nearest_index(t), b.nearest_index(t));
        assert_eq!(
            a.n_nearest_indices(t, KNN_COUNT).unwrap(),
            b.n_nearest_indices(t, KNN_COUNT).unwrap()
        );
        assert_eq!(
            a.find_ball_indices(t, RADIUS).unwrap(),
            b.find_ball_indices(t, RADIUS).unwrap()
        );
    }
    let query = Box2D::new(-10.0, 10.0, -10.0, 10.0);
    assert_eq!(a.find_box_indices(&query).unwrap(), b.find_box_indices(&query).unwrap());
}

#[test]
fn rtree_build_is_deterministic() {
    let boxes = sample_boxes();
    let targets = [Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)];

    let a = RTree::build(boxes.clone(), MAX_CHILDREN).unwrap();
    let b = RTree::build(boxes.clone(), MAX_CHILDREN).unwrap();

    for t in &targets {
        assert_eq!(a.nearest_index(t), b.nearest_index(t));
        assert_eq!(
            a.n_nearest_indices(t, KNN_COUNT).unwrap(),
            b.n_nearest_indices(t, KNN_COUNT).unwrap()
        );
    }
    let query = Box2D::new(-5.0, 5.0, -5.0, 5.0);
    assert_eq!(
        a.find_box_indices(&query).unwrap(),
        b.find_box_indices(&query).unwrap()
    );
    assert_eq!(
        a.find_subsets_indices(&query).unwrap(),
        b.find_subsets_indices(&query).unwrap()
    );
}

// --- Property 2: index fidelity ---

#[test]
fn kdtree_nearest_to_self_is_own_index() {
    let points = sample_points();
    let tree = KdTree::build(points.clone());
    for (i, p) in points.iter().enumerate() {
        assert_eq!(tree.nearest_index(p).unwrap(), i);
    }
}

#[test]
fn rtree_nearest_to_own_center_has_zero_distance() {
    let boxes = sample_boxes();
    let tree = RTree::build(boxes.clone(), MAX_CHILDREN).unwrap();
    for b in &boxes {
        let center = center_of(b);
        let j = tree.nearest_index(&center).unwrap();
        assert_eq!(dist_point_box(&center, &boxes[j]), 0.0);
    }
}

// --- Property 7: monotonicity of k ---

#[test]
fn kdtree_n_nearest_is_monotonic_in_k() {
    let points = sample_points();
    let tree = KdTree::build(points);
    let target = Point2D::new(2.0, -3.0);

    let small = tree.n_nearest_indices(&target, 2).unwrap();
    let large = tree.n_nearest_indices(&target, 5).unwrap();
    assert_eq!(&large[..2], &small[..]);
}

#[test]
fn rtree_n_nearest_is_monotonic_in_k() {
    let boxes = sample_boxes();
    let tree = RTree::build(boxes, MAX_CHILDREN).unwrap();
    let target = Point2D::new(2.0, -3.0);

    let small = tree.n_nearest_indices(&target, 2).unwrap();
    let large = tree.n_nearest_indices(&target, 5).unwrap();
    assert_eq!(&large[..2], &small[..]);
}

#[test]
fn n_nearest_k_larger_than_n_is_not_an_error_and_returns_all() {
    let points = sample_points();
    let tree = KdTree::build(points.clone());
    let target = Point2D::new(0.0, 0.0);
    let huge = tree.n_nearest_indices(&target, usize::MAX).unwrap();
    assert_eq!(huge.len(), points.len());
}

// --- Property 8: tree shape bounds ---

#[test]
fn kdtree_depth_is_bounded_by_log2_n() {
    let n = 1_000usize;
    let points: Vec<Point2D> = (0..n)
        .map(|i| {
            let t = i as f64;
            Point2D::new((t * 0.618_034).fract() * 1000.0, (t * 0.414_214).fract() * 1000.0)
        })
        .collect();
    let tree = KdTree::build(points);
    let bound = (n as f64).log2().ceil() as usize + 1;
    assert!(tree.depth() <= bound, "depth {} exceeds bound {}", tree.depth(), bound);
}

/// `⌈log_M N⌉` computed by repeated integer ceil-division, matching how STR packing itself
/// collapses one level to the next (`P = ⌈L / M⌉`) rather than floating-point `log`, which can
/// round the wrong way exactly at powers of `M`.
fn ceil_log_m(mut n: usize, m: usize) -> usize {
    let mut levels = 0;
    while n > 1 {
        n = n.div_ceil(m);
        levels += 1;
    }
    levels
}

#[test]
fn rtree_depth_matches_log_m_n() {
    let n = 1_000usize;
    let max_children = 8usize;
    let boxes: Vec<Box2D> = (0..n)
        .map(|i| {
            let x = (i % 100) as f64 * 2.0;
            let y = (i / 100) as f64 * 2.0;
            Box2D::new(x, x + 1.0, y, y + 1.0)
        })
        .collect();
    let tree = RTree::build(boxes, max_children).unwrap();
    // `depth()` counts nodes along the root-to-leaf path (root at depth 1), so it is one more
    // than the edge-count `⌈log_M N⌉` the spec's formula names; see DESIGN.md.
    let expected = ceil_log_m(n, max_children) + 1;
    assert_eq!(tree.depth(), expected);
}

#[test]
fn single_item_trees_have_depth_one() {
    let tree = KdTree::build(vec![Point2D::new(0.0, 0.0)]);
    assert_eq!(tree.depth(), 1);

    let tree = RTree::build(vec![Box2D::new(0.0, 1.0, 0.0, 1.0)], 4).unwrap();
    assert_eq!(tree.depth(), 1);
}

#[test]
fn empty_trees_have_depth_zero() {
    let tree: KdTree<Point2D> = KdTree::build(vec![]);
    assert_eq!(tree.depth(), 0);

    let tree: RTree<Box2D> = RTree::build(vec![], 4).unwrap();
    assert_eq!(tree.depth(), 0);
}
