//! Property-based tests for the geometry facade's primitive predicates and distances.

use planeidx::geometry::{dist_point_box, dist_point_point, Box2D, PlanarBox, Point2D};
use proptest::prelude::*;

prop_compose! {
    fn arb_box()(
        x0 in -500.0..500.0, w in 0.0..100.0,
        y0 in -500.0..500.0, h in 0.0..100.0,
    ) -> Box2D {
        Box2D::new(x0, x0 + w, y0, y0 + h)
    }
}

proptest! {
    #[test]
    fn test_distance_is_never_negative(
        px in -1000.0..1000.0, py in -1000.0..1000.0,
        qx in -1000.0..1000.0, qy in -1000.0..1000.0,
    ) {
        let p = Point2D::new(px, py);
        let q = Point2D::new(qx, qy);
        prop_assert!(dist_point_point(&p, &q) >= 0.0);
    }

    #[test]
    fn test_point_inside_box_has_zero_distance(
        b in arb_box(),
        t in 0.0..1.0, u in 0.0..1.0,
    ) {
        let x = b.min_x + t * (b.max_x - b.min_x);
        let y = b.min_y + u * (b.max_y - b.min_y);
        let p = Point2D::new(x, y);
        prop_assert_eq!(dist_point_box(&p, &b), 0.0);
        prop_assert!(b.contains_point(&p));
    }

    #[test]
    fn test_union_contains_both_operands(a in arb_box(), b in arb_box()) {
        let u = a.union(&b);
        prop_assert!(u.contains_box(&a));
        prop_assert!(u.contains_box(&b));
    }

    #[test]
    fn test_intersects_is_symmetric(a in arb_box(), b in arb_box()) {
        prop_assert_eq!(a.intersects_box(&b), b.intersects_box(&a));
    }

    #[test]
    fn test_contains_implies_intersects(a in arb_box(), b in arb_box()) {
        if a.contains_box(&b) {
            prop_assert!(a.intersects_box(&b));
        }
    }
}
