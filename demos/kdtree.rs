use planeidx::geometry::{Box2D, Point2D};
use planeidx::kdtree::KdTree;

fn main() {
    println!("--- k-d tree example ---");

    let points = vec![
        Point2D::new(10.0, 20.0),
        Point2D::new(80.0, 30.0),
        Point2D::new(45.0, 70.0),
        Point2D::new(12.0, 24.0),
        Point2D::new(60.0, 55.0),
    ];
    let tree = KdTree::build(points);

    let query = Point2D::new(12.0, 22.0);
    let nearest = tree.nearest_index(&query).unwrap();
    println!("nearest index to {query:?}: {nearest}");

    let knn = tree.n_nearest_indices(&query, 2).unwrap();
    println!("2 nearest indices to {query:?}: {knn:?}");

    let ball = tree
        .find_ball_indices(&Point2D::new(40.0, 40.0), 35.0)
        .unwrap();
    println!("indices within radius 35 of (40, 40): {ball:?}");

    let region = Box2D::new(0.0, 50.0, 0.0, 50.0);
    let boxed = tree.find_box_indices(&region).unwrap();
    println!("indices inside {region:?}: {boxed:?}");
}
