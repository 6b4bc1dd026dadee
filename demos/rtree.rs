use planeidx::geometry::{Box2D, Point2D};
use planeidx::rtree::RTree;

fn main() {
    println!("--- R-tree example ---");

    let boxes = vec![
        Box2D::new(10.0, 15.0, 20.0, 25.0),
        Box2D::new(80.0, 85.0, 30.0, 35.0),
        Box2D::new(45.0, 50.0, 70.0, 75.0),
        Box2D::new(12.0, 14.0, 22.0, 24.0),
        Box2D::new(60.0, 62.0, 55.0, 58.0),
    ];
    let tree = RTree::build(boxes, 4).unwrap();

    let query = Point2D::new(12.0, 22.0);
    let nearest = tree.nearest_index(&query).unwrap();
    println!("nearest box index to {query:?}: {nearest}");

    let knn = tree.n_nearest_indices(&query, 2).unwrap();
    println!("2 nearest box indices to {query:?}: {knn:?}");

    let region = Box2D::new(0.0, 20.0, 0.0, 30.0);
    let intersecting = tree.find_box_indices(&region).unwrap();
    println!("boxes intersecting {region:?}: {intersecting:?}");

    let subsets = tree.find_subsets_indices(&region).unwrap();
    println!("boxes contained in {region:?}: {subsets:?}");

    let tiny = Box2D::new(12.5, 13.0, 22.5, 23.0);
    let supersets = tree.find_supersets_indices(&tiny).unwrap();
    println!("boxes containing {tiny:?}: {supersets:?}");
}
