use bednest::Item;
use bednest::geometry::primitives::{Point, Polygon, Rect};
use float_cmp::approx_eq;

fn square_item(size: f64) -> Item {
    Item::new(0, "square", Polygon::rectangle(size, size))
}

#[test]
fn queries_are_idempotent() {
    let item = square_item(10.0);

    //bit-identical results on repeated calls without intervening mutation
    assert_eq!(item.area(), item.area());
    assert_eq!(item.bbox(), item.bbox());
    assert_eq!(item.is_contour_convex(), item.is_contour_convex());
    assert_eq!(item.rightmost_top_vertex(), item.rightmost_top_vertex());
    assert_eq!(item.leftmost_bottom_vertex(), item.leftmost_bottom_vertex());
}

#[test]
fn translation_moves_bbox_but_not_area() {
    let mut item = square_item(10.0);

    let area_before = item.area();
    let bbox_before = item.bbox();

    item.translate(Point(5.0, 3.0));

    //the translation shifts the box corner and is exact
    assert_eq!(item.bbox(), bbox_before.translated(5.0, 3.0));
    //area is invariant under translation, bit-identical since it is cached
    assert_eq!(item.area(), area_before);
}

#[test]
fn translation_is_cumulative_and_settable() {
    let mut item = square_item(10.0);
    assert_eq!(item.translation(), None);

    item.translate(Point(2.0, 0.0));
    item.translate(Point(3.0, 1.0));
    assert_eq!(item.translation(), Some(Point(5.0, 1.0)));

    item.set_translation(Point(0.0, 0.0));
    //zero is a set value, distinguishable from "never set"
    assert_eq!(item.translation(), Some(Point(0.0, 0.0)));
}

#[test]
fn rotation_changes_bbox_and_preserves_area() {
    let mut item = Item::new(0, "rect", Polygon::rectangle(20.0, 10.0));

    let area_before = item.area();
    item.set_rotation(std::f64::consts::FRAC_PI_2);

    let bbox = item.bbox();
    assert!(approx_eq!(f64, bbox.width(), 10.0, epsilon = 1e-9, ulps = 4));
    assert!(approx_eq!(f64, bbox.height(), 20.0, epsilon = 1e-9, ulps = 4));
    assert_eq!(item.area(), area_before);
}

#[test]
fn inflation_grows_area_and_deflating_back_restores_shape() {
    let mut item = square_item(10.0);
    assert_eq!(item.area(), 100.0);

    item.inflate(2.0);
    assert_eq!(item.inflation(), Some(2.0));
    assert!(approx_eq!(f64, item.area(), 196.0, epsilon = 1e-6, ulps = 4));

    item.inflate(-2.0);
    //inflation of zero short-circuits to the raw shape, no offset round-trip
    assert_eq!(item.inflation(), Some(0.0));
    assert_eq!(item.area(), 100.0);
    assert_eq!(item.bbox(), Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn reset_transformation_clears_all_state() {
    let mut item = square_item(10.0);
    item.translate(Point(5.0, 5.0));
    item.set_rotation(1.0);
    item.inflate(1.0);

    item.reset_transformation();
    assert_eq!(item.translation(), None);
    assert_eq!(item.rotation(), None);
    assert_eq!(item.inflation(), None);
    assert_eq!(item.area(), 100.0);
    assert_eq!(item.bbox(), Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn containment_queries() {
    let mut small = square_item(4.0);
    small.set_translation(Point(3.0, 3.0));

    let big = square_item(10.0);

    assert!(small.fits_in(&big));
    assert!(!big.fits_in(&small));
    assert!(small.fits_in_shape(big.raw_shape()));
    assert!(small.fits_in_rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
    assert!(!small.fits_in_rect(Rect::new(0.0, 0.0, 5.0, 5.0)));

    assert!(big.covers_point(Point(5.0, 5.0)));
    assert!(!big.covers_point(Point(15.0, 5.0)));

    assert!(Item::intersects(&small, &big));
}

#[test]
fn extreme_vertices_follow_the_transform() {
    let mut item = square_item(10.0);
    assert_eq!(item.rightmost_top_vertex(), Point(10.0, 10.0));
    assert_eq!(item.leftmost_bottom_vertex(), Point(0.0, 0.0));
    assert_eq!(item.reference_vertex(), item.rightmost_top_vertex());

    item.translate(Point(5.0, 0.0));
    assert_eq!(item.rightmost_top_vertex(), Point(15.0, 10.0));
    assert_eq!(item.leftmost_bottom_vertex(), Point(5.0, 0.0));
}

#[test]
fn convexity_is_tracked_across_mutations() {
    let l_shape = Polygon::new(vec![
        Point(0.0, 0.0),
        Point(20.0, 0.0),
        Point(20.0, 10.0),
        Point(10.0, 10.0),
        Point(10.0, 20.0),
        Point(0.0, 20.0),
    ]);
    let mut item = Item::new(0, "l", l_shape);

    assert!(!item.is_contour_convex());
    //rigid moves preserve convexity
    item.translate(Point(5.0, 5.0));
    item.set_rotation(0.3);
    assert!(!item.is_contour_convex());

    let mut convex = square_item(10.0);
    assert!(convex.is_contour_convex());
    convex.set_rotation(0.7);
    assert!(convex.is_contour_convex());
}

#[test]
fn bookkeeping_fields() {
    let mut item = square_item(10.0);
    assert_eq!(item.bin_id(), None);
    assert!(!item.is_fixed());
    assert_eq!(item.priority(), 0);

    item.set_priority(5);
    assert_eq!(item.priority(), 5);

    item.mark_as_fixed_in_bin(2);
    assert!(item.is_fixed());
    assert_eq!(item.bin_id(), Some(2));

    item.unmark_fixed();
    assert!(!item.is_fixed());

    assert_eq!(item.vertex_count(), 4);
    assert_eq!(item.hole_count(), 0);
    assert_eq!(item.vertex(0), Point(0.0, 0.0));
}

#[test]
fn degenerate_shape_does_not_panic() {
    let degenerate = Polygon::new(vec![Point(0.0, 0.0), Point(5.0, 0.0), Point(10.0, 0.0)]);
    let mut item = Item::new(0, "degenerate", degenerate);

    assert_eq!(item.area(), 0.0);
    assert!(!item.is_contour_convex());
    assert!(!item.covers_point(Point(1.0, 1.0)));

    //inflating a degenerate shape falls back to the raw shape instead of
    //crashing, and the caches stay consistent
    item.inflate(2.0);
    assert_eq!(item.area(), 0.0);
    assert_eq!(item.area(), item.area());
}
