use bednest::geometry::convex_hull::{convex_hull_from_points, min_area_bbox_rotation};
use bednest::geometry::geo_traits::{CollidesWith, Shape};
use bednest::geometry::offset::offset_polygon;
use bednest::geometry::primitives::{Edge, Point, Polygon, Rect};
use float_cmp::approx_eq;
use test_case::test_case;

fn square(size: f64) -> Polygon {
    Polygon::rectangle(size, size)
}

fn l_shape() -> Polygon {
    //L-shaped footprint: 20x20 with the top-right 10x10 quadrant missing
    Polygon::new(vec![
        Point(0.0, 0.0),
        Point(20.0, 0.0),
        Point(20.0, 10.0),
        Point(10.0, 10.0),
        Point(10.0, 20.0),
        Point(0.0, 20.0),
    ])
}

#[test]
fn polygon_area_and_bbox() {
    let sq = square(10.0);
    assert!(approx_eq!(f64, sq.area(), 100.0, ulps = 2));

    let bbox = sq.bbox();
    assert_eq!(bbox, Rect::new(0.0, 0.0, 10.0, 10.0));

    assert!(approx_eq!(f64, l_shape().area(), 300.0, ulps = 2));
}

#[test]
fn polygon_orientation_is_normalized() {
    //clockwise input gets reversed to counterclockwise
    let cw = Polygon::new(vec![
        Point(0.0, 0.0),
        Point(0.0, 10.0),
        Point(10.0, 10.0),
        Point(10.0, 0.0),
    ]);
    assert!(Polygon::signed_ring_area(&cw.contour) > 0.0);
    assert!(approx_eq!(f64, cw.area(), 100.0, ulps = 2));
}

#[test]
fn polygon_area_subtracts_holes() {
    let with_hole = Polygon::with_holes(
        vec![
            Point(0.0, 0.0),
            Point(10.0, 0.0),
            Point(10.0, 10.0),
            Point(0.0, 10.0),
        ],
        vec![vec![
            Point(4.0, 4.0),
            Point(6.0, 4.0),
            Point(6.0, 6.0),
            Point(4.0, 6.0),
        ]],
    );
    assert!(approx_eq!(f64, with_hole.area(), 96.0, ulps = 2));
}

#[test_case(Point(5.0, 5.0), true; "inside")]
#[test_case(Point(15.0, 5.0), false; "outside")]
#[test_case(Point(-1.0, 5.0), false; "outside left")]
fn point_in_polygon(point: Point, expected: bool) {
    assert_eq!(square(10.0).collides_with(&point), expected);
}

#[test]
fn point_in_polygon_hole_is_outside() {
    let with_hole = Polygon::with_holes(
        vec![
            Point(0.0, 0.0),
            Point(10.0, 0.0),
            Point(10.0, 10.0),
            Point(0.0, 10.0),
        ],
        vec![vec![
            Point(3.0, 3.0),
            Point(7.0, 3.0),
            Point(7.0, 7.0),
            Point(3.0, 7.0),
        ]],
    );
    assert!(!with_hole.collides_with(&Point(5.0, 5.0)));
    assert!(with_hole.collides_with(&Point(1.0, 1.0)));
}

#[test]
fn polygon_collision_cases() {
    let a = square(10.0);

    //overlapping
    assert!(a.collides_with(&square(10.0).translated(5.0, 5.0)));
    //disjoint
    assert!(!a.collides_with(&square(10.0).translated(20.0, 0.0)));
    //fully contained, no edge crossings
    assert!(a.collides_with(&square(2.0).translated(4.0, 4.0)));
}

#[test]
fn polygon_inside_hole_does_not_collide() {
    let donut = Polygon::with_holes(
        vec![
            Point(0.0, 0.0),
            Point(10.0, 0.0),
            Point(10.0, 10.0),
            Point(0.0, 10.0),
        ],
        vec![vec![
            Point(2.0, 2.0),
            Point(8.0, 2.0),
            Point(8.0, 8.0),
            Point(2.0, 8.0),
        ]],
    );
    let inner = square(2.0).translated(4.0, 4.0);
    assert!(!donut.collides_with(&inner));

    //but a shape bridging the hole boundary does collide
    let bridging = square(4.0).translated(0.5, 0.5);
    assert!(donut.collides_with(&bridging));
}

#[test]
fn polygon_encloses() {
    let big = square(20.0);
    assert!(big.encloses(&square(5.0).translated(5.0, 5.0)));
    assert!(!big.encloses(&square(5.0).translated(18.0, 5.0)));

    //concave container: vertices inside, but an edge dips outside the L
    let l = l_shape();
    assert!(l.encloses(&square(4.0).translated(1.0, 1.0)));
    let spanning = Polygon::new(vec![
        Point(5.0, 18.0),
        Point(18.0, 5.0),
        Point(19.0, 9.0),
        Point(6.0, 19.0),
    ]);
    assert!(!l.encloses(&spanning));
}

#[test]
fn polygon_convexity() {
    assert!(square(10.0).is_contour_convex());
    assert!(!l_shape().is_contour_convex());

    //degenerate, collinear contour
    let degenerate = Polygon::new(vec![Point(0.0, 0.0), Point(5.0, 0.0), Point(10.0, 0.0)]);
    assert!(!degenerate.is_contour_convex());
    assert_eq!(degenerate.area(), 0.0);
}

#[test]
fn edge_intersections() {
    let e1 = Edge::new(Point(0.0, 0.0), Point(10.0, 10.0));
    let e2 = Edge::new(Point(0.0, 10.0), Point(10.0, 0.0));
    let e3 = Edge::new(Point(20.0, 0.0), Point(30.0, 0.0));

    assert!(e1.collides_with(&e2));
    assert!(!e1.collides_with(&e3));

    //parallel edges never intersect
    let e4 = Edge::new(Point(0.0, 1.0), Point(10.0, 11.0));
    assert!(!e1.collides_with(&e4));
}

#[test]
fn rect_relations() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 15.0, 15.0);
    let c = Rect::new(2.0, 2.0, 8.0, 8.0);

    assert!(a.collides_with(&b));
    assert!(a.contains(c));
    assert!(!a.contains(b));
    assert_eq!(Rect::bounding_rect(a, b), Rect::new(0.0, 0.0, 15.0, 15.0));
    assert!(Rect::try_new(5.0, 5.0, 5.0, 10.0).is_err());
}

#[test]
fn convex_hull_filters_interior_points() {
    let hull = convex_hull_from_points(vec![
        Point(0.0, 0.0),
        Point(10.0, 0.0),
        Point(10.0, 10.0),
        Point(0.0, 10.0),
        Point(5.0, 5.0),
        Point(2.0, 7.0),
    ]);
    assert_eq!(hull.len(), 4);
    assert!(!hull.contains(&Point(5.0, 5.0)));
}

#[test]
fn min_area_bbox_rotation_recovers_axis_alignment() {
    //a 20x10 rectangle rotated by 0.4 rad; the minimum-area bbox rotation
    //must bring it back to an axis-aligned 20x10 box
    let rotated = Polygon::rectangle(20.0, 10.0).rotated(0.4);
    let correction = min_area_bbox_rotation(&rotated);
    let realigned = rotated.rotated(correction);
    let bbox = realigned.bbox();
    assert!(approx_eq!(
        f64,
        bbox.area(),
        200.0,
        epsilon = 1e-6,
        ulps = 4
    ));
}

#[test]
fn offset_inflates_and_deflates() {
    let sq = square(10.0);

    let inflated = offset_polygon(&sq, 2.0).unwrap();
    assert!(approx_eq!(f64, inflated.area(), 196.0, epsilon = 1e-6, ulps = 4));
    assert!(inflated.encloses(&sq));

    let deflated = offset_polygon(&sq, -2.0).unwrap();
    assert!(approx_eq!(f64, deflated.area(), 36.0, epsilon = 1e-6, ulps = 4));
    assert!(sq.encloses(&deflated));
}

#[test]
fn offset_rejects_degenerate_input() {
    let degenerate = Polygon::new(vec![Point(0.0, 0.0), Point(5.0, 0.0), Point(10.0, 0.0)]);
    assert!(offset_polygon(&degenerate, 1.0).is_err());
}
