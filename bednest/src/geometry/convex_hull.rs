use ordered_float::OrderedFloat;

use crate::geometry::primitives::{Point, Polygon};

/// Filters a set of points to only include those that are part of the convex hull
pub fn convex_hull_from_points(mut points: Vec<Point>) -> Vec<Point> {
    //https://en.wikibooks.org/wiki/Algorithm_Implementation/Geometry/Convex_hull/Monotone_chain

    //sort the points by x coordinate, y as tie-breaker
    points.sort_by_key(|p| (OrderedFloat(p.0), OrderedFloat(p.1)));
    points.dedup();

    if points.len() < 3 {
        return points;
    }

    let mut lower_hull = points
        .iter()
        .fold(vec![], |hull, p| grow_convex_hull(hull, *p));
    let mut upper_hull = points
        .iter()
        .rev()
        .fold(vec![], |hull, p| grow_convex_hull(hull, *p));

    //first and last element of both hull parts are the same point
    upper_hull.pop();
    lower_hull.pop();

    lower_hull.append(&mut upper_hull);
    lower_hull
}

fn grow_convex_hull(mut h: Vec<Point>, next: Point) -> Vec<Point> {
    //pop all points from the hull which will be made irrelevant due to the new point
    while h.len() >= 2 && cross(h[h.len() - 2], h[h.len() - 1], next) <= 0.0 {
        h.pop();
    }
    h.push(next);
    h
}

fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Returns the rotation (in radians) that aligns the minimum-area bounding
/// box of the polygon's convex hull with the axes. Used as a starting
/// orientation when rotations are allowed.
pub fn min_area_bbox_rotation(shape: &Polygon) -> f64 {
    let hull = convex_hull_from_points(shape.contour.clone());
    if hull.len() < 3 {
        return 0.0;
    }

    let mut best_angle = 0.0;
    let mut best_area = f64::MAX;

    //the minimum-area bounding box has a side collinear with a hull edge
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let angle = -(b.1 - a.1).atan2(b.0 - a.0);

        let (mut x_min, mut y_min) = (f64::MAX, f64::MAX);
        let (mut x_max, mut y_max) = (f64::MIN, f64::MIN);
        for p in hull.iter() {
            let Point(x, y) = p.rotated(angle);
            x_min = x_min.min(x);
            y_min = y_min.min(y);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        }

        let area = (x_max - x_min) * (y_max - y_min);
        if area < best_area {
            best_area = area;
            best_angle = angle;
        }
    }

    best_angle
}
