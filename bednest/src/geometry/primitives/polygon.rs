use itertools::Itertools;

use crate::geometry::geo_traits::{CollidesWith, Shape};
use crate::geometry::primitives::{Edge, Point, Rect};

/// Geometric primitive representing a polygon: a closed outer contour with
/// optional holes. Contours are normalized counterclockwise, holes clockwise.
///
/// Stores plain vertices only; derived properties (area, bounding box, ...)
/// are computed on demand. Caching of these lives in
/// [`Item`](crate::entities::Item), which controls invalidation.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub contour: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

impl Polygon {
    /// Creates a polygon from an outer contour.
    /// Degenerate (zero-area) contours are accepted; geometric queries on
    /// them answer `0`/`false`.
    pub fn new(contour: Vec<Point>) -> Self {
        Self::with_holes(contour, vec![])
    }

    pub fn with_holes(mut contour: Vec<Point>, mut holes: Vec<Vec<Point>>) -> Self {
        assert!(contour.len() >= 3, "polygon must have at least 3 vertices");
        holes.retain(|h| h.len() >= 3);

        if Self::signed_ring_area(&contour) < 0.0 {
            contour.reverse();
        }
        for hole in holes.iter_mut() {
            if Self::signed_ring_area(hole) > 0.0 {
                hole.reverse();
            }
        }

        Polygon { contour, holes }
    }

    /// Axis-aligned rectangle with its bottom-left corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Polygon::new(vec![
            Point(0.0, 0.0),
            Point(width, 0.0),
            Point(width, height),
            Point(0.0, height),
        ])
    }

    //https://en.wikipedia.org/wiki/Shoelace_formula
    //counterclockwise = positive area, clockwise = negative area
    pub fn signed_ring_area(ring: &[Point]) -> f64 {
        let mut sigma = 0.0;
        for i in 0..ring.len() {
            let j = (i + 1) % ring.len();
            let Point(x_i, y_i) = ring[i];
            let Point(x_j, y_j) = ring[j];
            sigma += (y_i + y_j) * (x_i - x_j);
        }
        0.5 * sigma
    }

    pub fn n_vertices(&self) -> usize {
        self.contour.len()
    }

    pub fn contour_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        ring_edges(&self.contour)
    }

    /// All edges of the polygon: contour followed by hole edges.
    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + '_ {
        ring_edges(&self.contour).chain(self.holes.iter().flat_map(|h| ring_edges(h)))
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        let d = Point(dx, dy);
        self.contour.iter_mut().for_each(|p| *p = *p + d);
        self.holes
            .iter_mut()
            .for_each(|h| h.iter_mut().for_each(|p| *p = *p + d));
        self
    }

    /// Rotates the polygon around the origin by `angle` radians.
    pub fn rotate(&mut self, angle: f64) -> &mut Self {
        self.contour.iter_mut().for_each(|p| *p = p.rotated(angle));
        self.holes
            .iter_mut()
            .for_each(|h| h.iter_mut().for_each(|p| *p = p.rotated(angle)));
        self
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut clone = self.clone();
        clone.translate(dx, dy);
        clone
    }

    pub fn rotated(&self, angle: f64) -> Self {
        let mut clone = self.clone();
        clone.rotate(angle);
        clone
    }

    /// Whether the outer contour is convex. Holes are not considered.
    /// Degenerate contours are reported non-convex.
    pub fn is_contour_convex(&self) -> bool {
        let n = self.contour.len();
        if n < 3 {
            return false;
        }

        let mut sign = 0.0f64;
        for i in 0..n {
            let a = self.contour[i];
            let b = self.contour[(i + 1) % n];
            let c = self.contour[(i + 2) % n];
            let cross = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
            if cross != 0.0 {
                if sign != 0.0 && cross.signum() != sign {
                    return false;
                }
                sign = cross.signum();
            }
        }
        sign != 0.0
    }

    /// Whether `other` lies entirely within `self`: every vertex of `other`'s
    /// contour is inside and no edges cross.
    pub fn encloses(&self, other: &Polygon) -> bool {
        if !self.bbox().contains(other.bbox()) {
            return false;
        }
        if !other.contour.iter().all(|p| self.collides_with(p)) {
            return false;
        }
        //a vertex-inclusion test is not sufficient for concave containers
        self.edge_iter()
            .cartesian_product(other.contour_edges().collect_vec())
            .all(|(e1, e2)| !e1.collides_with(&e2))
    }
}

fn ring_edges(ring: &[Point]) -> impl Iterator<Item = Edge> + '_ {
    (0..ring.len()).map(move |i| Edge::new(ring[i], ring[(i + 1) % ring.len()]))
}

//https://en.wikipedia.org/wiki/Point_in_polygon#Ray_casting_algorithm
//crossing test on the y-straddle of each edge, which sidesteps
//ray-through-vertex ambiguity
fn point_in_ring(ring: &[Point], point: Point) -> bool {
    let Point(px, py) = point;
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let Point(x_i, y_i) = ring[i];
        let Point(x_j, y_j) = ring[j];
        if (y_i > py) != (y_j > py) {
            let x_cross = x_j + (py - y_j) * (x_i - x_j) / (y_i - y_j);
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

impl Shape for Polygon {
    fn centroid(&self) -> Point {
        //based on: https://en.wikipedia.org/wiki/Centroid#Of_a_polygon
        let area = Self::signed_ring_area(&self.contour);
        if area == 0.0 {
            return self.bbox().center();
        }

        let n = self.contour.len();
        let mut c_x = 0.0;
        let mut c_y = 0.0;
        for i in 0..n {
            let Point(x_i, y_i) = self.contour[i];
            let Point(x_j, y_j) = self.contour[(i + 1) % n];
            c_x += (x_i + x_j) * (x_i * y_j - x_j * y_i);
            c_y += (y_i + y_j) * (x_i * y_j - x_j * y_i);
        }
        Point(c_x / (6.0 * area), c_y / (6.0 * area))
    }

    fn area(&self) -> f64 {
        let contour_area = Self::signed_ring_area(&self.contour).abs();
        let holes_area: f64 = self
            .holes
            .iter()
            .map(|h| Self::signed_ring_area(h).abs())
            .sum();
        (contour_area - holes_area).max(0.0)
    }

    fn bbox(&self) -> Rect {
        let (mut x_min, mut y_min) = (f64::MAX, f64::MAX);
        let (mut x_max, mut y_max) = (f64::MIN, f64::MIN);
        for point in self.contour.iter() {
            x_min = x_min.min(point.0);
            y_min = y_min.min(point.1);
            x_max = x_max.max(point.0);
            y_max = y_max.max(point.1);
        }
        Rect::new(x_min, y_min, x_max, y_max)
    }
}

impl CollidesWith<Point> for Polygon {
    fn collides_with(&self, point: &Point) -> bool {
        if !self.bbox().collides_with(point) {
            return false;
        }
        point_in_ring(&self.contour, *point) && !self.holes.iter().any(|h| point_in_ring(h, *point))
    }
}

impl CollidesWith<Polygon> for Polygon {
    fn collides_with(&self, other: &Polygon) -> bool {
        if !self.bbox().collides_with(&other.bbox()) {
            return false;
        }

        let other_edges = other.edge_iter().collect_vec();
        for e1 in self.edge_iter() {
            for e2 in other_edges.iter() {
                if e1.collides_with(e2) {
                    return true;
                }
            }
        }

        //no edge crossings: either disjoint or one fully contains the other.
        //the hole-aware point test rules out shapes nested inside a hole.
        self.collides_with(&other.contour[0]) || other.collides_with(&self.contour[0])
    }
}

impl From<Rect> for Polygon {
    fn from(r: Rect) -> Self {
        Polygon::new(vec![
            Point(r.x_min, r.y_min),
            Point(r.x_max, r.y_min),
            Point(r.x_max, r.y_max),
            Point(r.x_min, r.y_max),
        ])
    }
}
