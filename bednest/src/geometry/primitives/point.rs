use std::ops::{Add, Neg, Sub};

/// Geometric primitive representing a point
#[derive(Debug, Clone, PartialEq, Copy, Default)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    pub fn distance(&self, other: Point) -> f64 {
        self.sq_distance(other).sqrt()
    }

    pub fn sq_distance(&self, other: Point) -> f64 {
        (self.0 - other.0).powi(2) + (self.1 - other.1).powi(2)
    }

    /// Rotates the point around the origin by `angle` radians.
    pub fn rotated(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point(self.0 * cos - self.1 * sin, self.0 * sin + self.1 * cos)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0, -self.1)
    }
}

impl From<(f64, f64)> for Point {
    fn from(p: (f64, f64)) -> Self {
        Point(p.0, p.1)
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.0, p.1)
    }
}
