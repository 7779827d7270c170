use anyhow::{Result, ensure};

use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::Point;

/// Axis-aligned rectangle
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn try_new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        ensure!(
            x_min < x_max && y_min < y_max,
            "invalid rectangle, x_min: {x_min}, x_max: {x_max}, y_min: {y_min}, y_max: {y_max}"
        );
        Ok(Rect::new(x_min, y_min, x_max, y_max))
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Point {
        Point(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point(self.x_max, self.y_max),
            Point(self.x_min, self.y_max),
            Point(self.x_min, self.y_min),
            Point(self.x_max, self.y_min),
        ]
    }

    /// Returns a new rectangle expanded by `d` in all four directions.
    /// `d` may be negative, shrinking the rectangle; the caller must ensure
    /// it stays valid.
    pub fn offset(&self, d: f64) -> Rect {
        Rect::new(
            self.x_min - d,
            self.y_min - d,
            self.x_max + d,
            self.y_max + d,
        )
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.x_min + dx,
            self.y_min + dy,
            self.x_max + dx,
            self.y_max + dy,
        )
    }

    /// Whether `other` lies entirely within `self` (boundaries included).
    pub fn contains(&self, other: Rect) -> bool {
        self.x_min <= other.x_min
            && self.y_min <= other.y_min
            && self.x_max >= other.x_max
            && self.y_max >= other.y_max
    }

    /// Returns the smallest rectangle that contains both `a` and `b`.
    pub fn bounding_rect(a: Rect, b: Rect) -> Rect {
        Rect::new(
            f64::min(a.x_min, b.x_min),
            f64::min(a.y_min, b.y_min),
            f64::max(a.x_max, b.x_max),
            f64::max(a.y_max, b.y_max),
        )
    }
}

impl CollidesWith<Rect> for Rect {
    #[inline(always)]
    fn collides_with(&self, other: &Rect) -> bool {
        f64::max(self.x_min, other.x_min) <= f64::min(self.x_max, other.x_max)
            && f64::max(self.y_min, other.y_min) <= f64::min(self.y_max, other.y_max)
    }
}

impl CollidesWith<Point> for Rect {
    #[inline(always)]
    fn collides_with(&self, point: &Point) -> bool {
        let Point(x, y) = *point;
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}
