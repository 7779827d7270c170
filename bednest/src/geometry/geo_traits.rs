use crate::geometry::primitives::{Point, Rect};

/// Trait for types that can detect collisions between `Self` and `T`.
pub trait CollidesWith<T> {
    fn collides_with(&self, other: &T) -> bool;
}

/// Trait for shared properties of geometric primitives.
pub trait Shape {
    /// Geometric center of the shape
    fn centroid(&self) -> Point;

    /// Area of the interior of the shape
    fn area(&self) -> f64;

    /// Bounding box of the shape
    fn bbox(&self) -> Rect;
}
