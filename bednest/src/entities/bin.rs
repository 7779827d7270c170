use anyhow::Result;

use crate::geometry::Shape;
use crate::geometry::offset::offset_polygon;
use crate::geometry::primitives::{Polygon, Rect};

/// A printable surface onto which items are packed. Identified by its ordinal
/// when multiple virtual bins are in play.
#[derive(Clone, Debug)]
pub enum Bin {
    /// Rectangular bed, the common case. Containment checks reduce to
    /// bounding-box tests.
    Rect(Rect),
    /// Arbitrarily shaped bed.
    Contour(Polygon),
}

impl Bin {
    pub fn bbox(&self) -> Rect {
        match self {
            Bin::Rect(r) => *r,
            Bin::Contour(p) => p.bbox(),
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            Bin::Rect(r) => r.area(),
            Bin::Contour(p) => p.area(),
        }
    }

    /// Whether the shape lies entirely within the bin.
    /// For rectangular bins this is a bounding-box test, mirroring the
    /// shape-in-box containment the placement search uses.
    pub fn encloses(&self, shape: &Polygon) -> bool {
        match self {
            Bin::Rect(r) => r.contains(shape.bbox()),
            Bin::Contour(p) => p.encloses(shape),
        }
    }

    /// Returns the bin expanded outwards by `d` (exact for rectangles).
    pub fn offset(&self, d: f64) -> Result<Bin> {
        match self {
            Bin::Rect(r) => Ok(Bin::Rect(r.offset(d))),
            Bin::Contour(p) => Ok(Bin::Contour(offset_polygon(p, d)?)),
        }
    }
}

impl From<Rect> for Bin {
    fn from(r: Rect) -> Self {
        Bin::Rect(r)
    }
}

impl From<Polygon> for Bin {
    fn from(p: Polygon) -> Self {
        Bin::Contour(p)
    }
}
