use anyhow::{Result, ensure};
use geo_types::{Coord, LineString, MultiPolygon};

use crate::geometry::Shape;
use crate::geometry::primitives::{Point, Polygon};

/// Offsets a [`Polygon`] outwards (`distance > 0`) or inwards
/// (`distance < 0`). Relies on the [`geo-buffer`](https://crates.io/crates/geo-buffer) crate.
///
/// Deflating may split the polygon into multiple components; the largest one
/// is returned. Degenerate input or an offset that consumes the entire shape
/// yields an error, never a panic.
pub fn offset_polygon(shape: &Polygon, distance: f64) -> Result<Polygon> {
    ensure!(shape.area() > 0.0, "cannot offset a degenerate polygon");

    let geo_poly = geo_types::Polygon::new(
        to_linestring(&shape.contour),
        shape.holes.iter().map(|h| to_linestring(h)).collect(),
    );

    let buffered: MultiPolygon = geo_buffer::buffer_polygon(&geo_poly, distance);

    //deflating can split the shape, keep the dominant component
    let component = buffered
        .0
        .iter()
        .max_by(|a, b| {
            ring_area(a.exterior())
                .abs()
                .total_cmp(&ring_area(b.exterior()).abs())
        })
        .ok_or_else(|| anyhow::anyhow!("offset by {distance} consumed the entire polygon"))?;

    let contour = from_linestring(component.exterior());
    ensure!(
        contour.len() >= 3,
        "offset by {distance} left a degenerate contour"
    );

    let holes = component
        .interiors()
        .iter()
        .map(from_linestring)
        .filter(|h| h.len() >= 3)
        .collect();

    Ok(Polygon::with_holes(contour, holes))
}

fn to_linestring(ring: &[Point]) -> LineString {
    LineString::new(ring.iter().map(|p| Coord { x: p.0, y: p.1 }).collect())
}

fn from_linestring(ls: &LineString) -> Vec<Point> {
    let mut points: Vec<Point> = ls.0.iter().map(|c| Point(c.x, c.y)).collect();
    //rings come back closed, drop the duplicated closing vertex
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn ring_area(ls: &LineString) -> f64 {
    let coords = &ls.0;
    let mut sigma = 0.0;
    for i in 0..coords.len().saturating_sub(1) {
        let (a, b) = (coords[i], coords[i + 1]);
        sigma += (a.y + b.y) * (a.x - b.x);
    }
    0.5 * sigma
}
