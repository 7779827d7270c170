use bednest::geometry::primitives::{Point, Polygon};
use serde::{Deserialize, Serialize};

/// A printable scene: the bed description plus all objects and their
/// instances, in global coordinates.
///
/// Multiple (virtual) beds are strided along the +x axis: bed `i` occupies
/// `[i * stride, i * stride + width] × [0, depth]`, where
/// `stride = width + gap`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Scene {
    pub bed: BedSpec,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wipe_tower: Option<WipeTower>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct BedSpec {
    pub width: f64,
    pub depth: f64,
    /// Gap between consecutive virtual beds along the x axis.
    #[serde(default = "default_bed_gap")]
    pub gap: f64,
    /// Number of beds available. Unlimited when absent.
    #[serde(default)]
    pub count: Option<usize>,
}

impl BedSpec {
    pub fn stride(&self) -> f64 {
        self.width + self.gap
    }

    /// Global coordinates -> coordinates relative to the given bed.
    pub fn to_local(&self, bed: usize, p: Point) -> Point {
        Point(p.0 - self.stride() * bed as f64, p.1)
    }

    /// Bed-relative coordinates -> global coordinates.
    pub fn to_global(&self, bed: usize, p: Point) -> Point {
        Point(p.0 + self.stride() * bed as f64, p.1)
    }
}

fn default_bed_gap() -> f64 {
    10.0
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    /// Outer contour of the object's footprint, in object-local coordinates.
    pub outline: Vec<[f64; 2]>,
    #[serde(default)]
    pub holes: Vec<Vec<[f64; 2]>>,
    pub instances: Vec<SceneInstance>,
}

impl SceneObject {
    /// The footprint as a polygon, or `None` for unusable outlines
    /// (fewer than 3 vertices).
    pub fn polygon(&self) -> Option<Polygon> {
        if self.outline.len() < 3 {
            return None;
        }
        let contour = self.outline.iter().map(|&[x, y]| Point(x, y)).collect();
        let holes = self
            .holes
            .iter()
            .filter(|h| h.len() >= 3)
            .map(|h| h.iter().map(|&[x, y]| Point(x, y)).collect())
            .collect();
        Some(Polygon::with_holes(contour, holes))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct SceneInstance {
    #[serde(default)]
    pub translation: [f64; 2],
    /// Rotation in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Bed the instance is currently assigned to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed: Option<usize>,
    #[serde(default = "default_true")]
    pub printable: bool,
    /// Locked instances are excluded from arranging entirely.
    #[serde(default)]
    pub locked: bool,
    /// Only relevant for the rearrange-selection mode.
    #[serde(default = "default_true")]
    pub selected: bool,
}

impl SceneInstance {
    pub fn translation_point(&self) -> Point {
        Point(self.translation[0], self.translation[1])
    }
}

/// Shared auxiliary structure (purge/wipe tower) with a rectangular
/// footprint, arranged alongside the objects with elevated priority.
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct WipeTower {
    #[serde(default)]
    pub position: [f64; 2],
    pub width: f64,
    pub depth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed: Option<usize>,
    #[serde(default = "default_true")]
    pub selected: bool,
}

fn default_true() -> bool {
    true
}
