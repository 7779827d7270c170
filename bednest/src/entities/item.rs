use std::cell::{Cell, Ref, RefCell};

use log::warn;
use ordered_float::OrderedFloat;
use tribool::Tribool;

use crate::geometry::Shape;
use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::offset::offset_polygon;
use crate::geometry::primitives::{Point, Polygon, Rect};

/// An item to be placed on a bin.
///
/// Owns a private copy of its shape and caches the results of the expensive
/// derived computations. Each cached field is invalidated only when one of
/// its actual inputs changes:
///
/// | cache             | inputs                            |
/// |-------------------|-----------------------------------|
/// | inflated shape    | inflation                         |
/// | area              | inflation                         |
/// | convexity         | inflation (rigid moves preserve it) |
/// | bounding box      | inflation, rotation (translated post hoc on read) |
/// | transformed shape | inflation, rotation, translation  |
/// | extreme vertices  | inflation, rotation, translation  |
///
/// In particular, translating an item does not discard its bounding box or
/// area; the box is stored untranslated and shifted on every read.
///
/// Transform state uses `Option` because zero is a valid set value and must
/// be distinguishable from "never set".
///
/// Item identity is positional: strategies refer to items by their index in
/// the run's item slice, never by value.
#[derive(Clone, Debug)]
pub struct Item {
    shape: Polygon,

    translation: Option<Point>,
    rotation: Option<f64>,
    inflation: Option<f64>,

    inflated: RefCell<Option<Polygon>>,
    transformed: RefCell<Option<Polygon>>,
    area: Cell<Option<f64>>,
    bbox: Cell<Option<Rect>>,
    extremes: Cell<Option<(Point, Point)>>,
    convexity: Cell<Tribool>,

    bin_id: Option<usize>,
    priority: i32,
    fixed: bool,

    /// Opaque application identifier, not interpreted by the engine.
    pub id: usize,
    pub name: String,
}

impl Item {
    pub fn new(id: usize, name: impl Into<String>, shape: Polygon) -> Self {
        Item {
            shape,
            translation: None,
            rotation: None,
            inflation: None,
            inflated: RefCell::new(None),
            transformed: RefCell::new(None),
            area: Cell::new(None),
            bbox: Cell::new(None),
            extremes: Cell::new(None),
            convexity: Cell::new(Tribool::Indeterminate),
            bin_id: None,
            priority: 0,
            fixed: false,
            id,
            name: name.into(),
        }
    }

    /// The raw shape, without inflation or transformation.
    pub fn raw_shape(&self) -> &Polygon {
        &self.shape
    }

    pub fn vertex(&self, idx: usize) -> Point {
        self.shape.contour[idx]
    }

    pub fn vertex_count(&self) -> usize {
        self.shape.contour.len()
    }

    pub fn hole_count(&self) -> usize {
        self.shape.holes.len()
    }

    // --- bookkeeping ---

    pub fn bin_id(&self) -> Option<usize> {
        self.bin_id
    }

    pub fn set_bin_id(&mut self, bin_id: Option<usize>) {
        self.bin_id = bin_id;
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Marks the item as already placed in `bin_id`: it contributes to
    /// collision checks but is never moved by a run.
    pub fn mark_as_fixed_in_bin(&mut self, bin_id: usize) {
        self.fixed = true;
        self.bin_id = Some(bin_id);
    }

    pub fn unmark_fixed(&mut self) {
        self.fixed = false;
    }

    // --- transform state ---

    pub fn translation(&self) -> Option<Point> {
        self.translation
    }

    pub fn rotation(&self) -> Option<f64> {
        self.rotation
    }

    pub fn inflation(&self) -> Option<f64> {
        self.inflation
    }

    pub fn set_translation(&mut self, t: Point) {
        if self.translation != Some(t) {
            self.translation = Some(t);
            //the bounding box is stored untranslated: only the transformed
            //shape and the extreme vertices depend on the translation
            *self.transformed.get_mut() = None;
            self.extremes.set(None);
        }
    }

    pub fn translate(&mut self, d: Point) {
        let current = self.translation.unwrap_or(Point(0.0, 0.0));
        self.set_translation(current + d);
    }

    pub fn set_rotation(&mut self, r: f64) {
        if self.rotation != Some(r) {
            self.rotation = Some(r);
            *self.transformed.get_mut() = None;
            self.extremes.set(None);
            self.bbox.set(None);
        }
    }

    pub fn rotate(&mut self, r: f64) {
        let current = self.rotation.unwrap_or(0.0);
        self.set_rotation(current + r);
    }

    pub fn set_inflation(&mut self, d: f64) {
        self.inflation = Some(d);
        self.invalidate_all();
    }

    pub fn inflate(&mut self, d: f64) {
        let current = self.inflation.unwrap_or(0.0);
        self.set_inflation(current + d);
    }

    pub fn reset_transformation(&mut self) {
        self.translation = None;
        self.rotation = None;
        self.inflation = None;
        self.invalidate_all();
    }

    fn invalidate_all(&mut self) {
        *self.inflated.get_mut() = None;
        *self.transformed.get_mut() = None;
        self.area.set(None);
        self.bbox.set(None);
        self.extremes.set(None);
        self.convexity.set(Tribool::Indeterminate);
    }

    // --- derived, cached queries ---

    fn inflated_shape(&self) -> Ref<'_, Polygon> {
        if self.inflated.borrow().is_none() {
            let shape = match self.inflation {
                //an inflation of zero is a no-op: a zero offset round-trip
                //through the buffering backend can drift on degenerate shapes
                None => self.shape.clone(),
                Some(d) if d == 0.0 => self.shape.clone(),
                Some(d) => offset_polygon(&self.shape, d).unwrap_or_else(|err| {
                    warn!("[ITEM {}] inflation by {d} failed: {err}", self.id);
                    self.shape.clone()
                }),
            };
            *self.inflated.borrow_mut() = Some(shape);
        }
        Ref::map(self.inflated.borrow(), |c| {
            c.as_ref().expect("inflated cache filled above")
        })
    }

    /// The shape with inflation, rotation and translation applied, in that
    /// order. Cached until one of those inputs changes.
    pub fn transformed_shape(&self) -> Ref<'_, Polygon> {
        if self.transformed.borrow().is_none() {
            let mut shape = self.inflated_shape().clone();
            if let Some(r) = self.rotation {
                shape.rotate(r);
            }
            if let Some(Point(dx, dy)) = self.translation {
                shape.translate(dx, dy);
            }
            *self.transformed.borrow_mut() = Some(shape);
        }
        Ref::map(self.transformed.borrow(), |c| {
            c.as_ref().expect("transformed cache filled above")
        })
    }

    /// Area of the inflated shape. Invariant under rotation and translation.
    pub fn area(&self) -> f64 {
        match self.area.get() {
            Some(area) => area,
            None => {
                let area = self.inflated_shape().area();
                self.area.set(Some(area));
                area
            }
        }
    }

    /// Bounding box of the transformed shape. The rotated box is cached; the
    /// translation is applied on every read.
    pub fn bbox(&self) -> Rect {
        let base = match self.bbox.get() {
            Some(bb) => bb,
            None => {
                let bb = match self.rotation {
                    None => self.inflated_shape().bbox(),
                    Some(r) => self.inflated_shape().rotated(r).bbox(),
                };
                self.bbox.set(Some(bb));
                bb
            }
        };
        match self.translation {
            Some(Point(dx, dy)) => base.translated(dx, dy),
            None => base,
        }
    }

    /// Whether the outer contour of the transformed shape is convex.
    /// Tri-state cached: unchecked until first queried, then pinned until
    /// the inflated shape itself changes (rigid moves preserve convexity).
    pub fn is_contour_convex(&self) -> bool {
        match self.convexity.get() {
            Tribool::True => true,
            Tribool::False => false,
            Tribool::Indeterminate => {
                let convex = self.transformed_shape().is_contour_convex();
                self.convexity.set(match convex {
                    true => Tribool::True,
                    false => Tribool::False,
                });
                convex
            }
        }
    }

    fn extreme_vertices(&self) -> (Point, Point) {
        match self.extremes.get() {
            Some(e) => e,
            None => {
                let e = {
                    let shape = self.transformed_shape();
                    let rmt = shape
                        .contour
                        .iter()
                        .max_by_key(|p| (OrderedFloat(p.1), OrderedFloat(p.0)))
                        .copied()
                        .unwrap_or(Point(0.0, 0.0));
                    let lmb = shape
                        .contour
                        .iter()
                        .min_by_key(|p| (OrderedFloat(p.1), OrderedFloat(p.0)))
                        .copied()
                        .unwrap_or(Point(0.0, 0.0));
                    (rmt, lmb)
                };
                self.extremes.set(Some(e));
                e
            }
        }
    }

    /// Vertex of the transformed contour with the highest y (x breaks ties).
    pub fn rightmost_top_vertex(&self) -> Point {
        self.extreme_vertices().0
    }

    /// Vertex of the transformed contour with the lowest y (x breaks ties).
    pub fn leftmost_bottom_vertex(&self) -> Point {
        self.extreme_vertices().1
    }

    pub fn reference_vertex(&self) -> Point {
        self.rightmost_top_vertex()
    }

    // --- containment / intersection queries ---

    /// Point-in-shape test against the transformed shape.
    pub fn covers_point(&self, p: Point) -> bool {
        self.transformed_shape().collides_with(&p)
    }

    /// Shape-in-shape test: whether `self` lies entirely within `other`.
    pub fn fits_in(&self, other: &Item) -> bool {
        other.transformed_shape().encloses(&*self.transformed_shape())
    }

    /// Shape-in-shape test against a raw polygon.
    pub fn fits_in_shape(&self, shape: &Polygon) -> bool {
        shape.encloses(&*self.transformed_shape())
    }

    /// Shape-in-box test: the transformed bounding box against `rect`.
    pub fn fits_in_rect(&self, rect: Rect) -> bool {
        rect.contains(self.bbox())
    }

    pub fn intersects(a: &Item, b: &Item) -> bool {
        a.transformed_shape().collides_with(&*b.transformed_shape())
    }
}
