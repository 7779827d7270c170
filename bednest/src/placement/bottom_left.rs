use log::debug;
use ordered_float::OrderedFloat;
use rayon::prelude::*;

use crate::entities::{Bin, Item};
use crate::geometry::Shape;
use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::{Point, Polygon, Rect};
use crate::placement::{Alignment, PackResult, Placement, PlacementConfig, PlacementStrategy};

//pose grid resolution at accuracy 0.0 and 1.0
const MIN_GRID_STEPS: f64 = 8.0;
const MAX_GRID_STEPS: f64 = 56.0;

/// Deterministic raster placement strategy.
///
/// For every allowed rotation, candidate translations are enumerated over the
/// bin bottom-to-top, then left-to-right, at a step derived from the
/// configured accuracy. Valid poses are scored by distance to the alignment
/// anchor blended with the growth of the pile's bounding box (weighted by how
/// many items are still to come); the best strictly-smaller score wins, ties
/// resolved by enumeration order. The search order makes the result
/// reproducible: it never depends on hash iteration or thread scheduling,
/// even with parallel evaluation enabled.
pub struct BottomLeftPlacer {
    bin: Bin,
    config: PlacementConfig,
    /// Norming factor for score terms: sqrt of the bin area.
    norm: f64,
    slots: Vec<Slot>,
}

/// An item occupying space in the bin, with its transformed shape snapshotted
/// at accept/preload time.
#[derive(Clone, Debug)]
struct Slot {
    item: usize,
    bbox: Rect,
    shape: Polygon,
    area: f64,
    score: f64,
    preloaded: bool,
}

impl PlacementStrategy for BottomLeftPlacer {
    fn new(bin: Bin, config: &PlacementConfig) -> Self {
        let norm = bin.area().abs().sqrt();
        BottomLeftPlacer {
            bin,
            config: config.clone(),
            norm,
            slots: vec![],
        }
    }

    fn configure(&mut self, config: &PlacementConfig) {
        self.config = config.clone();
    }

    fn bin(&self) -> &Bin {
        &self.bin
    }

    fn try_pack(&self, items: &[Item], candidate: usize, remaining: &[usize]) -> PackResult {
        let bin_bbox = self.bin.bbox();
        let anchor = anchor_point(self.config.alignment, bin_bbox);

        let pile_bbox = self
            .slots
            .iter()
            .map(|s| s.bbox)
            .reduce(Rect::bounding_rect);
        let remaining_frac = {
            let total = self.slots.len() + remaining.len() + 1;
            remaining.len() as f64 / total as f64
        };

        //scratch copy: poses are evaluated on it so the candidate item itself
        //is never mutated
        let mut scratch = items[candidate].clone();
        scratch.set_translation(Point(0.0, 0.0));
        let base_rotation = items[candidate].rotation().unwrap_or(0.0);

        let default_rotations = [0.0];
        let rotations: &[f64] = match self.config.rotations.is_empty() {
            true => &default_rotations,
            false => &self.config.rotations,
        };

        let mut best: Option<Placement> = None;
        let mut best_overfit = f64::MAX;

        for &rot in rotations {
            let rotation = base_rotation + rot;
            scratch.set_rotation(rotation);
            let shape = scratch.transformed_shape().clone();
            let sbox = shape.bbox();

            let w_diff = sbox.width() - bin_bbox.width();
            let h_diff = sbox.height() - bin_bbox.height();
            if w_diff > 0.0 || h_diff > 0.0 {
                best_overfit = best_overfit.min(w_diff.max(0.0) + h_diff.max(0.0));
                continue;
            }

            //translations keeping the shape's bbox within the bin bbox
            let (tx_min, tx_max) = (bin_bbox.x_min - sbox.x_min, bin_bbox.x_max - sbox.x_max);
            let (ty_min, ty_max) = (bin_bbox.y_min - sbox.y_min, bin_bbox.y_max - sbox.y_max);

            let step = self.config.step.unwrap_or_else(|| {
                let n = MIN_GRID_STEPS
                    + (MAX_GRID_STEPS - MIN_GRID_STEPS) * self.config.accuracy.clamp(0.0, 1.0);
                f64::max(bin_bbox.width(), bin_bbox.height()) / n
            });
            let nx = ((tx_max - tx_min) / step).ceil() as usize;
            let ny = ((ty_max - ty_min) / step).ceil() as usize;

            //bottom-to-top, then left-to-right: ties on score resolve to the
            //leftmost-bottom pose
            let candidates: Vec<Point> = (0..=ny)
                .flat_map(|iy| {
                    let ty = grid_pos(ty_min, ty_max, iy, ny);
                    (0..=nx).map(move |ix| Point(grid_pos(tx_min, tx_max, ix, nx), ty))
                })
                .collect();

            let eval = |(ordinal, t): (usize, Point)| -> Option<(OrderedFloat<f64>, usize)> {
                let tbox = sbox.translated(t.0, t.1);
                if let Bin::Rect(r) = &self.bin {
                    if !r.contains(tbox) {
                        return None;
                    }
                }

                //the translated polygon is only materialized when a bbox
                //prefilter cannot decide
                let mut tshape: Option<Polygon> = None;
                for slot in self.slots.iter() {
                    if slot.bbox.collides_with(&tbox) {
                        let ts = tshape.get_or_insert_with(|| shape.translated(t.0, t.1));
                        if slot.shape.collides_with(ts) {
                            return None;
                        }
                    }
                }
                if let Bin::Contour(contour) = &self.bin {
                    let ts = tshape.get_or_insert_with(|| shape.translated(t.0, t.1));
                    if !contour.encloses(ts) {
                        return None;
                    }
                }

                let dist = anchor.distance(tbox.center()) / self.norm;
                let score = match pile_bbox {
                    None => dist,
                    Some(pile) => {
                        let full = Rect::bounding_rect(pile, tbox);
                        let density =
                            ((full.width() / self.norm) * (full.height() / self.norm)).sqrt();
                        self.config.dist_weight * dist
                            + (1.0 - remaining_frac) * self.config.density_weight * density
                    }
                };
                Some((OrderedFloat(score), ordinal))
            };

            let rot_best = match self.config.parallel {
                true => candidates
                    .par_iter()
                    .copied()
                    .enumerate()
                    .filter_map(eval)
                    .min(),
                false => candidates
                    .iter()
                    .copied()
                    .enumerate()
                    .filter_map(eval)
                    .min(),
            };

            match rot_best {
                Some((score, ordinal)) => {
                    //a later rotation must strictly improve on the incumbent
                    if best.as_ref().is_none_or(|b| score.0 < b.score) {
                        best = Some(Placement {
                            item: candidate,
                            translation: candidates[ordinal],
                            rotation,
                            score: score.0,
                        });
                    }
                }
                None => {
                    //the item fits the bin, every pose collided
                    best_overfit = best_overfit.min(0.0);
                }
            }
        }

        match best {
            Some(placement) => {
                debug!(
                    "[BLP] item {} placed at ({:.3}, {:.3}) rot {:.3} score {:.4}",
                    items[candidate].id,
                    placement.translation.0,
                    placement.translation.1,
                    placement.rotation,
                    placement.score
                );
                PackResult::Placed(placement)
            }
            None => PackResult::Unfit {
                overfit: best_overfit.max(0.0),
            },
        }
    }

    fn accept(&mut self, items: &mut [Item], result: &PackResult) {
        if let PackResult::Placed(p) = result {
            let item = &mut items[p.item];
            item.set_rotation(p.rotation);
            item.set_translation(p.translation);

            let shape = item.transformed_shape().clone();
            self.slots.push(Slot {
                item: p.item,
                bbox: shape.bbox(),
                area: item.area(),
                shape,
                score: p.score,
                preloaded: false,
            });
        }
    }

    fn preload(&mut self, items: &[Item], fixed: &[usize]) {
        for &idx in fixed {
            let item = &items[idx];
            let shape = item.transformed_shape().clone();
            self.slots.push(Slot {
                item: idx,
                bbox: shape.bbox(),
                area: item.area(),
                shape,
                score: 0.0,
                preloaded: true,
            });
        }
    }

    fn unpack_last(&mut self) {
        if self.slots.last().is_some_and(|s| !s.preloaded) {
            self.slots.pop();
        }
    }

    fn clear_items(&mut self) {
        self.slots.clear();
    }

    fn retain_items(&mut self, items: &[Item], keep: &dyn Fn(&Item) -> bool) {
        self.slots.retain(|s| keep(&items[s.item]));
    }

    fn filled_area(&self) -> f64 {
        self.slots.iter().map(|s| s.area).sum()
    }

    fn score(&self) -> f64 {
        self.slots
            .iter()
            .filter(|s| !s.preloaded)
            .map(|s| s.score)
            .sum()
    }

    fn packed(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.item).collect()
    }
}

fn anchor_point(alignment: Alignment, bin_bbox: Rect) -> Point {
    match alignment {
        Alignment::Center => bin_bbox.center(),
        Alignment::BottomLeft => Point(bin_bbox.x_min, bin_bbox.y_min),
        Alignment::BottomRight => Point(bin_bbox.x_max, bin_bbox.y_min),
        Alignment::TopLeft => Point(bin_bbox.x_min, bin_bbox.y_max),
        Alignment::TopRight => Point(bin_bbox.x_max, bin_bbox.y_max),
    }
}

fn grid_pos(min: f64, max: f64, i: usize, n: usize) -> f64 {
    match n {
        0 => min,
        _ => min + (max - min) * i as f64 / n as f64,
    }
}
