use std::cmp::Reverse;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bednest::Nester;
use bednest::entities::{Bin, Item};
use bednest::geometry::convex_hull::min_area_bbox_rotation;
use bednest::geometry::primitives::{Point, Polygon, Rect};
use bednest::placement::BottomLeftPlacer;
use bednest::selection::{FirstFit, SelectionConfig};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::params::ArrangeParams;
use crate::scene::Scene;

/// Priority given to the synthetic wipe-tower item so it is placed before
/// any regular object.
const WIPE_TOWER_PRIORITY: i32 = 100;

/// Which instances are subject to rearrangement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrangeMode {
    /// Rearrange every printable, non-locked instance.
    All,
    /// Rearrange the selection; unselected printable instances stay where
    /// they are but still block placements on their bed.
    SelectedOnly,
}

/// Identifies where an arranged item came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemSource {
    Object { object: usize, instance: usize },
    WipeTower,
}

/// Final pose of a successfully arranged item, in global coordinates.
#[derive(Clone, Copy, Debug)]
pub struct PlacedPose {
    pub bed: usize,
    pub translation: Point,
    pub rotation: f64,
}

/// Result of one arrangement run.
#[derive(Clone, Debug)]
pub struct ArrangeOutcome {
    pub bed_count: usize,
    pub arranged: usize,
    pub canceled: bool,
    /// Human-readable summary for presentation.
    pub status: String,
    pub unarranged: Vec<ItemSource>,
}

/// One arrangement run: gathers items from the scene, drives the nester and
/// writes the results back through a per-item setter.
///
/// Instances are partitioned into *selected* (rearranged), *fixed* (their
/// footprint blocks placements but they are not moved) and *excluded*
/// (locked or unprintable; they do not participate at all). A fresh job is
/// built for every run; items are never shared between runs.
pub struct ArrangeJob<'a> {
    scene: &'a Scene,
    params: ArrangeParams,
    mode: ArrangeMode,
    items: Vec<Item>,
    /// Source of each item, indexed by `Item::id`.
    sources: Vec<ItemSource>,
}

impl<'a> ArrangeJob<'a> {
    pub fn new(scene: &'a Scene, params: ArrangeParams, mode: ArrangeMode) -> Self {
        ArrangeJob {
            scene,
            params,
            mode,
            items: vec![],
            sources: vec![],
        }
    }

    /// Builds the item lists from the scene. Fixed items have their
    /// bed-relative offset removed so all beds are compared in a common
    /// coordinate frame; fixed items lying outside their bed are dropped
    /// from collision checking (they keep their pose and assignment).
    pub fn prepare(&mut self) {
        let mut selected: Vec<Item> = vec![];
        let mut fixed: Vec<Item> = vec![];
        self.sources.clear();
        let bed_rect = Rect::new(0.0, 0.0, self.scene.bed.width, self.scene.bed.depth);

        for (oi, object) in self.scene.objects.iter().enumerate() {
            let Some(polygon) = object.polygon() else {
                warn!("[JOB] object '{}' has a degenerate outline, skipped", object.name);
                continue;
            };

            for (ii, instance) in object.instances.iter().enumerate() {
                if instance.locked || !instance.printable {
                    debug!("[JOB] skipping locked/unprintable instance of '{}'", object.name);
                    continue;
                }

                let id = self.sources.len();
                self.sources.push(ItemSource::Object {
                    object: oi,
                    instance: ii,
                });

                let mut item = Item::new(id, object.name.clone(), polygon.clone());
                item.set_rotation(instance.rotation);

                let select = self.mode == ArrangeMode::All || instance.selected;
                match (select, instance.bed) {
                    (false, Some(bed)) => {
                        item.set_translation(
                            self.scene
                                .bed
                                .to_local(bed, instance.translation_point()),
                        );
                        item.mark_as_fixed_in_bin(bed);
                        if item.fits_in_rect(bed_rect) {
                            fixed.push(item);
                        } else {
                            warn!(
                                "[JOB] fixed instance of '{}' lies outside bed {bed}, \
                                 it will not block placements",
                                object.name
                            );
                        }
                    }
                    _ => {
                        //unselected instances without a bed have nothing to
                        //block; arrange them along with the selection
                        item.set_translation(instance.translation_point());
                        selected.push(item);
                    }
                }
            }
        }

        if let Some(wt) = &self.scene.wipe_tower {
            let id = self.sources.len();
            self.sources.push(ItemSource::WipeTower);

            let mut item = Item::new(id, "wipe tower", Polygon::rectangle(wt.width, wt.depth));
            item.set_priority(WIPE_TOWER_PRIORITY);

            let bed = wt.bed.unwrap_or(0);
            let local = self
                .scene
                .bed
                .to_local(bed, Point(wt.position[0], wt.position[1]));
            item.set_translation(local);

            let select = self.mode == ArrangeMode::All || wt.selected;
            if select {
                selected.push(item);
            } else {
                item.mark_as_fixed_in_bin(bed);
                fixed.push(item);
            }
        }

        if self.params.allow_rotations {
            //start from the orientation that minimizes the bounding box
            for item in selected.iter_mut() {
                item.set_rotation(min_area_bbox_rotation(item.raw_shape()));
            }
        }

        //high priority first; the sort is stable, so ties keep insertion order
        selected.sort_by_key(|item| Reverse(item.priority()));

        self.items = selected;
        self.items.append(&mut fixed);

        info!(
            "[JOB] prepared {} item(s), {} fixed",
            self.items.len(),
            self.items.iter().filter(|i| i.is_fixed()).count()
        );
    }

    /// Runs the engine over the prepared items.
    pub fn process(&mut self) -> Result<ArrangeOutcome> {
        let bed_rect = Rect::try_new(0.0, 0.0, self.scene.bed.width, self.scene.bed.depth)
            .context("invalid bed dimensions")?;
        let max_bins = self.params.max_beds.or(self.scene.bed.count);

        let mut nester: Nester<BottomLeftPlacer, FirstFit> = Nester::new(
            Bin::Rect(bed_rect),
            self.params.min_obj_distance,
            self.params.placement_config(),
            SelectionConfig { max_bins },
        );

        let unfit_ids = Arc::new(Mutex::new(Vec::<usize>::new()));
        {
            let sink = Arc::clone(&unfit_ids);
            nester.unfit_indicator(Box::new(move |item| {
                warn!("[JOB] '{}' cannot be placed on any bed", item.name);
                sink.lock().expect("unfit sink poisoned").push(item.id);
            }));
        }

        nester.progress_indicator(Box::new(|remaining| {
            debug!("[JOB] {remaining} item(s) remaining");
        }));

        let canceled = Arc::new(AtomicBool::new(false));
        if let Some(secs) = self.params.timeout {
            let deadline = Instant::now() + Duration::from_secs_f64(secs);
            let flag = Arc::clone(&canceled);
            nester.stop_condition(Box::new(move || {
                let stop = Instant::now() >= deadline;
                if stop {
                    flag.store(true, Ordering::Relaxed);
                }
                stop
            }));
        }

        let bed_count = nester.execute(&mut self.items)?;

        let unarranged: Vec<ItemSource> = unfit_ids
            .lock()
            .expect("unfit sink poisoned")
            .iter()
            .map(|&id| self.sources[id])
            .collect();
        let canceled = canceled.load(Ordering::Relaxed);
        let arranged = self
            .items
            .iter()
            .filter(|i| !i.is_fixed() && i.bin_id().is_some())
            .count();

        let mut status = match canceled {
            true => format!("Arrange canceled, {arranged} object(s) already placed were kept"),
            false => format!("Arranged {arranged} object(s) onto {bed_count} bed(s)"),
        };
        if !unarranged.is_empty() {
            status.push_str(&format!(
                ". Objects that do not fit on any bed: {}",
                self.source_names(&unarranged).join(", ")
            ));
        }

        info!("[JOB] {status}");

        Ok(ArrangeOutcome {
            bed_count,
            arranged,
            canceled,
            status,
            unarranged,
        })
    }

    /// Invokes `setter` once for every successfully arranged item with its
    /// final pose in global coordinates. Fixed items are untouched and get
    /// no invocation.
    pub fn write_back(&self, setter: &mut dyn FnMut(ItemSource, PlacedPose)) {
        for item in self.items.iter() {
            if item.is_fixed() {
                continue;
            }
            let Some(bed) = item.bin_id() else {
                continue;
            };
            let local = item.translation().unwrap_or(Point(0.0, 0.0));
            setter(
                self.sources[item.id],
                PlacedPose {
                    bed,
                    translation: self.scene.bed.to_global(bed, local),
                    rotation: item.rotation().unwrap_or(0.0),
                },
            );
        }
    }

    /// User-facing names of the given sources, grouped by owning object and
    /// deduplicated, preserving order.
    pub fn source_names(&self, sources: &[ItemSource]) -> Vec<String> {
        sources
            .iter()
            .map(|source| match source {
                ItemSource::Object { object, .. } => self.scene.objects[*object].name.clone(),
                ItemSource::WipeTower => "wipe tower".to_string(),
            })
            .unique()
            .collect()
    }
}

/// Applies a pose delivered by [`ArrangeJob::write_back`] to the scene.
pub fn apply_pose(scene: &mut Scene, source: ItemSource, pose: PlacedPose) {
    match source {
        ItemSource::Object { object, instance } => {
            let inst = &mut scene.objects[object].instances[instance];
            inst.translation = [pose.translation.0, pose.translation.1];
            inst.rotation = pose.rotation;
            inst.bed = Some(pose.bed);
        }
        ItemSource::WipeTower => {
            if let Some(wt) = scene.wipe_tower.as_mut() {
                wt.position = [pose.translation.0, pose.translation.1];
                wt.bed = Some(pose.bed);
            }
        }
    }
}
