use log::{debug, info};

use crate::entities::{Bin, Item};
use crate::placement::{PlacementConfig, PlacementStrategy};
use crate::selection::{
    PackGroup, ProgressFn, SelectionConfig, SelectionStrategy, StopFn, UnfitFn,
};

/// First-fit selection: each item goes into the first open bin with a valid
/// pose, tried in ordinal order; a new bin is opened on exhaustion, up to
/// [`SelectionConfig::max_bins`].
///
/// One placer instance is owned per open bin, indexed by bin ordinal, so
/// opening and dropping bins has clear lifetime semantics.
#[derive(Default)]
pub struct FirstFit {
    config: SelectionConfig,
    result: PackGroup,
    last_packed_bin: Option<usize>,
    on_progress: Option<ProgressFn>,
    on_unfit: Option<UnfitFn>,
    stop: Option<StopFn>,
}

impl SelectionStrategy for FirstFit {
    fn configure(&mut self, config: &SelectionConfig) {
        self.config = *config;
    }

    fn progress_indicator(&mut self, f: ProgressFn) {
        self.on_progress = Some(f);
    }

    fn unfit_indicator(&mut self, f: UnfitFn) {
        self.on_unfit = Some(f);
    }

    fn stop_condition(&mut self, f: StopFn) {
        self.stop = Some(f);
    }

    fn pack_items<P: PlacementStrategy>(
        &mut self,
        items: &mut [Item],
        bin: &Bin,
        pconfig: &PlacementConfig,
    ) {
        self.result.clear();
        self.last_packed_bin = None;

        //fixed items are preloaded into their bin, everything else is packed
        let fixed: Vec<usize> = (0..items.len())
            .filter(|&i| items[i].is_fixed() && items[i].bin_id().is_some())
            .collect();
        let movable: Vec<usize> = (0..items.len()).filter(|&i| !items[i].is_fixed()).collect();

        let mut placers: Vec<P> = vec![];

        //bins holding fixed items exist up front, whether or not anything
        //movable ever lands on them
        let preopened = fixed
            .iter()
            .filter_map(|&i| items[i].bin_id())
            .max()
            .map_or(0, |b| b + 1);
        for _ in 0..preopened {
            open_bin(&mut placers, &mut self.result, items, &fixed, bin, pconfig);
        }

        let mut stopped = false;
        for (pos, &idx) in movable.iter().enumerate() {
            if !stopped && self.stop.as_ref().is_some_and(|f| f()) {
                info!("[FF] stop condition fired, {} items left", movable.len() - pos);
                stopped = true;
            }
            if stopped {
                items[idx].set_bin_id(None);
                if let Some(cb) = self.on_unfit.as_mut() {
                    cb(&items[idx]);
                }
                continue;
            }

            let remaining = &movable[pos + 1..];
            let mut placed_in = None;

            for (b, placer) in placers.iter_mut().enumerate() {
                let result = placer.try_pack(items, idx, remaining);
                if result.is_placed() {
                    placer.accept(items, &result);
                    placed_in = Some(b);
                    break;
                }
            }

            if placed_in.is_none() {
                let can_open = self.config.max_bins.is_none_or(|m| placers.len() < m);
                if can_open {
                    open_bin(&mut placers, &mut self.result, items, &fixed, bin, pconfig);
                    let b = placers.len() - 1;
                    let result = placers[b].try_pack(items, idx, remaining);
                    if result.is_placed() {
                        placers[b].accept(items, &result);
                        placed_in = Some(b);
                    } else if self.result[b].is_empty() {
                        //the fresh bin could not even hold this item on its
                        //own and carries no fixed items: close it again
                        placers.pop();
                        self.result.pop();
                    }
                }
            }

            match placed_in {
                Some(b) => {
                    items[idx].set_bin_id(Some(b));
                    self.result[b].push(idx);
                    self.last_packed_bin = Some(b);
                    debug!("[FF] item {} -> bin {b}", items[idx].id);
                    if let Some(cb) = self.on_progress.as_mut() {
                        cb(movable.len() - pos - 1);
                    }
                }
                None => {
                    items[idx].set_bin_id(None);
                    debug!("[FF] item {} does not fit in any bin", items[idx].id);
                    if let Some(cb) = self.on_unfit.as_mut() {
                        cb(&items[idx]);
                    }
                }
            }
        }
    }

    fn result(&self) -> &PackGroup {
        &self.result
    }

    fn last_packed_bin_id(&self) -> Option<usize> {
        self.last_packed_bin
    }

    fn clear(&mut self) {
        self.result.clear();
        self.last_packed_bin = None;
    }
}

/// Opens the next bin ordinal: constructs its placer and preloads the fixed
/// items pinned to it.
fn open_bin<P: PlacementStrategy>(
    placers: &mut Vec<P>,
    result: &mut PackGroup,
    items: &[Item],
    fixed: &[usize],
    bin: &Bin,
    pconfig: &PlacementConfig,
) {
    let ordinal = placers.len();
    let mut placer = P::new(bin.clone(), pconfig);

    let in_bin: Vec<usize> = fixed
        .iter()
        .copied()
        .filter(|&i| items[i].bin_id() == Some(ordinal))
        .collect();
    if !in_bin.is_empty() {
        placer.preload(items, &in_bin);
    }

    placers.push(placer);
    result.push(in_bin);
}
