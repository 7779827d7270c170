use std::marker::PhantomData;

use anyhow::Result;
use log::info;

use crate::entities::{Bin, Item};
use crate::placement::{PlacementConfig, PlacementStrategy};
use crate::selection::{
    PackGroup, ProgressFn, SelectionConfig, SelectionStrategy, StopFn, UnfitFn,
};

/// Front-end of the engine: binds a [`PlacementStrategy`] type to a
/// [`SelectionStrategy`] instance, owns the bin shape and the default
/// placement config, and applies the symmetric clearance transform around
/// the run.
///
/// To guarantee a minimum gap of `min_obj_distance` between any two items'
/// original outlines, every item is inflated by half that distance before
/// packing and deflated by the same amount afterwards; the bin is expanded
/// outwards by the same half so the clearance is not also enforced against
/// the bed boundary. A distance of zero skips the transform entirely.
pub struct Nester<P, S>
where
    P: PlacementStrategy,
    S: SelectionStrategy,
{
    bin: Bin,
    pconfig: PlacementConfig,
    min_obj_distance: f64,
    selector: S,
    _placer: PhantomData<P>,
}

impl<P, S> Nester<P, S>
where
    P: PlacementStrategy,
    S: SelectionStrategy + Default,
{
    pub fn new(
        bin: Bin,
        min_obj_distance: f64,
        pconfig: PlacementConfig,
        sconfig: SelectionConfig,
    ) -> Self {
        let mut selector = S::default();
        selector.configure(&sconfig);
        Nester {
            bin,
            pconfig,
            min_obj_distance,
            selector,
            _placer: PhantomData,
        }
    }

    pub fn configure(&mut self, pconfig: PlacementConfig) {
        self.pconfig = pconfig;
    }

    pub fn configure_selection(&mut self, sconfig: &SelectionConfig) {
        self.selector.configure(sconfig);
    }

    pub fn progress_indicator(&mut self, f: ProgressFn) -> &mut Self {
        self.selector.progress_indicator(f);
        self
    }

    pub fn unfit_indicator(&mut self, f: UnfitFn) -> &mut Self {
        self.selector.unfit_indicator(f);
        self
    }

    pub fn stop_condition(&mut self, f: StopFn) -> &mut Self {
        self.selector.stop_condition(f);
        self
    }

    /// Arranges the items, mutating their transforms in place, and returns
    /// the number of bins used. Read the final poses off each item
    /// (`bin_id`, `translation`, `rotation`) or via [`Self::last_result`].
    ///
    /// An empty slice yields zero bins, invokes no callbacks and is not an
    /// error.
    pub fn execute(&mut self, items: &mut [Item]) -> Result<usize> {
        if items.is_empty() {
            self.selector.clear();
            return Ok(0);
        }

        let inflation = (self.min_obj_distance / 2.0).ceil();

        let bin = match inflation > 0.0 {
            true => self.bin.offset(inflation)?,
            false => self.bin.clone(),
        };

        if inflation > 0.0 {
            items.iter_mut().for_each(|item| item.inflate(inflation));
        }

        self.selector.pack_items::<P>(items, &bin, &self.pconfig);

        if inflation > 0.0 {
            items.iter_mut().for_each(|item| item.inflate(-inflation));
        }

        let n_bins = self.selector.result().len();
        info!(
            "[NEST] {} items over {n_bins} bin(s)",
            self.selector.result().iter().map(Vec::len).sum::<usize>()
        );
        Ok(n_bins)
    }

    pub fn last_result(&self) -> &PackGroup {
        self.selector.result()
    }

    pub fn last_packed_bin_id(&self) -> Option<usize> {
        self.selector.last_packed_bin_id()
    }
}
