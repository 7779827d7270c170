mod first_fit;

use serde::{Deserialize, Serialize};

use crate::entities::{Bin, Item};
use crate::placement::{PlacementConfig, PlacementStrategy};

#[doc(inline)]
pub use first_fit::FirstFit;

/// The final output of a run: one entry per opened bin, each holding the
/// indices of the items assigned to it, in placement order (fixed items
/// first).
pub type PackGroup = Vec<Vec<usize>>;

/// Called after each successful placement with the number of items still to
/// be attempted.
pub type ProgressFn = Box<dyn FnMut(usize) + Send>;

/// Called once for each item that could not be placed in any bin.
pub type UnfitFn = Box<dyn FnMut(&Item) + Send>;

/// Polled once per item; returning `true` terminates the run early, leaving
/// accepted placements intact and treating all remaining items as unfit.
pub type StopFn = Box<dyn Fn() -> bool + Send>;

/// Tunables shared by selection strategies.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
pub struct SelectionConfig {
    /// Cap on the number of bins that may be opened. `None` allows unlimited
    /// overflow bins.
    pub max_bins: Option<usize>,
}

/// Strategy deciding item order and bin assignment across potentially many
/// bins: the counterpart of [`PlacementStrategy`], which it drives once per
/// candidate bin.
///
/// Both seams operate on the same `Item`/`Bin` representation, so any
/// placement implementation can be bound to any selection implementation at
/// compile time.
pub trait SelectionStrategy {
    fn configure(&mut self, config: &SelectionConfig);

    fn progress_indicator(&mut self, f: ProgressFn);

    fn unfit_indicator(&mut self, f: UnfitFn);

    fn stop_condition(&mut self, f: StopFn);

    /// Packs every non-fixed item of `items`, in slice order, into bins of
    /// shape `bin`, assigning each item's `bin_id` on success and reporting
    /// it unfit otherwise. Fixed items with a bin assignment are preloaded
    /// into their bin and never moved.
    ///
    /// Callers that care about priorities pre-sort the slice
    /// (priority-descending, stable) so ties keep insertion order.
    fn pack_items<P: PlacementStrategy>(
        &mut self,
        items: &mut [Item],
        bin: &Bin,
        pconfig: &PlacementConfig,
    );

    fn result(&self) -> &PackGroup;

    /// Ordinal of the bin that received the most recent placement.
    fn last_packed_bin_id(&self) -> Option<usize>;

    /// Clears the result so a new session can be started.
    fn clear(&mut self);
}
