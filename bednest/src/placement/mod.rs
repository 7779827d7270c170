mod bottom_left;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::entities::{Bin, Item};
use crate::geometry::primitives::Point;

#[doc(inline)]
pub use bottom_left::BottomLeftPlacer;

/// Anchor towards which a placement strategy gravitates the packed pile.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Center,
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

/// Tunables shared by placement strategies.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlacementConfig {
    /// Rotations (radians, relative to the item's current rotation) to try
    /// for each item. An empty list is treated as `[0.0]`.
    pub rotations: Vec<f64>,
    /// Where to gravitate the packed pile.
    pub alignment: Alignment,
    /// Quality/speed slider in `[0, 1]`: scales the pose search density.
    pub accuracy: f64,
    /// Explicit search step in coordinate units, overriding the
    /// accuracy-derived step.
    pub step: Option<f64>,
    /// Scoring weight of the distance-to-anchor term.
    pub dist_weight: f64,
    /// Scoring weight of the pile-density term.
    pub density_weight: f64,
    /// Evaluate pose candidates on all cores. The outcome is identical to a
    /// sequential run.
    pub parallel: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            rotations: vec![0.0, PI / 2.0, PI, 3.0 * PI / 2.0],
            alignment: Alignment::Center,
            accuracy: 0.65,
            step: None,
            dist_weight: 0.5,
            density_weight: 0.5,
            parallel: true,
        }
    }
}

/// A pose found by [`PlacementStrategy::try_pack`], carrying everything
/// needed to commit it later without recomputation.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    /// Index of the item in the run's item slice.
    pub item: usize,
    /// Absolute translation to apply on accept.
    pub translation: Point,
    /// Absolute rotation to apply on accept.
    pub rotation: f64,
    pub score: f64,
}

/// Outcome of a single placement attempt.
#[derive(Clone, Copy, Debug)]
pub enum PackResult {
    Placed(Placement),
    /// No valid pose exists in this bin. `overfit` quantifies by how much
    /// the item exceeded the bin in the best attempt (0 if it fit the bin
    /// but collided everywhere).
    Unfit { overfit: f64 },
}

impl PackResult {
    pub fn is_placed(&self) -> bool {
        matches!(self, PackResult::Placed(_))
    }

    pub fn placement(&self) -> Option<&Placement> {
        match self {
            PackResult::Placed(p) => Some(p),
            PackResult::Unfit { .. } => None,
        }
    }
}

/// Strategy searching for a valid pose of one item within one bin.
///
/// `try_pack` and `accept` are split so a selection strategy can probe
/// several candidate bins for the same item before committing to one,
/// without speculatively mutating shared state.
pub trait PlacementStrategy {
    fn new(bin: Bin, config: &PlacementConfig) -> Self
    where
        Self: Sized;

    /// Replaces the tunables. May be called mid-run; already accepted
    /// placements are unaffected.
    fn configure(&mut self, config: &PlacementConfig);

    fn bin(&self) -> &Bin;

    /// Searches for a valid, non-overlapping pose for `items[candidate]`
    /// against the bin and all previously accepted items.
    ///
    /// `remaining` is a read-only look-ahead of the not-yet-attempted item
    /// indices; implementations may use it to adapt their search but must
    /// not mutate those items. A pure attempt: neither the item nor the bin
    /// state is modified.
    fn try_pack(&self, items: &[Item], candidate: usize, remaining: &[usize]) -> PackResult;

    /// Commits a previously returned result: applies the transform to the
    /// item and records it as occupying space in the bin.
    /// A no-op for [`PackResult::Unfit`].
    fn accept(&mut self, items: &mut [Item], result: &PackResult);

    /// Registers already-placed items: they contribute to collision checks
    /// but are not subject to `try_pack` and are never moved.
    fn preload(&mut self, items: &[Item], fixed: &[usize]);

    /// Undoes the most recent `accept`. Preloaded items are not affected.
    fn unpack_last(&mut self);

    /// Removes all accepted and preloaded items.
    fn clear_items(&mut self);

    /// Removes accepted/preloaded items for which `keep` returns false.
    fn retain_items(&mut self, items: &[Item], keep: &dyn Fn(&Item) -> bool);

    /// Total area occupied by the items in the bin.
    fn filled_area(&self) -> f64;

    /// Accumulated placement score of the accepted items.
    fn score(&self) -> f64;

    /// Indices of the items in the bin, in placement order (preloaded first).
    fn packed(&self) -> Vec<usize>;
}
