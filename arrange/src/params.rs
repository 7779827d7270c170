use std::f64::consts::PI;

use bednest::placement::{Alignment, PlacementConfig};
use serde::{Deserialize, Serialize};

/// User-facing arrangement tunables, loadable from a JSON config file.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ArrangeParams {
    /// Minimum clearance between any two arranged objects, in scene units.
    pub min_obj_distance: f64,
    /// Try rotated poses (and pre-orient objects by their minimum-area
    /// bounding box).
    pub allow_rotations: bool,
    /// Quality/speed slider in `[0, 1]`.
    pub accuracy: f64,
    /// Evaluate pose candidates on all cores.
    pub parallel: bool,
    /// Cap on the number of beds; overrides the scene's bed count when set.
    #[serde(default)]
    pub max_beds: Option<usize>,
    /// Time budget in seconds. The engine has no timeout primitive of its
    /// own; this is implemented as a deadline-observing stop condition.
    #[serde(default)]
    pub timeout: Option<f64>,
}

impl Default for ArrangeParams {
    fn default() -> Self {
        ArrangeParams {
            min_obj_distance: 5.0,
            allow_rotations: false,
            accuracy: 0.65,
            parallel: true,
            max_beds: None,
            timeout: None,
        }
    }
}

impl ArrangeParams {
    /// Placer configuration carefully derived from the user parameters:
    /// pile gravitates to the bed center, quarter-turn rotations when
    /// rotations are allowed.
    pub fn placement_config(&self) -> PlacementConfig {
        let rotations = match self.allow_rotations {
            true => vec![0.0, PI / 2.0, PI, 3.0 * PI / 2.0],
            false => vec![0.0],
        };
        PlacementConfig {
            rotations,
            alignment: Alignment::Center,
            accuracy: self.accuracy,
            parallel: self.parallel,
            ..PlacementConfig::default()
        }
    }
}
