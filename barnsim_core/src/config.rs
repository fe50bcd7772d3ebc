//! Scenario configuration.
//!
//! A scenario is the editor handoff in file form: grid dimensions, the
//! ordered layout list, herd size and tuning knobs. Loaded from YAML.

use serde::{Deserialize, Serialize};

use crate::activity::DEFAULT_ACTIVITY_FACTOR;
use crate::layout::{AreaKind, Orientation, PlacedArea};

/// Scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Editor grid width in cells.
    pub columns: usize,
    /// Editor grid height in cells.
    pub rows: usize,
    /// Herd size to spawn.
    pub number_of_cows: usize,
    /// Evasion chance in percent. Reserved: carried through from the
    /// tuning surface but not consumed by any behaviour yet.
    pub evade_probability: u32,
    /// Multiplier applied to the base dwell durations.
    pub activity_factor: f32,
    /// RNG seed for deterministic replay; entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Ordered list of placed functional areas.
    pub layout: Vec<PlacedArea>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            columns: 30,
            rows: 30,
            number_of_cows: 50,
            evade_probability: 75,
            activity_factor: DEFAULT_ACTIVITY_FACTOR,
            seed: None,
            layout: default_layout(),
        }
    }
}

impl ScenarioConfig {
    /// Parse a scenario from YAML.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    /// Serialise the scenario to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// A small working barn so the simulator runs out of the box: a row of
/// cubicles, a milking robot, feeders, a concentrate dispenser, a
/// drinker, a docking station and one free-standing obstacle.
fn default_layout() -> Vec<PlacedArea> {
    let place = |kind, orientation, gx, gy| PlacedArea {
        kind,
        orientation,
        gx,
        gy,
    };
    vec![
        place(AreaKind::Cubicle, Orientation::Vertical, 3, 22),
        place(AreaKind::Cubicle, Orientation::Vertical, 5, 22),
        place(AreaKind::Cubicle, Orientation::Vertical, 7, 22),
        place(AreaKind::Milker, Orientation::Horizontal, 22, 24),
        place(AreaKind::Feeder, Orientation::Square, 12, 3),
        place(AreaKind::Feeder, Orientation::Square, 14, 3),
        place(AreaKind::Concentrate, Orientation::Square, 20, 3),
        place(AreaKind::Drinker, Orientation::Square, 26, 14),
        place(AreaKind::DockingStation, Orientation::Square, 1, 1),
        place(AreaKind::Obstacle, Orientation::Horizontal, 14, 14),
    ]
}
