//! Markov activity selection.
//!
//! A cow finishing an activity draws its next one from a fixed 5x5
//! transition matrix, filtered down to the activity kinds that exist
//! in the current layout, then picks one concrete area of that kind
//! uniformly at random.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{SimError, SimResult};
use crate::layout::{PlacedArea, ACTIVITY_KIND_COUNT};

/// Row `i` is the PMF of the next activity given current activity `i`.
/// Order: Cubicle, Milker, Feeder, Concentrate, Drinker.
pub const TRANSITION_MATRIX: [[f32; ACTIVITY_KIND_COUNT]; ACTIVITY_KIND_COUNT] = [
    [0.10, 0.30, 0.19, 0.05, 0.36], // Cubicle
    [0.27, 0.01, 0.43, 0.20, 0.09], // Milker
    [0.75, 0.01, 0.03, 0.05, 0.16], // Feeder
    [0.50, 0.01, 0.35, 0.03, 0.11], // Concentrate
    [0.30, 0.20, 0.30, 0.15, 0.05], // Drinker
];

/// Dwell duration per activity in ticks, before the tunable factor.
pub const BASE_DWELL_TICKS: [f32; ACTIVITY_KIND_COUNT] = [70.0, 8.0, 36.5, 9.74, 4.5];

/// Default multiplier applied to `BASE_DWELL_TICKS`.
pub const DEFAULT_ACTIVITY_FACTOR: f32 = 60.0;

// A redraw bound far above anything the rejection sampler needs when
// the support intersection is non-empty.
const MAX_REDRAWS: usize = 10_000;

/// Owns the normalised transition rows and the dwell table.
#[derive(Debug, Clone)]
pub struct ActivitySelector {
    rows: [[f32; ACTIVITY_KIND_COUNT]; ACTIVITY_KIND_COUNT],
    samplers: Vec<WeightedIndex<f32>>,
    durations: [u32; ACTIVITY_KIND_COUNT],
}

impl ActivitySelector {
    /// Build the selector, normalising each matrix row so it sums to
    /// one regardless of what the table said.
    pub fn new(activity_factor: f32) -> Self {
        let mut rows = TRANSITION_MATRIX;
        for row in &mut rows {
            let sum: f32 = row.iter().sum();
            for weight in row.iter_mut() {
                *weight /= sum;
            }
        }

        let samplers = rows
            .iter()
            .map(|row| WeightedIndex::new(row).expect("transition row has positive mass"))
            .collect();

        let mut durations = [0; ACTIVITY_KIND_COUNT];
        for (slot, base) in durations.iter_mut().zip(BASE_DWELL_TICKS) {
            *slot = (base * activity_factor) as u32;
        }

        Self {
            rows,
            samplers,
            durations,
        }
    }

    /// Dwell duration of `activity` in ticks.
    pub fn duration(&self, activity: usize) -> u32 {
        self.durations[activity]
    }

    /// Normalised transition row for `current`.
    pub fn row(&self, current: usize) -> &[f32; ACTIVITY_KIND_COUNT] {
        &self.rows[current]
    }

    /// Draw the next activity from the row of `current`, restricted to
    /// kinds present in `layout`, and pick one matching area uniformly.
    pub fn pick_next<'a>(
        &self,
        current: usize,
        layout: &'a [PlacedArea],
        rng: &mut impl Rng,
    ) -> SimResult<(usize, &'a PlacedArea)> {
        let mut available = [false; ACTIVITY_KIND_COUNT];
        let mut any = false;
        for area in layout {
            if let Some(index) = area.kind.activity_index() {
                available[index] = true;
                any = true;
            }
        }
        if !any {
            return Err(SimError::EmptyLayout);
        }

        let row = &self.rows[current];
        if !available
            .iter()
            .zip(row)
            .any(|(&present, &weight)| present && weight > 0.0)
        {
            return Err(SimError::NoEligibleActivity { current });
        }

        // Rejection-sample the row until the draw names a kind that is
        // actually placed. Terminates almost surely; the bound only
        // guards degenerate numerics.
        let mut next = None;
        for _ in 0..MAX_REDRAWS {
            let draw = self.samplers[current].sample(rng);
            if available[draw] {
                next = Some(draw);
                break;
            }
        }
        let next = next.ok_or(SimError::NoEligibleActivity { current })?;

        let matching: Vec<&PlacedArea> = layout
            .iter()
            .filter(|area| area.kind.activity_index() == Some(next))
            .collect();
        let instance = matching[rng.gen_range(0..matching.len())];
        Ok((next, instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{AreaKind, Orientation};
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn area(kind: AreaKind, gx: i32) -> PlacedArea {
        PlacedArea {
            kind,
            orientation: Orientation::Square,
            gx,
            gy: 0,
        }
    }

    #[test]
    fn test_rows_are_normalised() {
        let selector = ActivitySelector::new(DEFAULT_ACTIVITY_FACTOR);
        for current in 0..ACTIVITY_KIND_COUNT {
            let sum: f32 = selector.row(current).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_durations_apply_factor() {
        let selector = ActivitySelector::new(60.0);
        assert_eq!(selector.duration(0), 4200);
        assert_eq!(selector.duration(1), 480);
        assert_eq!(selector.duration(2), 2190);
        assert_eq!(selector.duration(3), 584);
        assert_eq!(selector.duration(4), 270);
    }

    #[test]
    fn test_pick_next_only_returns_placed_kinds() {
        let selector = ActivitySelector::new(DEFAULT_ACTIVITY_FACTOR);
        let layout = vec![area(AreaKind::Cubicle, 0), area(AreaKind::Drinker, 2)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let (next, instance) = selector.pick_next(0, &layout, &mut rng).unwrap();
            assert!(next == 0 || next == 4);
            assert_eq!(instance.kind.activity_index(), Some(next));
        }
    }

    #[test]
    fn test_empty_layout_is_fatal() {
        let selector = ActivitySelector::new(DEFAULT_ACTIVITY_FACTOR);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            selector.pick_next(0, &[], &mut rng).err(),
            Some(SimError::EmptyLayout)
        );
        // Docking stations and obstacles are not destinations.
        let layout = vec![area(AreaKind::Obstacle, 0), area(AreaKind::DockingStation, 1)];
        assert_eq!(
            selector.pick_next(0, &layout, &mut rng).err(),
            Some(SimError::EmptyLayout)
        );
    }

    #[test]
    fn test_filtered_distribution_matches_restricted_row() {
        // Cubicle row restricted to {Cubicle, Drinker}: the drinker
        // share converges to 0.36 / (0.10 + 0.36).
        let selector = ActivitySelector::new(DEFAULT_ACTIVITY_FACTOR);
        let layout = vec![area(AreaKind::Cubicle, 0), area(AreaKind::Drinker, 2)];
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let draws = 20_000;
        let mut drinker = 0usize;
        for _ in 0..draws {
            let (next, _) = selector.pick_next(0, &layout, &mut rng).unwrap();
            if next == 4 {
                drinker += 1;
            }
        }
        let expected = 0.36 / (0.10 + 0.36);
        let observed = drinker as f32 / draws as f32;
        assert!((observed - expected).abs() < 0.02);
    }
}
