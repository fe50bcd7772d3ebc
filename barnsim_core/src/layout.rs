//! Functional areas placed on the editor grid.
//!
//! A placed area is immutable for the life of a scene. It contributes
//! one footprint AABB to the map compiler and exposes its world center
//! as the goal position for cows heading there.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::geometry::{cell_center, Aabb, CELL_SIZE};

/// Kinds of functional area. The first five are activity destinations;
/// docking stations and obstacles are collidable but never chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    Cubicle,
    Milker,
    Feeder,
    Concentrate,
    Drinker,
    DockingStation,
    Obstacle,
}

/// Number of activity destination kinds (indices `0..5`).
pub const ACTIVITY_KIND_COUNT: usize = 5;

impl AreaKind {
    /// Activity index in `0..5`, or `None` for non-destination kinds.
    pub fn activity_index(self) -> Option<usize> {
        match self {
            AreaKind::Cubicle => Some(0),
            AreaKind::Milker => Some(1),
            AreaKind::Feeder => Some(2),
            AreaKind::Concentrate => Some(3),
            AreaKind::Drinker => Some(4),
            AreaKind::DockingStation | AreaKind::Obstacle => None,
        }
    }

    /// Whether this kind may be placed with a non-square orientation.
    pub fn allows_elongation(self) -> bool {
        matches!(
            self,
            AreaKind::Cubicle | AreaKind::Milker | AreaKind::Concentrate
        )
    }
}

/// Footprint orientation of a placed area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// One cell, 24 x 24.
    Square,
    /// Two cells stacked, 24 x 48.
    Vertical,
    /// Two cells side by side, 48 x 24.
    Horizontal,
}

impl Orientation {
    pub fn half_extents(self) -> Vector2<f32> {
        match self {
            Orientation::Square => Vector2::new(12.0, 12.0),
            Orientation::Vertical => Vector2::new(12.0, 24.0),
            Orientation::Horizontal => Vector2::new(24.0, 12.0),
        }
    }
}

/// One functional area placed at grid cell `(gx, gy)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedArea {
    #[serde(rename = "type")]
    pub kind: AreaKind,
    pub orientation: Orientation,
    pub gx: i32,
    pub gy: i32,
}

impl PlacedArea {
    /// World center of the footprint.
    pub fn center(&self) -> Vector2<f32> {
        let mut c = cell_center(self.gx, self.gy);
        match self.orientation {
            Orientation::Square => {}
            Orientation::Vertical => c.y += CELL_SIZE / 2.0,
            Orientation::Horizontal => c.x += CELL_SIZE / 2.0,
        }
        c
    }

    /// Footprint AABB in world units.
    pub fn footprint(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center(), self.orientation.half_extents())
    }

    /// Grid cells covered by the footprint.
    pub fn cells(&self) -> Vec<(i32, i32)> {
        match self.orientation {
            Orientation::Square => vec![(self.gx, self.gy)],
            Orientation::Vertical => vec![(self.gx, self.gy), (self.gx, self.gy + 1)],
            Orientation::Horizontal => vec![(self.gx, self.gy), (self.gx + 1, self.gy)],
        }
    }

    /// Reject areas that leave the grid or combine a kind with an
    /// orientation the editor should not have produced. The core does
    /// not trust the editor.
    pub fn validate(&self, columns: usize, rows: usize) -> SimResult<()> {
        if !matches!(self.orientation, Orientation::Square) && !self.kind.allows_elongation() {
            return Err(SimError::InvalidLayout {
                reason: format!(
                    "{:?} at ({}, {}) must be square, got {:?}",
                    self.kind, self.gx, self.gy, self.orientation
                ),
            });
        }
        for (cx, cy) in self.cells() {
            if cx < 0 || cy < 0 || cx as usize >= columns || cy as usize >= rows {
                return Err(SimError::InvalidLayout {
                    reason: format!(
                        "{:?} at ({}, {}) covers cell ({}, {}) outside the {}x{} grid",
                        self.kind, self.gx, self.gy, cx, cy, columns, rows
                    ),
                });
            }
        }
        Ok(())
    }
}
