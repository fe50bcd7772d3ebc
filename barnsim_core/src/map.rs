//! Map compiler: turns the placed-area list into a merged obstacle set
//! and a boolean occupancy grid.
//!
//! Merging collapses edge-adjacent footprints into larger boxes so the
//! planner tests far fewer AABBs per raycast. The compiled set is
//! merge-closed: no two boxes in it still share a full edge.

use nalgebra::Vector2;

use crate::error::SimResult;
use crate::geometry::{Aabb, CELL_SIZE};
use crate::layout::PlacedArea;

/// Boolean grid marking cells covered by any placed area. Indexed
/// `[x][y]`, column-major like the editor grid.
#[derive(Debug, Clone, Default)]
pub struct OccupancyGrid {
    cells: Vec<Vec<bool>>,
}

impl OccupancyGrid {
    fn new(columns: usize, rows: usize) -> Self {
        Self {
            cells: vec![vec![false; rows]; columns],
        }
    }

    pub fn columns(&self) -> usize {
        self.cells.len()
    }

    pub fn rows(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Whether cell `(x, y)` is covered. Out-of-range cells read as
    /// occupied, matching the walled world boundary.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return true;
        }
        self.cells
            .get(x as usize)
            .and_then(|col| col.get(y as usize))
            .copied()
            .unwrap_or(true)
    }

    /// Count of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .map(|col| col.iter().filter(|&&c| c).count())
            .sum()
    }
}

/// Compiles the editor layout into collision obstacles and an
/// occupancy grid. Rebuilt from scratch whenever the layout changes.
#[derive(Debug, Default)]
pub struct MapMaker {
    obstacles: Vec<Aabb>,
    grid: OccupancyGrid,
    world_extent: Vector2<f32>,
}

impl MapMaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild obstacles, grid and world extent from the given layout.
    /// Validates every area against the grid bounds first.
    pub fn compile(&mut self, areas: &[PlacedArea], columns: usize, rows: usize) -> SimResult<()> {
        self.clear();

        let mut grid = OccupancyGrid::new(columns, rows);
        let mut aabbs = Vec::with_capacity(areas.len());
        for area in areas {
            area.validate(columns, rows)?;
            aabbs.push(area.footprint());
            for (cx, cy) in area.cells() {
                grid.cells[cx as usize][cy as usize] = true;
            }
        }

        self.obstacles = merge_aabbs(aabbs);
        self.grid = grid;
        self.world_extent = Vector2::new(columns as f32 * CELL_SIZE, rows as f32 * CELL_SIZE);
        Ok(())
    }

    /// Drop all derived state. Called on scene reset before a rebuild.
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.grid = OccupancyGrid::default();
        self.world_extent = Vector2::zeros();
    }

    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// World rectangle extent `(24 * columns, 24 * rows)`.
    pub fn world_extent(&self) -> Vector2<f32> {
        self.world_extent
    }
}

/// Collapse edge-adjacent boxes until no pair is mergeable. Runs
/// passes to a fixpoint: one pass can leave mergeable boxes behind
/// (a solid block first collapses into column strips, and a strip
/// emitted early never sees the strips formed after it). Quadratic
/// per pass, which is fine at editor scale.
fn merge_aabbs(mut aabbs: Vec<Aabb>) -> Vec<Aabb> {
    loop {
        let before = aabbs.len();
        aabbs = merge_pass(aabbs);
        // A pass without a merge compared every remaining pair.
        if aabbs.len() == before {
            return aabbs;
        }
    }
}

fn merge_pass(mut aabbs: Vec<Aabb>) -> Vec<Aabb> {
    aabbs.sort_by(|a, b| {
        a.lower
            .x
            .total_cmp(&b.lower.x)
            .then(a.lower.y.total_cmp(&b.lower.y))
    });

    let mut merged_set = Vec::new();
    while !aabbs.is_empty() {
        let mut current = aabbs.remove(0);

        // Absorb mergeable boxes, restarting the scan after each merge
        // because the grown box may now touch earlier candidates.
        let mut merged = true;
        while merged {
            merged = false;
            for i in 0..aabbs.len() {
                if current.is_mergeable_with(&aabbs[i]) {
                    current = current.merged(&aabbs[i]);
                    aabbs.remove(i);
                    merged = true;
                    break;
                }
            }
        }

        merged_set.push(current);
    }
    merged_set
}
