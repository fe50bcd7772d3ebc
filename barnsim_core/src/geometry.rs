//! Geometry primitives shared by the map compiler, planner and agents.
//!
//! Positions and extents are `nalgebra::Vector2<f32>` in world units.
//! One editor cell is `CELL_SIZE` x `CELL_SIZE` world units.

use nalgebra::Vector2;

/// Side length of one editor grid cell in world units.
pub const CELL_SIZE: f32 = 24.0;

/// Axis-aligned bounding box with `lower <= upper` componentwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub lower: Vector2<f32>,
    pub upper: Vector2<f32>,
}

impl Aabb {
    pub fn new(lower: Vector2<f32>, upper: Vector2<f32>) -> Self {
        debug_assert!(lower.x <= upper.x && lower.y <= upper.y);
        Self { lower, upper }
    }

    pub fn from_center_half_extents(center: Vector2<f32>, half: Vector2<f32>) -> Self {
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> Vector2<f32> {
        (self.lower + self.upper) * 0.5
    }

    pub fn half_extents(&self) -> Vector2<f32> {
        (self.upper - self.lower) * 0.5
    }

    /// Strict interval overlap on both axes. Boxes that only share an
    /// edge do not overlap; edge-adjacency is what `is_mergeable_with`
    /// detects.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.lower.x < other.upper.x
            && other.lower.x < self.upper.x
            && self.lower.y < other.upper.y
            && other.lower.y < self.upper.y
    }

    /// Whether `point` lies inside the box grown by `inflate` on every
    /// side (closed intervals).
    pub fn contains_inflated(&self, point: Vector2<f32>, inflate: f32) -> bool {
        self.lower.x - inflate <= point.x
            && point.x <= self.upper.x + inflate
            && self.lower.y - inflate <= point.y
            && point.y <= self.upper.y + inflate
    }

    /// Two boxes are mergeable when they share a full edge: touching
    /// intervals on one axis and identical intervals on the other.
    pub fn is_mergeable_with(&self, other: &Aabb) -> bool {
        if self.upper.x == other.lower.x || other.upper.x == self.lower.x {
            return self.lower.y == other.lower.y && self.upper.y == other.upper.y;
        }
        if self.upper.y == other.lower.y || other.upper.y == self.lower.y {
            return self.lower.x == other.lower.x && self.upper.x == other.upper.x;
        }
        false
    }

    /// Componentwise union. Only meaningful when `is_mergeable_with`
    /// holds; the result then covers exactly the two inputs.
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            lower: Vector2::new(
                self.lower.x.min(other.lower.x),
                self.lower.y.min(other.lower.y),
            ),
            upper: Vector2::new(
                self.upper.x.max(other.upper.x),
                self.upper.y.max(other.upper.y),
            ),
        }
    }
}

/// World center of grid cell `(gx, gy)`.
pub fn cell_center(gx: i32, gy: i32) -> Vector2<f32> {
    Vector2::new(
        CELL_SIZE * gx as f32 + CELL_SIZE / 2.0,
        CELL_SIZE * gy as f32 + CELL_SIZE / 2.0,
    )
}

/// Grid cell containing a world point.
pub fn world_to_cell(point: Vector2<f32>) -> (i32, i32) {
    (
        (point.x / CELL_SIZE).floor() as i32,
        (point.y / CELL_SIZE).floor() as i32,
    )
}

/// Normalise an angle to the interval (-pi, pi].
pub fn unwind_angle(theta: f32) -> f32 {
    use std::f32::consts::PI;
    let mut a = theta % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}
