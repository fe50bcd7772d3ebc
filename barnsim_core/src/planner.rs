//! RRT path planner.
//!
//! Single-query planner over the merged obstacle field. The tree is an
//! arena vector of nodes with integer parent indices; one planning
//! invocation owns all nodes and drops them together on return.

use nalgebra::Vector2;
use rand::Rng;

use crate::error::{SimError, SimResult};
use crate::geometry::Aabb;

/// Planner tuning. Defaults match the herd's step/arrival geometry.
#[derive(Debug, Clone)]
pub struct PlannerParams {
    /// Length of one tree extension in world units.
    pub step_size: f32,
    /// The goal counts as reached inside this radius.
    pub goal_radius: f32,
    /// Hard iteration budget; exceeding it is `PathNotFound`.
    pub max_iterations: usize,
    /// Probability of sampling the goal itself instead of a uniform
    /// point. Zero reproduces plain uniform sampling.
    pub goal_bias: f32,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            step_size: 24.0,
            goal_radius: 56.0,
            max_iterations: 10_000,
            goal_bias: 0.0,
        }
    }
}

struct PlanNode {
    position: Vector2<f32>,
    parent: Option<usize>,
}

/// Grow a tree from `start` until a node lands within the goal radius,
/// then return the polyline from `start` to that node. Waypoint edges
/// never cross an obstacle.
pub fn find_path(
    start: Vector2<f32>,
    goal: Vector2<f32>,
    obstacles: &[Aabb],
    world_extent: Vector2<f32>,
    params: &PlannerParams,
    rng: &mut impl Rng,
) -> SimResult<Vec<Vector2<f32>>> {
    let mut nodes = vec![PlanNode {
        position: start,
        parent: None,
    }];

    for _ in 0..params.max_iterations {
        let sample = if params.goal_bias > 0.0 && rng.gen::<f32>() < params.goal_bias {
            goal
        } else {
            Vector2::new(
                rng.gen::<f32>() * world_extent.x,
                rng.gen::<f32>() * world_extent.y,
            )
        };

        let nearest = nearest_node(&nodes, sample);
        let from = nodes[nearest].position;

        let direction = sample - from;
        let length = direction.norm();
        if length <= 0.0 {
            continue;
        }
        let new_position = from + direction * (params.step_size / length);

        if segment_hits_any(from, new_position, obstacles) {
            continue;
        }

        nodes.push(PlanNode {
            position: new_position,
            parent: Some(nearest),
        });

        if (new_position - goal).norm() < params.goal_radius {
            return Ok(build_path(&nodes, nodes.len() - 1));
        }
    }

    tracing::debug!(
        iterations = params.max_iterations,
        tree_size = nodes.len(),
        "planner exhausted its iteration budget"
    );
    Err(SimError::PathNotFound {
        iterations: params.max_iterations,
    })
}

/// Index of the tree node closest to `point`. Squared distance is
/// enough for the comparison; ties keep the first node found.
fn nearest_node(nodes: &[PlanNode], point: Vector2<f32>) -> usize {
    let mut nearest = 0;
    let mut min_dist = f32::MAX;
    for (i, node) in nodes.iter().enumerate() {
        let dist = (node.position - point).norm_squared();
        if dist < min_dist {
            nearest = i;
            min_dist = dist;
        }
    }
    nearest
}

fn build_path(nodes: &[PlanNode], leaf: usize) -> Vec<Vector2<f32>> {
    let mut path = Vec::new();
    let mut cursor = Some(leaf);
    while let Some(index) = cursor {
        path.push(nodes[index].position);
        cursor = nodes[index].parent;
    }
    path.reverse();
    path
}

/// Whether the segment `from -> to` intersects any obstacle.
pub fn segment_hits_any(from: Vector2<f32>, to: Vector2<f32>, obstacles: &[Aabb]) -> bool {
    obstacles
        .iter()
        .any(|aabb| segment_hits_aabb(from, to, aabb))
}

/// Slab test restricted to the segment's parameter interval `[0, 1]`.
/// Axis-parallel segments miss unless the fixed coordinate lies inside
/// the slab on that axis.
pub fn segment_hits_aabb(from: Vector2<f32>, to: Vector2<f32>, aabb: &Aabb) -> bool {
    let d = to - from;
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..2 {
        let (f, lo, hi, dk) = (from[axis], aabb.lower[axis], aabb.upper[axis], d[axis]);
        if dk == 0.0 {
            if f < lo || f > hi {
                return false;
            }
        } else {
            let mut t1 = (lo - f) / dk;
            let mut t2 = (hi - f) / dk;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
        }
    }

    tmin <= tmax && tmax >= 0.0 && tmin <= 1.0
}
