//! Cow agent: per-cow state machine, path cursor and kinematic
//! controller.
//!
//! A cow cycles through picking an activity, walking a planned path to
//! it and dwelling there. Motion is a bicycle model driven by a
//! proportional controller on distance and heading; the computed
//! velocities are written to the cow's rigid body and the physics
//! engine resolves contacts with walls, areas and other cows.

use nalgebra::Vector2;
use rand::Rng;
use rapier2d::prelude::RigidBodyHandle;

use crate::activity::ActivitySelector;
use crate::error::SimResult;
use crate::geometry::{unwind_angle, Aabb};
use crate::layout::PlacedArea;
use crate::physics::PhysicsWorld;
use crate::planner::{find_path, PlannerParams};

/// Half length of the cow body.
pub const COW_HALF_LENGTH: f32 = 14.0;
/// Half width of the cow body.
pub const COW_HALF_WIDTH: f32 = 2.0;
/// Corner radius of the rounded body box.
pub const COW_CORNER_RADIUS: f32 = 7.0;
/// Body friction against other shapes.
pub const COW_FRICTION: f32 = 0.1;
/// Distance between the virtual front and rear axles.
pub const COW_WHEELBASE: f32 = 10.0;
/// Speed ceiling in world units per second.
pub const COW_MAX_SPEED: f32 = 30.0;
/// Steering ceiling in radians.
pub const COW_MAX_STEERING: f32 = 1.0;
/// A waypoint counts as reached inside this radius.
pub const WAYPOINT_RADIUS: f32 = 48.0;
/// Proportional gain from target distance to speed.
pub const K_V: f32 = 0.5;
/// Obstacle inflation applied when testing spawn positions.
pub const SPAWN_INFLATE: f32 = 42.0;

/// Behaviour state of one cow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CowState {
    /// Needs a goal and a path.
    Starting,
    /// Following the planned path.
    Translating,
    /// Dwelling at the reached activity area.
    InActivity,
    /// Last goal selection or plan failed; retry on the next tick.
    Idling,
}

/// Read-only view of the scene a cow steps against.
pub struct SceneView<'a> {
    pub layout: &'a [PlacedArea],
    pub obstacles: &'a [Aabb],
    pub world_extent: Vector2<f32>,
    pub selector: &'a ActivitySelector,
    pub planner: &'a PlannerParams,
}

/// One cow agent. Owns its rigid body handle exclusively; never
/// touches another cow's body or the shared layout.
pub struct Cow {
    body: RigidBodyHandle,
    state: CowState,
    current_activity: usize,
    previous_activity: usize,
    goal_area: Option<PlacedArea>,
    path: Vec<Vector2<f32>>,
    waypoint_index: usize,
    speed: f32,
    steering_angle: f32,
    dwell_remaining: u32,
}

impl Cow {
    /// Create the rigid body and the agent around it.
    pub fn spawn(
        physics: &mut PhysicsWorld,
        position: Vector2<f32>,
        heading: f32,
        density: f32,
        initial_activity: usize,
    ) -> Self {
        let body = physics.create_dynamic_body(position, heading);
        physics.attach_box(
            body,
            Vector2::new(COW_HALF_LENGTH, COW_HALF_WIDTH),
            COW_CORNER_RADIUS,
            density,
            COW_FRICTION,
        );
        Self {
            body,
            state: CowState::Starting,
            current_activity: initial_activity,
            previous_activity: initial_activity,
            goal_area: None,
            path: Vec::new(),
            waypoint_index: 0,
            speed: 0.0,
            steering_angle: 0.0,
            dwell_remaining: 0,
        }
    }

    /// Remove the body from the world.
    pub fn despawn(self, physics: &mut PhysicsWorld) {
        physics.destroy_body(self.body);
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn state(&self) -> CowState {
        self.state
    }

    pub fn current_activity(&self) -> usize {
        self.current_activity
    }

    pub fn previous_activity(&self) -> usize {
        self.previous_activity
    }

    pub fn goal_area(&self) -> Option<&PlacedArea> {
        self.goal_area.as_ref()
    }

    pub fn path(&self) -> &[Vector2<f32>] {
        &self.path
    }

    pub fn dwell_remaining(&self) -> u32 {
        self.dwell_remaining
    }

    /// Advance the agent by one tick. Goal-selection and planning
    /// failures leave the cow `Idling` and are surfaced to the caller.
    pub fn step(
        &mut self,
        physics: &mut PhysicsWorld,
        scene: &SceneView<'_>,
        rng: &mut impl Rng,
    ) -> SimResult<()> {
        match self.state {
            CowState::Starting => self.begin_route(physics, scene, rng),
            CowState::Translating => {
                self.follow_path(physics, scene);
                Ok(())
            }
            CowState::InActivity => {
                self.dwell_remaining = self.dwell_remaining.saturating_sub(1);
                if self.dwell_remaining == 0 {
                    self.state = CowState::Starting;
                }
                Ok(())
            }
            CowState::Idling => {
                // Retry with a fresh goal next tick.
                self.state = CowState::Starting;
                Ok(())
            }
        }
    }

    /// Pick the next activity and plan a path to it.
    fn begin_route(
        &mut self,
        physics: &mut PhysicsWorld,
        scene: &SceneView<'_>,
        rng: &mut impl Rng,
    ) -> SimResult<()> {
        let Some((position, _)) = physics.pose(self.body) else {
            return Ok(());
        };

        let choice = scene
            .selector
            .pick_next(self.current_activity, scene.layout, rng);
        let (next, area) = match choice {
            Ok(pick) => pick,
            Err(err) => {
                self.state = CowState::Idling;
                return Err(err);
            }
        };

        let plan = find_path(
            position,
            area.center(),
            scene.obstacles,
            scene.world_extent,
            scene.planner,
            rng,
        );
        match plan {
            Ok(path) => {
                self.previous_activity = self.current_activity;
                self.current_activity = next;
                self.goal_area = Some(*area);
                self.path = path;
                self.waypoint_index = 0;
                self.state = CowState::Translating;
                Ok(())
            }
            Err(err) => {
                self.state = CowState::Idling;
                Err(err)
            }
        }
    }

    /// One tick of path following: compute controls toward the current
    /// waypoint, write body velocities, advance the cursor on arrival.
    fn follow_path(&mut self, physics: &mut PhysicsWorld, scene: &SceneView<'_>) {
        let Some((position, angle)) = physics.pose(self.body) else {
            return;
        };
        let target = self.path[self.waypoint_index];

        let (speed, steering) = point_controls(position, angle, target);
        self.speed = speed;
        self.steering_angle = steering;

        let velocity = Vector2::new(self.speed * angle.cos(), self.speed * angle.sin());
        let angular = (self.speed / COW_WHEELBASE) * self.steering_angle.tan();
        physics.set_linear_velocity(self.body, velocity);
        physics.set_angular_velocity(self.body, angular);

        if (target - position).norm() < WAYPOINT_RADIUS {
            if self.waypoint_index + 1 < self.path.len() {
                self.waypoint_index += 1;
            } else {
                self.speed = 0.0;
                self.waypoint_index = 0;
                self.dwell_remaining = scene.selector.duration(self.current_activity);
                self.state = CowState::InActivity;
                physics.set_linear_velocity(self.body, Vector2::zeros());
                physics.set_angular_velocity(self.body, 0.0);
            }
        }
    }
}

/// Proportional controls toward `target`: speed from distance, the
/// clamped heading error as the steering angle.
pub fn point_controls(
    position: Vector2<f32>,
    angle: f32,
    target: Vector2<f32>,
) -> (f32, f32) {
    let to_target = target - position;
    let distance = to_target.norm();
    let heading = to_target.y.atan2(to_target.x);
    let error = unwind_angle(heading - angle);

    let speed = (K_V * distance).clamp(0.0, COW_MAX_SPEED);
    let steering = error.clamp(-COW_MAX_STEERING, COW_MAX_STEERING);
    (speed, steering)
}
