//! Thin wrapper over the rapier2d physics world.
//!
//! The simulation core only needs body creation, pose queries,
//! velocity writes and body destruction; everything else the engine
//! does (integration, contacts between cows, the solver) is behind
//! `step()`.

use nalgebra::Vector2;
use rapier2d::prelude::*;

/// Physics world with a zero-gravity default (top-down barn).
pub struct PhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    gravity: Vector<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    physics_hooks: (),
    event_handler: (),
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            physics_hooks: (),
            event_handler: (),
        }
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_gravity(&mut self, gravity: Vector2<f32>) {
        self.gravity = gravity;
    }

    pub fn create_static_body(&mut self, position: Vector2<f32>) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed().translation(position).build();
        self.rigid_body_set.insert(body)
    }

    pub fn create_dynamic_body(&mut self, position: Vector2<f32>, angle: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(position)
            .rotation(angle)
            .build();
        self.rigid_body_set.insert(body)
    }

    /// Attach a box collider. A non-zero `rounded_radius` grows the
    /// box into a rounded box, which is what the cow bodies use.
    pub fn attach_box(
        &mut self,
        handle: RigidBodyHandle,
        half_extents: Vector2<f32>,
        rounded_radius: f32,
        density: f32,
        friction: f32,
    ) {
        let builder = if rounded_radius > 0.0 {
            ColliderBuilder::round_cuboid(half_extents.x, half_extents.y, rounded_radius)
        } else {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
        };
        let collider = builder.density(density).friction(friction).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
    }

    /// Attach a closed polyline to a body; used for the barn walls.
    pub fn attach_chain_loop(&mut self, handle: RigidBodyHandle, points: &[Vector2<f32>]) {
        let vertices: Vec<Point<f32>> = points.iter().map(|p| point![p.x, p.y]).collect();
        let count = vertices.len() as u32;
        let indices: Vec<[u32; 2]> = (0..count).map(|i| [i, (i + 1) % count]).collect();
        let collider = ColliderBuilder::polyline(vertices, Some(indices)).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
    }

    /// Position and heading of a body.
    pub fn pose(&self, handle: RigidBodyHandle) -> Option<(Vector2<f32>, f32)> {
        self.rigid_body_set
            .get(handle)
            .map(|body| (*body.translation(), body.rotation().angle()))
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vector2<f32>) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(velocity, true);
        }
    }

    pub fn set_angular_velocity(&mut self, handle: RigidBodyHandle, velocity: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_angvel(velocity, true);
        }
    }

    /// Remove a body and its colliders.
    pub fn destroy_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Advance the solver by one tick.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &self.physics_hooks,
            &self.event_handler,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_body_round_trip() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_dynamic_body(Vector2::new(10.0, 20.0), 0.5);
        world.attach_box(handle, Vector2::new(14.0, 2.0), 7.0, 5.0, 0.1);

        let (position, angle) = world.pose(handle).unwrap();
        assert_eq!(position, Vector2::new(10.0, 20.0));
        assert!((angle - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_velocity_moves_body_across_steps() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_dynamic_body(Vector2::new(0.0, 0.0), 0.0);
        world.attach_box(handle, Vector2::new(14.0, 2.0), 7.0, 1.0, 0.1);
        world.set_linear_velocity(handle, Vector2::new(60.0, 0.0));

        for _ in 0..60 {
            world.step();
        }
        let (position, _) = world.pose(handle).unwrap();
        // One second of simulated time at 60 units/s, no gravity.
        assert!(position.x > 30.0);
        assert!(position.y.abs() < 1.0);
    }

    #[test]
    fn test_destroy_removes_body() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_static_body(Vector2::new(0.0, 0.0));
        assert_eq!(world.body_count(), 1);
        world.destroy_body(handle);
        assert_eq!(world.body_count(), 0);
        assert!(world.pose(handle).is_none());
    }
}
