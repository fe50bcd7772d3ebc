//! Barn coordinator.
//!
//! Owns the physics world, the compiled map, the herd and the scene
//! RNG. Builds the scene from a `ScenarioConfig`, advances every cow
//! each tick (fixed order, cow index ascending) and then steps the
//! physics solver once.

use nalgebra::Vector2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rapier2d::prelude::RigidBodyHandle;
use tracing::{debug, info, warn};

use crate::activity::ActivitySelector;
use crate::config::ScenarioConfig;
use crate::cow::{Cow, CowState, SceneView, SPAWN_INFLATE};
use crate::error::{SimError, SimResult};
use crate::geometry::world_to_cell;
use crate::map::MapMaker;
use crate::physics::PhysicsWorld;
use crate::planner::PlannerParams;

// Static area collider material
const AREA_DENSITY: f32 = 10.0;
const AREA_FRICTION: f32 = 0.2;

/// Placement attempts per cow before giving up on the map.
const SPAWN_ATTEMPTS: usize = 1_000;

/// How the herd spawn went. The scene stays usable when fewer cows
/// fit than were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HerdReport {
    pub requested: usize,
    pub spawned: usize,
}

/// The simulation scene: world, layout, compiled map and herd.
pub struct Barn {
    config: ScenarioConfig,
    physics: PhysicsWorld,
    map: MapMaker,
    selector: ActivitySelector,
    planner: PlannerParams,
    cows: Vec<Cow>,
    area_bodies: Vec<RigidBodyHandle>,
    wall_body: Option<RigidBodyHandle>,
    rng: ChaCha8Rng,
    tick: u64,
    herd_report: HerdReport,
    replan_failures: u64,
}

impl Barn {
    /// Build a scene from the given scenario. Fails on an invalid
    /// layout, or on a layout with no activity areas while cows were
    /// requested.
    pub fn new(config: ScenarioConfig) -> SimResult<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut barn = Self {
            selector: ActivitySelector::new(config.activity_factor),
            planner: PlannerParams::default(),
            physics: PhysicsWorld::new(),
            map: MapMaker::new(),
            cows: Vec::new(),
            area_bodies: Vec::new(),
            wall_body: None,
            rng,
            tick: 0,
            herd_report: HerdReport {
                requested: config.number_of_cows,
                spawned: 0,
            },
            replan_failures: 0,
            config,
        };
        barn.build_scene()?;
        Ok(barn)
    }

    /// Compile the map, create the static world and spawn the herd.
    fn build_scene(&mut self) -> SimResult<()> {
        let config = &self.config;
        if config.number_of_cows > 0
            && !config
                .layout
                .iter()
                .any(|area| area.kind.activity_index().is_some())
        {
            return Err(SimError::EmptyLayout);
        }

        self.map
            .compile(&config.layout, config.columns, config.rows)?;
        let extent = self.map.world_extent();

        // Top-down view: nothing pulls the herd sideways.
        self.physics.set_gravity(Vector2::zeros());

        // Enclosing wall chain around the world rectangle.
        let wall = self.physics.create_static_body(Vector2::zeros());
        self.physics.attach_chain_loop(
            wall,
            &[
                Vector2::new(0.0, 0.0),
                Vector2::new(extent.x, 0.0),
                Vector2::new(extent.x, extent.y),
                Vector2::new(0.0, extent.y),
            ],
        );
        self.wall_body = Some(wall);

        // Every placed area is also a static collider at its center.
        for area in &self.config.layout {
            let footprint = area.footprint();
            let body = self.physics.create_static_body(footprint.center());
            self.physics.attach_box(
                body,
                footprint.half_extents(),
                0.0,
                AREA_DENSITY,
                AREA_FRICTION,
            );
            self.area_bodies.push(body);
        }

        self.spawn_herd();
        info!(
            columns = self.config.columns,
            rows = self.config.rows,
            areas = self.config.layout.len(),
            obstacles = self.map.obstacles().len(),
            cows = self.herd_report.spawned,
            "barn scene built"
        );
        Ok(())
    }

    /// Spawn up to the requested number of cows at free positions.
    fn spawn_herd(&mut self) {
        let requested = self.config.number_of_cows;
        for index in 0..requested {
            match self.sample_spawn_point() {
                Ok(position) => {
                    let heading = self.rng.gen_range(0.0..std::f32::consts::TAU);
                    let density = self.rng.gen_range(1..=100) as f32;
                    let initial_activity = self.rng.gen_range(0..4);
                    self.cows.push(Cow::spawn(
                        &mut self.physics,
                        position,
                        heading,
                        density,
                        initial_activity,
                    ));
                }
                Err(err) => {
                    warn!(spawned = index, requested, %err, "herd spawn stopped early");
                    break;
                }
            }
        }
        self.herd_report = HerdReport {
            requested,
            spawned: self.cows.len(),
        };
    }

    /// Uniform integer positions, rejecting any inside an obstacle
    /// inflated by the spawn margin.
    fn sample_spawn_point(&mut self) -> SimResult<Vector2<f32>> {
        let extent = self.map.world_extent();
        let (max_x, max_y) = (extent.x as u32, extent.y as u32);
        for _ in 0..SPAWN_ATTEMPTS {
            let point = Vector2::new(
                self.rng.gen_range(0..max_x) as f32,
                self.rng.gen_range(0..max_y) as f32,
            );
            // Occupied cells are inside some footprint; skip the
            // obstacle scan for them.
            let (cx, cy) = world_to_cell(point);
            if self.map.grid().is_occupied(cx, cy) {
                continue;
            }
            let trapped = self
                .map
                .obstacles()
                .iter()
                .any(|aabb| aabb.contains_inflated(point, SPAWN_INFLATE));
            if !trapped {
                return Ok(point);
            }
        }
        Err(SimError::SpawnInfeasible {
            attempts: SPAWN_ATTEMPTS,
        })
    }

    /// Advance the whole scene by one tick: every cow in index order,
    /// then the physics solver.
    pub fn step(&mut self) {
        let scene = SceneView {
            layout: &self.config.layout,
            obstacles: self.map.obstacles(),
            world_extent: self.map.world_extent(),
            selector: &self.selector,
            planner: &self.planner,
        };
        for cow in &mut self.cows {
            if let Err(err) = cow.step(&mut self.physics, &scene, &mut self.rng) {
                self.replan_failures += 1;
                debug!(%err, "cow idles after failed goal selection or plan");
            }
        }
        self.physics.step();
        self.tick += 1;
    }

    /// Despawn the herd and spawn a fresh one on the existing map.
    pub fn reset_cows(&mut self) {
        for cow in self.cows.drain(..) {
            cow.despawn(&mut self.physics);
        }
        self.spawn_herd();
    }

    /// Tear the whole scene down and rebuild it from the stored
    /// scenario: areas, map, walls and herd.
    pub fn reset_scene(&mut self) -> SimResult<()> {
        for cow in self.cows.drain(..) {
            cow.despawn(&mut self.physics);
        }
        for body in self.area_bodies.drain(..) {
            self.physics.destroy_body(body);
        }
        if let Some(wall) = self.wall_body.take() {
            self.physics.destroy_body(wall);
        }
        self.map.clear();
        self.build_scene()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn cows(&self) -> &[Cow] {
        &self.cows
    }

    pub fn herd_report(&self) -> HerdReport {
        self.herd_report
    }

    pub fn replan_failures(&self) -> u64 {
        self.replan_failures
    }

    pub fn map(&self) -> &MapMaker {
        &self.map
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Pose of one cow, for observers.
    pub fn cow_pose(&self, index: usize) -> Option<(Vector2<f32>, f32)> {
        self.cows
            .get(index)
            .and_then(|cow| self.physics.pose(cow.body()))
    }

    /// Herd size per state: starting, translating, in-activity, idling.
    pub fn state_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for cow in &self.cows {
            let slot = match cow.state() {
                CowState::Starting => 0,
                CowState::Translating => 1,
                CowState::InActivity => 2,
                CowState::Idling => 3,
            };
            counts[slot] += 1;
        }
        counts
    }
}
