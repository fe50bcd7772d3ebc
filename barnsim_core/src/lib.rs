//! # barnsim core
//!
//! Simulation core for a 2D dairy-barn behaviour simulator.
//!
//! A scenario places functional areas (cubicles, milking robots,
//! feeders, concentrate dispensers, drinkers, docking stations,
//! obstacles) on a rectangular grid. A herd of cow agents then lives
//! in the barn: each cow picks its next activity from a Markov
//! transition matrix, plans a collision-free path to an instance of
//! that activity with an RRT, tracks the path with a bicycle-model
//! controller, and dwells at the destination before choosing again.
//!
//! The building blocks:
//!
//! - **Map compiler**: merges placed-area footprints into a minimal
//!   obstacle set and an occupancy grid
//! - **Planner**: single-query RRT over the merged obstacle field
//! - **Agents**: per-cow state machine and kinematic tracking
//! - **Coordinator**: owns the physics world and advances the scene
//!   tick by tick
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use barnsim_core::{Barn, ScenarioConfig};
//!
//! let mut barn = Barn::new(ScenarioConfig::default()).unwrap();
//! for _ in 0..600 {
//!     barn.step();
//! }
//! println!("herd: {:?}", barn.state_counts());
//! ```

pub mod activity;
pub mod barn;
pub mod config;
pub mod cow;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod map;
pub mod physics;
pub mod planner;

// Re-export commonly used types for easy access
pub use activity::ActivitySelector;
pub use barn::{Barn, HerdReport};
pub use config::ScenarioConfig;
pub use cow::{Cow, CowState};
pub use error::{SimError, SimResult};
pub use geometry::Aabb;
pub use layout::{AreaKind, Orientation, PlacedArea};
pub use map::{MapMaker, OccupancyGrid};
pub use physics::PhysicsWorld;
pub use planner::{find_path, PlannerParams};
