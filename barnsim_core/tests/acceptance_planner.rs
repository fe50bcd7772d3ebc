//! Seeded end-to-end planner scenarios.

use barnsim_core::geometry::Aabb;
use barnsim_core::planner::{find_path, segment_hits_any, PlannerParams};
use nalgebra::Vector2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn world() -> Vector2<f32> {
    Vector2::new(720.0, 720.0)
}

#[test]
fn test_empty_barn_straight_run() {
    // 30x30 grid, no areas: the tree only has to cross open floor.
    let mut rng = ChaCha8Rng::seed_from_u64(36);
    let params = PlannerParams::default();
    let start = Vector2::new(100.0, 100.0);
    let goal = Vector2::new(500.0, 500.0);

    let path = find_path(start, goal, &[], world(), &params, &mut rng).unwrap();

    assert!(path.len() >= 2);
    assert_eq!(path[0], start);
    assert!((path.last().unwrap() - goal).norm() < params.goal_radius);

    // Every edge is one fixed-size extension.
    for pair in path.windows(2) {
        let edge = (pair[1] - pair[0]).norm();
        assert!((edge - params.step_size).abs() < 1e-3);
    }
}

#[test]
fn test_wall_detour_keeps_clearance() {
    // Horizontal obstacle at grid (10, 10); start below it, goal above.
    let obstacle = Aabb::new(Vector2::new(252.0, 252.0), Vector2::new(300.0, 276.0));
    let start = Vector2::new(288.0, 240.0);
    let goal = Vector2::new(288.0, 336.0);
    let params = PlannerParams::default();

    for seed in [1, 7, 36, 99] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let path = find_path(start, goal, &[obstacle], world(), &params, &mut rng).unwrap();

        assert_eq!(path[0], start);
        assert!((path.last().unwrap() - goal).norm() < params.goal_radius);
        for pair in path.windows(2) {
            assert!(
                !segment_hits_any(pair[0], pair[1], &[obstacle]),
                "seed {seed}: edge {:?} -> {:?} crosses the wall",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn test_cluttered_field_paths_stay_clear() {
    // A few merged-scale boxes scattered across the floor.
    let obstacles = vec![
        Aabb::new(Vector2::new(120.0, 96.0), Vector2::new(216.0, 120.0)),
        Aabb::new(Vector2::new(312.0, 240.0), Vector2::new(336.0, 432.0)),
        Aabb::new(Vector2::new(480.0, 120.0), Vector2::new(552.0, 144.0)),
        Aabb::new(Vector2::new(96.0, 480.0), Vector2::new(288.0, 504.0)),
    ];
    let params = PlannerParams::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let start = Vector2::new(60.0, 60.0);
    let goal = Vector2::new(600.0, 600.0);
    let path = find_path(start, goal, &obstacles, world(), &params, &mut rng).unwrap();

    assert_eq!(path[0], start);
    assert!((path.last().unwrap() - goal).norm() < params.goal_radius);
    for pair in path.windows(2) {
        assert!(!segment_hits_any(pair[0], pair[1], &obstacles));
    }
}

#[test]
fn test_goal_bias_still_produces_clear_paths() {
    let obstacle = Aabb::new(Vector2::new(252.0, 252.0), Vector2::new(300.0, 276.0));
    let params = PlannerParams {
        goal_bias: 0.1,
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let path = find_path(
        Vector2::new(288.0, 240.0),
        Vector2::new(288.0, 336.0),
        &[obstacle],
        world(),
        &params,
        &mut rng,
    )
    .unwrap();
    for pair in path.windows(2) {
        assert!(!segment_hits_any(pair[0], pair[1], &[obstacle]));
    }
}
