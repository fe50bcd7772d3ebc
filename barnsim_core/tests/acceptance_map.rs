//! Map compilation scenarios: merging and occupancy coverage.

use barnsim_core::geometry::Aabb;
use barnsim_core::layout::{AreaKind, Orientation, PlacedArea};
use barnsim_core::map::MapMaker;
use nalgebra::Vector2;

fn obstacle(gx: i32, gy: i32) -> PlacedArea {
    PlacedArea {
        kind: AreaKind::Obstacle,
        orientation: Orientation::Square,
        gx,
        gy,
    }
}

#[test]
fn test_horizontally_adjacent_footprints_merge() {
    let mut map = MapMaker::new();
    map.compile(&[obstacle(3, 3), obstacle(4, 3)], 30, 30).unwrap();
    assert_eq!(
        map.obstacles(),
        &[Aabb::new(Vector2::new(84.0, 84.0), Vector2::new(132.0, 108.0))]
    );
}

#[test]
fn test_vertically_adjacent_footprints_merge() {
    let mut map = MapMaker::new();
    map.compile(&[obstacle(3, 3), obstacle(3, 4)], 30, 30).unwrap();
    assert_eq!(
        map.obstacles(),
        &[Aabb::new(Vector2::new(84.0, 84.0), Vector2::new(108.0, 132.0))]
    );
}

#[test]
fn test_gap_prevents_merging() {
    let mut map = MapMaker::new();
    map.compile(&[obstacle(3, 3), obstacle(5, 3)], 30, 30).unwrap();
    assert_eq!(map.obstacles().len(), 2);
}

#[test]
fn test_block_of_cells_collapses_to_one_box() {
    // A 3x2 block of squares merges into a single AABB regardless of
    // the order the areas were painted in.
    let areas = vec![
        obstacle(6, 5),
        obstacle(4, 4),
        obstacle(5, 5),
        obstacle(6, 4),
        obstacle(4, 5),
        obstacle(5, 4),
    ];
    let mut map = MapMaker::new();
    map.compile(&areas, 30, 30).unwrap();
    assert_eq!(
        map.obstacles(),
        &[Aabb::new(Vector2::new(96.0, 96.0), Vector2::new(168.0, 144.0))]
    );
}

#[test]
fn test_compiled_set_is_merge_closed_and_disjoint() {
    // An irregular blob plus solid rectangular blocks. Solid blocks
    // are the hard case: a single merge pass leaves column strips
    // that still share full edges.
    let blob = vec![
        obstacle(2, 2),
        obstacle(3, 2),
        obstacle(3, 3),
        obstacle(5, 2),
        obstacle(5, 3),
        obstacle(6, 3),
        obstacle(2, 6),
    ];
    let block_2x2 = vec![
        obstacle(10, 10),
        obstacle(11, 10),
        obstacle(10, 11),
        obstacle(11, 11),
    ];
    let block_3x2 = vec![
        obstacle(20, 20),
        obstacle(21, 20),
        obstacle(22, 20),
        obstacle(20, 21),
        obstacle(21, 21),
        obstacle(22, 21),
    ];

    for areas in [&blob, &block_2x2, &block_3x2] {
        let mut map = MapMaker::new();
        map.compile(areas, 30, 30).unwrap();

        let compiled = map.obstacles();
        for (i, a) in compiled.iter().enumerate() {
            for b in compiled.iter().skip(i + 1) {
                assert!(!a.is_mergeable_with(b), "{a:?} and {b:?} still mergeable");
                assert!(!a.overlaps(b), "{a:?} and {b:?} overlap");
            }
        }
    }

    // Solid blocks must collapse all the way down to one box.
    let mut map = MapMaker::new();
    map.compile(&block_2x2, 30, 30).unwrap();
    assert_eq!(
        map.obstacles(),
        &[Aabb::new(Vector2::new(240.0, 240.0), Vector2::new(288.0, 288.0))]
    );

    let mut map = MapMaker::new();
    map.compile(&block_3x2, 30, 30).unwrap();
    assert_eq!(
        map.obstacles(),
        &[Aabb::new(Vector2::new(480.0, 480.0), Vector2::new(552.0, 528.0))]
    );
}

#[test]
fn test_occupancy_matches_painted_cells() {
    let areas = vec![
        PlacedArea {
            kind: AreaKind::Cubicle,
            orientation: Orientation::Vertical,
            gx: 1,
            gy: 1,
        },
        PlacedArea {
            kind: AreaKind::Milker,
            orientation: Orientation::Horizontal,
            gx: 4,
            gy: 7,
        },
        obstacle(9, 9),
    ];
    let mut map = MapMaker::new();
    map.compile(&areas, 12, 12).unwrap();

    let grid = map.grid();
    assert_eq!((grid.columns(), grid.rows()), (12, 12));
    let mut expected = std::collections::HashSet::new();
    for area in &areas {
        for cell in area.cells() {
            expected.insert(cell);
        }
    }
    for x in 0..12 {
        for y in 0..12 {
            assert_eq!(
                grid.is_occupied(x, y),
                expected.contains(&(x, y)),
                "cell ({x}, {y})"
            );
        }
    }
    assert_eq!(grid.occupied_count(), expected.len());
}

#[test]
fn test_mixed_kinds_all_become_obstacles() {
    // Activity areas and obstacles alike feed the collision map.
    let areas = vec![
        PlacedArea {
            kind: AreaKind::Feeder,
            orientation: Orientation::Square,
            gx: 2,
            gy: 2,
        },
        PlacedArea {
            kind: AreaKind::DockingStation,
            orientation: Orientation::Square,
            gx: 3,
            gy: 2,
        },
    ];
    let mut map = MapMaker::new();
    map.compile(&areas, 10, 10).unwrap();
    // Adjacent footprints of different kinds still merge.
    assert_eq!(map.obstacles().len(), 1);
}

#[test]
fn test_clear_drops_derived_state() {
    let mut map = MapMaker::new();
    map.compile(&[obstacle(1, 1)], 10, 10).unwrap();
    assert_eq!(map.obstacles().len(), 1);

    map.clear();
    assert!(map.obstacles().is_empty());
    assert_eq!(map.grid().occupied_count(), 0);
    assert_eq!(map.world_extent(), Vector2::new(0.0, 0.0));
}
