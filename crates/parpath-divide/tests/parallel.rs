//! End-to-end checks of the parallel search against sequential Dijkstra.

use parpath_core::{Point, World};
use parpath_divide::{DivideConfig, par_divide};
use parpath_search::{SearchError, dijkstra, path_cost};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

fn assert_valid(world: &World, path: &[Point], start: Point, end: Point) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&end));
    for pair in path.windows(2) {
        assert_ne!(pair[0], pair[1], "consecutive duplicate in {path:?}");
        assert!(pair[0].is_adjacent(pair[1]), "gap between {} and {}", pair[0], pair[1]);
    }
    assert!(path.iter().all(|&p| world.cost(p).is_some_and(|c| c != 0)));
}

#[test]
fn matches_dijkstra_on_open_worlds() {
    let cases = [
        (16, 16, 1, Point::new(0, 0), Point::new(15, 15)),
        (20, 8, 3, Point::new(0, 4), Point::new(19, 4)),
        (9, 25, 1, Point::new(8, 0), Point::new(0, 24)),
        (30, 30, 7, Point::new(29, 0), Point::new(0, 29)),
        (12, 12, 2, Point::new(11, 11), Point::new(0, 3)),
    ];
    for (width, height, cost, start, end) in cases {
        let world = World::filled(width, height, cost).unwrap();
        let reference = dijkstra(&world, start, end).unwrap();
        for workers in 1..=4 {
            let cfg = DivideConfig::default().with_workers(workers);
            let out = par_divide(&world, start, end, &cfg).unwrap();
            assert_eq!(
                out.cost, reference.cost,
                "{width}x{height} {start} -> {end} with {workers} workers"
            );
            assert_valid(&world, &out.path, start, end);
            assert_eq!(out.cost, path_cost(&world, &out.path).unwrap());
            assert!(out.cost <= out.unsmoothed_cost);
        }
    }
}

#[test]
fn matches_dijkstra_for_random_endpoints() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..40 {
        let (width, height) = (rng.random_range(4..24), rng.random_range(4..24));
        let world = World::filled(width, height, rng.random_range(1..=9)).unwrap();
        let start = Point::new(rng.random_range(0..width), rng.random_range(0..height));
        let end = Point::new(rng.random_range(0..width), rng.random_range(0..height));
        let workers = rng.random_range(1..=4);
        if start.x.abs_diff(end.x) + start.y.abs_diff(end.y) < 2 * workers as u32 {
            continue;
        }
        let reference = dijkstra(&world, start, end).unwrap();
        let out = par_divide(&world, start, end, &DivideConfig::default().with_workers(workers))
            .unwrap();
        assert_eq!(out.cost, reference.cost, "{start} -> {end} with {workers} workers");
        assert_valid(&world, &out.path, start, end);
    }
}

#[test]
fn corridor_forces_single_route() {
    // A one-cell-wide serpentine corridor: every worker has exactly one way on.
    let world = World::from_rows(&[
        [1, 1, 1, 1, 1, 1, 1],
        [0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 1, 1],
    ])
    .unwrap();
    let (start, end) = (Point::new(0, 0), Point::new(6, 4));
    let reference = dijkstra(&world, start, end).unwrap();
    for workers in 1..=3 {
        let cfg = DivideConfig::default().with_workers(workers);
        let out = par_divide(&world, start, end, &cfg).unwrap();
        assert_eq!(out.cost, reference.cost);
        assert_eq!(out.path, reference.path);
    }
}

#[test]
fn walled_midpoint_moves_seed() {
    let mut world = World::filled(9, 9, 1).unwrap();
    for y in 0..9 {
        if y != 7 {
            world.set_cost(Point::new(4, y), 0);
        }
    }
    let (start, end) = (Point::new(0, 4), Point::new(8, 4));
    let cfg = DivideConfig::default().with_workers(3);
    let out = par_divide(&world, start, end, &cfg).unwrap();
    assert_eq!(out.seeds, vec![start, Point::new(4, 7), end]);
    assert_valid(&world, &out.path, start, end);
    assert_eq!(out.cost, dijkstra(&world, start, end).unwrap().cost);
}

#[test]
fn split_world_is_unreachable() {
    let world = World::from_rows(&[[1, 0, 1], [1, 0, 1], [1, 0, 1]]).unwrap();
    for workers in [1, 2] {
        let cfg = DivideConfig::default().with_workers(workers);
        let err = par_divide(&world, Point::new(0, 0), Point::new(2, 2), &cfg).unwrap_err();
        assert!(
            matches!(err, SearchError::UnreachableSegment { .. }),
            "{workers} workers: {err}"
        );
    }
}

#[test]
fn walled_scan_line_fails_seed_placement() {
    // The midpoint column is solid, so the vertical scan never finds a cell.
    let mut world = World::filled(7, 7, 1).unwrap();
    for y in 0..7 {
        world.set_cost(Point::new(3, y), 0);
    }
    let cfg = DivideConfig::default().with_workers(3);
    let err = par_divide(&world, Point::new(0, 3), Point::new(6, 3), &cfg).unwrap_err();
    assert!(matches!(err, SearchError::SeedPlacement { .. }), "{err}");
}

#[test]
fn larger_split_world_joins_all_workers() {
    let mut world = World::filled(20, 10, 1).unwrap();
    for y in 0..10 {
        world.set_cost(Point::new(13, y), 0);
    }
    let cfg = DivideConfig::default().with_workers(4);
    let err = par_divide(&world, Point::new(0, 0), Point::new(19, 9), &cfg).unwrap_err();
    assert!(matches!(err, SearchError::UnreachableSegment { .. }), "{err}");
}
