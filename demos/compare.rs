//! Runs every search on one random cave and logs how they compare.
//!
//! ```sh
//! RUST_LOG=debug cargo run --bin compare
//! ```

use std::error::Error;
use std::io::Write;

use parpath_core::{CostMap, GenerateConfig, Point, World};
use parpath_divide::{DivideConfig, par_divide};
use parpath_search::{BidirectionalConfig, SearchOutcome, astar, bidirectional, dijkstra};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

const WIDTH: u32 = 400;
const HEIGHT: u32 = 300;

/// First passable cell scanning row-major from either corner.
fn first_open(world: &World, from_end: bool) -> Option<Point> {
    let w = world.width();
    let mut cells = (0..world.len() as u32).map(|i| Point::new(i % w, i / w));
    if from_end {
        cells.rev().find(|&p| world.is_passable(p))
    } else {
        cells.find(|&p| world.is_passable(p))
    }
}

fn report(name: &str, outcome: &SearchOutcome) {
    log::info!(
        "{name:>14}: cost {:>6}  steps {:>5}  expanded {:>7}  {:>10.3?}",
        outcome.cost,
        outcome.path.len(),
        outcome.expanded,
        outcome.elapsed
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let seed: u64 = rand::rng().random();
    let mut rng = StdRng::seed_from_u64(seed);
    let world = World::generate(WIDTH, HEIGHT, &GenerateConfig::default(), &mut rng)?;
    log::info!(
        "world {WIDTH}x{HEIGHT} (seed {seed}): {} open tiles",
        world.open_tiles()
    );

    let (Some(start), Some(end)) = (first_open(&world, false), first_open(&world, true)) else {
        log::warn!("generated world has no open tiles");
        return Ok(());
    };
    log::info!("searching {start} -> {end}");

    report("dijkstra", &dijkstra(&world, start, end)?);
    report("astar", &astar(&world, start, end)?);
    report(
        "bidirectional",
        &bidirectional(&world, start, end, &BidirectionalConfig::default())?,
    );
    for workers in [2, 4, 8] {
        let cfg = DivideConfig::default().with_workers(workers);
        let outcome = match par_divide(&world, start, end, &cfg) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("par_divide with {workers} workers failed: {err}");
                continue;
            }
        };
        let (first_wave, waves) = (outcome.unsmoothed_cost, outcome.waves.len());
        report(&format!("par_divide x{workers}"), &outcome.into_outcome());
        log::info!("{:>14}  first wave cost {first_wave}, {waves} waves", "");
    }
    Ok(())
}
