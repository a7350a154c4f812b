//! Unhappy Flying Reptiles headless runner
//!
//! Runs the simulation at the fixed tick without a window and prints the final
//! world snapshot as JSON. A renderer would drive `tick` from its own timer instead.
//!
//! Usage: `flying-reptiles [ticks] [seed] [settings.json]`

use std::process::ExitCode;

use flying_reptiles::Settings;
use flying_reptiles::consts::TICK_INTERVAL_MS;
use flying_reptiles::sim::{PhysicsBody, TickInput, World, WorldEvent, tick};

const DEFAULT_TICKS: u64 = 1200;
const DEFAULT_SEED: u64 = 12345;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Unhappy Flying Reptiles (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ticks = args
        .first()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TICKS);
    let seed = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let settings = match args.get(2) {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let mut world = match World::new(settings, seed) {
        Ok(world) => world,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let input = TickInput::default();
    let mut crate_hits = 0u64;
    for _ in 0..ticks {
        for event in tick(&mut world, &input) {
            if matches!(event, WorldEvent::ReptileHitCrate { .. }) {
                crate_hits += 1;
            }
        }
        if world.time_ticks % 200 == 0 {
            let body = world.reptile.body();
            log::info!(
                "t={}s reptile at ({}, {}) vel {} {:?}",
                world.time_ticks * TICK_INTERVAL_MS / 1000,
                body.left_offset(),
                body.bottom_offset(),
                body.velocity(),
                world.reptile.state()
            );
        }
    }
    log::info!("{} ticks done, {} reptile/crate collisions", ticks, crate_hits);

    match serde_json::to_string_pretty(&world.snapshot()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}
