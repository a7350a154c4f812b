//! Fixed timestep simulation tick
//!
//! One call advances the world by one step, in this order:
//! 1. apply the shot from the input, if any
//! 2. tick every crate
//! 3. reptile against each crate
//! 4. every unordered crate pair (i < j)
//! 5. tick the reptile
//! 6. driver rules: keep the flyer in the field, respawn the fallen reptile

use super::body::PhysicsBody;
use super::reptile::FlightState;
use super::state::{TickInput, World, WorldEvent};

/// Advance the world by one fixed timestep, returning what happened
pub fn tick(world: &mut World, input: &TickInput) -> Vec<WorldEvent> {
    let mut events = Vec::new();
    world.time_ticks += 1;

    if let Some(point) = input.shot {
        if world.shoot(point) {
            events.push(WorldEvent::ReptileShot);
        }
    }

    for crate_body in &mut world.crates {
        crate_body.tick();
    }

    for (index, crate_body) in world.crates.iter_mut().enumerate() {
        if world.reptile.detect_collision(crate_body) {
            events.push(WorldEvent::ReptileHitCrate { index });
        }
    }

    collide_crate_pairs(world, &mut events);

    world.reptile.tick(&mut world.rng);

    match world.reptile.state() {
        FlightState::Flying => world.keep_reptile_in_field(),
        FlightState::Falling => {
            world.dead_ticks += 1;
            let velocity = world.reptile.body().velocity();
            let at_rest = velocity.x == 0 && velocity.y == 0;
            if at_rest || world.dead_ticks >= world.settings.difficulty.max_dead_ticks {
                world.respawn_reptile();
                events.push(WorldEvent::ReptileRespawned {
                    respawns: world.respawns,
                });
            }
        }
    }

    if !events.is_empty() {
        log::trace!("tick {}: {:?}", world.time_ticks, events);
    }
    events
}

fn collide_crate_pairs(world: &mut World, events: &mut Vec<WorldEvent>) {
    for i in 0..world.crates.len() {
        let (head, tail) = world.crates.split_at_mut(i + 1);
        let first = &mut head[i];
        for (offset, second) in tail.iter_mut().enumerate() {
            if first.detect_collision(second) {
                events.push(WorldEvent::CratesCollided {
                    a: i,
                    b: i + 1 + offset,
                });
            }
        }
    }
}

/// Run `ticks` steps with no input
pub fn run(world: &mut World, ticks: u64) -> Vec<WorldEvent> {
    let input = TickInput::default();
    (0..ticks).flat_map(|_| tick(world, &input)).collect()
}
