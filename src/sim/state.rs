//! World state owned by the tick driver
//!
//! Everything the game loop mutates lives here: the crates, the reptile, the
//! seeded RNG and the bookkeeping counters. There are no globals.

use glam::IVec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, PhysicsBody};
use super::collision::Aabb;
use super::crate_body::Crate;
use super::reptile::{FlightState, Reptile};
use super::rng::RngState;
use crate::error::SimError;
use crate::settings::Settings;

/// Something worth telling the renderer or audio layer about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A shot landed on the flying reptile
    ReptileShot,
    /// The reptile came to rest and was sent back in
    ReptileRespawned { respawns: u32 },
    /// The reptile collided with the crate at this index
    ReptileHitCrate { index: usize },
    /// Two crates collided
    CratesCollided { a: usize, b: usize },
}

/// Per-tick input from the surrounding application
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Click position in field coordinates (left/bottom offsets)
    pub shot: Option<IVec2>,
}

/// Renderer-facing view of one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub bounds: Aabb,
    pub velocity: IVec2,
}

/// Renderer-facing view of the reptile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReptileSnapshot {
    pub entity: EntitySnapshot,
    pub state: FlightState,
    pub rotation: i32,
    pub facing_left: bool,
}

/// Serializable view of the whole world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time_ticks: u64,
    pub hits: u32,
    pub respawns: u32,
    pub reptile: ReptileSnapshot,
    pub crates: Vec<EntitySnapshot>,
}

/// The simulated world
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    pub crates: Vec<Crate>,
    pub reptile: Reptile,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks spent falling since the last shot
    pub dead_ticks: u32,
    /// Successful shots
    pub hits: u32,
    pub respawns: u32,
    /// Side the next respawn enters from
    pub spawn_from_left: bool,
}

impl World {
    /// Build the world from settings with the given seed
    pub fn new(settings: Settings, seed: u64) -> Result<Self, SimError> {
        settings.validate()?;
        let mut rng = RngState::new(seed).to_rng();

        let crates = settings
            .crates
            .iter()
            .map(|layout| {
                Crate::with_params(
                    layout.left,
                    layout.bottom,
                    layout.params.unwrap_or(settings.crate_body),
                    settings.sprites.crate_sprite,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let reptile = Reptile::new(
            settings.spawn.left,
            settings.spawn.bottom,
            settings.reptile_body,
            settings.sprites.reptile_sprite,
            settings.reptile.clone(),
            &mut rng,
        )?;

        log::info!(
            "World created: seed={} crates={} field={}x{}",
            seed,
            crates.len(),
            settings.field.width,
            settings.field.height
        );

        Ok(Self {
            seed,
            rng,
            settings,
            crates,
            reptile,
            time_ticks: 0,
            dead_ticks: 0,
            hits: 0,
            respawns: 0,
            spawn_from_left: false,
        })
    }

    /// Hit test a click against the flying reptile. A hit knocks it out of the sky.
    pub fn shoot(&mut self, point: IVec2) -> bool {
        if self.reptile.state() != FlightState::Flying
            || !self.reptile.body().bounds().contains_point(point)
        {
            return false;
        }
        self.reptile.set_state(FlightState::Falling);
        self.dead_ticks = 0;
        self.hits += 1;
        log::info!("Reptile shot at {} (hits: {})", point, self.hits);
        true
    }

    /// Send the reptile back in from the next spawn edge, a little faster than before
    pub fn respawn_reptile(&mut self) {
        let spawn = self.settings.spawn;
        let width = self.reptile.body().width();
        let from_left = self.spawn_from_left;
        let left = if from_left {
            spawn.left
        } else {
            self.settings
                .field
                .width
                .saturating_sub(width)
                .saturating_sub(spawn.left)
        };
        self.spawn_from_left = !from_left;

        // Always head into the field
        let speed = spawn.vx.saturating_abs();
        let vx = if from_left { speed } else { -speed };

        self.reptile
            .set_offset_and_velocity(left, spawn.bottom, vx, spawn.vy);
        self.reptile.set_state(FlightState::Flying);
        self.escalate_speed();

        self.dead_ticks = 0;
        self.respawns += 1;
        log::info!(
            "Reptile respawned at ({}, {}) speed bounds [{}, {}) respawns={}",
            left,
            spawn.bottom,
            self.reptile.min_hor_speed(),
            self.reptile.max_hor_speed(),
            self.respawns
        );
    }

    fn escalate_speed(&mut self) {
        let difficulty = self.settings.difficulty;
        let max = self
            .reptile
            .max_hor_speed()
            .saturating_add(difficulty.speed_step)
            .min(difficulty.max_speed_cap);
        let min = self
            .reptile
            .min_hor_speed()
            .saturating_add(difficulty.speed_step);
        // Raise the max first so the new min is accepted
        self.reptile.set_max_hor_speed(max);
        self.reptile.set_min_hor_speed(min);
    }

    /// Turn a flying reptile around when it crosses a side of the play field
    pub(crate) fn keep_reptile_in_field(&mut self) {
        let field_width = self.settings.field.width;
        let body = self.reptile.body();
        let (bottom, vy) = (body.bottom_offset(), body.vertical_vel());
        let speed = body.horizontal_vel().saturating_abs();

        if body.left_offset() < 0 {
            self.reptile.set_offset_and_velocity(0, bottom, speed, vy);
        } else if body.left_offset().saturating_add(body.width()) > field_width {
            let left = field_width.saturating_sub(body.width());
            self.reptile.set_offset_and_velocity(left, bottom, -speed, vy);
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let entity = |body: &Body| EntitySnapshot {
            bounds: body.bounds(),
            velocity: body.velocity(),
        };
        WorldSnapshot {
            time_ticks: self.time_ticks,
            hits: self.hits,
            respawns: self.respawns,
            reptile: ReptileSnapshot {
                entity: entity(self.reptile.body()),
                state: self.reptile.state(),
                rotation: self.reptile.rotation(),
                facing_left: self.reptile.facing_left(),
            },
            crates: self.crates.iter().map(|c| entity(c.body())).collect(),
        }
    }
}
