//! Unhappy Flying Reptiles - tick-driven arcade physics core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, AABB collisions, reptile state machine, world tick)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Configuration errors raised at construction time
//!
//! Rendering, audio and window plumbing live outside this crate. A renderer only
//! needs the positions, sizes and rotation exposed through [`sim::World::snapshot`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 50;

    /// Play field defaults (pixels)
    pub const FIELD_WIDTH: i32 = 1280;
    pub const FIELD_HEIGHT: i32 = 720;

    /// Body defaults shared by crates and the reptile
    pub const DEFAULT_FRICTION: u32 = 1;
    pub const DEFAULT_GRAVITY: u32 = 1;

    /// Crate defaults
    pub const CRATE_WEIGHT: i32 = 5;
    pub const CRATE_FORCE_GIVEN: f64 = 0.7;
    pub const CRATE_SCALE: f64 = 0.3;
    pub const CRATE_SPRITE_SIZE: (u32, u32) = (128, 128);

    /// Reptile defaults
    pub const REPTILE_WEIGHT: i32 = 3;
    pub const REPTILE_FORCE_GIVEN: f64 = 0.5;
    pub const REPTILE_SCALE: f64 = 0.5;
    pub const REPTILE_SPRITE_SIZE: (u32, u32) = (160, 120);
    pub const REPTILE_INITIAL_VELOCITY: (i32, i32) = (10, 25);

    /// Wing flap impulse, drawn from [min, max)
    pub const FLAP_STRENGTH: (i32, i32) = (4, 9);
    /// Ticks between flaps, drawn from [min, max)
    pub const FLAP_INTERVAL: (i32, i32) = (10, 30);
    /// Ticks between horizontal velocity re-rolls, drawn from [min, max)
    pub const X_VEL_INTERVAL: (i32, i32) = (20, 60);
    /// Horizontal speed magnitude bounds
    pub const MIN_X_SPEED: u32 = 5;
    pub const MAX_X_SPEED: u32 = 15;
    /// Height band the flying reptile is kept inside
    pub const MIN_FLIGHT_THRESHOLD: i32 = 100;
    pub const MAX_FLIGHT_THRESHOLD: i32 = 400;
    /// Degrees rotated per tick while falling
    pub const FALL_ROTATION_STEP: i32 = 15;

    /// Respawn point and velocity after the reptile comes to rest
    pub const SPAWN_LEFT_OFFSET: i32 = 0;
    pub const SPAWN_BOTTOM_OFFSET: i32 = 35;
    pub const SPAWN_VELOCITY: (i32, i32) = (10, 20);

    /// Horizontal speed escalation per respawn
    pub const SPEED_ESCALATION: u32 = 1;
    pub const MAX_SPEED_CAP: u32 = 40;
    /// Dead ticks before a falling reptile is forced to respawn
    pub const MAX_DEAD_TICKS: u32 = 200;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: i32) -> i32 {
    angle.rem_euclid(360)
}
