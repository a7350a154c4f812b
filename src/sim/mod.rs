//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected, seeded RNG only
//! - Stable iteration order (crates by index)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod crate_body;
pub mod reptile;
pub mod rng;
pub mod state;
pub mod tick;

pub use body::{Body, BodyParams, PhysicsBody, SpriteSize};
pub use collision::{
    Aabb, Contact, ImpactAxis, center_delta, detect_collision, handle_collision, overlaps,
};
pub use crate_body::Crate;
pub use reptile::{FlightState, Reptile, ReptileTuning};
pub use rng::{IntRange, RandomSource, RngState};
pub use state::{EntitySnapshot, ReptileSnapshot, TickInput, World, WorldEvent, WorldSnapshot};
pub use tick::{run, tick};
