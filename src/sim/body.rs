//! Shared physics state for crates and the reptile
//!
//! Positions are offsets from the left and bottom of the play field, velocities
//! are integer units per tick. All position/velocity arithmetic saturates at the
//! `i32` limits instead of wrapping.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, Aabb, Contact};
use crate::consts::*;
use crate::error::SimError;

/// Native pixel size of the sprite backing an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSize {
    pub width: u32,
    pub height: u32,
}

impl SpriteSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Mass and material parameters for a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    /// Mass proxy, must be > 0
    pub weight: i32,
    /// Fraction of momentum kept on impact (0 gives everything away, 1 keeps it all)
    pub force_given: f64,
    /// Sprite-to-bounding-box scale
    pub scale: f64,
    /// Horizontal speed lost per grounded tick
    pub friction: u32,
    /// Vertical speed lost per airborne tick
    pub gravity: u32,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self::crate_defaults()
    }
}

impl BodyParams {
    pub fn crate_defaults() -> Self {
        Self {
            weight: CRATE_WEIGHT,
            force_given: CRATE_FORCE_GIVEN,
            scale: CRATE_SCALE,
            friction: DEFAULT_FRICTION,
            gravity: DEFAULT_GRAVITY,
        }
    }

    pub fn reptile_defaults() -> Self {
        Self {
            weight: REPTILE_WEIGHT,
            force_given: REPTILE_FORCE_GIVEN,
            scale: REPTILE_SCALE,
            friction: DEFAULT_FRICTION,
            gravity: DEFAULT_GRAVITY,
        }
    }

    /// Validate and normalize. Negative `force_given`/`scale` are flipped to
    /// their absolute value; a non-positive weight is rejected.
    pub fn normalized(self) -> Result<Self, SimError> {
        if self.weight <= 0 {
            return Err(SimError::invalid(
                "weight",
                format!("must be greater than zero, got {}", self.weight),
            ));
        }
        if !self.force_given.is_finite() {
            return Err(SimError::invalid("force_given", "must be a finite number"));
        }
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(SimError::invalid(
                "scale",
                format!("must be finite and non-zero, got {}", self.scale),
            ));
        }

        let mut force_given = self.force_given.abs();
        if force_given > 1.0 {
            log::debug!("force_given {} clamped to 1.0", force_given);
            force_given = 1.0;
        }

        Ok(Self {
            force_given,
            scale: self.scale.abs(),
            ..self
        })
    }
}

/// Physics state of a single entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BodyRecord")]
pub struct Body {
    pos: IVec2,
    vel: IVec2,
    friction: u32,
    gravity: u32,
    weight: i32,
    force_given: f64,
    width: i32,
    height: i32,
}

/// Serialized form of a [`Body`], checked before it becomes one
#[derive(Deserialize)]
struct BodyRecord {
    pos: IVec2,
    vel: IVec2,
    friction: u32,
    gravity: u32,
    weight: i32,
    force_given: f64,
    width: i32,
    height: i32,
}

impl TryFrom<BodyRecord> for Body {
    type Error = SimError;

    fn try_from(record: BodyRecord) -> Result<Self, Self::Error> {
        if record.weight <= 0 {
            return Err(SimError::invalid(
                "weight",
                format!("must be greater than zero, got {}", record.weight),
            ));
        }
        if !(0.0..=1.0).contains(&record.force_given) {
            return Err(SimError::invalid(
                "force_given",
                format!("must be in [0, 1], got {}", record.force_given),
            ));
        }
        if record.width < 0 || record.height < 0 {
            return Err(SimError::invalid(
                "size",
                format!("negative size {}x{}", record.width, record.height),
            ));
        }
        if record.pos.y < 0 {
            return Err(SimError::invalid("bottom", "below the floor"));
        }

        Ok(Self {
            pos: record.pos,
            vel: record.vel,
            friction: record.friction,
            gravity: record.gravity,
            weight: record.weight,
            force_given: record.force_given,
            width: record.width,
            height: record.height,
        })
    }
}

impl Body {
    /// Build a resting body whose bounding box is the sprite scaled by `params.scale`
    pub fn new(
        left: i32,
        bottom: i32,
        params: BodyParams,
        sprite: SpriteSize,
    ) -> Result<Self, SimError> {
        let params = params.normalized()?;
        if sprite.width == 0 || sprite.height == 0 {
            return Err(SimError::invalid(
                "sprite",
                format!("empty sprite {}x{}", sprite.width, sprite.height),
            ));
        }

        Ok(Self {
            pos: IVec2::new(left, bottom.max(0)),
            vel: IVec2::ZERO,
            friction: params.friction,
            gravity: params.gravity,
            weight: params.weight,
            force_given: params.force_given,
            width: (sprite.width as f64 * params.scale) as i32,
            height: (sprite.height as f64 * params.scale) as i32,
        })
    }

    pub fn with_velocity(mut self, vx: i32, vy: i32) -> Self {
        self.vel = IVec2::new(vx, vy);
        self
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> IVec2 {
        self.vel
    }

    #[inline]
    pub fn left_offset(&self) -> i32 {
        self.pos.x
    }

    pub fn set_left_offset(&mut self, offset: i32) {
        self.pos.x = offset;
    }

    #[inline]
    pub fn bottom_offset(&self) -> i32 {
        self.pos.y
    }

    /// Negative offsets are clamped to the floor
    pub fn set_bottom_offset(&mut self, offset: i32) {
        self.pos.y = offset.max(0);
    }

    #[inline]
    pub fn horizontal_vel(&self) -> i32 {
        self.vel.x
    }

    pub fn set_horizontal_vel(&mut self, vel: i32) {
        self.vel.x = vel;
    }

    #[inline]
    pub fn vertical_vel(&self) -> i32 {
        self.vel.y
    }

    pub fn set_vertical_vel(&mut self, vel: i32) {
        self.vel.y = vel;
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn force_given(&self) -> f64 {
        self.force_given
    }

    pub fn friction(&self) -> u32 {
        self.friction
    }

    pub fn gravity(&self) -> u32 {
        self.gravity
    }

    /// Grounded means the bottom offset is exactly zero
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.pos.y == 0
    }

    /// Axis-aligned bounding box at the current position
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Advance one fixed step: integrate, then ground friction or gravity
    pub fn tick(&mut self) {
        if self.integrate() {
            self.vel.y = 0;
            self.apply_friction();
        } else {
            self.apply_gravity();
        }
    }

    /// Move by the current velocity and clamp to the floor.
    /// Returns true if the body ends up grounded.
    pub(crate) fn integrate(&mut self) -> bool {
        self.pos.x = self.pos.x.saturating_add(self.vel.x);
        self.pos.y = self.pos.y.saturating_add(self.vel.y).max(0);
        self.is_grounded()
    }

    /// Decay horizontal velocity toward zero without overshooting
    pub(crate) fn apply_friction(&mut self) {
        let vx = self.vel.x;
        if vx == 0 {
            return;
        }
        if vx.unsigned_abs() <= self.friction {
            self.vel.x = 0;
        } else {
            // |vx| > friction, so friction fits in i32 here
            let friction = self.friction as i32;
            self.vel.x = if vx > 0 { vx - friction } else { vx + friction };
        }
    }

    pub(crate) fn apply_gravity(&mut self) {
        let gravity = i32::try_from(self.gravity).unwrap_or(i32::MAX);
        self.vel.y = self.vel.y.saturating_sub(gravity);
    }

    /// Velocity change of `force / weight`, truncated toward zero
    pub fn apply_horizontal_force(&mut self, force: i32) {
        self.vel.x = self.vel.x.saturating_add(force / self.weight);
    }

    pub fn apply_vertical_force(&mut self, force: i32) {
        self.vel.y = self.vel.y.saturating_add(force / self.weight);
    }

    /// Momentum this body surrenders on a horizontal impact
    pub fn calc_horizontal_force(&self) -> i32 {
        self.give_force(self.vel.x)
    }

    /// Momentum this body surrenders on a vertical impact
    pub fn calc_vertical_force(&self) -> i32 {
        self.give_force(self.vel.y)
    }

    fn give_force(&self, vel: i32) -> i32 {
        let momentum = vel.saturating_mul(self.weight) as f64;
        (momentum * (1.0 - self.force_given)) as i32
    }
}

/// Anything that owns a [`Body`] and takes part in collisions
pub trait PhysicsBody {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Test for overlap with `other` and resolve the collision if there is one.
    /// Returns whether the two bodies collided.
    fn detect_collision<O: PhysicsBody>(&mut self, other: &mut O) -> bool
    where
        Self: Sized,
    {
        collision::detect_collision(self.body_mut(), other.body_mut())
    }

    /// Resolve a collision that is already known to overlap
    fn handle_collision<O: PhysicsBody>(&mut self, other: &mut O) -> Contact
    where
        Self: Sized,
    {
        collision::handle_collision(self.body_mut(), other.body_mut())
    }

    fn apply_horizontal_force(&mut self, force: i32) {
        self.body_mut().apply_horizontal_force(force);
    }

    fn apply_vertical_force(&mut self, force: i32) {
        self.body_mut().apply_vertical_force(force);
    }

    fn calc_horizontal_force(&self) -> i32 {
        self.body().calc_horizontal_force()
    }

    fn calc_vertical_force(&self) -> i32 {
        self.body().calc_vertical_force()
    }
}

impl PhysicsBody for Body {
    fn body(&self) -> &Body {
        self
    }

    fn body_mut(&mut self) -> &mut Body {
        self
    }
}
