//! The flying reptile
//!
//! Two states:
//! - `Flying`: flaps at random intervals to stay inside the flight band and
//!   re-rolls its horizontal velocity now and then
//! - `Falling`: plain body physics while tumbling in the direction of travel
//!
//! Only the owner moves the reptile between states. A shot switches it to
//! `Falling`; the world driver brings it back to `Flying` once it has come to rest.

use serde::{Deserialize, Serialize};

use super::body::{Body, BodyParams, PhysicsBody, SpriteSize};
use super::rng::{IntRange, RandomSource};
use crate::consts::*;
use crate::error::SimError;
use crate::wrap_degrees;

/// Flight state of the reptile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightState {
    #[default]
    Flying,
    Falling,
}

/// Flight behavior tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReptileTuning {
    /// Upward impulse added per flap
    pub flap_strength: IntRange,
    /// Ticks between scheduled flaps
    pub flap_interval: IntRange,
    /// Ticks between horizontal velocity re-rolls
    pub x_vel_interval: IntRange,
    /// Horizontal speed magnitude bounds for re-rolls
    pub min_x_speed: u32,
    pub max_x_speed: u32,
    /// Below this height the reptile flaps every tick
    pub min_flight_threshold: i32,
    /// At or above this height the reptile never flaps
    pub max_flight_threshold: i32,
    /// Degrees turned per tick while falling
    pub rotation_step: i32,
    /// Velocity at construction
    pub initial_velocity: (i32, i32),
}

impl Default for ReptileTuning {
    fn default() -> Self {
        Self {
            flap_strength: FLAP_STRENGTH.into(),
            flap_interval: FLAP_INTERVAL.into(),
            x_vel_interval: X_VEL_INTERVAL.into(),
            min_x_speed: MIN_X_SPEED,
            max_x_speed: MAX_X_SPEED,
            min_flight_threshold: MIN_FLIGHT_THRESHOLD,
            max_flight_threshold: MAX_FLIGHT_THRESHOLD,
            rotation_step: FALL_ROTATION_STEP,
            initial_velocity: REPTILE_INITIAL_VELOCITY,
        }
    }
}

impl ReptileTuning {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.flap_strength.is_empty() || self.flap_strength.min <= 0 {
            return Err(SimError::invalid(
                "flap_strength",
                "needs a positive, non-empty range",
            ));
        }
        for (field, range) in [
            ("flap_interval", self.flap_interval),
            ("x_vel_interval", self.x_vel_interval),
        ] {
            if range.is_empty() || range.min <= 0 {
                return Err(SimError::invalid(field, "needs a positive, non-empty range"));
            }
        }
        if self.min_x_speed >= self.max_x_speed {
            return Err(SimError::invalid(
                "min_x_speed",
                format!(
                    "must be below max_x_speed ({} >= {})",
                    self.min_x_speed, self.max_x_speed
                ),
            ));
        }
        if self.max_x_speed > i32::MAX as u32 {
            return Err(SimError::invalid("max_x_speed", "out of range"));
        }
        if self.min_flight_threshold >= self.max_flight_threshold {
            return Err(SimError::invalid(
                "min_flight_threshold",
                "must be below max_flight_threshold",
            ));
        }
        if !(0..360).contains(&self.rotation_step) {
            return Err(SimError::invalid("rotation_step", "must be in [0, 360)"));
        }
        Ok(())
    }
}

/// The reptile controller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reptile {
    body: Body,
    state: FlightState,
    /// Degrees in [0, 360)
    rotation: i32,
    ticks_to_next_flap: i32,
    ticks_to_next_x_vel: i32,
    min_x_speed: u32,
    max_x_speed: u32,
    facing_left: bool,
    tuning: ReptileTuning,
}

impl Reptile {
    pub fn new<R: RandomSource + ?Sized>(
        left: i32,
        bottom: i32,
        params: BodyParams,
        sprite: SpriteSize,
        tuning: ReptileTuning,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        tuning.validate()?;
        let (vx, vy) = tuning.initial_velocity;
        let body = Body::new(left, bottom, params, sprite)?.with_velocity(vx, vy);

        Ok(Self {
            body,
            state: FlightState::Flying,
            rotation: 0,
            ticks_to_next_flap: tuning.flap_interval.draw(rng),
            ticks_to_next_x_vel: tuning.x_vel_interval.draw(rng),
            min_x_speed: tuning.min_x_speed,
            max_x_speed: tuning.max_x_speed,
            facing_left: vx < 0,
            tuning,
        })
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Switch state. Entering `Flying` resets the rotation.
    pub fn set_state(&mut self, state: FlightState) {
        if state != self.state {
            log::debug!("reptile {:?} -> {:?}", self.state, state);
        }
        self.state = state;
        if state == FlightState::Flying {
            self.rotation = 0;
        }
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn ticks_to_next_flap(&self) -> i32 {
        self.ticks_to_next_flap
    }

    pub fn ticks_to_next_x_vel(&self) -> i32 {
        self.ticks_to_next_x_vel
    }

    pub fn tuning(&self) -> &ReptileTuning {
        &self.tuning
    }

    pub fn min_hor_speed(&self) -> u32 {
        self.min_x_speed
    }

    pub fn max_hor_speed(&self) -> u32 {
        self.max_x_speed
    }

    /// Ignored unless the new minimum stays below the maximum
    pub fn set_min_hor_speed(&mut self, speed: u32) {
        if speed < self.max_x_speed {
            self.min_x_speed = speed;
        } else {
            log::debug!(
                "ignoring min speed {} (max is {})",
                speed,
                self.max_x_speed
            );
        }
    }

    /// Ignored unless the new maximum stays above the minimum
    pub fn set_max_hor_speed(&mut self, speed: u32) {
        if self.min_x_speed < speed && speed <= i32::MAX as u32 {
            self.max_x_speed = speed;
        } else {
            log::debug!(
                "ignoring max speed {} (min is {})",
                speed,
                self.min_x_speed
            );
        }
    }

    /// Reset position and velocity in one go (used on respawn)
    pub fn set_offset_and_velocity(&mut self, left: i32, bottom: i32, vx: i32, vy: i32) {
        self.body.set_left_offset(left);
        self.body.set_bottom_offset(bottom);
        self.body.set_horizontal_vel(vx);
        self.body.set_vertical_vel(vy);
        self.update_facing();
    }

    /// Pick a new horizontal velocity with a random magnitude in
    /// `[min_speed, max_speed)` and a random sign, and restart the re-roll countdown
    pub fn set_rand_hor_vel<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let speed = rng.range(self.min_x_speed as i32, self.max_x_speed as i32);
        let vx = if rng.range(0, 2) == 0 { -speed } else { speed };
        self.body.set_horizontal_vel(vx);
        self.ticks_to_next_x_vel = self.tuning.x_vel_interval.draw(rng);
        self.update_facing();
    }

    /// Advance one fixed step
    pub fn tick<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        match self.state {
            FlightState::Flying => self.fly_tick(rng),
            FlightState::Falling => self.fall_tick(),
        }
    }

    fn fly_tick<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let grounded = self.body.integrate();
        if grounded {
            self.body.set_vertical_vel(0);
        } else {
            self.body.apply_gravity();
        }

        self.ticks_to_next_flap = self.ticks_to_next_flap.saturating_sub(1);
        if grounded {
            self.flap_wings(rng);
        }

        // Checked after the ground flap, so a grounded flyer below the band flaps twice
        let height = self.body.bottom_offset();
        let below_ceiling = height < self.tuning.max_flight_threshold;
        let wants_flap =
            self.ticks_to_next_flap <= 0 || height < self.tuning.min_flight_threshold;
        if below_ceiling && wants_flap {
            self.flap_wings(rng);
        }

        self.ticks_to_next_x_vel = self.ticks_to_next_x_vel.saturating_sub(1);
        if self.ticks_to_next_x_vel <= 0 {
            self.set_rand_hor_vel(rng);
        }

        self.update_facing();
    }

    fn fall_tick(&mut self) {
        self.body.tick();

        let step = self.tuning.rotation_step;
        match self.body.horizontal_vel() {
            vx if vx > 0 => self.rotate_clockwise(step),
            vx if vx < 0 => self.rotate_counter_clockwise(step),
            _ => {}
        }

        self.update_facing();
    }

    fn flap_wings<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let strength = self.tuning.flap_strength.draw(rng);
        let vy = self.body.vertical_vel().saturating_add(strength);
        self.body.set_vertical_vel(vy);
        self.ticks_to_next_flap = self.tuning.flap_interval.draw(rng);
    }

    fn rotate_clockwise(&mut self, degrees: i32) {
        self.rotation = wrap_degrees(self.rotation + degrees);
    }

    fn rotate_counter_clockwise(&mut self, degrees: i32) {
        self.rotation = wrap_degrees(self.rotation - degrees);
    }

    fn update_facing(&mut self) {
        let vx = self.body.horizontal_vel();
        if vx != 0 {
            self.facing_left = vx < 0;
        }
    }
}

impl PhysicsBody for Reptile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{RngState, ScriptedRng};

    const SPRITE: SpriteSize = SpriteSize::new(160, 120);

    /// Reptile with a flap countdown of 20 and a re-roll countdown of 40
    fn reptile() -> Reptile {
        let mut rng = ScriptedRng::new(&[20, 40]);
        Reptile::new(
            0,
            35,
            BodyParams::reptile_defaults(),
            SPRITE,
            ReptileTuning::default(),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_new_reptile_is_flying() {
        let r = reptile();
        assert_eq!(r.state(), FlightState::Flying);
        assert_eq!(r.rotation(), 0);
        assert_eq!(r.body().horizontal_vel(), 10);
        assert_eq!(r.body().vertical_vel(), 25);
        assert_eq!(r.body().width(), 80);
        assert_eq!(r.body().height(), 60);
        assert_eq!(r.ticks_to_next_flap(), 20);
        assert_eq!(r.ticks_to_next_x_vel(), 40);
        assert!(!r.facing_left());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = ReptileTuning {
            min_x_speed: 20,
            max_x_speed: 10,
            ..ReptileTuning::default()
        };
        let mut rng = ScriptedRng::default();
        let err = Reptile::new(
            0,
            0,
            BodyParams::reptile_defaults(),
            SPRITE,
            tuning,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_reentering_flight_resets_rotation() {
        let mut r = reptile();
        r.set_offset_and_velocity(0, 500, 5, 0);
        r.set_state(FlightState::Falling);

        let mut rng = ScriptedRng::default();
        r.tick(&mut rng);
        r.tick(&mut rng);
        assert_eq!(r.rotation(), 30);

        r.set_state(FlightState::Flying);
        assert_eq!(r.state(), FlightState::Flying);
        assert_eq!(r.rotation(), 0);
    }

    #[test]
    fn test_falling_rotates_with_direction() {
        let mut rng = ScriptedRng::default();

        let mut right = reptile();
        right.set_offset_and_velocity(0, 500, 5, 0);
        right.set_state(FlightState::Falling);
        right.tick(&mut rng);
        assert_eq!(right.rotation(), 15);

        let mut left = reptile();
        left.set_offset_and_velocity(0, 500, -5, 0);
        left.set_state(FlightState::Falling);
        left.tick(&mut rng);
        assert_eq!(left.rotation(), 345);
        assert!(left.facing_left());
    }

    #[test]
    fn test_falling_rotation_wraps() {
        let mut rng = ScriptedRng::default();
        let mut r = reptile();
        r.set_offset_and_velocity(0, 100_000, 5, 0);
        r.set_state(FlightState::Falling);
        for _ in 0..24 {
            r.tick(&mut rng);
        }
        assert_eq!(r.rotation(), 0);
        r.tick(&mut rng);
        assert_eq!(r.rotation(), 15);
    }

    #[test]
    fn test_falling_settles_with_friction() {
        let mut rng = ScriptedRng::default();
        let mut r = reptile();
        r.set_offset_and_velocity(0, 0, 3, 0);
        r.set_state(FlightState::Falling);

        r.tick(&mut rng);
        assert_eq!(r.body().horizontal_vel(), 2);
        r.tick(&mut rng);
        r.tick(&mut rng);
        assert_eq!(r.body().horizontal_vel(), 0);
        assert_eq!(r.body().vertical_vel(), 0);
        // No spin once stopped
        let rotation = r.rotation();
        r.tick(&mut rng);
        assert_eq!(r.rotation(), rotation);
    }

    #[test]
    fn test_grounded_flyer_flaps_twice() {
        let mut r = reptile();
        r.set_offset_and_velocity(0, 0, 5, 0);

        // ground flap (6, interval 15), then the below-band flap (5, interval 12)
        let mut rng = ScriptedRng::new(&[6, 15, 5, 12]);
        r.tick(&mut rng);

        assert_eq!(r.body().bottom_offset(), 0);
        assert_eq!(r.body().vertical_vel(), 11);
        assert_eq!(r.ticks_to_next_flap(), 12);
        // No friction while flying
        assert_eq!(r.body().horizontal_vel(), 5);
    }

    #[test]
    fn test_grounded_flyer_above_band_flaps_once() {
        let mut r = reptile();
        r.tuning.min_flight_threshold = -10;
        r.ticks_to_next_flap = 20;
        r.set_offset_and_velocity(0, 0, 5, 0);

        let mut rng = ScriptedRng::new(&[6, 15]);
        r.tick(&mut rng);

        assert_eq!(r.body().vertical_vel(), 6);
        assert_eq!(r.ticks_to_next_flap(), 15);
        assert_eq!(r.tuning().min_flight_threshold, -10);
    }

    #[test]
    fn test_flyer_flaps_below_min_threshold() {
        let mut r = reptile();
        r.set_offset_and_velocity(0, 50, 5, 0);

        let mut rng = ScriptedRng::new(&[7, 15]);
        r.tick(&mut rng);

        // gravity -1, flap +7
        assert_eq!(r.body().vertical_vel(), 6);
        assert_eq!(r.ticks_to_next_flap(), 15);
    }

    #[test]
    fn test_flyer_flaps_when_countdown_elapses() {
        let mut r = reptile();
        r.ticks_to_next_flap = 1;
        r.set_offset_and_velocity(0, 200, 5, 0);

        let mut rng = ScriptedRng::new(&[5, 12]);
        r.tick(&mut rng);

        assert_eq!(r.body().vertical_vel(), 4);
        assert_eq!(r.ticks_to_next_flap(), 12);
    }

    #[test]
    fn test_flyer_coasts_inside_band() {
        let mut r = reptile();
        r.set_offset_and_velocity(0, 200, 5, 0);

        let mut rng = ScriptedRng::default();
        r.tick(&mut rng);

        assert_eq!(r.body().vertical_vel(), -1);
        assert_eq!(r.ticks_to_next_flap(), 19);
    }

    #[test]
    fn test_flyer_never_flaps_above_ceiling() {
        let mut r = reptile();
        r.ticks_to_next_flap = 1;
        r.set_offset_and_velocity(0, 500, 5, 0);

        let mut rng = ScriptedRng::new(&[8]);
        r.tick(&mut rng);

        assert_eq!(r.body().vertical_vel(), -1);
        assert!(r.ticks_to_next_flap() <= 0);
    }

    #[test]
    fn test_horizontal_velocity_reroll() {
        let mut r = reptile();
        r.ticks_to_next_x_vel = 1;
        r.set_offset_and_velocity(100, 200, 5, 0);

        // magnitude 12, sign 0 (left), next countdown 25
        let mut rng = ScriptedRng::new(&[12, 0, 25]);
        r.tick(&mut rng);

        assert_eq!(r.body().horizontal_vel(), -12);
        assert_eq!(r.ticks_to_next_x_vel(), 25);
        assert!(r.facing_left());
    }

    #[test]
    fn test_set_rand_hor_vel_respects_bounds() {
        let mut r = reptile();
        let mut rng = RngState::new(3).to_rng();
        for _ in 0..200 {
            r.set_rand_hor_vel(&mut rng);
            let speed = r.body().horizontal_vel().unsigned_abs();
            assert!(speed >= r.min_hor_speed() && speed < r.max_hor_speed());
        }
    }

    #[test]
    fn test_speed_bound_setters_keep_order() {
        let mut r = reptile();
        assert_eq!((r.min_hor_speed(), r.max_hor_speed()), (5, 15));

        r.set_min_hor_speed(20);
        assert_eq!(r.min_hor_speed(), 5);
        r.set_min_hor_speed(15);
        assert_eq!(r.min_hor_speed(), 5);
        r.set_min_hor_speed(7);
        assert_eq!(r.min_hor_speed(), 7);

        r.set_max_hor_speed(6);
        assert_eq!(r.max_hor_speed(), 15);
        r.set_max_hor_speed(7);
        assert_eq!(r.max_hor_speed(), 15);
        r.set_max_hor_speed(30);
        assert_eq!(r.max_hor_speed(), 30);
    }

    #[test]
    fn test_seeded_flight_stays_airborne_and_upright() {
        let mut rng = RngState::new(12345).to_rng();
        let mut r = Reptile::new(
            0,
            35,
            BodyParams::reptile_defaults(),
            SPRITE,
            ReptileTuning::default(),
            &mut rng,
        )
        .unwrap();

        let mut grounded_ticks = 0;
        for _ in 0..1000 {
            r.tick(&mut rng);
            assert!(r.body().bottom_offset() >= 0);
            assert_eq!(r.rotation(), 0);
            if r.body().is_grounded() {
                grounded_ticks += 1;
            }
        }
        assert!(grounded_ticks < 200);
    }

    #[test]
    fn test_reptile_hits_crate() {
        use crate::sim::crate_body::Crate;

        let mut r = reptile();
        r.set_offset_and_velocity(0, 0, 10, 0);
        let mut c = Crate::new(70, 0, SpriteSize::new(128, 128)).unwrap();

        assert!(r.detect_collision(&mut c));
        // reptile is left of the crate: snapped to crate.left - width
        assert_eq!(r.body().left_offset(), 70 - 80);
        // give force = (10 * 3) * 0.5 = 15; reptile -15/3, crate +15/5
        assert_eq!(r.body().horizontal_vel(), 5);
        assert_eq!(c.body().horizontal_vel(), 3);
    }
}
