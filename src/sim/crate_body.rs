//! Passive crates scattered on the platform

use serde::{Deserialize, Serialize};

use super::body::{Body, BodyParams, PhysicsBody, SpriteSize};
use crate::error::SimError;

/// A crate: a body with no behavior of its own beyond integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crate {
    body: Body,
}

impl Crate {
    /// A standard crate resting at the given offsets
    pub fn new(left: i32, bottom: i32, sprite: SpriteSize) -> Result<Self, SimError> {
        Self::with_params(left, bottom, BodyParams::crate_defaults(), sprite)
    }

    /// A special crate with its own weight, force fraction and scale
    pub fn with_params(
        left: i32,
        bottom: i32,
        params: BodyParams,
        sprite: SpriteSize,
    ) -> Result<Self, SimError> {
        Ok(Self {
            body: Body::new(left, bottom, params, sprite)?,
        })
    }

    pub fn tick(&mut self) {
        self.body.tick();
    }
}

impl PhysicsBody for Crate {
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

    const SPRITE: SpriteSize = SpriteSize::new(128, 128);

    #[test]
    fn test_default_crate() {
        let c = Crate::new(100, 0, SPRITE).unwrap();
        assert_eq!(c.body().width(), 38);
        assert_eq!(c.body().weight(), 5);
        assert_eq!(c.body().velocity(), glam::IVec2::ZERO);
    }

    #[test]
    fn test_deserialized_crate_keeps_weight_check() {
        let c = Crate::new(100, 0, SPRITE).unwrap();
        let mut json = serde_json::to_value(&c).unwrap();
        assert_eq!(serde_json::from_value::<Crate>(json.clone()).unwrap(), c);

        json["body"]["weight"] = 0.into();
        assert!(serde_json::from_value::<Crate>(json).is_err());
    }

    #[test]
    fn test_special_crate_rejects_zero_weight() {
        let params = BodyParams {
            weight: 0,
            ..BodyParams::crate_defaults()
        };
        assert!(Crate::with_params(0, 0, params, SPRITE).is_err());
    }

    #[test]
    fn test_resting_crate_stays_put() {
        let mut c = Crate::new(100, 0, SPRITE).unwrap();
        for _ in 0..10 {
            c.tick();
        }
        assert_eq!(c.body().left_offset(), 100);
        assert_eq!(c.body().bottom_offset(), 0);
    }

    #[test]
    fn test_dropped_crate_lands() {
        let mut c = Crate::new(0, 10, SPRITE).unwrap();
        let mut ticks = 0;
        while !c.body().is_grounded() {
            c.tick();
            ticks += 1;
            assert!(ticks < 100);
        }
        c.tick();
        assert_eq!(c.body().vertical_vel(), 0);
    }

    #[test]
    fn test_crate_pushes_crate() {
        let mut a = Crate::new(30, 0, SPRITE).unwrap();
        let mut b = Crate::new(0, 0, SPRITE).unwrap();
        a.body_mut().set_horizontal_vel(-20);

        assert!(a.detect_collision(&mut b));

        assert_eq!(a.body().left_offset(), 38);
        // (-20 * 5) * 0.3 = -30 -> a gets +6, b gets -6
        assert_eq!(a.body().horizontal_vel(), -14);
        assert_eq!(b.body().horizontal_vel(), -6);
    }

    #[test]
    fn test_far_crates_do_not_collide() {
        let mut a = Crate::new(300, 0, SPRITE).unwrap();
        let mut b = Crate::new(0, 0, SPRITE).unwrap();
        a.body_mut().set_horizontal_vel(-20);
        let before = (a.clone(), b.clone());

        assert!(!a.detect_collision(&mut b));
        assert_eq!((a, b), before);
    }
}
