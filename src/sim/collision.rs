//! AABB collision detection and response
//!
//! Overlap is a closed-interval test on box centers, so touching edges count.
//! Resolution snaps one box against the other along the dominant axis and then
//! trades momentum between the two bodies. The exchange is an arcade
//! approximation: integer truncation means momentum is not conserved.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::body::Body;

/// Axis-aligned box anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
}

impl Aabb {
    pub fn new(left: i32, bottom: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }

    /// Center point, using the integer half extents
    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.left, self.bottom).saturating_add(self.half_extents())
    }

    /// Closed containment test, used for click hit tests
    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.left
            && point.x <= self.left.saturating_add(self.width)
            && point.y >= self.bottom
            && point.y <= self.bottom.saturating_add(self.height)
    }
}

/// Dominant axis of an impact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactAxis {
    /// Side-on collision
    Horizontal,
    /// Top or bottom collision
    Vertical,
}

/// Outcome of a resolved collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Center of the first box minus center of the second, before correction
    pub delta: IVec2,
    pub axis: ImpactAxis,
    /// Momentum given up by the first body
    pub force_a: i32,
    /// Momentum given up by the second body
    pub force_b: i32,
}

/// Displacement from the center of `b` to the center of `a`
#[inline]
pub fn center_delta(a: &Aabb, b: &Aabb) -> IVec2 {
    a.center().saturating_sub(b.center())
}

/// Closed-interval overlap test
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let delta = center_delta(a, b);
    let reach = a.half_extents() + b.half_extents();
    delta.x.unsigned_abs() <= reach.x.unsigned_abs()
        && delta.y.unsigned_abs() <= reach.y.unsigned_abs()
}

/// Collide `a` against `b`, resolving the collision if they overlap.
/// Returns whether a collision happened. Non-overlapping bodies are left untouched.
pub fn detect_collision(a: &mut Body, b: &mut Body) -> bool {
    if !overlaps(&a.bounds(), &b.bounds()) {
        return false;
    }
    let contact = handle_collision(a, b);
    log::trace!(
        "collision {:?} delta={} forces=({}, {})",
        contact.axis,
        contact.delta,
        contact.force_a,
        contact.force_b
    );
    true
}

/// Resolve a collision between two bodies already known to overlap.
///
/// Side impacts move `a` flush against `b`. Vertical impacts move `a` onto the
/// top of `b` when `a` is above, but push `b` up onto `a` when `a` is below.
/// Each body only gives up momentum if it was moving toward the other.
pub fn handle_collision(a: &mut Body, b: &mut Body) -> Contact {
    let delta = center_delta(&a.bounds(), &b.bounds());

    if delta.x.unsigned_abs() >= delta.y.unsigned_abs() {
        let (force_a, force_b) = if delta.x > 0 {
            // a is to the right of b
            a.set_left_offset(b.left_offset().saturating_add(b.width()));
            (
                gated(a.horizontal_vel() < 0, || a.calc_horizontal_force()),
                gated(b.horizontal_vel() > 0, || b.calc_horizontal_force()),
            )
        } else {
            a.set_left_offset(b.left_offset().saturating_sub(a.width()));
            (
                gated(a.horizontal_vel() > 0, || a.calc_horizontal_force()),
                gated(b.horizontal_vel() < 0, || b.calc_horizontal_force()),
            )
        };

        a.apply_horizontal_force(force_a.saturating_neg());
        b.apply_horizontal_force(force_a);
        b.apply_horizontal_force(force_b.saturating_neg());
        a.apply_horizontal_force(force_b);

        Contact {
            delta,
            axis: ImpactAxis::Horizontal,
            force_a,
            force_b,
        }
    } else {
        let (force_a, force_b) = if delta.y > 0 {
            // a is above b
            a.set_bottom_offset(b.bottom_offset().saturating_add(b.height()));
            (
                gated(a.vertical_vel() < 0, || a.calc_vertical_force()),
                gated(b.vertical_vel() > 0, || b.calc_vertical_force()),
            )
        } else {
            // a is below b: the upper body is lifted, a stays put
            b.set_bottom_offset(a.bottom_offset().saturating_add(a.height()));
            (
                gated(a.vertical_vel() > 0, || a.calc_vertical_force()),
                gated(b.vertical_vel() < 0, || b.calc_vertical_force()),
            )
        };

        a.apply_vertical_force(force_a.saturating_neg());
        b.apply_vertical_force(force_a);
        b.apply_vertical_force(force_b.saturating_neg());
        a.apply_vertical_force(force_b);

        Contact {
            delta,
            axis: ImpactAxis::Vertical,
            force_a,
            force_b,
        }
    }
}

#[inline]
fn gated(moving_toward: bool, force: impl FnOnce() -> i32) -> i32 {
    if moving_toward { force() } else { 0 }
}
