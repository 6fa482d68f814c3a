//! Shared physics for round moving objects (balls and bonuses)
//!
//! A `Body` integrates its position, bounces off the ceiling and side walls
//! on its own, and reports platform and floor contact to its owner, since
//! those have different consequences for balls and bonuses.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platform::Platform;
use crate::consts::{BOUNCE_MARGIN, PLATFORM_HEIGHT};
use crate::{LevelCoord, LevelPoint, Time, is_in_range};

/// Which level borders a body touched during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderContact {
    /// Bounced off the ceiling
    pub ceiling: bool,
    /// Bounced off a side wall
    pub wall: bool,
    /// Reached the floor (not handled here)
    pub floor: bool,
}

/// Position, velocity and size of a round object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pos: LevelPoint,
    vel: Vec2,
    /// Cached `vel.length()`, refreshed whenever `vel` changes
    speed: f32,
    radius: LevelCoord,
    dead: bool,
}

impl Body {
    pub fn new(pos: LevelPoint, vel: Vec2, radius: LevelCoord) -> Self {
        Self {
            pos,
            vel,
            speed: vel.length(),
            radius,
            dead: false,
        }
    }

    #[inline]
    pub fn pos(&self) -> LevelPoint {
        self.pos
    }

    #[inline]
    pub fn pos_mut(&mut self) -> &mut LevelPoint {
        &mut self.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn radius(&self) -> LevelCoord {
        self.radius
    }

    pub fn set_radius(&mut self, radius: LevelCoord) {
        self.radius = radius;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn die(&mut self) {
        self.dead = true;
    }

    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
        self.speed = vel.length();
    }

    /// Explicit Euler step
    pub fn integrate(&mut self, dt: Time) {
        self.pos += self.vel * dt;
    }

    /// Reflect the x velocity off a vertical border.
    ///
    /// `positive` is the side of the border the body should end up on. Does
    /// nothing if the body is already moving toward that side, so a body that
    /// was pushed clear of the border cannot bounce twice.
    pub fn bounce_x(&mut self, positive: bool, border: LevelCoord) -> bool {
        let bounced = bounce(&mut self.vel.x, &mut self.pos.x, self.radius, positive, border);
        self.speed = self.vel.length();
        bounced
    }

    /// Reflect the y velocity off a horizontal border
    pub fn bounce_y(&mut self, positive: bool, border: LevelCoord) -> bool {
        let bounced = bounce(&mut self.vel.y, &mut self.pos.y, self.radius, positive, border);
        self.speed = self.vel.length();
        bounced
    }

    /// Falling onto the platform from above, within its reach
    pub fn touches_platform(&self, platform: &Platform) -> bool {
        self.vel.y < 0.0
            && self.pos.y - self.radius <= PLATFORM_HEIGHT
            && is_in_range(
                platform.min_x() - self.radius,
                self.pos.x,
                platform.max_x() + self.radius,
            )
    }

    /// Bounce off the ceiling and side walls of a `width` x `height` level
    pub fn collide_with_bounds(&mut self, width: LevelCoord, height: LevelCoord) -> BorderContact {
        let mut contact = BorderContact::default();

        if self.pos.y >= height - self.radius {
            contact.ceiling = self.bounce_y(false, height);
        }

        if self.pos.x <= self.radius {
            contact.wall = self.bounce_x(true, 0.0);
        } else if self.pos.x >= width - self.radius {
            contact.wall = self.bounce_x(false, width);
        }

        contact.floor = self.pos.y - self.radius <= 0.0;
        contact
    }
}

fn bounce(
    velocity: &mut f32,
    coord: &mut LevelCoord,
    radius: LevelCoord,
    positive: bool,
    border: LevelCoord,
) -> bool {
    if *velocity == 0.0 || positive == (*velocity > 0.0) {
        return false;
    }

    *velocity = -*velocity;

    let margin = radius + BOUNCE_MARGIN;
    *coord = border + if positive { margin } else { -margin };
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_speed_follows_velocity() {
        let mut body = Body::new(Vec2::ZERO, Vec2::new(3.0, 4.0), 0.25);
        assert!((body.speed() - 5.0).abs() < 1e-6);
        body.set_velocity(Vec2::new(0.0, -2.0));
        assert!((body.speed() - 2.0).abs() < 1e-6);
        body.bounce_y(true, 0.0);
        assert!((body.speed() - 2.0).abs() < 1e-6);
        assert!(body.vel().y > 0.0);
    }

    #[test]
    fn test_wall_bounce_clamps_position() {
        let mut body = Body::new(Vec2::new(9.9, 5.0), Vec2::new(2.0, 1.0), 0.25);
        let contact = body.collide_with_bounds(10.0, 10.0);
        assert!(contact.wall);
        assert!(!contact.ceiling);
        assert!(!contact.floor);
        assert!(body.vel().x < 0.0);
        assert!((body.pos().x - (10.0 - 0.25 - BOUNCE_MARGIN)).abs() < 1e-5);
    }

    #[test]
    fn test_ceiling_bounce() {
        let mut body = Body::new(Vec2::new(5.0, 9.9), Vec2::new(0.0, 3.0), 0.25);
        let contact = body.collide_with_bounds(10.0, 10.0);
        assert!(contact.ceiling);
        assert_eq!(body.vel().y, -3.0);
        assert!((body.pos().y - (10.0 - 0.25 - BOUNCE_MARGIN)).abs() < 1e-5);
    }

    #[test]
    fn test_floor_reported_not_bounced() {
        let mut body = Body::new(Vec2::new(5.0, 0.1), Vec2::new(0.0, -3.0), 0.25);
        let contact = body.collide_with_bounds(10.0, 10.0);
        assert!(contact.floor);
        assert_eq!(body.vel().y, -3.0);
    }

    #[test]
    fn test_no_bounce_when_moving_away() {
        let mut body = Body::new(Vec2::new(0.1, 5.0), Vec2::new(2.0, 0.0), 0.25);
        assert!(!body.bounce_x(true, 0.0));
        assert_eq!(body.vel().x, 2.0);
        assert_eq!(body.pos().x, 0.1);
    }

    #[test]
    fn test_touches_platform() {
        let platform = Platform::new(10.0);
        let x = platform.position();
        let falling = Body::new(Vec2::new(x, 0.9), Vec2::new(0.0, -1.0), 0.25);
        assert!(falling.touches_platform(&platform));

        let rising = Body::new(Vec2::new(x, 0.9), Vec2::new(0.0, 1.0), 0.25);
        assert!(!rising.touches_platform(&platform));

        let beside = Body::new(Vec2::new(x + 5.0, 0.9), Vec2::new(0.0, -1.0), 0.25);
        assert!(!beside.touches_platform(&platform));
    }

    proptest! {
        #[test]
        fn prop_bounce_does_not_retrigger(
            overshoot in 0.0f32..0.5,
            vx in 0.1f32..30.0,
            vy in -30.0f32..30.0,
            radius in 0.05f32..1.0,
            dt in 0.0f32..0.05,
        ) {
            let x = 10.0 - radius + overshoot;
            let mut body = Body::new(Vec2::new(x, 5.0), Vec2::new(vx, vy), radius);
            let first = body.collide_with_bounds(10.0, 100.0);
            prop_assert!(first.wall);
            let vel_after = body.vel();

            // Moving away from the wall now: the next tick must not flip it back
            body.integrate(dt);
            let second = body.collide_with_bounds(10.0, 100.0);
            prop_assert!(!second.wall);
            prop_assert_eq!(body.vel().x, vel_after.x);
        }
    }
}
