//! The player's platform
//!
//! Input moves a desired position; the visible platform follows it on a
//! critically damped spring. A second spring drives a purely cosmetic
//! recoil when balls land on it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{LevelCoord, Time, force_in_range};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Center x in level coordinates
    position: LevelCoord,
    /// Where input wants the platform to be
    desired_position: LevelCoord,
    velocity: f32,
    size: LevelCoord,
    desired_size: LevelCoord,

    moving_left: bool,
    moving_right: bool,
    moving_fast: bool,

    /// Visual recoil offset (negative = pushed down)
    bounce_height: f32,
    bounce_velocity: f32,
}

impl Platform {
    /// A default-sized platform centered in a level `level_width` wide
    pub fn new(level_width: LevelCoord) -> Self {
        let mut platform = Self {
            position: 0.0,
            desired_position: 0.0,
            velocity: 0.0,
            size: DEFAULT_PLATFORM_SIZE,
            desired_size: DEFAULT_PLATFORM_SIZE,
            moving_left: false,
            moving_right: false,
            moving_fast: false,
            bounce_height: 0.0,
            bounce_velocity: 0.0,
        };
        platform.reset(level_width);
        platform
    }

    /// Recenter and restore default size. Movement intent is kept since the
    /// keys may still be held.
    pub fn reset(&mut self, level_width: LevelCoord) {
        self.position = level_width / 2.0;
        self.desired_position = self.position;
        self.velocity = 0.0;
        self.size = DEFAULT_PLATFORM_SIZE;
        self.desired_size = DEFAULT_PLATFORM_SIZE;
        self.bounce_height = 0.0;
        self.bounce_velocity = 0.0;
    }

    #[inline]
    pub fn position(&self) -> LevelCoord {
        self.position
    }

    #[inline]
    pub fn size(&self) -> LevelCoord {
        self.size
    }

    pub fn desired_size(&self) -> LevelCoord {
        self.desired_size
    }

    pub fn min_x(&self) -> LevelCoord {
        self.position - self.size / 2.0
    }

    pub fn max_x(&self) -> LevelCoord {
        self.position + self.size / 2.0
    }

    /// Visual recoil offset for the renderer
    pub fn bounce_height(&self) -> f32 {
        self.bounce_height
    }

    pub fn set_position(&mut self, position: LevelCoord) {
        self.position = position;
        self.desired_position = position;
        self.velocity = 0.0;
    }

    /// Resize immediately
    pub fn set_size(&mut self, size: LevelCoord) {
        self.size = size;
        self.desired_size = size;
    }

    /// Resize gradually over the next ticks
    pub fn set_size_animated(&mut self, size: LevelCoord) {
        self.desired_size = size;
    }

    /// Key press or release for one direction
    pub fn set_movement(&mut self, is_left: bool, pressed: bool, is_fast: bool) {
        if is_left {
            self.moving_left = pressed;
        } else {
            self.moving_right = pressed;
        }
        self.set_movement_fast(is_fast);
    }

    pub fn set_movement_fast(&mut self, is_fast: bool) {
        self.moving_fast = is_fast;
    }

    /// Kick the recoil spring with a ball's momentum
    pub fn kick(&mut self, impulse: f32) {
        self.bounce_velocity -= impulse * PLATFORM_BOUNCE_PER_UNIT_IMPULSE;
    }

    /// Advance one frame. Platform speed follows the fastest ball so the
    /// player can keep up as balls accelerate.
    pub fn tick(&mut self, dt: Time, level_width: LevelCoord, fastest_ball_speed: f32) {
        self.tick_size(dt);
        self.tick_movement(dt, level_width, fastest_ball_speed);
        self.tick_bounce(dt);
    }

    fn tick_movement(&mut self, dt: Time, level_width: LevelCoord, fastest_ball_speed: f32) {
        let mut speed = fastest_ball_speed.max(DEFAULT_BALL_SPEED);
        if self.moving_fast {
            speed *= PLATFORM_FAST_FACTOR;
        }

        let mut direction = 0.0;
        if self.moving_left {
            direction -= 1.0;
        }
        if self.moving_right {
            direction += 1.0;
        }

        let min = self.size / 2.0;
        let max = level_width - self.size / 2.0;

        self.desired_position =
            force_in_range(min, self.desired_position + direction * speed * dt, max);

        let accel = (self.desired_position - self.position) * PLATFORM_STIFFNESS
            - self.velocity * PLATFORM_DAMPING;
        self.velocity += accel * dt;
        self.position += self.velocity * dt;

        let clamped = force_in_range(min, self.position, max);
        if clamped != self.position {
            self.position = clamped;
            self.velocity = 0.0;
        }
    }

    fn tick_size(&mut self, dt: Time) {
        let t = (PLATFORM_SIZE_EASING * dt).min(1.0);
        self.size += (self.desired_size - self.size) * t;
    }

    fn tick_bounce(&mut self, dt: Time) {
        let accel = -self.bounce_height * PLATFORM_BOUNCE_STIFFNESS
            - self.bounce_velocity * PLATFORM_BOUNCE_DAMPING;
        self.bounce_velocity += accel * dt;
        self.bounce_height += self.bounce_velocity * dt;
    }
}
