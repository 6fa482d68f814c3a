//! Ball entity
//!
//! Mass grows with the cube of the radius, so when a bonus resizes a ball
//! its velocity is rescaled to keep momentum (not speed) constant, and brick
//! damage scales with momentum.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::{ball_cell_collision, candidate_cells};
use super::context::FrameContext;
use super::game::{Game, Sprite, SpriteKind};
use super::platform::Platform;
use crate::consts::*;
use crate::{LevelBlock, LevelCoord, LevelPoint, Time, force_in_range};

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    body: Body,
    /// Pinned to the platform, waiting for release
    held: bool,
    /// Seconds of floor immunity left
    invincibility: Time,
    /// Target of the radius animation
    desired_radius: LevelCoord,
}

impl Ball {
    /// A default ball moving straight up
    pub fn new(id: u32, pos: LevelPoint) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::new(0.0, DEFAULT_BALL_SPEED), DEFAULT_BALL_RADIUS),
            held: false,
            invincibility: 0.0,
            desired_radius: DEFAULT_BALL_RADIUS,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.body.set_velocity(vel);
        self
    }

    #[inline]
    pub fn pos(&self) -> LevelPoint {
        self.body.pos()
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.body.vel()
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.body.speed()
    }

    #[inline]
    pub fn radius(&self) -> LevelCoord {
        self.body.radius()
    }

    pub fn desired_radius(&self) -> LevelCoord {
        self.desired_radius
    }

    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Uniform density, calibrated so a default-sized ball has mass 1
    pub fn mass(&self) -> f32 {
        mass_of(self.radius())
    }

    /// Momentum magnitude (mass * speed)
    pub fn impulse(&self) -> f32 {
        self.mass() * self.speed()
    }

    /// Resize immediately (velocity untouched)
    pub fn set_radius(&mut self, radius: LevelCoord) {
        self.body.set_radius(radius);
        self.desired_radius = radius;
    }

    /// Resize gradually, conserving momentum
    pub fn set_radius_animated(&mut self, radius: LevelCoord) {
        self.desired_radius = radius;
    }

    pub fn invincibility(&self) -> Time {
        self.invincibility
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility > 0.0
    }

    pub fn add_invincibility(&mut self, time: Time) {
        self.invincibility += time;
    }

    /// Speed up along the current direction
    pub fn accelerate(&mut self, delta: f32) {
        let speed = self.speed();
        if speed > 0.0 {
            self.body.set_velocity(self.vel() * ((speed + delta) / speed));
        }
    }

    /// Pin the ball on top of the platform, aimed straight down so the first
    /// free tick bounces it off the platform
    pub fn hold(&mut self) {
        if self.held {
            return;
        }

        self.held = true;
        let radius = self.radius();
        self.body.pos_mut().y = PLATFORM_HEIGHT + radius;
        let speed = self.speed();
        self.body.set_velocity(Vec2::new(0.0, -speed));
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    /// Advance one frame
    pub fn tick(&mut self, game: &mut Game, frame: &mut FrameContext<'_>, dt: Time) {
        if self.tick_held(&game.platform) {
            return;
        }

        self.tick_radius(dt);

        self.body.integrate(dt);
        self.check_collisions(game, frame);

        self.accelerate(BALL_ACCELERATION_PER_SECOND_PER_UNIT_MASS * dt / self.mass());

        self.tick_invincibility(dt);
    }

    /// Follow the platform while held. Returns true if held.
    fn tick_held(&mut self, platform: &Platform) -> bool {
        if !self.held {
            return false;
        }

        let reach = platform.size() * HELD_BALL_REACH;
        let radius = self.radius();
        let pos = self.body.pos_mut();
        pos.x = force_in_range(platform.position() - reach, pos.x, platform.position() + reach);
        pos.y = PLATFORM_HEIGHT + radius;
        true
    }

    /// Move the radius toward its target at a fixed rate without overshoot
    pub fn tick_radius(&mut self, dt: Time) {
        let radius = self.radius();
        if radius == self.desired_radius {
            return;
        }

        let step = BALL_RADIUS_CHANGE_SPEED * dt;
        let new_radius = if radius < self.desired_radius {
            (radius + step).min(self.desired_radius)
        } else {
            (radius - step).max(self.desired_radius)
        };

        let ratio = mass_of(radius) / mass_of(new_radius);
        self.body.set_radius(new_radius);
        self.body.set_velocity(self.vel() * ratio);
    }

    fn tick_invincibility(&mut self, dt: Time) {
        if self.is_invincible() {
            self.invincibility = (self.invincibility - dt).max(0.0);
        }
    }

    fn check_collisions(&mut self, game: &mut Game, frame: &mut FrameContext<'_>) {
        if self.body.touches_platform(&game.platform) {
            self.on_collide_with_platform(game);
        }

        let width = game.level.width() as f32;
        let height = game.level.height() as f32;
        let contact = self.body.collide_with_bounds(width, height);

        if contact.ceiling || contact.wall {
            game.add_sprite(Sprite::new(SpriteKind::Collision, self.pos()));
        }

        if contact.floor {
            self.on_collide_with_floor(game);
        }

        if !self.is_dead() {
            self.collide_with_level(game, frame);
        }
    }

    /// Deflect off the platform: the further from its center, the flatter
    fn on_collide_with_platform(&mut self, game: &mut Game) {
        let platform = &game.platform;
        let speed = self.speed();
        let offset = (self.pos().x - platform.position()) / (platform.size() / 2.0 + self.radius());

        let vx = speed * PLATFORM_RESTITUTION * offset;
        let vy = (speed * speed - vx * vx).max(0.0).sqrt();
        self.body.set_velocity(Vec2::new(vx, vy));

        game.platform.kick(self.impulse());
        game.add_sprite(Sprite::new(SpriteKind::Collision, self.pos()));
    }

    fn on_collide_with_floor(&mut self, game: &mut Game) {
        if self.is_invincible() {
            if self.body.bounce_y(true, 0.0) {
                game.add_sprite(Sprite::new(SpriteKind::Collision, self.pos()));
            }
            return;
        }

        game.add_sprite(Sprite::new(
            SpriteKind::FloorCollision {
                radius: self.radius(),
                velocity: self.vel(),
            },
            self.pos(),
        ));
        self.body.die();
    }

    /// Test every cell under the ball's bounding box
    fn collide_with_level(&mut self, game: &mut Game, frame: &mut FrameContext<'_>) {
        let cells: Vec<LevelBlock> = candidate_cells(self.pos(), self.radius()).collect();
        for cell in cells {
            self.collide_with_cell(game, frame, cell);
        }
    }

    fn collide_with_cell(&mut self, game: &mut Game, frame: &mut FrameContext<'_>, cell: LevelBlock) {
        if game.level.brick(cell).is_none() {
            return;
        }

        let Some(hit) = ball_cell_collision(cell, self.pos(), self.radius()) else {
            return;
        };

        if !game.hit_brick(frame, cell, self.impulse()) {
            return;
        }

        let mut bounced = false;
        if hit.horizontal {
            bounced |= self.body.bounce_x(hit.positive_x, hit.border_x(cell));
        }
        if hit.vertical {
            bounced |= self.body.bounce_y(hit.positive_y, hit.border_y(cell));
        }

        if bounced {
            game.add_sprite(Sprite::new(SpriteKind::Collision, self.pos()));
        }
    }
}

fn mass_of(radius: LevelCoord) -> f32 {
    (radius / DEFAULT_BALL_RADIUS).powi(3)
}
