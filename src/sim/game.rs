//! State of one level being played

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::bonus::Bonus;
use super::brick::{BrickKind, HitOutcome};
use super::context::FrameContext;
use super::level::Level;
use super::platform::Platform;
use crate::consts::*;
use crate::{LevelBlock, LevelCoord, LevelPoint, Lives, Score, Time};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Running,
    Paused,
    /// Level cleared
    Victory,
    /// Out of lives
    Defeat,
}

/// Transitions the outside world has to react to (results screen, sounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LifeLost { lives: Lives },
    Victory { score: Score },
    Defeat { score: Score },
}

/// Kinds of short-lived visual effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpriteKind {
    /// Ball bounced off something
    Collision,
    BrickBroken,
    BrickExplosion,
    /// Ball lost through the floor
    FloorCollision { radius: LevelCoord, velocity: Vec2 },
    BonusCollected,
    BonusFloorCollision { velocity: Vec2 },
}

impl SpriteKind {
    /// Seconds the effect stays visible
    pub fn lifetime(&self) -> Time {
        match self {
            SpriteKind::Collision => 0.25,
            SpriteKind::BrickBroken => 0.5,
            SpriteKind::BrickExplosion => 0.6,
            SpriteKind::FloorCollision { .. } => 1.0,
            SpriteKind::BonusCollected => 0.5,
            SpriteKind::BonusFloorCollision { .. } => 1.0,
        }
    }
}

/// A visual effect (not gameplay-affecting)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: LevelPoint,
    pub age: Time,
}

impl Sprite {
    pub fn new(kind: SpriteKind, pos: LevelPoint) -> Self {
        Self { kind, pos, age: 0.0 }
    }

    /// Animation progress, 0 at spawn and 1 at expiry
    pub fn progress(&self) -> f32 {
        (self.age / self.kind.lifetime()).clamp(0.0, 1.0)
    }
}

/// One level in play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub level: Level,
    pub platform: Platform,
    pub state: GameState,
    balls: Vec<Ball>,
    bonuses: Vec<Bonus>,
    #[serde(skip)]
    sprites: Vec<Sprite>,
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Game {
    /// A running game with no balls yet
    pub fn new(level: Level) -> Self {
        let platform = Platform::new(level.width() as f32);
        Self {
            level,
            platform,
            state: GameState::Running,
            balls: Vec::new(),
            bonuses: Vec::new(),
            sprites: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn add_ball(&mut self, ball: Ball) {
        self.balls.push(ball);
    }

    /// A free ball at `pos` moving with `vel`. Returns its id.
    pub fn spawn_ball(&mut self, pos: LevelPoint, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, pos).with_velocity(vel));
        id
    }

    /// A default ball resting on the platform, slightly off center
    pub fn add_held_ball(&mut self) -> u32 {
        let id = self.next_entity_id();
        let pos = Vec2::new(self.platform.position() + HELD_BALL_OFFSET, PLATFORM_HEIGHT);
        let mut ball = Ball::new(id, pos);
        ball.hold();
        self.balls.push(ball);
        id
    }

    /// Serve again: one held ball on a recentered platform. Falling bonuses
    /// stay in play.
    pub fn reset_balls(&mut self) {
        self.balls.clear();
        self.platform.reset(self.level.width() as f32);
        self.add_held_ball();
    }

    pub fn add_bonus(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn add_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    /// Key press or release for one direction
    pub fn set_movement(&mut self, is_left: bool, pressed: bool, is_fast: bool) {
        self.platform.set_movement(is_left, pressed, is_fast);
    }

    pub fn set_movement_fast(&mut self, is_fast: bool) {
        self.platform.set_movement_fast(is_fast);
    }

    pub fn release_balls(&mut self) {
        for ball in &mut self.balls {
            ball.release();
        }
    }

    /// RUNNING <-> PAUSED; ignored once the level is over
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
            other => other,
        };
    }

    /// Speed of the fastest live ball
    pub fn fastest_ball_speed(&self) -> f32 {
        self.balls
            .iter()
            .filter(|ball| !ball.is_dead())
            .map(Ball::speed)
            .fold(0.0, f32::max)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the transitions that happened since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn take_balls(&mut self) -> Vec<Ball> {
        std::mem::take(&mut self.balls)
    }

    /// Put a ticked snapshot back ahead of anything spawned meanwhile
    pub(crate) fn restore_balls(&mut self, balls: Vec<Ball>) {
        let spawned = std::mem::replace(&mut self.balls, balls);
        self.balls.extend(spawned);
    }

    pub(crate) fn take_bonuses(&mut self) -> Vec<Bonus> {
        std::mem::take(&mut self.bonuses)
    }

    pub(crate) fn restore_bonuses(&mut self, bonuses: Vec<Bonus>) {
        let spawned = std::mem::replace(&mut self.bonuses, bonuses);
        self.bonuses.extend(spawned);
    }

    /// Age visual effects and drop expired ones
    pub fn tick_sprites(&mut self, dt: Time) {
        for sprite in &mut self.sprites {
            sprite.age += dt;
        }
        self.sprites.retain(|s| s.age < s.kind.lifetime());
    }

    /// A ball carrying `impulse` hit the brick at `pos`. Returns whether the
    /// ball should bounce.
    pub fn hit_brick(&mut self, frame: &mut FrameContext<'_>, pos: LevelBlock, impulse: f32) -> bool {
        let Some(brick) = self.level.brick_mut(pos) else {
            return false;
        };

        if brick.hit(impulse) == HitOutcome::Destroyed {
            self.destroy_brick(frame, pos);
        }
        true
    }

    /// Remove the brick at `pos` and run its destruction effects. Safe to
    /// call on empty cells, so cascades never count a brick twice.
    pub fn destroy_brick(&mut self, frame: &mut FrameContext<'_>, pos: LevelBlock) {
        let Some(kind) = self.level.remove_brick(pos) else {
            return;
        };
        let center = pos.center();

        match kind {
            BrickKind::Explosive => {
                for cell in pos.neighborhood() {
                    self.destroy_brick(frame, cell);
                }
                self.add_sprite(Sprite::new(SpriteKind::BrickExplosion, center));
            }
            BrickKind::ExtraBall => {
                let angle = frame.rng.random::<f32>() * TAU;
                let vel = Vec2::new(angle.sin(), angle.cos()) * DEFAULT_BALL_SPEED;
                self.spawn_ball(center, vel);
                self.add_sprite(Sprite::new(SpriteKind::BrickBroken, center));
            }
            BrickKind::Simple | BrickKind::Sturdy { .. } => {
                self.add_sprite(Sprite::new(SpriteKind::BrickBroken, center));
            }
        }

        frame.attempt.increase_score(kind.reward());

        if let Some((kind, vel)) = frame.bonuses.roll(&mut *frame.rng, frame.bonus_chance) {
            let id = self.next_entity_id();
            self.add_bonus(Bonus::new(id, kind, center, vel));
        }
    }
}
