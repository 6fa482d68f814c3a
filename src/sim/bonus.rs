//! Bonuses dropped by destroyed bricks
//!
//! A bonus falls under gravity, bounces off the ceiling and walls, and applies
//! its effect when it lands on the platform. Which bonus drops is drawn from a
//! weighted registry owned by the simulation context.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::context::Attempt;
use super::game::{Game, Sprite, SpriteKind};
use crate::consts::*;
use crate::{LevelPoint, Time};

/// What a collected bonus does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusEffect {
    ExtraLife,
    LongerPlatform,
    ShorterPlatform,
    /// Every ball bounces off the floor for a while
    Invincibility,
    LargerBall,
    SmallerBall,
}

impl BonusEffect {
    pub fn apply(self, game: &mut Game, attempt: &mut Attempt) {
        match self {
            BonusEffect::ExtraLife => attempt.add_lives(1),
            BonusEffect::LongerPlatform => {
                let size = game.platform.desired_size() * PLATFORM_SIZE_BONUS_FACTOR;
                game.platform.set_size_animated(size);
            }
            BonusEffect::ShorterPlatform => {
                let size = game.platform.desired_size() / PLATFORM_SIZE_BONUS_FACTOR;
                game.platform.set_size_animated(size);
            }
            BonusEffect::Invincibility => {
                for ball in game.balls_mut() {
                    ball.add_invincibility(INVINCIBILITY_BONUS);
                }
            }
            BonusEffect::LargerBall => {
                for ball in game.balls_mut() {
                    let radius = ball.desired_radius() * BALL_SIZE_BONUS_FACTOR;
                    ball.set_radius_animated(radius);
                }
            }
            BonusEffect::SmallerBall => {
                for ball in game.balls_mut() {
                    let radius = ball.desired_radius() / BALL_SIZE_BONUS_FACTOR;
                    ball.set_radius_animated(radius);
                }
            }
        }
    }
}

/// A registered bonus type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusKind {
    pub effect: BonusEffect,
    /// 0xRRGGBB
    pub color: u32,
    /// Whether the player wants to catch it
    pub good: bool,
}

impl BonusKind {
    pub const fn new(effect: BonusEffect, color: u32, good: bool) -> Self {
        Self { effect, color, good }
    }
}

/// Weighted table of bonus kinds
#[derive(Debug, Clone)]
pub struct BonusRegistry {
    entries: Vec<(BonusKind, f32)>,
    total_weight: f32,
}

impl Default for BonusRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(BonusKind::new(BonusEffect::ExtraLife, 0xEE0000, true), 0.5);
        registry.register(BonusKind::new(BonusEffect::LongerPlatform, 0x3333EE, true), 1.0);
        registry.register(BonusKind::new(BonusEffect::ShorterPlatform, 0x3333EE, false), 1.0);
        registry.register(BonusKind::new(BonusEffect::Invincibility, 0xEEEEEE, true), 0.5);
        registry.register(BonusKind::new(BonusEffect::LargerBall, 0xEEEE33, true), 1.0);
        registry.register(BonusKind::new(BonusEffect::SmallerBall, 0xEEEE33, false), 1.0);
        registry
    }
}

impl BonusRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            total_weight: 0.0,
        }
    }

    /// Add a kind. Non-positive weights are ignored.
    pub fn register(&mut self, kind: BonusKind, weight: f32) {
        if weight <= 0.0 || !weight.is_finite() {
            log::warn!("Ignoring bonus {:?} with weight {}", kind.effect, weight);
            return;
        }
        self.entries.push((kind, weight));
        self.total_weight += weight;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    pub fn kinds(&self) -> impl Iterator<Item = &BonusKind> {
        self.entries.iter().map(|(kind, _)| kind)
    }

    /// Kind selected by a draw in `0..total_weight`. Rounding leftovers land
    /// on the last entry.
    pub fn pick(&self, mut draw: f32) -> Option<BonusKind> {
        for (kind, weight) in &self.entries {
            if draw < *weight {
                return Some(*kind);
            }
            draw -= weight;
        }
        self.entries.last().map(|(kind, _)| *kind)
    }

    /// Decide whether a destroyed brick drops a bonus, and which one.
    /// Returns the kind and its launch velocity.
    pub fn roll(&self, rng: &mut impl Rng, chance: f32) -> Option<(BonusKind, Vec2)> {
        if self.is_empty() || rng.random::<f32>() >= chance {
            return None;
        }

        let kind = self.pick(rng.random::<f32>() * self.total_weight)?;

        // Up, within 45 degrees either side
        let angle = (rng.random::<f32>() - 0.5) * FRAC_PI_2;
        let vel = Vec2::new(angle.sin(), angle.cos()) * BONUS_LAUNCH_SPEED;
        Some((kind, vel))
    }
}

/// A falling bonus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub id: u32,
    body: Body,
    kind: BonusKind,
}

impl Bonus {
    pub fn new(id: u32, kind: BonusKind, pos: LevelPoint, vel: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, vel, BONUS_RADIUS),
            kind,
        }
    }

    pub fn kind(&self) -> BonusKind {
        self.kind
    }

    #[inline]
    pub fn pos(&self) -> LevelPoint {
        self.body.pos()
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.body.vel()
    }

    pub fn radius(&self) -> f32 {
        self.body.radius()
    }

    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    pub fn tick(&mut self, game: &mut Game, attempt: &mut Attempt, dt: Time) {
        self.body.integrate(dt);

        if self.body.touches_platform(&game.platform) {
            log::debug!("Collected bonus {:?}", self.kind.effect);
            self.kind.effect.apply(game, attempt);
            game.add_sprite(Sprite::new(SpriteKind::BonusCollected, self.pos()));
            self.body.die();
            return;
        }

        let width = game.level.width() as f32;
        let height = game.level.height() as f32;
        let contact = self.body.collide_with_bounds(width, height);

        if contact.floor {
            game.add_sprite(Sprite::new(
                SpriteKind::BonusFloorCollision { velocity: self.vel() },
                self.pos(),
            ));
            self.body.die();
            return;
        }

        let vel = self.vel() - Vec2::new(0.0, BONUS_GRAVITY * dt);
        self.body.set_velocity(vel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::Ball;
    use crate::sim::level::Level;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn game() -> Game {
        Game::new(Level::new(0, 10, 10, 5))
    }

    #[test]
    fn test_default_catalogue() {
        let registry = BonusRegistry::default();
        assert_eq!(registry.len(), 6);
        assert!((registry.total_weight() - 5.0).abs() < 1e-6);
        let good = registry.kinds().filter(|kind| kind.good).count();
        assert_eq!(good, 4);
    }

    #[test]
    fn test_pick_walks_weights() {
        let registry = BonusRegistry::default();
        assert_eq!(registry.pick(0.0).unwrap().effect, BonusEffect::ExtraLife);
        assert_eq!(registry.pick(0.6).unwrap().effect, BonusEffect::LongerPlatform);
        assert_eq!(registry.pick(2.9).unwrap().effect, BonusEffect::Invincibility);
        // Past the end falls back to the last entry
        assert_eq!(registry.pick(99.0).unwrap().effect, BonusEffect::SmallerBall);
        assert!(BonusRegistry::empty().pick(0.0).is_none());
    }

    #[test]
    fn test_register_ignores_bad_weights() {
        let mut registry = BonusRegistry::empty();
        registry.register(BonusKind::new(BonusEffect::ExtraLife, 0, true), 0.0);
        registry.register(BonusKind::new(BonusEffect::ExtraLife, 0, true), -1.0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_roll_chance_bounds() {
        let registry = BonusRegistry::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(registry.roll(&mut rng, 0.0).is_none());
        }
        for _ in 0..1000 {
            let (_, vel) = registry.roll(&mut rng, 1.0).unwrap();
            assert!((vel.length() - BONUS_LAUNCH_SPEED).abs() < 1e-4);
            // Within 45 degrees of straight up
            assert!(vel.y >= vel.x.abs() - 1e-4);
        }
    }

    #[test]
    fn test_weighted_frequencies() {
        let mut registry = BonusRegistry::empty();
        let effects = [
            BonusEffect::ExtraLife,
            BonusEffect::LongerPlatform,
            BonusEffect::Invincibility,
            BonusEffect::SmallerBall,
        ];
        for (i, effect) in effects.iter().enumerate() {
            registry.register(BonusKind::new(*effect, 0, true), (i + 1) as f32);
        }

        let mut rng = Pcg32::seed_from_u64(42);
        let draws = 100_000;
        let mut counts = [0u32; 4];
        for _ in 0..draws {
            let (kind, _) = registry.roll(&mut rng, 1.0).unwrap();
            let index = effects.iter().position(|e| *e == kind.effect).unwrap();
            counts[index] += 1;
        }

        for (i, count) in counts.iter().enumerate() {
            let expected = (i + 1) as f32 / 10.0;
            let observed = *count as f32 / draws as f32;
            assert!(
                (observed - expected).abs() < 0.01,
                "bonus {i}: expected {expected}, observed {observed}"
            );
        }
    }

    #[test]
    fn test_drop_rate() {
        let registry = BonusRegistry::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let draws = 100_000;
        let drops = (0..draws)
            .filter(|_| registry.roll(&mut rng, BONUS_CHANCE).is_some())
            .count();
        let rate = drops as f32 / draws as f32;
        assert!((rate - BONUS_CHANCE).abs() < 0.01);
    }

    #[test]
    fn test_falls_under_gravity() {
        let mut game = game();
        let mut attempt = Attempt::new(3, 0);
        let kind = BonusKind::new(BonusEffect::ExtraLife, 0xEE0000, true);
        let mut bonus = Bonus::new(1, kind, Vec2::new(2.0, 8.0), Vec2::new(0.0, 10.0));

        let mut peak = bonus.pos().y;
        for _ in 0..120 {
            bonus.tick(&mut game, &mut attempt, DT);
            if bonus.is_dead() {
                break;
            }
            peak = peak.max(bonus.pos().y);
        }
        assert!(peak < game.level.height() as f32);
        assert!(bonus.is_dead());
        assert_eq!(attempt.lives(), 3);
        assert!(
            game.sprites()
                .iter()
                .any(|s| matches!(s.kind, SpriteKind::BonusFloorCollision { .. }))
        );
    }

    #[test]
    fn test_collect_extra_life() {
        let mut game = game();
        let mut attempt = Attempt::new(3, 0);
        let x = game.platform.position();
        let kind = BonusKind::new(BonusEffect::ExtraLife, 0xEE0000, true);
        let mut bonus = Bonus::new(1, kind, Vec2::new(x, 1.0), Vec2::new(0.0, -5.0));

        bonus.tick(&mut game, &mut attempt, DT);
        assert!(bonus.is_dead());
        assert_eq!(attempt.lives(), 4);
        assert!(
            game.sprites()
                .iter()
                .any(|s| s.kind == SpriteKind::BonusCollected)
        );
    }

    #[test]
    fn test_platform_size_effects_stack() {
        let mut game = game();
        let mut attempt = Attempt::new(3, 0);
        BonusEffect::LongerPlatform.apply(&mut game, &mut attempt);
        BonusEffect::LongerPlatform.apply(&mut game, &mut attempt);
        let expected = DEFAULT_PLATFORM_SIZE * 1.5 * 1.5;
        assert!((game.platform.desired_size() - expected).abs() < 1e-5);
        // Animated, not instant
        assert_eq!(game.platform.size(), DEFAULT_PLATFORM_SIZE);

        BonusEffect::ShorterPlatform.apply(&mut game, &mut attempt);
        assert!((game.platform.desired_size() - DEFAULT_PLATFORM_SIZE * 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_ball_effects_reach_every_ball() {
        let mut game = game();
        let mut attempt = Attempt::new(3, 0);
        let first = game.next_entity_id();
        game.add_ball(Ball::new(first, Vec2::new(2.0, 3.0)));
        let second = game.next_entity_id();
        game.add_ball(Ball::new(second, Vec2::new(6.0, 3.0)));

        BonusEffect::Invincibility.apply(&mut game, &mut attempt);
        BonusEffect::SmallerBall.apply(&mut game, &mut attempt);
        for ball in game.balls() {
            assert_eq!(ball.invincibility(), INVINCIBILITY_BONUS);
            assert!((ball.desired_radius() - DEFAULT_BALL_RADIUS / 1.5).abs() < 1e-6);
            assert_eq!(ball.radius(), DEFAULT_BALL_RADIUS);
        }
    }
}
