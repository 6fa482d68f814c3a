//! CleanOut - a brick-breaking arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, collisions, game state)
//! - `settings`: Data-driven configuration loaded from JSON
//!
//! Rendering, windowing and menus are collaborators that live outside this
//! crate; they read `sim::Game` and feed `sim::TickInput` back in.

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Border clearance added after a bounce so the same border is not hit again
    pub const BOUNCE_MARGIN: f32 = 0.01;

    /// Ball defaults
    pub const DEFAULT_BALL_SPEED: f32 = 10.0;
    pub const DEFAULT_BALL_RADIUS: f32 = 0.5 / 2.0;
    /// Forward acceleration of a unit-mass ball (lighter balls accelerate faster)
    pub const BALL_ACCELERATION_PER_SECOND_PER_UNIT_MASS: f32 = 0.2;
    /// Rate at which an animated radius approaches its target (units/s)
    pub const BALL_RADIUS_CHANGE_SPEED: f32 = 0.25;
    /// Fraction of speed turned into sideways motion by a platform hit at the edge
    pub const PLATFORM_RESTITUTION: f32 = 0.9;
    /// Held balls may slide this fraction of the platform size around its center
    pub const HELD_BALL_REACH: f32 = 0.25;
    /// Offset from platform center of a freshly served ball
    pub const HELD_BALL_OFFSET: f32 = 0.3;

    /// Platform defaults
    pub const PLATFORM_HEIGHT: f32 = 0.75;
    pub const DEFAULT_PLATFORM_SIZE: f32 = 3.0;
    pub const PLATFORM_FAST_FACTOR: f32 = 2.0;
    /// Spring stiffness pulling the platform toward its desired position
    pub const PLATFORM_STIFFNESS: f32 = 400.0;
    /// Drag on platform velocity (2 * sqrt(stiffness) = critically damped)
    pub const PLATFORM_DAMPING: f32 = 40.0;
    /// Exponential easing rate for platform size changes (1/s)
    pub const PLATFORM_SIZE_EASING: f32 = 5.0;
    pub const PLATFORM_BOUNCE_STIFFNESS: f32 = 300.0;
    pub const PLATFORM_BOUNCE_DAMPING: f32 = 12.0;
    /// Visual recoil velocity per unit of ball momentum
    pub const PLATFORM_BOUNCE_PER_UNIT_IMPULSE: f32 = 0.05;

    /// Bonus defaults
    pub const BONUS_RADIUS: f32 = 1.0 / 2.0 / 1.5;
    pub const BONUS_GRAVITY: f32 = 15.0;
    pub const BONUS_LAUNCH_SPEED: f32 = 10.0;
    pub const BONUS_CHANCE: f32 = 0.1;
    pub const PLATFORM_SIZE_BONUS_FACTOR: f32 = 1.5;
    pub const BALL_SIZE_BONUS_FACTOR: f32 = 1.5;
    pub const INVINCIBILITY_BONUS: f32 = 5.0;

    /// Brick damage per unit of ball momentum, so a default ball deals 0.75
    pub const HEALTH_DECREASE_PER_UNIT_IMPULSE: f32 = 0.75 / (1.0 * DEFAULT_BALL_SPEED);

    /// Progression
    pub const STARTING_LIVES: u32 = 10;
    pub const VICTORY_BONUS_PER_LIFE: u32 = 20;
}

/// Time in seconds
pub type Time = f32;
/// Floating point coordinate, 1 unit = 1 brick cell
pub type LevelCoord = f32;
/// Point in level space
pub type LevelPoint = Vec2;
/// Integer coordinate of a brick cell
pub type LevelBlockCoord = i32;
pub type LevelId = u32;
pub type Score = u32;
pub type Lives = u32;

/// A brick cell in the level grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelBlock {
    pub x: LevelBlockCoord,
    pub y: LevelBlockCoord,
}

impl LevelBlock {
    pub const fn new(x: LevelBlockCoord, y: LevelBlockCoord) -> Self {
        Self { x, y }
    }

    /// Lower-left corner of the cell in level space
    #[inline]
    pub fn corner(self) -> LevelPoint {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Center of the cell in level space
    #[inline]
    pub fn center(self) -> LevelPoint {
        self.corner() + Vec2::splat(0.5)
    }

    /// Cell containing a level-space point
    #[inline]
    pub fn containing(point: LevelPoint) -> Self {
        Self::new(point.x.floor() as i32, point.y.floor() as i32)
    }

    /// The 3x3 neighborhood centered on this cell, itself included
    pub fn neighborhood(self) -> impl Iterator<Item = LevelBlock> {
        (self.x - 1..=self.x + 1)
            .flat_map(move |x| (self.y - 1..=self.y + 1).map(move |y| LevelBlock::new(x, y)))
    }
}

/// Checks if min <= x <= max
#[inline]
pub fn is_in_range<T: PartialOrd>(min: T, x: T, max: T) -> bool {
    min <= x && x <= max
}

/// Clamp that tolerates min > max by preferring min (unlike `f32::clamp`)
#[inline]
pub fn force_in_range(min: f32, x: f32, max: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_to_point() {
        let block = LevelBlock::new(3, 7);
        assert_eq!(block.corner(), Vec2::new(3.0, 7.0));
        assert_eq!(block.center(), Vec2::new(3.5, 7.5));
        assert_eq!(LevelBlock::containing(Vec2::new(3.99, 7.01)), block);
        assert_eq!(LevelBlock::containing(Vec2::new(-0.2, 0.0)), LevelBlock::new(-1, 0));
    }

    #[test]
    fn test_neighborhood() {
        let cells: Vec<_> = LevelBlock::new(0, 0).neighborhood().collect();
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&LevelBlock::new(-1, -1)));
        assert!(cells.contains(&LevelBlock::new(1, 1)));
        assert!(cells.contains(&LevelBlock::new(0, 0)));
    }

    #[test]
    fn test_force_in_range() {
        assert_eq!(force_in_range(1.0, 0.0, 2.0), 1.0);
        assert_eq!(force_in_range(1.0, 3.0, 2.0), 2.0);
        assert_eq!(force_in_range(1.0, 1.5, 2.0), 1.5);
        // Inverted range does not panic
        assert_eq!(force_in_range(2.0, 0.0, 1.0), 2.0);
        assert!(is_in_range(0, 0, 1));
        assert!(!is_in_range(0, 2, 1));
    }
}
