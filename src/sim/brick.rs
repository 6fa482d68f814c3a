//! Brick variants
//!
//! Bricks are plain data owned by the level grid. Destruction side effects
//! (explosions, extra balls, score, bonus drops) need the whole game and are
//! dispatched from `Game::destroy_brick`.

use serde::{Deserialize, Serialize};

use crate::Score;
use crate::consts::HEALTH_DECREASE_PER_UNIT_IMPULSE;

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BrickKind {
    /// Breaks on the first hit
    Simple,
    /// Survives hits until accumulated damage exceeds its health
    Sturdy { max_health: u32, health: f32 },
    /// Destroys its 3x3 neighborhood when destroyed
    Explosive,
    /// Releases a free ball when destroyed
    ExtraBall,
}

impl BrickKind {
    /// Score for destroying a brick of this kind
    pub fn reward(&self) -> Score {
        match *self {
            BrickKind::Simple => 1,
            BrickKind::Sturdy { max_health, .. } => max_health,
            BrickKind::Explosive | BrickKind::ExtraBall => 5,
        }
    }
}

/// Result of a ball hitting a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Brick absorbed the hit
    Damaged,
    /// Brick must be destroyed
    Destroyed,
}

/// A brick entity (one grid cell)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub kind: BrickKind,
    /// Whether this brick must be destroyed to clear the level
    needs_destruction: bool,
}

impl Brick {
    pub fn new(kind: BrickKind) -> Self {
        Self {
            kind,
            needs_destruction: true,
        }
    }

    pub fn simple() -> Self {
        Self::new(BrickKind::Simple)
    }

    /// A brick that takes `extra_hits` default-ball hits' worth of damage
    pub fn sturdy(extra_hits: u32) -> Self {
        Self::new(BrickKind::Sturdy {
            max_health: extra_hits,
            health: extra_hits as f32,
        })
    }

    pub fn explosive() -> Self {
        Self::new(BrickKind::Explosive)
    }

    pub fn extra_ball() -> Self {
        Self::new(BrickKind::ExtraBall)
    }

    /// A brick that does not count toward clearing the level
    pub fn permanent(mut self) -> Self {
        self.needs_destruction = false;
        self
    }

    #[inline]
    pub fn needs_destruction(&self) -> bool {
        self.needs_destruction
    }

    pub fn reward(&self) -> Score {
        self.kind.reward()
    }

    /// Remaining health as 0.0 - 1.0 (for rendering cracks)
    pub fn health_fraction(&self) -> f32 {
        match self.kind {
            BrickKind::Sturdy { max_health, health } if max_health > 0 => {
                (health / max_health as f32).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Apply a hit from a ball carrying `impulse` (mass * speed)
    pub fn hit(&mut self, impulse: f32) -> HitOutcome {
        self.apply_damage(impulse * HEALTH_DECREASE_PER_UNIT_IMPULSE)
    }

    /// Sturdy bricks lose `decrease` health, and break once the remaining
    /// health can no longer absorb it. Every other kind breaks at once.
    pub fn apply_damage(&mut self, decrease: f32) -> HitOutcome {
        match &mut self.kind {
            BrickKind::Sturdy { health, .. } => {
                if *health < decrease {
                    HitOutcome::Destroyed
                } else {
                    *health = (*health - decrease).max(0.0);
                    HitOutcome::Damaged
                }
            }
            _ => HitOutcome::Destroyed,
        }
    }
}
