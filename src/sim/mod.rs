//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, settings and inputs
//! a run replays identically:
//! - Seeded RNG only, owned by `SimulationContext`
//! - Stable iteration order (insertion order of balls and bonuses)
//! - No rendering or platform dependencies

pub mod ball;
pub mod body;
pub mod bonus;
pub mod brick;
pub mod collision;
pub mod context;
pub mod game;
pub mod level;
pub mod levels;
pub mod platform;
pub mod tick;

pub use ball::Ball;
pub use body::{Body, BorderContact};
pub use bonus::{Bonus, BonusEffect, BonusKind, BonusRegistry};
pub use brick::{Brick, BrickKind, HitOutcome};
pub use collision::{CellHit, ball_cell_collision, candidate_cells};
pub use context::{Attempt, FrameContext, SimulationContext};
pub use game::{Game, GameEvent, GameState, Sprite, SpriteKind};
pub use level::Level;
pub use levels::{Direction, LevelBuilder, MAX_LEVEL, create_level};
pub use platform::Platform;
pub use tick::{TickInput, step, tick};
