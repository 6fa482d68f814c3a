//! Built-in level table
//!
//! Levels are assembled in code with a small drawing helper. Ids past the
//! last level fall back to it.

use super::brick::Brick;
use super::level::Level;
use crate::{LevelBlock, LevelBlockCoord, LevelId};

/// Id of the last built-in level; the sequence wraps to 0 after it
pub const MAX_LEVEL: LevelId = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Drawing helper over a level's brick grid. Every placed brick is a fresh
/// copy of the template.
pub struct LevelBuilder<'a> {
    level: &'a mut Level,
}

impl<'a> LevelBuilder<'a> {
    pub fn new(level: &'a mut Level) -> Self {
        Self { level }
    }

    /// Line of bricks along row `i` (horizontal) or column `i` (vertical),
    /// from `j1` to `j2` inclusive
    pub fn draw_line(
        &mut self,
        direction: Direction,
        i: LevelBlockCoord,
        j1: LevelBlockCoord,
        j2: LevelBlockCoord,
        template: &Brick,
    ) -> &mut Self {
        for j in j1..=j2 {
            let block = match direction {
                Direction::Horizontal => LevelBlock::new(j, i),
                Direction::Vertical => LevelBlock::new(i, j),
            };
            self.level.set_brick(block, template.clone());
        }
        self
    }

    /// Fill `min..=max` on both axes
    pub fn fill_rectangle(&mut self, min: LevelBlock, max: LevelBlock, template: &Brick) -> &mut Self {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                self.level.set_brick(LevelBlock::new(x, y), template.clone());
            }
        }
        self
    }

    /// 3x3 block of `walls` around a `center` brick
    pub fn draw_tile(&mut self, pos: LevelBlock, walls: &Brick, center: &Brick) -> &mut Self {
        for block in pos.neighborhood() {
            let brick = if block == pos { center } else { walls };
            self.level.set_brick(block, brick.clone());
        }
        self
    }

    pub fn brick(&mut self, pos: LevelBlock, brick: Brick) -> &mut Self {
        self.level.set_brick(pos, brick);
        self
    }
}

/// Build a fresh copy of level `id`
pub fn create_level(id: LevelId) -> Level {
    let simple = Brick::simple();

    let level = match id {
        0 => {
            let mut level = Level::new(id, 10, 10, 5);
            LevelBuilder::new(&mut level)
                .draw_line(Direction::Horizontal, 9, 1, 8, &simple)
                .draw_line(Direction::Horizontal, 8, 2, 7, &simple)
                .draw_line(Direction::Horizontal, 7, 3, 6, &simple)
                .draw_line(Direction::Horizontal, 6, 2, 7, &simple)
                .draw_line(Direction::Horizontal, 5, 1, 8, &simple)
                .brick(LevelBlock::new(4, 7), Brick::sturdy(2))
                .brick(LevelBlock::new(5, 7), Brick::sturdy(2));
            level
        }
        1 => {
            let mut level = Level::new(id, 15, 15, 10);
            let sturdy = Brick::sturdy(4);
            LevelBuilder::new(&mut level)
                .draw_line(Direction::Horizontal, 7, 1, 13, &sturdy)
                .draw_line(Direction::Vertical, 1, 8, 12, &sturdy)
                .draw_line(Direction::Vertical, 13, 8, 12, &sturdy)
                .fill_rectangle(LevelBlock::new(2, 8), LevelBlock::new(12, 12), &simple);
            level
        }
        2 => {
            let mut level = Level::new(id, 20, 16, 10);
            LevelBuilder::new(&mut level)
                .draw_line(Direction::Horizontal, 10, 2, 17, &Brick::sturdy(2))
                .draw_line(Direction::Horizontal, 9, 1, 18, &simple)
                .draw_line(Direction::Horizontal, 11, 2, 17, &Brick::sturdy(4))
                .brick(LevelBlock::new(3, 11), Brick::explosive())
                .brick(LevelBlock::new(16, 11), Brick::explosive());
            level
        }
        _ => {
            if id != MAX_LEVEL {
                log::warn!("Invalid level id {id}, assuming {MAX_LEVEL}");
            }

            let mut level = Level::new(MAX_LEVEL, 20, 16, 10);
            let sturdy = Brick::sturdy(3);
            let extra_ball = Brick::extra_ball();
            let explosive = Brick::explosive();
            LevelBuilder::new(&mut level)
                .draw_tile(LevelBlock::new(3, 13), &simple, &extra_ball)
                .draw_tile(LevelBlock::new(5, 10), &sturdy, &explosive)
                .draw_tile(LevelBlock::new(3, 7), &simple, &extra_ball)
                .draw_tile(LevelBlock::new(16, 13), &simple, &extra_ball)
                .draw_tile(LevelBlock::new(14, 10), &sturdy, &explosive)
                .draw_tile(LevelBlock::new(16, 7), &simple, &extra_ball)
                .draw_line(Direction::Horizontal, 7, 5, 14, &simple)
                .draw_line(Direction::Horizontal, 10, 7, 12, &Brick::sturdy(1))
                .draw_line(Direction::Horizontal, 13, 5, 14, &Brick::sturdy(2));
            level
        }
    };

    log::info!(
        "Built level {} ({}x{}, {} bricks to destroy)",
        level.id(),
        level.width(),
        level.height(),
        level.bricks_to_destroy()
    );
    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::brick::BrickKind;

    #[test]
    fn test_draw_line_directions() {
        let mut level = Level::new(0, 10, 10, 5);
        LevelBuilder::new(&mut level)
            .draw_line(Direction::Horizontal, 9, 2, 4, &Brick::simple())
            .draw_line(Direction::Vertical, 0, 5, 7, &Brick::simple());
        assert_eq!(level.bricks_to_destroy(), 6);
        assert!(level.brick(LevelBlock::new(3, 9)).is_some());
        assert!(level.brick(LevelBlock::new(0, 6)).is_some());
        assert!(level.brick(LevelBlock::new(5, 9)).is_none());
    }

    #[test]
    fn test_templates_are_copied() {
        let mut level = Level::new(0, 10, 10, 5);
        LevelBuilder::new(&mut level).draw_line(Direction::Horizontal, 8, 0, 1, &Brick::sturdy(2));

        level.brick_mut(LevelBlock::new(0, 8)).unwrap().apply_damage(1.0);
        let untouched = level.brick(LevelBlock::new(1, 8)).unwrap();
        assert_eq!(untouched.health_fraction(), 1.0);
    }

    #[test]
    fn test_draw_tile() {
        let mut level = Level::new(0, 10, 10, 5);
        LevelBuilder::new(&mut level).draw_tile(
            LevelBlock::new(5, 7),
            &Brick::simple(),
            &Brick::explosive(),
        );
        assert_eq!(level.bricks_to_destroy(), 9);
        assert_eq!(
            level.brick(LevelBlock::new(5, 7)).unwrap().kind,
            BrickKind::Explosive
        );
        assert_eq!(
            level.brick(LevelBlock::new(4, 6)).unwrap().kind,
            BrickKind::Simple
        );
    }

    #[test]
    fn test_builtin_levels() {
        let level = create_level(0);
        assert_eq!((level.width(), level.height(), level.field_height()), (10, 10, 5));
        // 8 + 6 + 4 + 6 + 8, two of them replaced by sturdy bricks
        assert_eq!(level.bricks_to_destroy(), 32);
        assert!(matches!(
            level.brick(LevelBlock::new(4, 7)).unwrap().kind,
            BrickKind::Sturdy { max_health: 2, .. }
        ));

        let level = create_level(1);
        // 13 + 5 + 5 + 11 * 5
        assert_eq!(level.bricks_to_destroy(), 78);

        let level = create_level(2);
        assert_eq!(level.bricks_to_destroy(), 16 + 18 + 16);
        assert_eq!(
            level.brick(LevelBlock::new(3, 11)).unwrap().kind,
            BrickKind::Explosive
        );
    }

    #[test]
    fn test_last_level_and_fallback() {
        let last = create_level(MAX_LEVEL);
        assert!(!last.is_level_cleared());
        assert_eq!(
            last.brick(LevelBlock::new(3, 13)).unwrap().kind,
            BrickKind::ExtraBall
        );

        let fallback = create_level(42);
        assert_eq!(fallback.id(), MAX_LEVEL);
        assert_eq!(fallback.bricks_to_destroy(), last.bricks_to_destroy());
    }
}
