//! Level brick grid
//!
//! The grid only stores the top `field_height` rows of the level; the rows
//! below them are open play space above the platform.
//!
//! Removing a brick takes it off the grid at once but parks it in a pending
//! list until `flush_removed` runs at the end of the tick, so a collision
//! pass that already looked at the cell sees a consistent world for the rest
//! of the frame.

use serde::{Deserialize, Serialize};

use super::brick::{Brick, BrickKind};
use crate::{LevelBlock, LevelBlockCoord, LevelId, is_in_range};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    id: LevelId,
    width: LevelBlockCoord,
    height: LevelBlockCoord,
    field_height: LevelBlockCoord,
    /// Row-major cells of the brick field
    field: Vec<Option<Brick>>,
    /// Cells that held a brick that has since been destroyed
    corpses: Vec<bool>,
    /// Bricks removed this tick, dropped by `flush_removed`
    #[serde(skip)]
    pending_removal: Vec<Brick>,
    bricks_to_destroy: u32,
}

impl Level {
    pub fn new(
        id: LevelId,
        width: LevelBlockCoord,
        height: LevelBlockCoord,
        field_height: LevelBlockCoord,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let field_height = field_height.clamp(0, height);
        let cells = (width * field_height) as usize;

        Self {
            id,
            width,
            height,
            field_height,
            field: vec![None; cells],
            corpses: vec![false; cells],
            pending_removal: Vec::new(),
            bricks_to_destroy: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> LevelId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> LevelBlockCoord {
        self.width
    }

    #[inline]
    pub fn height(&self) -> LevelBlockCoord {
        self.height
    }

    pub fn field_height(&self) -> LevelBlockCoord {
        self.field_height
    }

    /// Number of bricks that still have to be destroyed
    pub fn bricks_to_destroy(&self) -> u32 {
        self.bricks_to_destroy
    }

    pub fn is_level_cleared(&self) -> bool {
        self.bricks_to_destroy == 0
    }

    /// Field index for a block, None outside the brick field
    fn index(&self, pos: LevelBlock) -> Option<usize> {
        let row = pos.y - (self.height - self.field_height);
        if is_in_range(0, pos.x, self.width - 1) && is_in_range(0, row, self.field_height - 1) {
            Some((row * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    pub fn brick(&self, pos: LevelBlock) -> Option<&Brick> {
        self.index(pos).and_then(|i| self.field[i].as_ref())
    }

    pub fn brick_mut(&mut self, pos: LevelBlock) -> Option<&mut Brick> {
        self.index(pos).and_then(|i| self.field[i].as_mut())
    }

    pub fn has_corpse(&self, pos: LevelBlock) -> bool {
        self.index(pos).is_some_and(|i| self.corpses[i])
    }

    /// Place a brick, replacing whatever occupied the cell
    pub fn set_brick(&mut self, pos: LevelBlock, brick: Brick) {
        let Some(index) = self.index(pos) else {
            log::debug!("Level {}: brick at ({}, {}) is outside the field", self.id, pos.x, pos.y);
            return;
        };

        self.take(index);

        if brick.needs_destruction() {
            self.bricks_to_destroy += 1;
        }
        self.field[index] = Some(brick);
        self.corpses[index] = false;
    }

    /// Take a brick off the grid, parking it until the next flush. Returns
    /// its kind, or None if the cell was already empty, so a brick can only
    /// ever be removed (and counted) once.
    pub fn remove_brick(&mut self, pos: LevelBlock) -> Option<BrickKind> {
        let index = self.index(pos)?;
        let kind = self.take(index)?;
        self.corpses[index] = true;
        Some(kind)
    }

    fn take(&mut self, index: usize) -> Option<BrickKind> {
        let brick = self.field[index].take()?;
        if brick.needs_destruction() {
            self.bricks_to_destroy = self.bricks_to_destroy.saturating_sub(1);
        }
        let kind = brick.kind;
        self.pending_removal.push(brick);
        Some(kind)
    }

    /// Bricks removed since the last flush
    pub fn pending_removals(&self) -> &[Brick] {
        &self.pending_removal
    }

    /// Drop bricks removed during this tick
    pub fn flush_removed(&mut self) {
        self.pending_removal.clear();
    }

    /// All bricks on the grid with their cells (bottom row first)
    pub fn bricks(&self) -> impl Iterator<Item = (LevelBlock, &Brick)> {
        let first_row = self.height - self.field_height;
        let width = self.width;
        self.field.iter().enumerate().filter_map(move |(i, cell)| {
            let i = i as LevelBlockCoord;
            cell.as_ref()
                .map(|brick| (LevelBlock::new(i % width, first_row + i / width), brick))
        })
    }
}
