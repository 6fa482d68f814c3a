//! Collision detection between balls and brick cells
//!
//! Broad phase: the cells overlapped by a ball's bounding box. Narrow phase:
//! an exact circle vs unit-square test that also reports which faces were
//! hit, so the response knows which velocity axes to reflect.

use glam::Vec2;

use crate::{LevelBlock, LevelCoord, LevelPoint, is_in_range};

/// Result of a ball vs cell test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellHit {
    /// Hit a left/right face (reflect x)
    pub horizontal: bool,
    /// Hit a top/bottom face (reflect y)
    pub vertical: bool,
    /// Ball is right of the cell middle, so it bounces toward +x
    pub positive_x: bool,
    /// Ball is above the cell middle, so it bounces toward +y
    pub positive_y: bool,
}

impl CellHit {
    /// The vertical face the ball bounces off
    pub fn border_x(&self, cell: LevelBlock) -> LevelCoord {
        let x = cell.x as f32;
        if self.positive_x { x + 1.0 } else { x }
    }

    /// The horizontal face the ball bounces off
    pub fn border_y(&self, cell: LevelBlock) -> LevelCoord {
        let y = cell.y as f32;
        if self.positive_y { y + 1.0 } else { y }
    }
}

/// Cells a ball of `radius` at `center` may overlap
pub fn candidate_cells(center: LevelPoint, radius: LevelCoord) -> impl Iterator<Item = LevelBlock> {
    let min = LevelBlock::containing(center - Vec2::splat(radius));
    let max = LevelBlock::containing(center + Vec2::splat(radius));
    (min.x..=max.x).flat_map(move |x| (min.y..=max.y).map(move |y| LevelBlock::new(x, y)))
}

/// Check a ball against one unit cell
///
/// Face hits are tested first: the center inside the cell's x-span with the
/// radius-expanded y-span overlapping is a top/bottom hit, and symmetrically
/// for left/right. Otherwise the nearest corner decides, and a corner hit
/// reflects both axes.
pub fn ball_cell_collision(cell: LevelBlock, center: LevelPoint, radius: LevelCoord) -> Option<CellHit> {
    let corner = cell.corner();

    let mut vertical = is_in_range(corner.x, center.x, corner.x + 1.0)
        && is_in_range(corner.y - radius, center.y, corner.y + 1.0 + radius);

    let mut horizontal = is_in_range(corner.y, center.y, corner.y + 1.0)
        && is_in_range(corner.x - radius, center.x, corner.x + 1.0 + radius);

    if !(vertical || horizontal) {
        let dx = (center.x - corner.x).abs().min((center.x - (corner.x + 1.0)).abs());
        let dy = (center.y - corner.y).abs().min((center.y - (corner.y + 1.0)).abs());
        let touches_corner = dx * dx + dy * dy <= radius * radius;
        vertical = touches_corner;
        horizontal = touches_corner;
    }

    if !(vertical || horizontal) {
        return None;
    }

    Some(CellHit {
        horizontal,
        vertical,
        positive_x: center.x > corner.x + 0.5,
        positive_y: center.y > corner.y + 0.5,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: LevelBlock = LevelBlock::new(4, 6);
    const R: f32 = 0.25;

    #[test]
    fn test_bottom_face_hit() {
        // Ball just under the cell, centered horizontally
        let hit = ball_cell_collision(CELL, Vec2::new(4.5, 5.8), R).unwrap();
        assert!(hit.vertical);
        assert!(!hit.horizontal);
        assert!(!hit.positive_y);
        assert_eq!(hit.border_y(CELL), 6.0);
    }

    #[test]
    fn test_top_face_hit() {
        let hit = ball_cell_collision(CELL, Vec2::new(4.2, 7.1), R).unwrap();
        assert!(hit.vertical);
        assert!(hit.positive_y);
        assert_eq!(hit.border_y(CELL), 7.0);
    }

    #[test]
    fn test_side_face_hit() {
        let hit = ball_cell_collision(CELL, Vec2::new(5.2, 6.5), R).unwrap();
        assert!(hit.horizontal);
        assert!(!hit.vertical);
        assert!(hit.positive_x);
        assert_eq!(hit.border_x(CELL), 5.0);

        let hit = ball_cell_collision(CELL, Vec2::new(3.8, 6.5), R).unwrap();
        assert!(hit.horizontal);
        assert!(!hit.positive_x);
        assert_eq!(hit.border_x(CELL), 4.0);
    }

    #[test]
    fn test_corner_hit_sets_both_axes() {
        // 0.1 away from the bottom-left corner on both axes
        let hit = ball_cell_collision(CELL, Vec2::new(3.9, 5.9), R).unwrap();
        assert!(hit.horizontal);
        assert!(hit.vertical);
        assert!(!hit.positive_x);
        assert!(!hit.positive_y);
    }

    #[test]
    fn test_corner_miss_inside_bounding_box() {
        // Bounding boxes overlap but the circle misses the corner
        let center = Vec2::new(3.8, 5.8);
        assert!(ball_cell_collision(CELL, center, R).is_none());
    }

    #[test]
    fn test_far_miss() {
        assert!(ball_cell_collision(CELL, Vec2::new(1.0, 1.0), R).is_none());
    }

    #[test]
    fn test_candidate_cells() {
        // Ball fully inside one cell
        let cells: Vec<_> = candidate_cells(Vec2::new(2.5, 2.5), R).collect();
        assert_eq!(cells, vec![LevelBlock::new(2, 2)]);

        // Ball straddling a corner touches four cells
        let cells: Vec<_> = candidate_cells(Vec2::new(3.0, 3.0), R).collect();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&LevelBlock::new(2, 2)));
        assert!(cells.contains(&LevelBlock::new(3, 3)));
    }
}
