//! Discrete line of sight over the tile grid.
//!
//! Coarser than the visibility polygon and not required to agree with it.
//! It only decides which tiles get drawn.

use crate::tiles::{TileGrid, TileType};

/// Per-tile visibility, indexed `[y][x]` like the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl VisibilityMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range tiles are never visible.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    pub fn row(&self, y: usize) -> &[bool] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|v| **v).count()
    }

    fn set(&mut self, x: usize, y: usize) {
        self.cells[y * self.width + x] = true;
    }
}

/// Bresenham walk from the viewer's tile to `target`.
///
/// Any wall on the way blocks, except the viewer's own tile. The target
/// itself may be a wall (walls are seen, not seen through). Walks longer
/// than `max_steps` count as blocked.
pub fn has_line_of_sight<G: TileGrid + ?Sized>(
    grid: &G,
    viewer: [f64; 2],
    target: (i32, i32),
    max_steps: usize,
) -> bool {
    // Walked in i64 so a saturated viewer tile far off the grid can't overflow.
    let (vx, vy) = grid.tile_at(viewer);
    let (vx, vy) = (i64::from(vx), i64::from(vy));
    let (x1, y1) = (i64::from(target.0), i64::from(target.1));
    let (mut x, mut y) = (vx, vy);

    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    for _ in 0..=max_steps {
        if x == x1 && y == y1 {
            return true;
        }

        if (x, y) != (vx, vy) && wide_tile_type(grid, x, y) == TileType::Wall {
            return false;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    false
}

/// Coordinates past `i32` are off the grid, so they are walls too.
fn wide_tile_type<G: TileGrid + ?Sized>(grid: &G, x: i64, y: i64) -> TileType {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => grid.tile_type(x, y),
        _ => TileType::Wall,
    }
}

/// Tiles within `radius` (world units, measured to tile centres) that have
/// line of sight from `viewer`.
///
/// The viewer's own tile is always visible when it lies on the grid.
pub fn visible_tiles<G: TileGrid + ?Sized>(
    grid: &G,
    viewer: [f64; 2],
    radius: f64,
) -> VisibilityMask {
    let mut mask = VisibilityMask::new(grid.width(), grid.height());
    let cell = grid.cell_size();
    let (pcx, pcy) = grid.tile_at(viewer);

    if grid.in_bounds(pcx, pcy) {
        mask.set(pcx as usize, pcy as usize);
    }
    if !(radius > 0.0) {
        return mask;
    }

    // Float to int casts saturate, so an unbounded radius just covers the grid.
    let reach = ((radius / cell).floor() + 1.0) as i64;
    let max_steps =
        usize::try_from(reach.saturating_mul(2).saturating_add(1)).unwrap_or(usize::MAX);
    let radius2 = radius * radius;

    // The radius box clipped to the grid.
    let (pcx, pcy) = (i64::from(pcx), i64::from(pcy));
    let x_lo = pcx.saturating_sub(reach).max(0);
    let x_hi = pcx.saturating_add(reach).min(grid.width() as i64 - 1);
    let y_lo = pcy.saturating_sub(reach).max(0);
    let y_hi = pcy.saturating_add(reach).min(grid.height() as i64 - 1);

    for ty in y_lo..=y_hi {
        for tx in x_lo..=x_hi {
            let (tx, ty) = (tx as i32, ty as i32);

            let cx = (tx as f64 + 0.5) * cell;
            let cy = (ty as f64 + 0.5) * cell;
            let (ox, oy) = (cx - viewer[0], cy - viewer[1]);
            if ox * ox + oy * oy > radius2 {
                continue;
            }

            if has_line_of_sight(grid, viewer, (tx, ty), max_steps) {
                mask.set(tx as usize, ty as usize);
            }
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileMap;

    fn center(tx: i32, ty: i32) -> [f64; 2] {
        [(tx as f64 + 0.5) * 32.0, (ty as f64 + 0.5) * 32.0]
    }

    #[test]
    fn test_own_tile_visible() {
        let map = TileMap::from_rows(&["###", "###", "###"]);
        assert!(has_line_of_sight(&map, center(1, 1), (1, 1), 4));
        let mask = visible_tiles(&map, center(1, 1), 100.0);
        assert!(mask.get(1, 1));
    }

    #[test]
    fn test_wall_target_is_seen() {
        let map = TileMap::from_rows(&["...#"]);
        assert!(has_line_of_sight(&map, center(0, 0), (3, 0), 8));
    }

    #[test]
    fn test_wall_behind_wall_hidden() {
        let map = TileMap::from_rows(&["..##"]);
        assert!(has_line_of_sight(&map, center(0, 0), (2, 0), 8));
        assert!(!has_line_of_sight(&map, center(0, 0), (3, 0), 8));
    }

    #[test]
    fn test_step_cap_blocks() {
        let map = TileMap::new(10, 1);
        assert!(!has_line_of_sight(&map, center(0, 0), (9, 0), 3));
        assert!(has_line_of_sight(&map, center(0, 0), (9, 0), 9));
    }

    #[test]
    fn test_viewer_inside_wall_sees_out() {
        let map = TileMap::from_rows(&["#.."]);
        assert!(has_line_of_sight(&map, center(0, 0), (2, 0), 8));
    }

    #[test]
    fn test_mask_row_and_bounds() {
        let map = TileMap::new(3, 2);
        let mask = visible_tiles(&map, center(0, 0), 1000.0);
        assert_eq!(mask.row(1), &[true, true, true]);
        assert_eq!(mask.count(), 6);
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(3, 0));
    }

    #[test]
    fn test_far_viewer_sees_nothing() {
        let map = TileMap::new(4, 4);
        assert_eq!(visible_tiles(&map, [1e12, 1e12], 100.0).count(), 0);
        assert_eq!(visible_tiles(&map, [-1e12, 16.0], 1e15).count(), 0);
    }

    #[test]
    fn test_far_viewer_blocked() {
        let map = TileMap::new(4, 4);
        assert!(!has_line_of_sight(&map, [-1e12, 0.0], (0, 0), 10));
        assert!(!has_line_of_sight(&map, [1e12, 1e12], (3, 3), usize::MAX));
    }

    #[test]
    fn test_unbounded_radius_covers_grid() {
        let map = TileMap::new(4, 4);
        let mask = visible_tiles(&map, center(0, 0), f64::INFINITY);
        assert_eq!((mask.width(), mask.height()), (4, 4));
        assert_eq!(mask.count(), 16);
    }

    #[test]
    fn test_viewer_off_grid() {
        let map = TileMap::new(2, 2);
        let mask = visible_tiles(&map, [-100.0, -100.0], 64.0);
        assert_eq!(mask.count(), 0);
    }
}
