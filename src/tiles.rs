use std::sync::atomic::{AtomicU64, Ordering};

/// Side of one square cell in world units (pixels).
pub const CELL_SIZE: u32 = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileType {
    #[default]
    Floor,
    Wall,
    Door,
}

/// Read-only view of a tile grid, as consumed by the visibility code.
///
/// Implementations must report [`TileType::Wall`] for every coordinate
/// outside `0..width` x `0..height`. Ray casting and the LOS walk rely on
/// that to stop at the grid edge.
pub trait TileGrid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn tile_type(&self, x: i32, y: i32) -> TileType;
    fn cell_size(&self) -> f64;

    /// Changes whenever the grid's contents change. Used only by
    /// [`crate::segments::SegmentCache`].
    fn revision(&self) -> u64 {
        0
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    /// Tile index containing the world point `p`.
    #[inline]
    fn tile_at(&self, p: [f64; 2]) -> (i32, i32) {
        let c = self.cell_size();
        ((p[0] / c).floor() as i32, (p[1] / c).floor() as i32)
    }
}

// Shared so that two different maps never carry the same stamp.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// Row-major tile storage.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: usize,
    height: usize,
    cell_size: u32,
    cells: Vec<TileType>,
    revision: u64,
}

impl TileMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_cell_size(width, height, CELL_SIZE)
    }

    pub fn with_cell_size(width: usize, height: usize, cell_size: u32) -> Self {
        assert!(cell_size > 0, "cell size must be positive");
        Self {
            width,
            height,
            cell_size,
            cells: vec![TileType::Floor; width * height],
            revision: next_revision(),
        }
    }

    /// Builds a map from rows of characters: `#` wall, `+` door, anything
    /// else floor. Short rows are padded with floor.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut map = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let t = match ch {
                    '#' => TileType::Wall,
                    '+' => TileType::Door,
                    _ => TileType::Floor,
                };
                map.cells[y * width + x] = t;
            }
        }
        map
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        let Some(i) = self.index(x, y) else { return };
        if self.cells[i] != tile {
            self.cells[i] = tile;
            self.revision = next_revision();
        }
    }
}

impl TileGrid for TileMap {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn tile_type(&self, x: i32, y: i32) -> TileType {
        match self.index(x, y) {
            Some(i) => self.cells[i],
            None => TileType::Wall,
        }
    }

    #[inline]
    fn cell_size(&self) -> f64 {
        self.cell_size as f64
    }

    #[inline]
    fn revision(&self) -> u64 {
        self.revision
    }
}
