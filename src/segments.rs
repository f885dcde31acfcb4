use tracing::debug;

use crate::geometry::Segment;
use crate::tiles::{TileGrid, TileType};

/// The four edges of tile `(tx, ty)`: top, right, bottom, left.
pub fn tile_edges(tx: i32, ty: i32, cell: f64) -> [Segment; 4] {
    let x = tx as f64 * cell;
    let y = ty as f64 * cell;
    let (w, h) = (cell, cell);
    [
        Segment::new([x, y], [x + w, y]),
        Segment::new([x + w, y], [x + w, y + h]),
        Segment::new([x + w, y + h], [x, y + h]),
        Segment::new([x, y + h], [x, y]),
    ]
}

/// Every wall edge of `grid` as an occluder segment.
///
/// Neighbouring walls share edges; those come out twice. The caster only
/// needs the nearest hit, so duplicates cost time but never change a result.
pub fn wall_segments<G: TileGrid + ?Sized>(grid: &G) -> Vec<Segment> {
    let cell = grid.cell_size();
    let mut out = Vec::new();
    for ty in 0..grid.height() as i32 {
        for tx in 0..grid.width() as i32 {
            if grid.tile_type(tx, ty) == TileType::Wall {
                out.extend_from_slice(&tile_edges(tx, ty, cell));
            }
        }
    }
    out
}

/// Keeps the last extracted segment list until the grid changes.
///
/// Rebuilding every frame is the default path; this is the opt-in hook for
/// large maps. A rebuild happens when the grid reports a different
/// [`TileGrid::revision`] or after [`SegmentCache::invalidate`].
#[derive(Debug, Default)]
pub struct SegmentCache {
    segments: Vec<Segment>,
    revision: Option<u64>,
}

impl SegmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.revision = None;
    }

    pub fn segments<G: TileGrid + ?Sized>(&mut self, grid: &G) -> &[Segment] {
        let rev = grid.revision();
        if self.revision != Some(rev) {
            self.segments = wall_segments(grid);
            self.revision = Some(rev);
            debug!(revision = rev, count = self.segments.len(), "rebuilt wall segments");
        }
        &self.segments
    }
}
