//! Room layout: a walled box with a door in the middle of each side and a
//! few hollow sub-rooms scattered inside.

use rand::Rng;
use tracing::debug;

use crate::tiles::{TileMap, TileType};

pub const ROOM_WIDTH: usize = 25; // 800 px / 32 px cells
pub const ROOM_HEIGHT: usize = 18; // 600 px / 32 px cells

const SUBROOM_COUNT: usize = 5;
const MIN_SUBROOM: usize = 4;
const MAX_SUBROOM: usize = 8;
const PLACEMENT_ATTEMPTS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Rect {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

impl Rect {
    fn overlaps(&self, o: &Rect) -> bool {
        self.x < o.x + o.w && self.x + self.w > o.x && self.y < o.y + o.h && self.y + self.h > o.y
    }
}

pub fn generate_room<R: Rng>(rng: &mut R) -> TileMap {
    let (w, h) = (ROOM_WIDTH as i32, ROOM_HEIGHT as i32);
    let mut map = TileMap::new(ROOM_WIDTH, ROOM_HEIGHT);

    for tx in 0..w {
        map.set(tx, 0, TileType::Wall);
        map.set(tx, h - 1, TileType::Wall);
    }
    for ty in 0..h {
        map.set(0, ty, TileType::Wall);
        map.set(w - 1, ty, TileType::Wall);
    }

    map.set(w / 2, 0, TileType::Door);
    map.set(w / 2, h - 1, TileType::Door);
    map.set(0, h / 2, TileType::Door);
    map.set(w - 1, h / 2, TileType::Door);

    let placed = add_subrooms(rng, &mut map);
    debug!(subrooms = placed, "generated room");
    map
}

/// Hollow wall rectangles with one entrance each, kept off the central
/// corridors and off each other. Returns how many were placed.
fn add_subrooms<R: Rng>(rng: &mut R, map: &mut TileMap) -> usize {
    let mut taken: Vec<Rect> = Vec::new();

    for _ in 0..SUBROOM_COUNT {
        let rw = rng.random_range(MIN_SUBROOM..=MAX_SUBROOM);
        let rh = rng.random_range(MIN_SUBROOM..=MAX_SUBROOM);

        for _ in 0..PLACEMENT_ATTEMPTS {
            let rect = Rect {
                x: rng.random_range(1..ROOM_WIDTH - 1 - rw),
                y: rng.random_range(1..ROOM_HEIGHT - 1 - rh),
                w: rw,
                h: rh,
            };

            let (mid_x, mid_y) = (ROOM_WIDTH / 2, ROOM_HEIGHT / 2);
            if rect.x <= mid_x && rect.x + rect.w > mid_x {
                continue;
            }
            if rect.y <= mid_y && rect.y + rect.h > mid_y {
                continue;
            }
            if taken.iter().any(|t| t.overlaps(&rect)) {
                continue;
            }

            taken.push(rect);
            let entrance = pick_entrance(rng, &rect);
            draw_hollow(map, &rect, entrance);
            break;
        }
    }
    taken.len()
}

/// A perimeter cell on a random side, never a corner.
fn pick_entrance<R: Rng>(rng: &mut R, r: &Rect) -> (usize, usize) {
    fn along<R: Rng>(rng: &mut R, start: usize, len: usize) -> usize {
        if len > 2 {
            start + 1 + rng.random_range(0..len - 2)
        } else {
            start + len / 2
        }
    }

    match rng.random_range(0..4) {
        0 => (along(rng, r.x, r.w), r.y),
        1 => (along(rng, r.x, r.w), r.y + r.h - 1),
        2 => (r.x, along(rng, r.y, r.h)),
        _ => (r.x + r.w - 1, along(rng, r.y, r.h)),
    }
}

fn draw_hollow(map: &mut TileMap, r: &Rect, entrance: (usize, usize)) {
    let mut wall = |x: usize, y: usize| {
        if (x, y) != entrance {
            map.set(x as i32, y as i32, TileType::Wall);
        }
    };

    for cx in 0..r.w {
        wall(r.x + cx, r.y);
        wall(r.x + cx, r.y + r.h - 1);
    }
    for cy in 1..r.h - 1 {
        wall(r.x, r.y + cy);
        wall(r.x + r.w - 1, r.y + cy);
    }
}
