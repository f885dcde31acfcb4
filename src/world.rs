use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::room::generate_room;
use crate::tiles::TileMap;

/// Rooms keyed by room coordinate. Each room is generated the first time it
/// is entered and kept afterwards.
pub struct World {
    rooms: HashMap<(i32, i32), TileMap>,
    current: (i32, i32),
    rng: StdRng,
}

impl World {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        let mut world = Self {
            rooms: HashMap::new(),
            current: (0, 0),
            rng,
        };
        world.load_room((0, 0));
        world
    }

    fn load_room(&mut self, coord: (i32, i32)) {
        let Self { rooms, rng, .. } = self;
        rooms.entry(coord).or_insert_with(|| generate_room(rng));
        self.current = coord;
    }

    /// Steps to the neighbouring room in direction `(dx, dy)`.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.current;
        self.load_room((x + dx, y + dy));
        info!(room_x = x + dx, room_y = y + dy, rooms = self.rooms.len(), "entered room");
    }

    pub fn current(&self) -> &TileMap {
        &self.rooms[&self.current]
    }

    pub fn coord(&self) -> (i32, i32) {
        self.current
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
