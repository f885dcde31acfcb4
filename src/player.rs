use crate::tiles::{TileGrid, TileType};

pub const PLAYER_SIZE: f64 = 16.0;
pub const PLAYER_SPEED: f64 = 2.0; // px per tick

/// Held movement keys for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveIntent {
    fn velocity(&self) -> [f64; 2] {
        let mut v = [0.0, 0.0];
        if self.left {
            v[0] -= PLAYER_SPEED;
        }
        if self.right {
            v[0] += PLAYER_SPEED;
        }
        if self.up {
            v[1] -= PLAYER_SPEED;
        }
        if self.down {
            v[1] += PLAYER_SPEED;
        }
        v
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: [f64; 2], // top-left corner in world space
}

impl Default for Player {
    fn default() -> Self {
        Self { pos: [100.0, 100.0] }
    }
}

impl Player {
    /// Moves one tick. Collision looks only at the tile under the candidate
    /// centre: walls block, floors and doors let the move through. Returns
    /// the room direction when the move lands on a door in the border.
    pub fn update<G: TileGrid + ?Sized>(
        &mut self,
        intent: MoveIntent,
        map: &G,
    ) -> Option<(i32, i32)> {
        let v = intent.velocity();
        let next = [self.pos[0] + v[0], self.pos[1] + v[1]];
        let centre = [next[0] + PLAYER_SIZE / 2.0, next[1] + PLAYER_SIZE / 2.0];
        let (tx, ty) = map.tile_at(centre);

        match map.tile_type(tx, ty) {
            TileType::Wall => None,
            TileType::Floor => {
                self.pos = next;
                None
            }
            TileType::Door => {
                self.pos = next;
                let (w, h) = (map.width() as i32, map.height() as i32);
                if tx == 0 {
                    Some((-1, 0))
                } else if tx == w - 1 {
                    Some((1, 0))
                } else if ty == 0 {
                    Some((0, -1))
                } else if ty == h - 1 {
                    Some((0, 1))
                } else {
                    None
                }
            }
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [self.pos[0] + PLAYER_SIZE / 2.0, self.pos[1] + PLAYER_SIZE / 2.0]
    }

    pub fn set_center(&mut self, c: [f64; 2]) {
        self.pos = [c[0] - PLAYER_SIZE / 2.0, c[1] - PLAYER_SIZE / 2.0];
    }
}
