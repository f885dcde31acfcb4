use tracing::info;

use crate::camera::Camera;
use crate::config::Config;
use crate::player::{MoveIntent, Player};
use crate::world::World;

/// Where the player appears after a room change.
pub const SPAWN_CENTER: [f64; 2] = [384.0, 284.0];

const CAMERA_LERP: f64 = 0.1;
const TRANSITION_STEP: f64 = 0.05;

/// Input sampled for one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct Input {
    pub movement: MoveIntent,
    /// Set once per key press, not while held.
    pub toggle_rays: bool,
}

/// Black bars closing over the screen, then opening on the new room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub t: f64,
    closing: bool,
    direction: (i32, i32),
}

pub struct Game {
    pub player: Player,
    pub world: World,
    pub camera: Camera,
    pub transition: Option<Transition>,
    pub show_rays: bool,
    screen: [f64; 2],
}

impl Game {
    pub fn new(world: World, config: &Config) -> Self {
        Self {
            player: Player::default(),
            world,
            camera: Camera { pos: [0.0, 0.0] },
            transition: None,
            show_rays: config.light.show_rays,
            screen: [config.window.width as f64, config.window.height as f64],
        }
    }

    /// The light source: the player's centre.
    pub fn viewer(&self) -> [f64; 2] {
        self.player.center()
    }

    /// Bar coverage in `[0, 1]` while a room change is running.
    pub fn transition_progress(&self) -> Option<f64> {
        self.transition.map(|t| t.t.clamp(0.0, 1.0))
    }

    pub fn update(&mut self, input: &Input) {
        if input.toggle_rays {
            self.show_rays = !self.show_rays;
        }

        if let Some(mut tr) = self.transition.take() {
            if tr.closing {
                tr.t += TRANSITION_STEP;
                if tr.t >= 1.0 {
                    let (dx, dy) = tr.direction;
                    self.world.move_by(dx, dy);
                    self.player.set_center(SPAWN_CENTER);
                    tr.closing = false;
                }
                self.transition = Some(tr);
            } else {
                tr.t -= TRANSITION_STEP;
                if tr.t > 0.0 {
                    self.transition = Some(tr);
                }
            }
            return;
        }

        self.camera
            .follow(self.player.center(), self.screen, CAMERA_LERP);

        if let Some(direction) = self.player.update(input.movement, self.world.current()) {
            info!(dx = direction.0, dy = direction.1, "room transition");
            self.transition = Some(Transition {
                t: 0.0,
                closing: true,
                direction,
            });
        }
    }
}
