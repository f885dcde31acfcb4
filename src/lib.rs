//! Per-frame 2D visibility over a tile grid.
//!
//! Two independent answers to "what can the viewer see":
//!
//! - [`raycast::VisibilityPolygon`]: exact polygon from corner ray casting
//!   against wall edges ([`segments`]), drawn as a darkness overlay by
//!   [`shadow`].
//! - [`los::visible_tiles`]: Bresenham line of sight per tile, used to pick
//!   which tiles to draw.
//!
//! Both are pure functions of the viewer position and a [`tiles::TileGrid`].
//! The remaining modules are the small game built around them.

pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod logging;
pub mod los;
pub mod player;
pub mod raycast;
pub mod renderer;
pub mod room;
pub mod scaler;
pub mod segments;
pub mod shadow;
pub mod tiles;
pub mod world;

pub use config::{Config, LightConfig};
pub use error::ConfigError;
pub use geometry::{Segment, intersect};
pub use los::{VisibilityMask, has_line_of_sight, visible_tiles};
pub use raycast::{CastParams, Ray, VisibilityPolygon, cast_rays};
pub use segments::{SegmentCache, wall_segments};
pub use shadow::{ShadowMask, draw_light};
pub use tiles::{CELL_SIZE, TileGrid, TileMap, TileType};
