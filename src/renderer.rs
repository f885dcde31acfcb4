use tracing::trace;

use crate::color::pack_rgb;
use crate::config::LightConfig;
use crate::game::Game;
use crate::geometry::Segment;
use crate::los::visible_tiles;
use crate::player::PLAYER_SIZE;
use crate::raycast::VisibilityPolygon;
use crate::segments::{SegmentCache, wall_segments};
use crate::shadow::{ShadowMask, draw_light};
use crate::tiles::{TileGrid, TileType};

/// One square sprite per tile type: a flat fill with a 1 px black outline.
pub struct TileSprites {
    size: usize,
    floor: Vec<u32>,
    wall: Vec<u32>,
    door: Vec<u32>,
}

impl TileSprites {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            floor: outlined_sprite(size, pack_rgb(40, 40, 40)),
            wall: outlined_sprite(size, pack_rgb(0, 0, 255)),
            door: outlined_sprite(size, pack_rgb(0, 255, 0)),
        }
    }

    pub fn get(&self, tile: TileType) -> &[u32] {
        match tile {
            TileType::Floor => &self.floor,
            TileType::Wall => &self.wall,
            TileType::Door => &self.door,
        }
    }
}

fn outlined_sprite(size: usize, fill: u32) -> Vec<u32> {
    let outline = pack_rgb(0, 0, 0);
    let mut px = vec![fill; size * size];
    for i in 0..size {
        px[i] = outline; // top
        px[(size - 1) * size + i] = outline; // bottom
        px[i * size] = outline; // left
        px[i * size + size - 1] = outline; // right
    }
    px
}

/// Render resources built once at startup and handed to every frame.
pub struct RenderContext {
    pub sprites: TileSprites,
    pub shadow: ShadowMask,
    pub light: LightConfig,
    segment_cache: Option<SegmentCache>,
}

impl RenderContext {
    pub fn new(width: usize, height: usize, cell_size: usize, light: LightConfig) -> Self {
        let segment_cache = light.cache_segments.then(SegmentCache::new);
        Self {
            sprites: TileSprites::new(cell_size),
            shadow: ShadowMask::new(width, height),
            light,
            segment_cache,
        }
    }
}

/// Draws visible tiles, the light overlay, the player and any transition
/// bars into `buf` (`width * height`, 0RGB).
pub fn render_frame(
    buf: &mut [u32],
    width: usize,
    height: usize,
    game: &Game,
    ctx: &mut RenderContext,
) {
    buf.fill(pack_rgb(0, 0, 0));
    if ctx.shadow.width() != width || ctx.shadow.height() != height {
        ctx.shadow = ShadowMask::new(width, height);
    }

    let map = game.world.current();
    let viewer = game.viewer();
    let cam = game.camera.pos;
    let cell = map.cell_size();

    // Tiles with line of sight
    let visible = visible_tiles(map, viewer, ctx.light.view_radius);
    for ty in 0..visible.height() as i32 {
        for tx in 0..visible.width() as i32 {
            if !visible.get(tx, ty) {
                continue;
            }
            let sx = (tx as f64 * cell - cam[0]).round() as i32;
            let sy = (ty as f64 * cell - cam[1]).round() as i32;
            let sprite = ctx.sprites.get(map.tile_type(tx, ty));
            blit_sprite(buf, width, height, sprite, ctx.sprites.size, sx, sy);
        }
    }

    // Light overlay
    let owned: Vec<Segment>;
    let segments: &[Segment] = match ctx.segment_cache.as_mut() {
        Some(cache) => cache.segments(map),
        None => {
            owned = wall_segments(map);
            &owned
        }
    };
    let polygon = VisibilityPolygon::compute(viewer, segments, &ctx.light.cast_params());
    trace!(tiles = visible.count(), rays = polygon.rays().len(), "frame visibility");
    draw_light(
        buf,
        &mut ctx.shadow,
        &polygon,
        cam,
        ctx.light.shadow_alpha,
        game.show_rays,
    );

    // Player
    let p = game.camera.world_to_screen(game.player.pos);
    let size = PLAYER_SIZE as usize;
    fill_rect(
        buf,
        width,
        height,
        p[0].round() as i32,
        p[1].round() as i32,
        size,
        size,
        pack_rgb(255, 0, 0),
    );

    // Transition bars
    if let Some(t) = game.transition_progress() {
        let w = (width as f64 * t / 2.0) as usize;
        let black = pack_rgb(0, 0, 0);
        fill_rect(buf, width, height, 0, 0, w, height, black);
        fill_rect(buf, width, height, (width - w) as i32, 0, w, height, black);
    }
}

fn blit_sprite(
    buf: &mut [u32],
    width: usize,
    height: usize,
    sprite: &[u32],
    size: usize,
    x: i32,
    y: i32,
) {
    for row in 0..size {
        let dy = y + row as i32;
        if dy < 0 || dy >= height as i32 {
            continue;
        }
        let x0 = x.max(0);
        let x1 = (x + size as i32).min(width as i32);
        if x0 >= x1 {
            return;
        }
        let src = row * size + (x0 - x) as usize;
        let dst = dy as usize * width + x0 as usize;
        let n = (x1 - x0) as usize;
        buf[dst..dst + n].copy_from_slice(&sprite[src..src + n]);
    }
}

fn fill_rect(
    buf: &mut [u32],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    w: usize,
    h: usize,
    color: u32,
) {
    let x0 = x.max(0);
    let x1 = (x + w as i32).min(width as i32);
    let y0 = y.max(0);
    let y1 = (y + h as i32).min(height as i32);
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    for yy in y0..y1 {
        let row = yy as usize * width;
        buf[row + x0 as usize..row + x1 as usize].fill(color);
    }
}
