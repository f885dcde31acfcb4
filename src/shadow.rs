//! Darkness overlay carved by the visibility polygon.
//!
//! The mask starts fully dark. Every fan triangle is erased from it
//! (destination-out: coverage drops to zero wherever a triangle lands), so
//! after the whole fan only the area outside the polygon is still dark. The
//! mask is then laid over the frame at a fixed strength so walls out of
//! sight stay dimly visible.

use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use crate::color::{lerp_color_u32, weight256};
use crate::raycast::VisibilityPolygon;

const DARK: u8 = 255;

pub struct ShadowMask {
    width: usize,
    height: usize,
    coverage: Vec<u8>,
}

impl ShadowMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            coverage: vec![DARK; width * height],
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

    /// Darkness at a pixel, 0 (lit) to 255 (dark). `None` off the mask.
    pub fn coverage_at(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.coverage[y * self.width + x])
    }

    pub fn reset(&mut self) {
        self.coverage.fill(DARK);
    }

    /// Erases every fan triangle of `polygon`. `offset` is subtracted from
    /// world coordinates to get mask pixels (the camera position).
    pub fn erase_polygon(&mut self, polygon: &VisibilityPolygon, offset: [f64; 2]) {
        for tri in polygon.triangles() {
            let v = tri.map(|p| [p[0] - offset[0], p[1] - offset[1]]);
            self.erase_triangle(v);
        }
    }

    /// Scanline fill sampling pixel centres. Spans are half-open on the
    /// right so triangles that share an edge leave no seam.
    pub fn erase_triangle(&mut self, v: [[f64; 2]; 3]) {
        if v.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
            return;
        }

        let min_y = v[0][1].min(v[1][1]).min(v[2][1]);
        let max_y = v[0][1].max(v[1][1]).max(v[2][1]);
        let y_start = (min_y - 0.5).ceil().max(0.0);
        let y_end = (max_y - 0.5).ceil().min(self.height as f64);
        if y_start >= y_end {
            return;
        }

        for y in y_start as usize..y_end as usize {
            let yc = y as f64 + 0.5;

            let mut xs = [0.0f64; 3];
            let mut n = 0;
            for i in 0..3 {
                let a = v[i];
                let b = v[(i + 1) % 3];
                if (a[1] <= yc && b[1] > yc) || (b[1] <= yc && a[1] > yc) {
                    xs[n] = a[0] + (yc - a[1]) / (b[1] - a[1]) * (b[0] - a[0]);
                    n += 1;
                }
            }
            if n < 2 {
                continue;
            }

            let xl = xs[..n].iter().copied().fold(f64::INFINITY, f64::min);
            let xr = xs[..n].iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let x_start = (xl - 0.5).ceil().max(0.0);
            let x_end = (xr - 0.5).ceil().min(self.width as f64);
            if x_start >= x_end {
                continue;
            }

            let row = y * self.width;
            self.coverage[row + x_start as usize..row + x_end as usize].fill(0);
        }
    }

    /// Darkens `frame` by `coverage * alpha`. `frame` must match the mask size.
    pub fn composite(&self, frame: &mut [u32], alpha: f32) {
        debug_assert_eq!(frame.len(), self.coverage.len());
        if self.width == 0 {
            return;
        }
        let strength = weight256(alpha);

        frame
            .par_chunks_mut(self.width)
            .zip(self.coverage.par_chunks(self.width))
            .for_each(|(row, cov)| {
                for (px, c) in row.iter_mut().zip(cov) {
                    let w = *c as u32 * strength / DARK as u32;
                    if w != 0 {
                        *px = lerp_color_u32(*px, 0, w);
                    }
                }
            });
    }
}

/// Debug overlay: every ray as a blended line from the viewer to its end.
/// Touches only the frame, never a mask.
pub fn draw_rays(
    frame: &mut [u32],
    width: usize,
    height: usize,
    polygon: &VisibilityPolygon,
    offset: [f64; 2],
    color: u32,
    alpha: u8,
) {
    let w = alpha as u32 * 256 / 255;
    let o = polygon.origin();
    let x0 = (o[0] - offset[0]).round() as i32;
    let y0 = (o[1] - offset[1]).round() as i32;
    for ray in polygon.rays() {
        let e = ray.end();
        let x1 = (e[0] - offset[0]).round() as i32;
        let y1 = (e[1] - offset[1]).round() as i32;
        blend_line(frame, width, height, (x0, y0), (x1, y1), color, w);
    }
}

fn blend_line(
    frame: &mut [u32],
    width: usize,
    height: usize,
    from: (i32, i32),
    to: (i32, i32),
    color: u32,
    w256: u32,
) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
            let i = y as usize * width + x as usize;
            frame[i] = lerp_color_u32(frame[i], color, w256);
        }
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Full light pass for one frame: reset, carve, composite, optional rays.
pub fn draw_light(
    frame: &mut [u32],
    mask: &mut ShadowMask,
    polygon: &VisibilityPolygon,
    offset: [f64; 2],
    alpha: f32,
    show_rays: bool,
) {
    mask.reset();
    mask.erase_polygon(polygon, offset);
    mask.composite(frame, alpha);

    if show_rays {
        let (w, h) = (mask.width(), mask.height());
        draw_rays(frame, w, h, polygon, offset, RAY_COLOR, RAY_ALPHA);
    }
}

pub const RAY_COLOR: u32 = crate::color::pack_rgb(255, 255, 0);
pub const RAY_ALPHA: u8 = 160;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::pack_rgb;
    use crate::raycast::CastParams;
    use crate::segments::wall_segments;
    use crate::tiles::TileMap;

    #[test]
    fn test_erase_triangle_inside_only() {
        let mut mask = ShadowMask::new(10, 10);
        mask.erase_triangle([[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]]);
        assert_eq!(mask.coverage_at(1, 1), Some(0));
        assert_eq!(mask.coverage_at(8, 8), Some(DARK));
        assert_eq!(mask.coverage_at(10, 0), None);
    }

    #[test]
    fn test_erase_clips_to_mask() {
        let mut mask = ShadowMask::new(4, 4);
        mask.erase_triangle([[-100.0, -100.0], [100.0, -100.0], [0.0, 100.0]]);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(mask.coverage_at(x, y), Some(0), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_erase_ignores_nan() {
        let mut mask = ShadowMask::new(4, 4);
        mask.erase_triangle([[f64::NAN, 0.0], [4.0, 0.0], [0.0, 4.0]]);
        assert_eq!(mask.coverage_at(0, 0), Some(DARK));
    }

    #[test]
    fn test_composite_strength() {
        let mut mask = ShadowMask::new(2, 1);
        mask.erase_triangle([[0.0, -1.0], [1.0, -1.0], [0.0, 3.0]]);
        assert_eq!(mask.coverage_at(0, 0), Some(0));
        assert_eq!(mask.coverage_at(1, 0), Some(DARK));

        let white = pack_rgb(255, 255, 255);
        let mut frame = vec![white; 2];
        mask.composite(&mut frame, 0.7);
        assert_eq!(frame[0], white);
        // 255 * (256 - 179) / 256
        assert_eq!(frame[1], pack_rgb(76, 76, 76));
    }

    #[test]
    fn test_fan_lights_closed_room_without_seams() {
        let map = TileMap::from_rows(&["#####", "#...#", "#...#", "#...#", "#####"]);
        let segs = wall_segments(&map);
        let poly = VisibilityPolygon::compute([80.0, 80.0], &segs, &CastParams::default());

        let mut mask = ShadowMask::new(160, 160);
        mask.erase_polygon(&poly, [0.0, 0.0]);

        // Interior pixels, one pixel in from the walls.
        for y in 33..127 {
            for x in 33..127 {
                assert_eq!(mask.coverage_at(x, y), Some(0), "pixel ({}, {})", x, y);
            }
        }
        // Inside the walls stays dark.
        assert_eq!(mask.coverage_at(5, 5), Some(DARK));
        assert_eq!(mask.coverage_at(150, 80), Some(DARK));
    }

    #[test]
    fn test_draw_rays_leaves_mask_alone() {
        let map = TileMap::from_rows(&["###", "#.#", "###"]);
        let poly =
            VisibilityPolygon::compute([48.0, 48.0], &wall_segments(&map), &CastParams::default());

        let mut with = vec![0u32; 96 * 96];
        let mut without = vec![0u32; 96 * 96];
        let mut mask_a = ShadowMask::new(96, 96);
        let mut mask_b = ShadowMask::new(96, 96);
        draw_light(&mut with, &mut mask_a, &poly, [0.0, 0.0], 0.7, true);
        draw_light(&mut without, &mut mask_b, &poly, [0.0, 0.0], 0.7, false);

        assert_eq!(mask_a.coverage, mask_b.coverage);
        assert_ne!(with, without);
    }
}
