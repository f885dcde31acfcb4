//! Corner ray casting and the visibility polygon built from it.
//!
//! Every occluder endpoint gets two probes, one `corner_epsilon` radians to
//! either side of it. A probe aimed straight at a corner may or may not
//! register as blocked depending on rounding; the bracketing pair always
//! lands one probe on the near wall and one past the corner, so the fan
//! follows the corner exactly.
//!
//! Cost is O(segments x rays) = O(segments^2) per call. That is fine for a
//! single room; for large maps it is the first thing to budget.

use std::f64::consts::{FRAC_PI_2, PI};

use tracing::trace;

use crate::geometry::{Segment, dist_squared, intersect, wrap_angle};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastParams {
    /// Angular offset of the two probes around each corner (radians).
    pub corner_epsilon: f64,
    /// Probe length; must exceed the largest scene extent.
    pub ray_length: f64,
    /// Largest angle allowed between neighbouring rays of the fan.
    pub max_fan_gap: f64,
}

impl Default for CastParams {
    fn default() -> Self {
        Self {
            corner_epsilon: 0.0005,
            ray_length: 2000.0,
            max_fan_gap: PI / 16.0,
        }
    }
}

/// A probe from the viewer to whatever stopped it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub line: Segment,
    /// Angle the probe was cast at, in `(-PI, PI]`.
    pub angle: f64,
}

impl Ray {
    #[inline]
    pub fn end(&self) -> [f64; 2] {
        self.line.end
    }
}

/// Casts one probe and stops it at the nearest segment it crosses.
/// Unblocked probes keep their full length.
pub fn cast_ray(origin: [f64; 2], angle: f64, segments: &[Segment], length: f64) -> Ray {
    let angle = wrap_angle(angle);
    let probe = Segment::ray(origin, length, angle);

    let mut hit = probe.end;
    let mut best = f64::INFINITY;
    for seg in segments {
        if let Some(p) = intersect(&probe, seg) {
            let d = dist_squared(origin, p);
            if d < best {
                best = d;
                hit = p;
            }
        }
    }

    Ray {
        line: Segment::new(origin, hit),
        angle,
    }
}

/// Two probes per segment endpoint, unsorted.
pub fn cast_rays(origin: [f64; 2], segments: &[Segment], params: &CastParams) -> Vec<Ray> {
    let eps = params.corner_epsilon;
    let mut rays = Vec::with_capacity(segments.len() * 4);
    for s in segments {
        for p in [s.start, s.end] {
            let base = (p[1] - origin[1]).atan2(p[0] - origin[0]);
            for off in [-eps, eps] {
                rays.push(cast_ray(origin, base + off, segments, params.ray_length));
            }
        }
    }
    rays
}

fn sort_by_angle(rays: &mut [Ray]) {
    rays.sort_by(|a, b| a.angle.total_cmp(&b.angle));
}

/// Extra probe angles for every gap wider than `max_gap`, including the
/// wrap from the last ray back to the first. `rays` must be sorted.
fn gap_fillers(rays: &[Ray], max_gap: f64) -> Vec<f64> {
    // Fan triangles must stay well under half a turn.
    let max_gap = if max_gap.is_finite() && max_gap > 0.0 {
        max_gap.min(FRAC_PI_2)
    } else {
        FRAC_PI_2
    };

    let mut out = Vec::new();
    if rays.is_empty() {
        let n = (2.0 * PI / max_gap).ceil() as usize;
        out.extend((1..=n).map(|i| -PI + 2.0 * PI * i as f64 / n as f64));
        return out;
    }

    for i in 0..rays.len() {
        let a = rays[i].angle;
        let b = match rays.get(i + 1) {
            Some(next) => next.angle,
            None => rays[0].angle + 2.0 * PI,
        };
        let gap = b - a;
        if gap > max_gap {
            let k = (gap / max_gap).ceil() as usize;
            out.extend((1..k).map(|j| a + gap * j as f64 / k as f64));
        }
    }
    out
}

/// Angle-ordered fan of rays around one viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityPolygon {
    origin: [f64; 2],
    rays: Vec<Ray>,
}

impl VisibilityPolygon {
    pub fn compute(origin: [f64; 2], segments: &[Segment], params: &CastParams) -> Self {
        let mut rays = cast_rays(origin, segments, params);
        sort_by_angle(&mut rays);

        let fillers = gap_fillers(&rays, params.max_fan_gap);
        if !fillers.is_empty() {
            rays.extend(
                fillers
                    .into_iter()
                    .map(|a| cast_ray(origin, a, segments, params.ray_length)),
            );
            sort_by_angle(&mut rays);
        }

        trace!(segments = segments.len(), rays = rays.len(), "visibility polygon");
        Self { origin, rays }
    }

    #[inline]
    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    #[inline]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// Polygon outline in angle order.
    pub fn boundary(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.rays.iter().map(Ray::end)
    }

    /// Fan triangles `(origin, ray[i], ray[i + 1])`, wrapping at the end.
    pub fn triangles(&self) -> impl Iterator<Item = [[f64; 2]; 3]> + '_ {
        let n = self.rays.len();
        let count = if n < 2 { 0 } else { n };
        (0..count).map(move |i| {
            [
                self.origin,
                self.rays[i].end(),
                self.rays[(i + 1) % n].end(),
            ]
        })
    }

    /// `(min, max)` corners of the boundary, `None` with no rays.
    pub fn bounding_box(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut it = self.boundary();
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| {
            (
                [lo[0].min(p[0]), lo[1].min(p[1])],
                [hi[0].max(p[0]), hi[1].max(p[1])],
            )
        }))
    }
}
