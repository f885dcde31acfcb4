use std::f64::consts::PI;

/// A line segment in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: [f64; 2], // (x, y) start point in world space
    pub end: [f64; 2],   // (x, y) end point in world space
}

impl Segment {
    #[inline]
    pub const fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self { start, end }
    }

    /// Probe of `length` leaving `origin` at `angle` radians.
    #[inline]
    pub fn ray(origin: [f64; 2], length: f64, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            start: origin,
            end: [origin[0] + length * c, origin[1] + length * s],
        }
    }

    /// Direction of the segment from `start` to `end`. Only a sort key for rays.
    #[inline]
    pub fn angle(&self) -> f64 {
        (self.end[1] - self.start[1]).atan2(self.end[0] - self.start[0])
    }

    #[inline]
    pub fn len_squared(&self) -> f64 {
        dist_squared(self.start, self.end)
    }
}

#[inline]
pub fn dist_squared(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    dx * dx + dy * dy
}

/// Maps any angle into `(-PI, PI]`.
#[inline]
pub fn wrap_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Parametric segment-segment intersection.
///
/// Both parameters must fall inside the closed interval `[0, 1]`, so a probe
/// that grazes an endpoint still counts as a hit. Parallel and collinear
/// pairs never intersect.
pub fn intersect(a: &Segment, b: &Segment) -> Option<[f64; 2]> {
    let (ax1, ay1, ax2, ay2) = (a.start[0], a.start[1], a.end[0], a.end[1]);
    let (bx1, by1, bx2, by2) = (b.start[0], b.start[1], b.end[0], b.end[1]);

    let d = (ax1 - ax2) * (by1 - by2) - (ay1 - ay2) * (bx1 - bx2);
    if d == 0.0 || !d.is_finite() {
        return None;
    }

    let t = ((ax1 - bx1) * (by1 - by2) - (ay1 - by1) * (bx1 - bx2)) / d;
    let u = -((ax1 - ax2) * (ay1 - by1) - (ay1 - ay2) * (ax1 - bx1)) / d;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some([ax1 + t * (ax2 - ax1), ay1 + t * (ay2 - ay1)])
}
