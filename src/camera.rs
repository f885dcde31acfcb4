pub struct Camera {
    pub pos: [f64; 2], // top-left of the viewport in world space
}

impl Camera {
    /// Eases toward centring `target` in a `screen`-sized viewport.
    /// `lerp` is the fraction of the remaining distance covered per call.
    pub fn follow(&mut self, target: [f64; 2], screen: [f64; 2], lerp: f64) {
        let tx = target[0] - 0.5 * screen[0];
        let ty = target[1] - 0.5 * screen[1];
        self.pos[0] += (tx - self.pos[0]) * lerp;
        self.pos[1] += (ty - self.pos[1]) * lerp;
    }

    #[inline]
    pub fn world_to_screen(&self, p: [f64; 2]) -> [f64; 2] {
        [p[0] - self.pos[0], p[1] - self.pos[1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_converges() {
        let mut cam = Camera { pos: [0.0, 0.0] };
        for _ in 0..200 {
            cam.follow([500.0, 400.0], [800.0, 600.0], 0.1);
        }
        assert!((cam.pos[0] - 100.0).abs() < 1e-3);
        assert!((cam.pos[1] - 100.0).abs() < 1e-3);
        assert_eq!(cam.world_to_screen([500.0, 400.0]).map(f64::round), [400.0, 300.0]);
    }
}
