//! Pixel helpers for the 0RGB framebuffer (alpha byte unused).

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

/// Moves `a` toward `b` by `w256 / 256`.
#[inline]
pub fn lerp_color_u32(a: u32, b: u32, w256: u32) -> u32 {
    let w = w256.min(256);
    let inv = 256 - w;
    // R and B together (00RR00BB), G on its own (0000GG00)
    let rb = (((a & 0x00FF00FF) * inv + (b & 0x00FF00FF) * w) >> 8) & 0x00FF00FF;
    let g = (((a & 0x0000FF00) * inv + (b & 0x0000FF00) * w) >> 8) & 0x0000FF00;
    rb | g
}

/// Fraction in `[0, 1]` to the 0..=256 weight used by [`lerp_color_u32`].
#[inline]
pub fn weight256(fraction: f32) -> u32 {
    (fraction.clamp(0.0, 1.0) * 256.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_rgb(10, 20, 30), 0x000A141E);
    }

    #[test]
    fn test_lerp_endpoints() {
        let white = pack_rgb(255, 255, 255);
        let black = pack_rgb(0, 0, 0);
        assert_eq!(lerp_color_u32(white, black, 0), white);
        assert_eq!(lerp_color_u32(white, black, 256), black);
        assert_eq!(lerp_color_u32(white, black, 128), pack_rgb(127, 127, 127));
    }
}
