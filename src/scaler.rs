use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::color::lerp_color_u32;

/// For each destination pixel along one axis: the two source samples it
/// sits between and the weight of the second one (8.8 fixed point).
struct AxisTaps {
    lo: Vec<usize>,
    hi: Vec<usize>,
    w: Vec<u32>,
}

impl AxisTaps {
    fn build(dst: usize, src: usize) -> Self {
        let mut taps = Self {
            lo: Vec::with_capacity(dst),
            hi: Vec::with_capacity(dst),
            w: Vec::with_capacity(dst),
        };
        if src == 0 {
            return taps;
        }
        let step = src as f32 / dst as f32;
        let last = src - 1;
        for i in 0..dst {
            let f = i as f32 * step;
            let lo = (f.floor() as usize).min(last);
            taps.lo.push(lo);
            taps.hi.push((lo + 1).min(last));
            taps.w.push(((f - lo as f32) * 256.0).round().clamp(0.0, 256.0) as u32);
        }
        taps
    }
}

/// Precomputed mapping from the window to the internal framebuffer.
pub struct ScaleLut {
    dst: (usize, usize),
    src: (usize, usize),
    x: AxisTaps,
    y: AxisTaps,
}

impl ScaleLut {
    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        Self {
            dst: (dst_w, dst_h),
            src: (src_w, src_h),
            x: AxisTaps::build(dst_w, src_w),
            y: AxisTaps::build(dst_h, src_h),
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn matches(&self, dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> bool {
        self.dst == (dst_w, dst_h) && self.src == (src_w, src_h)
    }
}

/// Bilinear stretch of `src` onto `dst`, rows in parallel.
pub fn blit_bilinear_stretch(dst: &mut [u32], src: &[u32], lut: &ScaleLut) {
    let (dw, _) = lut.dst;
    let (sw, _) = lut.src;
    if dw == 0 || sw == 0 || lut.x.lo.is_empty() {
        return;
    }

    dst.par_chunks_mut(dw)
        .take(lut.y.lo.len())
        .enumerate()
        .for_each(|(y, row)| {
            let top = lut.y.lo[y] * sw;
            let bottom = lut.y.hi[y] * sw;
            let wy = lut.y.w[y];

            for (x, out) in row.iter_mut().enumerate() {
                let (x0, x1, wx) = (lut.x.lo[x], lut.x.hi[x], lut.x.w[x]);
                let upper = lerp_color_u32(src[top + x0], src[top + x1], wx);
                let lower = lerp_color_u32(src[bottom + x0], src[bottom + x1], wx);
                *out = lerp_color_u32(upper, lower, wy);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_copy() {
        let src: Vec<u32> = (0..12).map(|i| i * 0x010101).collect();
        let lut = ScaleLut::new(4, 3, 4, 3);
        let mut dst = vec![0u32; 12];
        blit_bilinear_stretch(&mut dst, &src, &lut);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_upscale_flat_color() {
        let src = vec![0x00336699u32; 4];
        let lut = ScaleLut::new(5, 7, 2, 2);
        let mut dst = vec![0u32; 35];
        blit_bilinear_stretch(&mut dst, &src, &lut);
        assert!(dst.iter().all(|&c| c == 0x00336699));
    }

    #[test]
    fn test_empty_lut_is_noop() {
        let mut dst = vec![1u32; 4];
        blit_bilinear_stretch(&mut dst, &[], &ScaleLut::empty());
        assert_eq!(dst, vec![1u32; 4]);
        assert!(ScaleLut::empty().matches(0, 0, 0, 0));
    }
}
