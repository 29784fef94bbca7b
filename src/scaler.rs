use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

// Two source samples along one axis and the 8.8 fixed-point weight of the
// second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tap {
    lo: usize,
    hi: usize,
    w: u16,
}

fn taps(dst: usize, src: usize) -> Vec<Tap> {
    let ratio = src as f32 / dst.max(1) as f32;
    (0..dst)
        .map(|i| {
            let f = i as f32 * ratio;
            let lo = (f.floor() as usize).min(src.saturating_sub(1));
            let hi = (lo + 1).min(src.saturating_sub(1));
            Tap {
                lo,
                hi,
                w: ((f - lo as f32) * 256.0).round().clamp(0.0, 256.0) as u16,
            }
        })
        .collect()
}

/// Precomputed source taps for stretching a `src` frame onto a `dst` window.
#[derive(Debug, Clone, Default)]
pub struct ScaleLut {
    cols: Vec<Tap>,
    rows: Vec<Tap>,
    src: (usize, usize),
    dst: (usize, usize),
}

impl ScaleLut {
    pub fn build(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        Self {
            cols: taps(dst_w, src_w),
            rows: taps(dst_h, src_h),
            src: (src_w, src_h),
            dst: (dst_w, dst_h),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        self.dst
    }

    /// Maps a window position back onto the source frame.
    pub fn to_source(&self, x: f64, y: f64) -> (f32, f32) {
        let sx = self.src.0 as f64 / self.dst.0.max(1) as f64;
        let sy = self.src.1 as f64 / self.dst.1.max(1) as f64;
        ((x * sx) as f32, (y * sy) as f32)
    }
}

#[inline]
fn mix(a: u32, b: u32, w: u32) -> u32 {
    let inv = 256 - w;
    // red and blue share one multiply, green gets its own
    let rb = (((a & 0x00FF_00FF) * inv + (b & 0x00FF_00FF) * w) >> 8) & 0x00FF_00FF;
    let g = (((a & 0x0000_FF00) * inv + (b & 0x0000_FF00) * w) >> 8) & 0x0000_FF00;
    rb | g
}

/// Bilinear stretch, one window row per rayon task.
pub fn stretch(dst: &mut [u32], src: &[u32], lut: &ScaleLut) {
    let (dw, _) = lut.dst;
    let (sw, _) = lut.src;
    if dw == 0 || sw == 0 {
        return;
    }
    dst.par_chunks_mut(dw)
        .zip(lut.rows.par_iter())
        .for_each(|(out, row)| {
            let top = &src[row.lo * sw..(row.lo + 1) * sw];
            let bottom = &src[row.hi * sw..(row.hi + 1) * sw];
            let wy = row.w as u32;
            for (px, col) in out.iter_mut().zip(&lut.cols) {
                let wx = col.w as u32;
                let upper = mix(top[col.lo], top[col.hi], wx);
                let lower = mix(bottom[col.lo], bottom[col.hi], wx);
                *px = mix(upper, lower, wy);
            }
        });
}
