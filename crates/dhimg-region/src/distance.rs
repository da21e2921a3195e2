//! Distance transform
//!
//! Computes, for every pixel of an 8 bpp image, the distance to the nearest
//! zero-valued pixel. Zero pixels get distance 0.
//!
//! - [`DistanceMetric::L1`] is exact Manhattan distance, computed with a
//!   forward/backward raster scan over 4-neighbours.
//! - [`DistanceMetric::L2`] is exact Euclidean distance, computed as the
//!   lower envelope of parabolas, one column pass followed by one row pass
//!   (Felzenszwalb & Huttenlocher, "Distance Transforms of Sampled
//!   Functions").
//!
//! Pixels with no zero pixel to reach get `f32::INFINITY`.

use crate::error::{RegionError, RegionResult};
use dhimg_core::{FPix, Pix, PixelDepth};

/// Distance metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// City-block distance |dx| + |dy|
    L1,
    /// Euclidean distance sqrt(dx² + dy²)
    #[default]
    L2,
}

/// How pixels outside the image are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryCondition {
    /// Outside pixels are zero, so distances are bounded by the distance to
    /// the image edge plus one.
    Background,
    /// Outside pixels are ignored; only zero pixels inside the image count.
    #[default]
    Foreground,
}

/// Compute the distance from every pixel to the nearest zero pixel.
///
/// # Arguments
///
/// * `pix` - 8 bpp input; 0 is background, anything else foreground
/// * `metric` - L1 or L2
/// * `boundary` - Treatment of pixels outside the image
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] if the input is not 8 bpp.
pub fn distance_transform(
    pix: &Pix,
    metric: DistanceMetric,
    boundary: BoundaryCondition,
) -> RegionResult<FPix> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(RegionError::UnsupportedDepth {
            expected: "8-bit",
            actual: pix.depth().bits(),
        });
    }

    let (src, border) = match boundary {
        BoundaryCondition::Background => (pix.add_border(1, 0)?, 1),
        BoundaryCondition::Foreground => (pix.clone(), 0),
    };
    let w = src.width() as usize;
    let h = src.height() as usize;

    let mut field = vec![f64::INFINITY; w * h];
    for y in 0..h {
        for x in 0..w {
            if src.get_pixel_unchecked(x as u32, y as u32) == 0 {
                field[y * w + x] = 0.0;
            }
        }
    }

    match metric {
        DistanceMetric::L1 => chamfer_l1(&mut field, w, h),
        DistanceMetric::L2 => {
            squared_edt(&mut field, w, h);
            for d in field.iter_mut() {
                *d = d.sqrt();
            }
        }
    }

    let out_w = pix.width();
    let out_h = pix.height();
    let mut data = Vec::with_capacity((out_w as usize) * (out_h as usize));
    for y in 0..out_h as usize {
        let row = (y + border) * w + border;
        data.extend(field[row..row + out_w as usize].iter().map(|&d| d as f32));
    }
    Ok(FPix::from_data(out_w, out_h, data)?)
}

/// Two-pass 4-neighbour chamfer; exact for the L1 metric.
fn chamfer_l1(d: &mut [f64], w: usize, h: usize) {
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let mut v = d[i];
            if x > 0 {
                v = v.min(d[i - 1] + 1.0);
            }
            if y > 0 {
                v = v.min(d[i - w] + 1.0);
            }
            d[i] = v;
        }
    }
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let i = y * w + x;
            let mut v = d[i];
            if x + 1 < w {
                v = v.min(d[i + 1] + 1.0);
            }
            if y + 1 < h {
                v = v.min(d[i + w] + 1.0);
            }
            d[i] = v;
        }
    }
}

/// Squared Euclidean distance transform, in place: columns, then rows.
fn squared_edt(d: &mut [f64], w: usize, h: usize) {
    let n = w.max(h);
    let mut f = vec![0.0f64; n];
    let mut out = vec![0.0f64; n];
    let mut env = Envelope::with_capacity(n);

    for x in 0..w {
        for y in 0..h {
            f[y] = d[y * w + x];
        }
        env.transform(&f[..h], &mut out[..h]);
        for y in 0..h {
            d[y * w + x] = out[y];
        }
    }
    for y in 0..h {
        let row = &mut d[y * w..(y + 1) * w];
        f[..w].copy_from_slice(row);
        env.transform(&f[..w], &mut out[..w]);
        row.copy_from_slice(&out[..w]);
    }
}

/// Lower envelope of the parabolas `(q - p)² + f[p]`.
struct Envelope {
    /// Parabola apexes
    v: Vec<usize>,
    /// Left boundary of each parabola's interval
    z: Vec<f64>,
}

impl Envelope {
    fn with_capacity(n: usize) -> Self {
        Self {
            v: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        }
    }

    /// 1D squared distance transform of `f`. Infinite samples contribute
    /// no parabola.
    fn transform(&mut self, f: &[f64], out: &mut [f64]) {
        self.v.clear();
        self.z.clear();

        for (q, &fq) in f.iter().enumerate() {
            if !fq.is_finite() {
                continue;
            }
            let qf = q as f64;
            let mut s = f64::NEG_INFINITY;
            while let (Some(&p), Some(&zp)) = (self.v.last(), self.z.last()) {
                let pf = p as f64;
                let cross = ((fq + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf));
                if cross <= zp {
                    self.v.pop();
                    self.z.pop();
                } else {
                    s = cross;
                    break;
                }
            }
            self.v.push(q);
            self.z.push(s);
        }

        if self.v.is_empty() {
            out.fill(f64::INFINITY);
            return;
        }

        let mut k = 0;
        for (q, o) in out.iter_mut().enumerate() {
            let qf = q as f64;
            while k + 1 < self.v.len() && self.z[k + 1] < qf {
                k += 1;
            }
            let p = self.v[k];
            let dq = qf - p as f64;
            *o = dq * dq + f[p];
        }
    }
}
