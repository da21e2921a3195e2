//! Synthetic test images
//!
//! Deterministic generators for the inputs used by the regression tests:
//! flat fields, pseudo-random noise, an unevenly lit "page" with dark
//! strokes, and rectangular or random masks.

use crate::error::{TestError, TestResult};
use dhimg_core::{Pix, PixelDepth, color};

/// Small deterministic generator for test data.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        // Knuth MMIX constants
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    /// Uniform value in `0..bound` (bound > 0).
    pub fn next_below(&mut self, bound: u32) -> u32 {
        // high bits have the longest period
        ((self.next_u64() >> 32) % u64::from(bound.max(1))) as u32
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn synth_err(name: &'static str) -> impl FnOnce(dhimg_core::Error) -> TestError {
    move |source| TestError::Synth { name, source }
}

/// 8 bpp image with every pixel set to `val`.
pub fn uniform_gray(width: u32, height: u32, val: u8) -> TestResult<Pix> {
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)
        .map_err(synth_err("uniform_gray"))?
        .to_mut();
    pm.set_all(u32::from(val));
    Ok(pm.into())
}

/// 8 bpp image of uniformly distributed values in 0..=255.
pub fn random_gray(width: u32, height: u32, seed: u64) -> TestResult<Pix> {
    let mut rng = SimpleRng::new(seed);
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)
        .map_err(synth_err("random_gray"))?
        .to_mut();
    for y in 0..height {
        for x in 0..width {
            pm.set_pixel_unchecked(x, y, rng.next_below(256));
        }
    }
    Ok(pm.into())
}

/// Paper intensity of the synthetic page at (x, y): bright, falling off
/// towards the bottom-right corner.
pub fn page_paper_value(width: u32, height: u32, x: u32, y: u32) -> u8 {
    let fx = f64::from(x) / f64::from(width.max(2) - 1);
    let fy = f64::from(y) / f64::from(height.max(2) - 1);
    (235.0 - 60.0 * fx - 40.0 * fy).round() as u8
}

/// Whether (x, y) lies on one of the dark strokes of the synthetic page.
///
/// Strokes are 2-pixel-high bars every 12 rows, inset 8 pixels from the
/// left and right edges, and broken every 20 columns to look like words.
pub fn page_is_ink(width: u32, height: u32, x: u32, y: u32) -> bool {
    let in_rows = y >= 8 && y + 8 < height && (y - 8) % 12 < 2;
    let in_cols = x >= 8 && x + 8 < width && (x - 8) % 20 < 16;
    in_rows && in_cols
}

/// 8 bpp unevenly lit page with dark text-like strokes.
pub fn gray_page(width: u32, height: u32) -> TestResult<Pix> {
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)
        .map_err(synth_err("gray_page"))?
        .to_mut();
    for y in 0..height {
        for x in 0..width {
            let v = if page_is_ink(width, height, x, y) {
                30
            } else {
                page_paper_value(width, height, x, y)
            };
            pm.set_pixel_unchecked(x, y, u32::from(v));
        }
    }
    Ok(pm.into())
}

/// 32 bpp version of [`gray_page`] on yellowed paper.
pub fn rgb_page(width: u32, height: u32) -> TestResult<Pix> {
    let gray = gray_page(width, height)?;
    let mut pm = Pix::new(width, height, PixelDepth::Bit32)
        .map_err(synth_err("rgb_page"))?
        .to_mut();
    for y in 0..height {
        for x in 0..width {
            let v = gray.get_pixel_unchecked(x, y) as f64;
            let r = v as u8;
            let g = (v * 0.95) as u8;
            let b = (v * 0.80) as u8;
            pm.set_pixel_unchecked(x, y, color::compose_rgb(r, g, b));
        }
    }
    Ok(pm.into())
}

/// Mask with 255 inside the half-open rectangle `[x0, x1) × [y0, y1)`.
pub fn rect_mask(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> TestResult<Pix> {
    if x0 > x1 || y0 > y1 {
        return Err(TestError::InvalidParameters(format!(
            "empty rectangle ({x0},{y0})-({x1},{y1})"
        )));
    }
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)
        .map_err(synth_err("rect_mask"))?
        .to_mut();
    for y in y0..y1.min(height) {
        for x in x0..x1.min(width) {
            pm.set_pixel_unchecked(x, y, 255);
        }
    }
    Ok(pm.into())
}

/// Mask with roughly `percent`% of pixels set to 255.
pub fn random_mask(width: u32, height: u32, percent: u32, seed: u64) -> TestResult<Pix> {
    if percent > 100 {
        return Err(TestError::InvalidParameters(format!(
            "percent {percent} > 100"
        )));
    }
    let mut rng = SimpleRng::new(seed);
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)
        .map_err(synth_err("random_mask"))?
        .to_mut();
    for y in 0..height {
        for x in 0..width {
            if rng.next_below(100) < percent {
                pm.set_pixel_unchecked(x, y, 255);
            }
        }
    }
    Ok(pm.into())
}
