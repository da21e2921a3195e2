//! Fast harmonic inpainting
//!
//! Fills the masked pixels of an image by repeatedly averaging their
//! neighbourhood (Oliveira et al., "Fast Digital Image Inpainting", 2001).
//! Unmasked pixels are the boundary condition and are never changed.
//!
//! The masked region is first seeded, either with the mean of all unmasked
//! pixels or by copying the nearest unmasked pixel, then relaxed with the
//! 3x3 [`Kernel::diffusion`] stencil for a fixed number of iterations.

use crate::convolve::fpix_convolve;
use crate::kernel::Kernel;
use crate::{FilterError, FilterResult};
use dhimg_core::{FPix, Pix, PixelDepth};
use log::debug;

/// Default number of relaxation iterations
pub const DEFAULT_INPAINT_ITERATIONS: u32 = 16;

/// How masked pixels are seeded before relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InpaintInit {
    /// Per-channel mean of every unmasked pixel
    Mean,
    /// Value of the nearest unmasked pixel in L1 distance
    #[default]
    NearestL1,
}

/// Inpainting parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InpaintOptions {
    /// Seeding of the masked region
    pub init: InpaintInit,
    /// Relaxation iterations (0 keeps the seed values)
    pub iterations: u32,
}

impl Default for InpaintOptions {
    fn default() -> Self {
        Self {
            init: InpaintInit::default(),
            iterations: DEFAULT_INPAINT_ITERATIONS,
        }
    }
}

impl InpaintOptions {
    /// Set the seeding mode
    pub fn with_init(mut self, init: InpaintInit) -> Self {
        self.init = init;
        self
    }

    /// Set the number of iterations
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Inpaint the pixels of `pix` where `mask` is non-zero.
///
/// # Arguments
///
/// * `pix` - 8 bpp gray or 32 bpp RGB source
/// * `mask` - 8 bpp mask of the same size; non-zero marks pixels to fill
/// * `options` - Seeding mode and iteration count
///
/// # Errors
///
/// - [`FilterError::UnsupportedDepth`] if the mask is not 8 bpp
/// - [`FilterError::InvalidParameters`] if the sizes differ
/// - [`FilterError::DegenerateMask`] if every pixel is masked
pub fn fast_inpaint(pix: &Pix, mask: &Pix, options: &InpaintOptions) -> FilterResult<Pix> {
    if mask.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 bpp mask",
            actual: mask.depth().bits(),
        });
    }
    if pix.dimensions() != mask.dimensions() {
        return Err(FilterError::InvalidParameters(format!(
            "mask is {}x{}, image is {}x{}",
            mask.width(),
            mask.height(),
            pix.width(),
            pix.height()
        )));
    }

    let masked = MaskIndex::new(mask);
    if masked.known == 0 {
        return Err(FilterError::DegenerateMask);
    }
    debug!(
        "inpaint: {}x{} masked={} init={:?} iterations={}",
        pix.width(),
        pix.height(),
        masked.positions.len(),
        options.init,
        options.iterations
    );
    if masked.positions.is_empty() {
        return Ok(pix.clone());
    }

    let kernel = Kernel::diffusion();
    let sources = match options.init {
        InpaintInit::Mean => None,
        InpaintInit::NearestL1 => Some(nearest_unmasked(mask, &masked.positions)),
    };

    let planes = pix
        .split_channels()?
        .iter()
        .map(|plane| {
            let mut f = FPix::from_pix(plane)?;
            match &sources {
                None => seed_mean(&mut f, mask, &masked),
                Some(src) => seed_nearest(&mut f, &masked.positions, src),
            }
            relax(&mut f, &kernel, &masked.positions, options.iterations)?;
            f.to_pix().map_err(FilterError::from)
        })
        .collect::<FilterResult<Vec<_>>>()?;

    Ok(Pix::merge_channels(&planes)?)
}

/// Masked pixel coordinates and the number of unmasked ones.
struct MaskIndex {
    positions: Vec<(u32, u32)>,
    known: u64,
}

impl MaskIndex {
    fn new(mask: &Pix) -> Self {
        let mut positions = Vec::new();
        let mut known = 0;
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.get_pixel_unchecked(x, y) != 0 {
                    positions.push((x, y));
                } else {
                    known += 1;
                }
            }
        }
        Self { positions, known }
    }
}

/// Fill masked pixels with the truncated mean of the unmasked ones.
fn seed_mean(f: &mut FPix, mask: &Pix, masked: &MaskIndex) {
    let mut total = 0u64;
    for y in 0..f.height() {
        for x in 0..f.width() {
            if mask.get_pixel_unchecked(x, y) == 0 {
                total += f.get_pixel_unchecked(x, y) as u64;
            }
        }
    }
    let mean = (total / masked.known) as f32;
    for &(x, y) in &masked.positions {
        f.set_pixel_unchecked(x, y, mean);
    }
}

fn seed_nearest(f: &mut FPix, positions: &[(u32, u32)], sources: &[(u32, u32)]) {
    for (&(x, y), &(sx, sy)) in positions.iter().zip(sources) {
        let v = f.get_pixel_unchecked(sx, sy);
        f.set_pixel_unchecked(x, y, v);
    }
}

/// For each masked position, the nearest unmasked pixel in L1 distance.
///
/// Rings of growing radius `d` are walked as a diamond starting at the
/// top vertex and going clockwise; the first unmasked pixel found wins.
/// At least one unmasked pixel must exist.
fn nearest_unmasked(mask: &Pix, positions: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let w = i64::from(mask.width());
    let h = i64::from(mask.height());
    let known = |x: i64, y: i64| {
        x >= 0 && x < w && y >= 0 && y < h && mask.get_pixel_unchecked(x as u32, y as u32) == 0
    };

    positions
        .iter()
        .map(|&(px, py)| {
            let (x, y) = (i64::from(px), i64::from(py));
            // Every pixel is within w + h of any other
            for d in 1..=(w + h) {
                for k in 0..d {
                    let ring = [
                        (x + k, y - d + k),
                        (x + d - k, y + k),
                        (x - k, y + d - k),
                        (x - d + k, y - k),
                    ];
                    if let Some(&(sx, sy)) = ring.iter().find(|&&(sx, sy)| known(sx, sy)) {
                        return (sx as u32, sy as u32);
                    }
                }
            }
            (px, py)
        })
        .collect()
}

/// Replace masked pixels with the stencil average, `iterations` times.
fn relax(
    f: &mut FPix,
    kernel: &Kernel,
    positions: &[(u32, u32)],
    iterations: u32,
) -> FilterResult<()> {
    for _ in 0..iterations {
        let smoothed = fpix_convolve(f, kernel, false)?;
        for &(x, y) in positions {
            f.set_pixel_unchecked(x, y, smoothed.get_pixel_unchecked(x, y));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhimg_test::synth;

    #[test]
    fn test_defaults() {
        let o = InpaintOptions::default();
        assert_eq!(o.init, InpaintInit::NearestL1);
        assert_eq!(o.iterations, 16);
    }

    #[test]
    fn test_mean_seed_truncates() {
        let pix = Pix::from_gray_bytes(4, 1, &[10, 11, 0, 0]).unwrap();
        let mask = Pix::from_gray_bytes(4, 1, &[0, 0, 255, 255]).unwrap();
        let opts = InpaintOptions::default()
            .with_init(InpaintInit::Mean)
            .with_iterations(0);
        let out = fast_inpaint(&pix, &mask, &opts).unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(10));
        assert_eq!(out.get_pixel(2, 0), Some(10));
        assert_eq!(out.get_pixel(3, 0), Some(10));
    }

    #[test]
    fn test_nearest_seed_order() {
        // Masked center; up (top vertex) is probed first at d = 1
        #[rustfmt::skip]
        let pix = Pix::from_gray_bytes(3, 3, &[
            0, 50, 0,
            60, 0, 70,
            0, 80, 0,
        ]).unwrap();
        let mask = Pix::from_gray_bytes(3, 3, &[255, 0, 255, 0, 255, 0, 255, 0, 255]).unwrap();
        let opts = InpaintOptions::default().with_iterations(0);
        let out = fast_inpaint(&pix, &mask, &opts).unwrap();
        assert_eq!(out.get_pixel(1, 1), Some(50));
        // corner (0, 0): d = 1, k = 0 probes (0, -1) then (1, 0)
        assert_eq!(out.get_pixel(0, 0), Some(50));
        // corner (2, 2): probes (2, 1) first
        assert_eq!(out.get_pixel(2, 2), Some(70));
    }

    #[test]
    fn test_nearest_far_away() {
        let mut bytes = vec![255u8; 25];
        bytes[24] = 0;
        let mask = Pix::from_gray_bytes(5, 5, &bytes).unwrap();
        let mut src = vec![0u8; 25];
        src[24] = 42;
        let pix = Pix::from_gray_bytes(5, 5, &src).unwrap();
        let out = fast_inpaint(&pix, &mask, &InpaintOptions::default().with_iterations(0)).unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(42));
    }

    #[test]
    fn test_unmasked_pixels_preserved() {
        let pix = synth::random_gray(15, 11, 3).unwrap();
        let mask = synth::random_mask(15, 11, 40, 9).unwrap();
        for init in [InpaintInit::Mean, InpaintInit::NearestL1] {
            for iterations in [0, 1, 20] {
                let opts = InpaintOptions { init, iterations };
                let out = fast_inpaint(&pix, &mask, &opts).unwrap();
                for y in 0..11 {
                    for x in 0..15 {
                        if mask.get_pixel_unchecked(x, y) == 0 {
                            assert_eq!(out.get_pixel(x, y), pix.get_pixel(x, y));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_relaxation_stays_in_range() {
        // A hole in a flat field fills with the field value
        let pix = synth::uniform_gray(9, 9, 77).unwrap();
        let mask = synth::rect_mask(9, 9, 3, 3, 6, 6).unwrap();
        let out = fast_inpaint(
            &pix,
            &mask,
            &InpaintOptions::default().with_init(InpaintInit::Mean),
        )
        .unwrap();
        assert_eq!(out.get_pixel(4, 4), Some(77));
    }

    #[test]
    fn test_rgb() {
        let mut pm = Pix::new(3, 1, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_rgb(0, 0, 10, 20, 30).unwrap();
        pm.set_rgb(2, 0, 50, 60, 70).unwrap();
        let pix: Pix = pm.into();
        let mask = Pix::from_gray_bytes(3, 1, &[0, 255, 0]).unwrap();
        let opts = InpaintOptions::default()
            .with_init(InpaintInit::Mean)
            .with_iterations(0);
        let out = fast_inpaint(&pix, &mask, &opts).unwrap();
        assert_eq!(out.get_rgb(1, 0), Some((30, 40, 50)));
        assert_eq!(out.get_rgb(0, 0), Some((10, 20, 30)));
    }

    #[test]
    fn test_rgb_with_gray_mask_nearest() {
        let mut pm = Pix::new(3, 1, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_rgb(0, 0, 10, 20, 30).unwrap();
        pm.set_rgb(2, 0, 50, 60, 70).unwrap();
        let pix: Pix = pm.into();
        let mask = Pix::from_gray_bytes(3, 1, &[0, 255, 0]).unwrap();
        let out = fast_inpaint(&pix, &mask, &InpaintOptions::default()).unwrap();
        assert_eq!(out.depth(), PixelDepth::Bit32);
        assert_eq!(out.get_rgb(0, 0), Some((10, 20, 30)));
        assert_eq!(out.get_rgb(2, 0), Some((50, 60, 70)));
        let (r, g, b) = out.get_rgb(1, 0).unwrap();
        assert!((10..=50).contains(&r) && (20..=60).contains(&g) && (30..=70).contains(&b));
    }

    #[test]
    fn test_errors() {
        let pix = synth::uniform_gray(4, 4, 1).unwrap();
        let full = synth::uniform_gray(4, 4, 255).unwrap();
        for init in [InpaintInit::Mean, InpaintInit::NearestL1] {
            let opts = InpaintOptions::default().with_init(init);
            assert!(matches!(
                fast_inpaint(&pix, &full, &opts),
                Err(FilterError::DegenerateMask)
            ));
        }
        let small = synth::uniform_gray(3, 4, 0).unwrap();
        assert!(fast_inpaint(&pix, &small, &InpaintOptions::default()).is_err());
        let rgb_mask = Pix::new(4, 4, PixelDepth::Bit32).unwrap();
        assert!(fast_inpaint(&pix, &rgb_mask, &InpaintOptions::default()).is_err());
    }
}
