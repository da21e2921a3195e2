//! Background isolation for scanned documents
//!
//! Estimates the paper background of a page by removing the ink and
//! inpainting the holes, then optionally divides the page by that estimate
//! to flatten uneven illumination.
//!
//! # Pipeline
//!
//! 1. Sauvola-binarize the gray view of the page (255 = paper).
//! 2. Clean the ink mask: negate, inset by `mask_shrink` (drops specks),
//!    negate, inset by `mask_grow` (widens the ink), negate.
//! 3. Inpaint the page under the ink mask.
//! 4. Gaussian-blur the estimate.
//! 5. Output the estimate, or the page normalized by it; optionally
//!    stretch the result to the full intensity range.

use crate::convolve::gaussian_blur;
use crate::enhance::stretch_contrast;
use crate::inpaint::{InpaintOptions, fast_inpaint};
use crate::sauvola::{SauvolaOptions, sauvola_binarize};
use crate::{FilterError, FilterResult};
use dhimg_core::{Pix, PixelDepth, color};
use dhimg_morph::{MaskOp, apply_mask_ops};
use dhimg_region::DistanceMetric;
use log::debug;

/// Default inset applied to the ink mask to remove small specks
pub const DEFAULT_MASK_SHRINK: f64 = 1.0;
/// Default growth of the ink mask before inpainting
pub const DEFAULT_MASK_GROW: f64 = 5.0;
/// Default Gaussian blur size for the background estimate
pub const DEFAULT_BLUR_SIZE: u32 = 9;
/// Default intensity the background is normalized to (fraction of 255)
pub const DEFAULT_ALPHA: f64 = 0.9;

/// What [`isolate_background`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolateOutput {
    /// The page divided by its background
    #[default]
    Normalized,
    /// The background estimate itself
    Background,
}

/// Parameters of the background isolation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct IsolateOptions {
    /// Binarization used to find the ink
    pub sauvola: SauvolaOptions,
    /// Inpainting of the ink regions
    pub inpaint: InpaintOptions,
    /// L2 inset removing specks from the ink mask
    pub mask_shrink: f64,
    /// L2 growth of the ink mask
    pub mask_grow: f64,
    /// Odd Gaussian blur size; 1 disables blurring
    pub blur_size: u32,
    /// Background intensity after normalization, in [0, 1]
    pub alpha: f64,
    /// Output selection
    pub output: IsolateOutput,
    /// Stretch the output to the full intensity range
    pub adjust_brightness: bool,
    /// Process (and return) the gray view of a color input
    pub input_as_grayscale: bool,
}

impl Default for IsolateOptions {
    fn default() -> Self {
        Self {
            sauvola: SauvolaOptions::default(),
            inpaint: InpaintOptions::default(),
            mask_shrink: DEFAULT_MASK_SHRINK,
            mask_grow: DEFAULT_MASK_GROW,
            blur_size: DEFAULT_BLUR_SIZE,
            alpha: DEFAULT_ALPHA,
            output: IsolateOutput::default(),
            adjust_brightness: false,
            input_as_grayscale: false,
        }
    }
}

impl IsolateOptions {
    /// Check every parameter, including the nested Sauvola options.
    pub fn validate(&self) -> FilterResult<()> {
        self.sauvola.validate()?;
        for (name, d) in [("mask_shrink", self.mask_shrink), ("mask_grow", self.mask_grow)] {
            if !d.is_finite() {
                return Err(FilterError::InvalidParameters(format!(
                    "{name} must be finite, got {d}"
                )));
            }
        }
        if self.blur_size == 0 || self.blur_size % 2 == 0 {
            return Err(FilterError::InvalidParameters(format!(
                "blur size must be an odd positive integer, got {}",
                self.blur_size
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(FilterError::InvalidParameters(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// The mask cleanup chain turning a Sauvola binary into an ink mask.
    pub fn mask_ops(&self) -> Vec<MaskOp> {
        vec![
            MaskOp::Negate,
            MaskOp::Inset {
                distance: self.mask_shrink,
                metric: DistanceMetric::L2,
            },
            MaskOp::Negate,
            MaskOp::Inset {
                distance: self.mask_grow,
                metric: DistanceMetric::L2,
            },
            MaskOp::Negate,
        ]
    }
}

/// Mask of the pixels to inpaint (255 = ink, 0 = paper).
///
/// Color input is reduced to gray first.
pub fn background_mask(pix: &Pix, options: &IsolateOptions) -> FilterResult<Pix> {
    options.validate()?;
    let gray = pix.convert_to_8()?;
    let binary = sauvola_binarize(&gray, &options.sauvola)?;
    debug!("background_mask: cleaning with {:?}", options.mask_ops());
    Ok(apply_mask_ops(&binary, &options.mask_ops())?)
}

/// Estimate the background of a page: inpaint under the ink mask, then
/// blur. The result has the depth of the input.
pub fn estimate_background(pix: &Pix, options: &IsolateOptions) -> FilterResult<Pix> {
    let mask = background_mask(pix, options)?;
    let bg = fast_inpaint(pix, &mask, &options.inpaint)?;
    debug!("estimate_background: blur size {}", options.blur_size);
    gaussian_blur(&bg, options.blur_size)
}

/// Divide a page by its background estimate.
///
/// Each channel becomes `trunc(255 · clamp(alpha · I / B, 0, 1))`. Where
/// the background is 0 the result is 255 if `alpha · I > 0`, else 0.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] if the images differ in size
/// or depth, or `alpha` is outside [0, 1].
pub fn normalize_by_background(pix: &Pix, background: &Pix, alpha: f64) -> FilterResult<Pix> {
    if pix.dimensions() != background.dimensions() || pix.depth() != background.depth() {
        return Err(FilterError::InvalidParameters(format!(
            "background is {}x{} {} bpp, image is {}x{} {} bpp",
            background.width(),
            background.height(),
            background.depth().bits(),
            pix.width(),
            pix.height(),
            pix.depth().bits()
        )));
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(FilterError::InvalidParameters(format!(
            "alpha must be in [0, 1], got {alpha}"
        )));
    }

    let ratio = |i: u8, b: u8| {
        let r = alpha * f64::from(i) / f64::from(b);
        if r.is_nan() {
            0
        } else {
            (255.0 * r.clamp(0.0, 1.0)) as u8
        }
    };

    let mut out = pix.create_template().to_mut();
    for y in 0..pix.height() {
        for x in 0..pix.width() {
            let i = pix.get_pixel_unchecked(x, y);
            let b = background.get_pixel_unchecked(x, y);
            let v = match pix.depth() {
                PixelDepth::Bit8 => u32::from(ratio(i as u8, b as u8)),
                PixelDepth::Bit32 => {
                    let (ir, ig, ib) = color::extract_rgb(i);
                    let (br, bg, bb) = color::extract_rgb(b);
                    color::compose_rgb(ratio(ir, br), ratio(ig, bg), ratio(ib, bb))
                }
            };
            out.set_pixel_unchecked(x, y, v);
        }
    }
    Ok(out.into())
}

/// Run the whole background isolation pipeline.
///
/// # Arguments
///
/// * `pix` - 8 bpp gray or 32 bpp RGB page
/// * `options` - Pipeline parameters
///
/// # Errors
///
/// Parameter errors from [`IsolateOptions::validate`],
/// [`FilterError::DegenerateMask`] when the whole page is taken for ink,
/// and size errors from the Sauvola stage.
pub fn isolate_background(pix: &Pix, options: &IsolateOptions) -> FilterResult<Pix> {
    options.validate()?;
    let page = if options.input_as_grayscale {
        pix.convert_to_8()?
    } else {
        pix.clone()
    };
    debug!(
        "isolate_background: {}x{} {} bpp, output {:?}",
        page.width(),
        page.height(),
        page.depth().bits(),
        options.output
    );

    let bg = estimate_background(&page, options)?;
    let out = match options.output {
        IsolateOutput::Normalized => normalize_by_background(&page, &bg, options.alpha)?,
        IsolateOutput::Background => bg,
    };
    if options.adjust_brightness {
        stretch_contrast(&out)
    } else {
        Ok(out)
    }
}
