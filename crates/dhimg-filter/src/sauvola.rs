//! Sauvola adaptive thresholding
//!
//! Every pixel is compared against a threshold derived from the mean and
//! standard deviation of the window around it:
//!
//! ```text
//! T = t_scale · mean · (1 + k · (stddev / R − 1)) + 255 · bias
//! R = r_scale · 127.5
//! ```
//!
//! Besides the usual binary output, the thresholder can emit the threshold
//! map itself, a "variable threshold" map encoding the smallest `k` that
//! turns each pixel white, or a per-pixel diagnostic color image. The
//! multi-window mode stacks variable threshold maps for up to three window
//! sizes into the R, G and B channels of one image.

use crate::windowed::{
    Accumulator, AccumulatorWidth, WindowStats, WindowedStatistics, check_padded_size,
    check_window_size,
};
use crate::{FilterError, FilterResult};
use dhimg_core::{Pix, PixelDepth, color};
use log::debug;

/// Default window size
pub const DEFAULT_WINDOW_SIZE: u32 = 60;
/// Default Sauvola `k`
pub const DEFAULT_K: f64 = 0.4;
/// Default scale of the dynamic range of the standard deviation
pub const DEFAULT_R_SCALE: f64 = 1.0;
/// Default threshold scale
pub const DEFAULT_T_SCALE: f64 = 1.0;
/// Default threshold bias (fraction of 255)
pub const DEFAULT_BIAS: f64 = 0.0;
/// Dynamic range of the standard deviation of 8-bit values at `r_scale = 1`
pub const HALF_RANGE: f64 = 127.5;

const DEGENERATE_RANGE: f64 = 1e-9;

/// What the thresholder emits for each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SauvolaOutput {
    /// 8 bpp, 255 where the pixel is brighter than its threshold, else 0
    #[default]
    Binary,
    /// 8 bpp threshold map, truncated and clamped to [0, 255]
    Threshold,
    /// 8 bpp map of the lowest `k` (in [0, 1], scaled to [255, 0]) at
    /// which the pixel turns white; requires `r_scale >= 1`
    VariableThreshold,
    /// 32 bpp diagnostics: R = 255 − value, G = 2 · stddev, B = mean
    PixelInfo,
}

/// Sauvola parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SauvolaOptions {
    /// Side of the square window (>= 1)
    pub window_size: u32,
    /// Sensitivity to local contrast (>= 0)
    pub k: f64,
    /// Scale of `R`, the dynamic range of the standard deviation (> 0)
    pub r_scale: f64,
    /// Scale of the whole threshold (> 0)
    pub t_scale: f64,
    /// Offset added to the threshold, as a fraction of 255
    pub bias: f64,
    /// Integral table element type
    pub accumulator: AccumulatorWidth,
}

impl Default for SauvolaOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            k: DEFAULT_K,
            r_scale: DEFAULT_R_SCALE,
            t_scale: DEFAULT_T_SCALE,
            bias: DEFAULT_BIAS,
            accumulator: AccumulatorWidth::default(),
        }
    }
}

impl SauvolaOptions {
    /// Create options with the given window size and `k`, other fields
    /// at their defaults.
    pub fn new(window_size: u32, k: f64) -> Self {
        Self {
            window_size,
            k,
            ..Default::default()
        }
    }

    /// Set the dynamic range scale
    pub fn with_r_scale(mut self, r_scale: f64) -> Self {
        self.r_scale = r_scale;
        self
    }

    /// Set the threshold scale
    pub fn with_t_scale(mut self, t_scale: f64) -> Self {
        self.t_scale = t_scale;
        self
    }

    /// Set the threshold bias (fraction of 255)
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Set the accumulator width
    pub fn with_accumulator(mut self, accumulator: AccumulatorWidth) -> Self {
        self.accumulator = accumulator;
        self
    }

    /// Check every parameter against its allowed range.
    ///
    /// # Errors
    ///
    /// [`FilterError::WindowSizeOutOfRange`] for a window the accumulator
    /// cannot handle, [`FilterError::InvalidParameters`] otherwise.
    pub fn validate(&self) -> FilterResult<()> {
        check_window_size(self.window_size, self.accumulator.max_window_size())?;
        // k and r_scale may be +inf
        if self.k.is_nan() || self.k < 0.0 {
            return Err(FilterError::InvalidParameters(format!(
                "k must be >= 0, got {}",
                self.k
            )));
        }
        if self.r_scale.is_nan() || self.r_scale <= 0.0 {
            return Err(FilterError::InvalidParameters(format!(
                "r_scale must be > 0, got {}",
                self.r_scale
            )));
        }
        if !(self.t_scale.is_finite() && self.t_scale > 0.0) {
            return Err(FilterError::InvalidParameters(format!(
                "t_scale must be finite and > 0, got {}",
                self.t_scale
            )));
        }
        if !self.bias.is_finite() {
            return Err(FilterError::InvalidParameters(format!(
                "bias must be finite, got {}",
                self.bias
            )));
        }
        Ok(())
    }

    /// `R`, the assumed dynamic range of the standard deviation.
    pub fn dynamic_range(&self) -> f64 {
        self.r_scale * HALF_RANGE
    }

    /// Bias in intensity units.
    pub fn real_bias(&self) -> f64 {
        255.0 * self.bias
    }

    /// Threshold for a window with the given statistics.
    pub fn threshold(&self, stats: WindowStats) -> f64 {
        self.t_scale
            * stats.mean
            * (1.0 + self.k * (stats.stddev / self.dynamic_range() - 1.0))
            + self.real_bias()
    }

    fn check_variable(&self) -> FilterResult<()> {
        if self.r_scale < 1.0 {
            return Err(FilterError::InvalidParameters(format!(
                "variable threshold output requires r_scale >= 1, got {}",
                self.r_scale
            )));
        }
        Ok(())
    }
}

/// Threshold an image with the Sauvola method.
///
/// RGB input is converted to gray first.
///
/// # Arguments
///
/// * `pix` - 8 or 32 bpp input
/// * `options` - Sauvola parameters
/// * `output` - Output mode
///
/// # Errors
///
/// Parameter errors are reported before anything is allocated; see
/// [`SauvolaOptions::validate`]. [`FilterError::ImageTooLarge`] if the
/// padded working image would be too large.
pub fn sauvola(pix: &Pix, options: &SauvolaOptions, output: SauvolaOutput) -> FilterResult<Pix> {
    options.validate()?;
    if output == SauvolaOutput::VariableThreshold {
        options.check_variable()?;
    }
    check_padded_size(pix.width(), pix.height(), options.window_size)?;

    debug!(
        "sauvola {:?}: {}x{} window={} k={} r_scale={} t_scale={} bias={}",
        output,
        pix.width(),
        pix.height(),
        options.window_size,
        options.k,
        options.r_scale,
        options.t_scale,
        options.bias
    );

    let gray = pix.convert_to_8()?;
    match options.accumulator {
        AccumulatorWidth::U32 => render(
            &WindowedStatistics::<u32>::new(&gray, options.window_size)?,
            options,
            output,
        ),
        AccumulatorWidth::U64 => render(
            &WindowedStatistics::<u64>::new(&gray, options.window_size)?,
            options,
            output,
        ),
    }
}

/// Binary Sauvola output: 255 for background (bright), 0 for ink.
pub fn sauvola_binarize(pix: &Pix, options: &SauvolaOptions) -> FilterResult<Pix> {
    sauvola(pix, options, SauvolaOutput::Binary)
}

/// Per-pixel Sauvola threshold map.
pub fn sauvola_threshold_map(pix: &Pix, options: &SauvolaOptions) -> FilterResult<Pix> {
    sauvola(pix, options, SauvolaOutput::Threshold)
}

/// Variable threshold map; see [`SauvolaOutput::VariableThreshold`].
pub fn sauvola_variable_threshold(pix: &Pix, options: &SauvolaOptions) -> FilterResult<Pix> {
    sauvola(pix, options, SauvolaOutput::VariableThreshold)
}

/// Diagnostic color image; see [`SauvolaOutput::PixelInfo`].
pub fn sauvola_pixel_info(pix: &Pix, options: &SauvolaOptions) -> FilterResult<Pix> {
    sauvola(pix, options, SauvolaOutput::PixelInfo)
}

/// Variable threshold maps for up to three window sizes, stacked as
/// R (first size), G (second) and B (third).
///
/// Missing sizes repeat the last one given. `options.window_size` is
/// ignored; every size is validated, and the largest decides whether the
/// padded image fits.
///
/// # Errors
///
/// [`FilterError::InvalidParameters`] unless 1 to 3 sizes are given, plus
/// everything [`sauvola`] reports.
pub fn sauvola_multi_window(
    pix: &Pix,
    options: &SauvolaOptions,
    window_sizes: &[u32],
) -> FilterResult<Pix> {
    let Some(&last) = window_sizes.last() else {
        return Err(FilterError::InvalidParameters(
            "at least one window size is required".into(),
        ));
    };
    if window_sizes.len() > 3 {
        return Err(FilterError::InvalidParameters(format!(
            "at most 3 window sizes are allowed, got {}",
            window_sizes.len()
        )));
    }

    let mut sizes = [last; 3];
    sizes[..window_sizes.len()].copy_from_slice(window_sizes);
    let max_size = sizes.iter().copied().max().unwrap_or(last);

    let base = SauvolaOptions {
        window_size: max_size,
        ..options.clone()
    };
    base.validate()?;
    base.check_variable()?;
    for &ws in &sizes {
        check_window_size(ws, base.accumulator.max_window_size())?;
    }
    check_padded_size(pix.width(), pix.height(), max_size)?;

    debug!(
        "sauvola multi-window: {}x{} windows={:?}",
        pix.width(),
        pix.height(),
        sizes
    );

    let mut planes: Vec<Pix> = Vec::with_capacity(3);
    for (i, &ws) in sizes.iter().enumerate() {
        // Repeated sizes reuse the previous plane
        if let Some(j) = sizes[..i].iter().position(|&s| s == ws) {
            let same: Pix = planes[j].clone();
            planes.push(same);
            continue;
        }
        let opts = SauvolaOptions {
            window_size: ws,
            ..base.clone()
        };
        planes.push(sauvola(pix, &opts, SauvolaOutput::VariableThreshold)?);
    }
    Ok(Pix::create_rgb_image(&planes[0], &planes[1], &planes[2])?)
}

fn render<A: Accumulator>(
    stats: &WindowedStatistics<A>,
    options: &SauvolaOptions,
    output: SauvolaOutput,
) -> FilterResult<Pix> {
    let w = stats.width();
    let h = stats.height();
    let depth = match output {
        SauvolaOutput::PixelInfo => PixelDepth::Bit32,
        _ => PixelDepth::Bit8,
    };
    let mut out = Pix::new(w, h, depth)?.to_mut();

    for y in 0..h {
        for x in 0..w {
            let s = stats.stats(x, y);
            let v = stats.source(x, y);
            let val = match output {
                SauvolaOutput::Binary => {
                    let t = options.threshold(s) as i64;
                    if i64::from(v) > t { 255 } else { 0 }
                }
                SauvolaOutput::Threshold => (options.threshold(s) as i64).clamp(0, 255) as u32,
                SauvolaOutput::VariableThreshold => variable_threshold(options, s, v),
                SauvolaOutput::PixelInfo => color::compose_rgb(
                    (255 - v) as u8,
                    saturate(2.0 * s.stddev),
                    saturate(s.mean),
                ),
            };
            out.set_pixel_unchecked(x, y, val);
        }
    }
    Ok(out.into())
}

/// Position of `v` between the thresholds at `k = 1` (`th0`) and `k = 0`
/// (`th1`), mapped to [0, 255].
fn variable_threshold(options: &SauvolaOptions, s: WindowStats, v: u32) -> u32 {
    let bias = options.real_bias();
    let th1 = options.t_scale * s.mean + bias;
    let th0 = options.t_scale * s.mean * (s.stddev / options.dynamic_range()) + bias;
    let v = f64::from(v);
    let range = th1 - th0;
    if range < DEGENERATE_RANGE {
        return if v >= th1 { 255 } else { 0 };
    }
    let t = v.clamp(th0, th1);
    u32::from(saturate(255.0 * (t - th0) / range))
}

/// Truncate to an 8-bit value, saturating at both ends.
#[inline]
fn saturate(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhimg_test::synth;

    #[test]
    fn test_defaults() {
        let o = SauvolaOptions::default();
        assert_eq!(o.window_size, 60);
        assert_eq!(o.k, 0.4);
        assert_eq!(o.dynamic_range(), 127.5);
        assert!(o.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(SauvolaOptions::new(15, -0.1).validate().is_err());
        assert!(SauvolaOptions::new(15, f64::NAN).validate().is_err());
        assert!(SauvolaOptions::new(15, 0.2).with_r_scale(0.0).validate().is_err());
        assert!(SauvolaOptions::new(15, 0.2).with_r_scale(f64::NAN).validate().is_err());
        assert!(SauvolaOptions::new(15, f64::INFINITY).validate().is_ok());
        assert!(SauvolaOptions::new(15, 0.2).with_r_scale(f64::INFINITY).validate().is_ok());
        assert!(SauvolaOptions::new(15, 0.2).with_t_scale(f64::INFINITY).validate().is_err());
        assert!(SauvolaOptions::new(15, 0.2).with_t_scale(-1.0).validate().is_err());
        assert!(SauvolaOptions::new(15, 0.2).with_bias(f64::INFINITY).validate().is_err());
        assert!(matches!(
            SauvolaOptions::new(0, 0.2).validate(),
            Err(FilterError::WindowSizeOutOfRange { .. })
        ));
        assert!(matches!(
            SauvolaOptions::new(300, 0.2)
                .with_accumulator(AccumulatorWidth::U32)
                .validate(),
            Err(FilterError::WindowSizeOutOfRange { size: 300, max: 257 })
        ));
    }

    #[test]
    fn test_threshold_formula() {
        let o = SauvolaOptions::new(3, 0.5).with_bias(0.1);
        let s = WindowStats {
            mean: 100.0,
            stddev: 63.75,
        };
        // 100 * (1 + 0.5 * (0.5 - 1)) + 25.5
        assert!((o.threshold(s) - 100.5).abs() < 1e-12);
    }

    #[test]
    fn test_flat_image_is_all_background() {
        // stddev 0: T = 0.6 * 128 = 76.8
        let pix = synth::uniform_gray(8, 8, 128).unwrap();
        let out = sauvola_binarize(&pix, &SauvolaOptions::new(3, 0.4)).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(out.get_pixel(x, y), Some(255));
            }
        }
    }

    #[test]
    fn test_k_zero_is_local_mean_threshold() {
        let pix = synth::random_gray(12, 10, 5).unwrap();
        let o = SauvolaOptions::new(5, 0.0);
        let out = sauvola_binarize(&pix, &o).unwrap();
        let stats = WindowedStatistics::<u64>::new(&pix, 5).unwrap();
        for y in 0..10 {
            for x in 0..12 {
                let mean = stats.stats(x, y).mean as i64;
                let v = i64::from(pix.get_pixel_unchecked(x, y));
                let want = if v > mean { 255 } else { 0 };
                assert_eq!(out.get_pixel(x, y), Some(want));
            }
        }
    }

    #[test]
    fn test_threshold_map_on_flat_image() {
        let pix = synth::uniform_gray(6, 6, 200).unwrap();
        let out = sauvola_threshold_map(&pix, &SauvolaOptions::new(5, 0.5)).unwrap();
        // 200 * (1 - 0.5) = 100
        assert_eq!(out.get_pixel(3, 3), Some(100));
    }

    #[test]
    fn test_variable_threshold_flat() {
        let pix = synth::uniform_gray(6, 6, 128).unwrap();
        let out = sauvola_variable_threshold(&pix, &SauvolaOptions::new(3, 0.4)).unwrap();
        // stddev 0: th0 = 0, th1 = 128, v = th1
        assert_eq!(out.get_pixel(2, 2), Some(255));

        let black = synth::uniform_gray(4, 4, 0).unwrap();
        let out = sauvola_variable_threshold(&black, &SauvolaOptions::new(3, 0.4)).unwrap();
        assert_eq!(out.get_pixel(1, 1), Some(255));
    }

    #[test]
    fn test_variable_threshold_requires_r_scale() {
        let pix = synth::uniform_gray(4, 4, 10).unwrap();
        let o = SauvolaOptions::new(3, 0.4).with_r_scale(0.5);
        assert!(sauvola_variable_threshold(&pix, &o).is_err());
        assert!(sauvola_binarize(&pix, &o).is_ok());
    }

    #[test]
    fn test_pixel_info() {
        let pix = synth::uniform_gray(4, 4, 40).unwrap();
        let out = sauvola_pixel_info(&pix, &SauvolaOptions::new(3, 0.4)).unwrap();
        assert_eq!(out.depth(), PixelDepth::Bit32);
        assert_eq!(out.get_rgb(1, 1), Some((215, 0, 40)));
    }

    #[test]
    fn test_rgb_input_uses_luma() {
        let gray = synth::gray_page(40, 30).unwrap();
        let rgb = gray.convert_8_to_32().unwrap();
        let o = SauvolaOptions::new(7, 0.3);
        let a = sauvola_binarize(&gray, &o).unwrap();
        let b = sauvola_binarize(&rgb, &o).unwrap();
        for y in 0..30 {
            for x in 0..40 {
                assert_eq!(a.get_pixel(x, y), b.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_accumulators_agree() {
        let pix = synth::random_gray(20, 15, 11).unwrap();
        let o = SauvolaOptions::new(9, 0.3);
        let a = sauvola_threshold_map(&pix, &o).unwrap();
        let narrow = o.clone().with_accumulator(AccumulatorWidth::U32);
        let b = sauvola_threshold_map(&pix, &narrow).unwrap();
        for y in 0..15 {
            for x in 0..20 {
                assert_eq!(a.get_pixel(x, y), b.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_multi_window_single_size() {
        let pix = synth::random_gray(16, 12, 8).unwrap();
        let o = SauvolaOptions::new(60, 0.4);
        let multi = sauvola_multi_window(&pix, &o, &[5]).unwrap();
        let single = sauvola_variable_threshold(&pix, &SauvolaOptions::new(5, 0.4)).unwrap();
        for y in 0..12 {
            for x in 0..16 {
                let v = single.get_pixel_unchecked(x, y) as u8;
                assert_eq!(multi.get_rgb(x, y), Some((v, v, v)));
            }
        }
    }

    #[test]
    fn test_multi_window_channel_order() {
        let pix = synth::random_gray(16, 12, 21).unwrap();
        let o = SauvolaOptions::default();
        let multi = sauvola_multi_window(&pix, &o, &[3, 7]).unwrap();
        let w3 = sauvola_variable_threshold(&pix, &SauvolaOptions::new(3, 0.4)).unwrap();
        let w7 = sauvola_variable_threshold(&pix, &SauvolaOptions::new(7, 0.4)).unwrap();
        for y in 0..12 {
            for x in 0..16 {
                let (r, g, b) = multi.get_rgb(x, y).unwrap();
                assert_eq!(u32::from(r), w3.get_pixel_unchecked(x, y));
                assert_eq!(u32::from(g), w7.get_pixel_unchecked(x, y));
                assert_eq!(u32::from(b), w7.get_pixel_unchecked(x, y));
            }
        }
    }

    #[test]
    fn test_multi_window_errors() {
        let pix = synth::uniform_gray(4, 4, 1).unwrap();
        let o = SauvolaOptions::default();
        assert!(sauvola_multi_window(&pix, &o, &[]).is_err());
        assert!(sauvola_multi_window(&pix, &o, &[1, 2, 3, 4]).is_err());
        assert!(sauvola_multi_window(&pix, &o, &[3, 0]).is_err());
    }
}
