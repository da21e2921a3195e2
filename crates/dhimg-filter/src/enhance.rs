//! Contrast stretching

use crate::FilterResult;
use dhimg_core::{Pix, PixelDepth, color};
use log::debug;

/// Linearly map the intensity range of an image onto [0, 255].
///
/// The range is measured on the gray view of the image (luma for RGB) and
/// the same mapping is applied to every channel, clamping the result. An
/// image whose gray view is a single value is returned unchanged.
pub fn stretch_contrast(pix: &Pix) -> FilterResult<Pix> {
    let gray = pix.convert_to_8()?;
    let (mut lo, mut hi) = (255u32, 0u32);
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            let v = gray.get_pixel_unchecked(x, y);
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if lo >= hi {
        return Ok(pix.clone());
    }
    debug!("stretch_contrast: range [{lo}, {hi}]");

    let lo = f64::from(lo);
    let range = f64::from(hi) - lo;
    // Divide last so the maximum lands on 255 exactly
    let map = |v: u8| ((f64::from(v) - lo) * 255.0 / range).clamp(0.0, 255.0) as u8;

    let mut out = pix.create_template().to_mut();
    for y in 0..pix.height() {
        for x in 0..pix.width() {
            let v = pix.get_pixel_unchecked(x, y);
            let mapped = match pix.depth() {
                PixelDepth::Bit8 => u32::from(map(v as u8)),
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(v);
                    color::compose_rgb(map(r), map(g), map(b))
                }
            };
            out.set_pixel_unchecked(x, y, mapped);
        }
    }
    Ok(out.into())
}
