//! Convolution operations
//!
//! Floating-point convolution with replicate (clamp) border handling, and
//! the Gaussian blur built on top of it. 8 and 32 bpp images are processed
//! one channel at a time.

use crate::kernel::Kernel;
use crate::{FilterError, FilterResult};
use dhimg_core::{FPix, Pix};

/// Convolve an FPix (floating-point image) with a kernel.
///
/// Each pixel in the output is the weighted sum of the kernel applied to
/// the corresponding neighborhood in the input. Samples outside the image
/// take the value of the nearest edge pixel.
///
/// If `normalize` is true, the kernel values are scaled so that they sum
/// to 1.0 before convolution. A kernel summing to (nearly) zero is used as
/// is.
pub fn fpix_convolve(fpix: &FPix, kernel: &Kernel, normalize: bool) -> FilterResult<FPix> {
    let w = fpix.width() as i64;
    let h = fpix.height() as i64;
    let kw = kernel.width() as i64;
    let kh = kernel.height() as i64;
    let cx = kernel.center_x() as i64;
    let cy = kernel.center_y() as i64;

    let ksum = kernel.sum();
    let scale = if normalize && ksum.abs() >= 1e-6 {
        1.0 / ksum
    } else {
        1.0
    };

    let mut fpixd = FPix::new(w as u32, h as u32)?;
    let kdata = kernel.data();
    let src = fpix.data();

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for ky in 0..kh {
                let sy = (y + ky - cy).clamp(0, h - 1);
                let row = (sy * w) as usize;
                for kx in 0..kw {
                    let sx = (x + kx - cx).clamp(0, w - 1);
                    let kidx = (ky * kw + kx) as usize;
                    sum += src[row + sx as usize] * kdata[kidx];
                }
            }
            fpixd.set_pixel_unchecked(x as u32, y as u32, sum * scale);
        }
    }

    Ok(fpixd)
}

/// Convolve an FPix with a pair of separable 1-D kernels.
///
/// Applies `kernel_x` in the horizontal direction, then `kernel_y` in the
/// vertical direction.
pub fn fpix_convolve_sep(
    fpix: &FPix,
    kernel_x: &Kernel,
    kernel_y: &Kernel,
    normalize: bool,
) -> FilterResult<FPix> {
    let tmp = fpix_convolve(fpix, kernel_x, normalize)?;
    fpix_convolve(&tmp, kernel_y, normalize)
}

/// Convolve every channel of an 8 or 32 bpp image with separable kernels,
/// rounding back to 8 bits.
pub fn convolve_sep(pix: &Pix, kernel_x: &Kernel, kernel_y: &Kernel) -> FilterResult<Pix> {
    let planes = pix
        .split_channels()?
        .iter()
        .map(|plane| {
            let f = FPix::from_pix(plane)?;
            fpix_convolve_sep(&f, kernel_x, kernel_y, false)?
                .to_pix()
                .map_err(FilterError::from)
        })
        .collect::<FilterResult<Vec<_>>>()?;
    Ok(Pix::merge_channels(&planes)?)
}

/// Gaussian blur with a square `size` x `size` window.
///
/// Sigma is derived from the size (see [`crate::kernel::auto_sigma`]);
/// borders replicate the edge pixels. A size of 1 returns the input
/// unchanged.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] unless `size` is odd.
pub fn gaussian_blur(pix: &Pix, size: u32) -> FilterResult<Pix> {
    if size == 0 || size % 2 == 0 {
        return Err(FilterError::InvalidParameters(format!(
            "blur size must be an odd positive integer, got {size}"
        )));
    }
    if size == 1 {
        return Ok(pix.clone());
    }
    let kx = Kernel::gaussian_1d(size, 0.0)?;
    let ky = kx.transpose();
    convolve_sep(pix, &kx, &ky)
}
