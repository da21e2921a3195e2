//! dhimg-filter - Adaptive thresholding and background estimation
//!
//! This crate provides:
//!
//! - Windowed mean / standard deviation from integral images
//! - Sauvola thresholding (binary, threshold map, variable threshold,
//!   diagnostics, multi-window composites)
//! - Fast harmonic inpainting
//! - Convolution and Gaussian blur
//! - Document background isolation and normalization
//!
//! # Example
//!
//! ```
//! use dhimg_core::{Pix, PixelDepth};
//! use dhimg_filter::{SauvolaOptions, sauvola_binarize};
//!
//! let mut pm = Pix::new(16, 16, PixelDepth::Bit8).unwrap().to_mut();
//! pm.set_all(200);
//! pm.set_pixel(8, 8, 20).unwrap();
//! let page: Pix = pm.into();
//!
//! let binary = sauvola_binarize(&page, &SauvolaOptions::new(5, 0.3)).unwrap();
//! assert_eq!(binary.get_pixel(8, 8), Some(0));
//! assert_eq!(binary.get_pixel(0, 0), Some(255));
//! ```

pub mod background;
pub mod convolve;
pub mod enhance;
mod error;
pub mod inpaint;
pub mod kernel;
pub mod sauvola;
pub mod windowed;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used items
pub use background::{
    IsolateOptions, IsolateOutput, background_mask, estimate_background, isolate_background,
    normalize_by_background,
};
pub use convolve::{convolve_sep, fpix_convolve, fpix_convolve_sep, gaussian_blur};
pub use enhance::stretch_contrast;
pub use inpaint::{InpaintInit, InpaintOptions, fast_inpaint};
pub use sauvola::{
    SauvolaOptions, SauvolaOutput, sauvola, sauvola_binarize, sauvola_multi_window,
    sauvola_pixel_info, sauvola_threshold_map, sauvola_variable_threshold,
};
pub use windowed::{
    Accumulator, AccumulatorWidth, IntegralImage, WindowStats, WindowedStatistics,
};
