//! dhimg - Document image binarization and background isolation
//!
//! Adaptive (Sauvola) thresholding over integral images, mask morphology
//! driven by exact distance transforms, fast harmonic inpainting, and a
//! background isolation pipeline that flattens unevenly lit page scans.
//!
//! # Overview
//!
//! - [`filter::windowed`] - O(1) windowed mean and standard deviation
//! - [`filter::sauvola`] - Sauvola binarization and its diagnostic outputs
//! - [`morph`] - Mask negate / inset / outset / border fill and sequences
//! - [`filter::inpaint`] - Diffusion inpainting under a mask
//! - [`filter::background`] - Background estimation and normalization
//!
//! # Example
//!
//! ```
//! use dhimg::filter::{IsolateOptions, IsolateOutput, SauvolaOptions, isolate_background};
//! use dhimg::{Pix, PixelDepth};
//!
//! let mut pm = Pix::new(32, 24, PixelDepth::Bit8).unwrap().to_mut();
//! pm.set_all(180);
//! let page: Pix = pm.into();
//!
//! let options = IsolateOptions {
//!     sauvola: SauvolaOptions::new(7, 0.4),
//!     output: IsolateOutput::Background,
//!     ..Default::default()
//! };
//! let background = isolate_background(&page, &options).unwrap();
//! assert_eq!(background.get_pixel(16, 12), Some(180));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use dhimg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use dhimg_filter as filter;
pub use dhimg_morph as morph;
pub use dhimg_region as region;
