//! dhimg-morph - Mask morphology for dhimg
//!
//! Masks are 8 bpp images where 255 marks the inside and 0 the outside.
//! This crate provides:
//!
//! - **Basic operations** - negate, inset (shrink), outset (grow) and
//!   border fill, see [`mask`]
//! - **Sequences** - string-driven chains of those operations, see
//!   [`sequence`]
//!
//! Inset and outset are distance-transform thresholds, so a shrink by
//! `d` removes exactly the pixels within distance `d` of the outside under
//! the chosen metric.
//!
//! # Examples
//!
//! ```
//! use dhimg_core::{Pix, PixelDepth};
//! use dhimg_morph::{mask_sequence, outset};
//! use dhimg_region::DistanceMetric;
//!
//! let mut pm = Pix::new(20, 20, PixelDepth::Bit8).unwrap().to_mut();
//! pm.set_pixel(10, 10, 255).unwrap();
//! let mask: Pix = pm.into();
//!
//! let grown = outset(&mask, 2.0, DistanceMetric::L2).unwrap();
//! assert_eq!(grown.get_pixel(12, 10), Some(255));
//! assert_eq!(grown.get_pixel(12, 12), Some(0));
//!
//! let round_trip = mask_sequence(&mask, "o2 + i2").unwrap();
//! assert_eq!(round_trip.get_pixel(10, 10), Some(255));
//! ```

pub mod error;
pub mod mask;
pub mod sequence;

pub use error::{MorphError, MorphResult};
pub use mask::{
    border_fill, inset, inset_with_boundary, negate, normalize_mask, outset,
    outset_with_boundary,
};
pub use sequence::{MaskOp, MaskSequence, apply_mask_ops, mask_sequence};
