//! Error types for dhimg-filter
//!
//! Parameter problems are reported before any buffer is allocated.

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] dhimg_core::Error),

    /// Region (distance transform / flood fill) error
    #[error("region error: {0}")]
    Region(#[from] dhimg_region::RegionError),

    /// Mask operation error
    #[error("mask error: {0}")]
    Morph(#[from] dhimg_morph::MorphError),

    /// Invalid kernel
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth {
        /// Expected depth description
        expected: &'static str,
        /// Actual depth in bits
        actual: u32,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The padded working image would not be addressable
    #[error("image too large: {width}x{height} padded by {padding} exceeds {limit} pixels")]
    ImageTooLarge {
        /// Source width
        width: u32,
        /// Source height
        height: u32,
        /// Total padding per axis
        padding: u32,
        /// Maximum number of padded pixels
        limit: u64,
    },

    /// Window too large for the accumulator to hold exact window totals
    #[error("window size {size} out of range (1..={max})")]
    WindowSizeOutOfRange {
        /// Requested window size
        size: u32,
        /// Largest size the accumulator supports
        max: u32,
    },

    /// Inpainting mask leaves no known pixel to start from
    #[error("mask covers the whole image: no unmasked pixel to inpaint from")]
    DegenerateMask,
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
