//! Error types for dhimg-morph

use thiserror::Error;

/// Errors that can occur during mask operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] dhimg_core::Error),

    /// Region (distance transform / flood fill) error
    #[error("region error: {0}")]
    Region(#[from] dhimg_region::RegionError),

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth { expected: &'static str, actual: u32 },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Invalid sequence format
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),
}

/// Result type for mask operations
pub type MorphResult<T> = Result<T, MorphError>;
