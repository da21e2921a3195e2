//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while preparing regression test inputs
#[derive(Debug, Error)]
pub enum TestError {
    /// Building a synthetic image failed
    #[error("failed to build synthetic image '{name}': {source}")]
    Synth {
        name: &'static str,
        #[source]
        source: dhimg_core::Error,
    },

    /// Invalid generator parameters
    #[error("invalid synthetic image parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
