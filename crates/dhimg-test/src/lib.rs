//! dhimg-test - Regression test framework for dhimg
//!
//! Every integration test under `crates/*/tests/*_reg.rs` drives a
//! [`RegParams`] instance: comparisons are numbered, failures are collected
//! and reported together by [`RegParams::cleanup`].
//!
//! Inputs are generated rather than loaded from disk; see [`synth`].
//!
//! # Usage
//!
//! ```ignore
//! use dhimg_test::RegParams;
//!
//! let mut rp = RegParams::new("sauvola");
//! rp.compare_values(255.0, value as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "display" to print per-comparison diagnostics

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
pub use synth::SimpleRng;
