//! Mask operation sequences
//!
//! Chains of mask operations specified as strings, so a whole cleanup
//! recipe can be stored or passed around as one value.
//!
//! # Sequence String Format
//!
//! Operations are separated by `+` and whitespace is ignored.
//!
//! - `n` - Negate
//! - `B` (or `b`) - Border fill: clear regions touching the image edge
//! - `i<d>` - Inset by `d` using the L2 metric
//! - `I<d>` - Inset by `d` using the L1 metric
//! - `o<d>` - Outset by `d` using the L2 metric
//! - `O<d>` - Outset by `d` using the L1 metric
//!
//! `d` is a decimal number and may be negative, in which case the inset
//! becomes an outset and the other way around.
//!
//! # Examples
//!
//! ```
//! use dhimg_morph::sequence::MaskSequence;
//!
//! let seq = MaskSequence::parse("n + i1.5 + O2 + B").unwrap();
//! assert_eq!(seq.ops().len(), 4);
//! ```

use crate::mask::{border_fill, inset, negate, outset};
use crate::{MorphError, MorphResult};
use dhimg_core::Pix;
use dhimg_region::DistanceMetric;
use log::trace;

/// A parsed mask operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskOp {
    /// Complement the mask
    Negate,
    /// Clear regions connected to the image border
    BorderFill,
    /// Shrink the mask
    Inset {
        /// Shrink distance (negative grows)
        distance: f64,
        /// Distance metric
        metric: DistanceMetric,
    },
    /// Grow the mask
    Outset {
        /// Grow distance (negative shrinks)
        distance: f64,
        /// Distance metric
        metric: DistanceMetric,
    },
}

impl MaskOp {
    /// Apply this operation to a mask, returning a new mask.
    pub fn apply(&self, mask: &Pix) -> MorphResult<Pix> {
        match *self {
            MaskOp::Negate => negate(mask),
            MaskOp::BorderFill => border_fill(mask),
            MaskOp::Inset { distance, metric } => inset(mask, distance, metric),
            MaskOp::Outset { distance, metric } => outset(mask, distance, metric),
        }
    }
}

/// A parsed mask operation sequence
#[derive(Debug, Clone, PartialEq)]
pub struct MaskSequence {
    ops: Vec<MaskOp>,
}

impl MaskSequence {
    /// Parse a sequence string into a `MaskSequence`
    ///
    /// # Arguments
    ///
    /// * `sequence` - The sequence string (e.g., "n + i3 + n")
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSequence`] for empty sequences, unknown
    /// operations and malformed or non-finite distances.
    pub fn parse(sequence: &str) -> MorphResult<Self> {
        if sequence.trim().is_empty() {
            return Err(MorphError::InvalidSequence("empty sequence".to_string()));
        }

        let ops = sequence
            .split('+')
            .enumerate()
            .map(|(i, part)| {
                let op_str: String = part.chars().filter(|c| !c.is_whitespace()).collect();
                if op_str.is_empty() {
                    return Err(MorphError::InvalidSequence(format!(
                        "empty operation at position {}",
                        i + 1
                    )));
                }
                Self::parse_operation(&op_str)
            })
            .collect::<MorphResult<Vec<_>>>()?;

        Ok(MaskSequence { ops })
    }

    /// Parse a single operation string (whitespace already removed)
    fn parse_operation(op_str: &str) -> MorphResult<MaskOp> {
        let mut chars = op_str.chars();
        let Some(first_char) = chars.next() else {
            return Err(MorphError::InvalidSequence("empty operation".to_string()));
        };
        let rest = chars.as_str();

        match first_char {
            'n' | 'B' | 'b' => {
                if !rest.is_empty() {
                    return Err(MorphError::InvalidSequence(format!(
                        "operation '{first_char}' takes no argument: '{op_str}'"
                    )));
                }
                Ok(if first_char == 'n' {
                    MaskOp::Negate
                } else {
                    MaskOp::BorderFill
                })
            }
            'i' | 'I' | 'o' | 'O' => {
                let distance = Self::parse_distance(rest, op_str)?;
                let metric = if first_char.is_ascii_uppercase() {
                    DistanceMetric::L1
                } else {
                    DistanceMetric::L2
                };
                Ok(if first_char.eq_ignore_ascii_case(&'i') {
                    MaskOp::Inset { distance, metric }
                } else {
                    MaskOp::Outset { distance, metric }
                })
            }
            _ => Err(MorphError::InvalidSequence(format!(
                "unknown operation '{first_char}' in '{op_str}'"
            ))),
        }
    }

    fn parse_distance(s: &str, op_str: &str) -> MorphResult<f64> {
        let distance: f64 = s.parse().map_err(|_| {
            MorphError::InvalidSequence(format!("invalid distance '{s}' in '{op_str}'"))
        })?;
        if !distance.is_finite() {
            return Err(MorphError::InvalidSequence(format!(
                "distance must be finite in '{op_str}'"
            )));
        }
        Ok(distance)
    }

    /// Build a sequence from already-constructed operations.
    pub fn from_ops(ops: Vec<MaskOp>) -> Self {
        MaskSequence { ops }
    }

    /// Get the operations in this sequence
    pub fn ops(&self) -> &[MaskOp] {
        &self.ops
    }

    /// Execute the sequence on a mask
    pub fn execute(&self, mask: &Pix) -> MorphResult<Pix> {
        apply_mask_ops(mask, &self.ops)
    }
}

/// Apply mask operations in order.
///
/// An empty list returns the normalized input.
pub fn apply_mask_ops(mask: &Pix, ops: &[MaskOp]) -> MorphResult<Pix> {
    let mut current = crate::mask::normalize_mask(mask)?;
    for (i, op) in ops.iter().enumerate() {
        trace!("mask op {}: {:?}", i + 1, op);
        current = op.apply(&current)?;
    }
    Ok(current)
}

/// Parse `sequence` and execute it on `mask`.
pub fn mask_sequence(mask: &Pix, sequence: &str) -> MorphResult<Pix> {
    MaskSequence::parse(sequence)?.execute(mask)
}
