//! Basic mask operations
//!
//! Every operation first normalizes its input (any non-zero value becomes
//! 255) and always returns a mask containing only 0 and 255. The input is
//! never modified.
//!
//! A negative distance turns an inset into an outset of the same magnitude
//! and vice versa.

use crate::error::{MorphError, MorphResult};
use dhimg_core::{Pix, PixelDepth};
use dhimg_region::{
    BoundaryCondition, ConnectivityType, DistanceMetric, clear_border, distance_transform,
};

fn check_mask(mask: &Pix) -> MorphResult<()> {
    if mask.depth() != PixelDepth::Bit8 {
        return Err(MorphError::UnsupportedDepth {
            expected: "8-bit",
            actual: mask.depth().bits(),
        });
    }
    Ok(())
}

fn check_distance(distance: f64) -> MorphResult<()> {
    if !distance.is_finite() {
        return Err(MorphError::InvalidParameters(format!(
            "distance must be finite, got {distance}"
        )));
    }
    Ok(())
}

/// Map an 8 bpp image to a {0, 255} mask: non-zero becomes 255.
///
/// # Errors
///
/// Returns [`MorphError::UnsupportedDepth`] if the image is not 8 bpp.
pub fn normalize_mask(mask: &Pix) -> MorphResult<Pix> {
    map_mask(mask, |v| v != 0)
}

/// Complement of a mask.
pub fn negate(mask: &Pix) -> MorphResult<Pix> {
    map_mask(mask, |v| v == 0)
}

fn map_mask(mask: &Pix, inside: impl Fn(u32) -> bool) -> MorphResult<Pix> {
    check_mask(mask)?;
    let mut out = mask.create_template().to_mut();
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if inside(mask.get_pixel_unchecked(x, y)) {
                out.set_pixel_unchecked(x, y, 255);
            }
        }
    }
    Ok(out.into())
}

/// Shrink a mask by `distance`.
///
/// Pixels whose distance to the nearest outside pixel is at most `distance`
/// are cleared. Pixels outside the image do not count as outside; see
/// [`inset_with_boundary`] to change that.
///
/// # Arguments
///
/// * `mask` - 8 bpp mask
/// * `distance` - Shrink distance; negative values grow the mask instead
/// * `metric` - Distance metric
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] for a non-finite distance.
pub fn inset(mask: &Pix, distance: f64, metric: DistanceMetric) -> MorphResult<Pix> {
    inset_with_boundary(mask, distance, metric, BoundaryCondition::Foreground)
}

/// Grow a mask by `distance` (negate, inset, negate).
pub fn outset(mask: &Pix, distance: f64, metric: DistanceMetric) -> MorphResult<Pix> {
    outset_with_boundary(mask, distance, metric, BoundaryCondition::Foreground)
}

/// [`inset`] with explicit treatment of the pixels outside the image.
///
/// With [`BoundaryCondition::Background`] the image edge acts as outside,
/// so a solid mask loses a band of width `distance` along every edge.
pub fn inset_with_boundary(
    mask: &Pix,
    distance: f64,
    metric: DistanceMetric,
    boundary: BoundaryCondition,
) -> MorphResult<Pix> {
    check_mask(mask)?;
    check_distance(distance)?;
    if distance < 0.0 {
        return outset_with_boundary(mask, -distance, metric, boundary);
    }

    let field = distance_transform(mask, metric, boundary)?;
    let mut out = mask.create_template().to_mut();
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if f64::from(field.get_pixel_unchecked(x, y)) > distance {
                out.set_pixel_unchecked(x, y, 255);
            }
        }
    }
    Ok(out.into())
}

/// [`outset`] with explicit boundary treatment.
///
/// The boundary condition applies to the inset of the negated mask.
pub fn outset_with_boundary(
    mask: &Pix,
    distance: f64,
    metric: DistanceMetric,
    boundary: BoundaryCondition,
) -> MorphResult<Pix> {
    check_distance(distance)?;
    if distance < 0.0 {
        return inset_with_boundary(mask, -distance, metric, boundary);
    }
    let inverted = negate(mask)?;
    let shrunk = inset_with_boundary(&inverted, distance, metric, boundary)?;
    negate(&shrunk)
}

/// Clear every 4-connected inside region that touches the image border.
pub fn border_fill(mask: &Pix) -> MorphResult<Pix> {
    let normalized = normalize_mask(mask)?;
    Ok(clear_border(&normalized, ConnectivityType::FourWay)?)
}
