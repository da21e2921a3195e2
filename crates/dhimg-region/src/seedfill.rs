//! Seed fill operations
//!
//! Flood fill over 8 bpp images and the removal of regions connected to the
//! image border.

use crate::error::{RegionError, RegionResult};
use dhimg_core::{Pix, PixMut, PixelDepth};
use std::collections::VecDeque;

/// Pixel connectivity used when growing a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// Horizontal and vertical neighbours only
    #[default]
    FourWay,
    /// Also diagonal neighbours
    EightWay,
}

fn check_gray(pix_depth: PixelDepth) -> RegionResult<()> {
    if pix_depth != PixelDepth::Bit8 {
        return Err(RegionError::UnsupportedDepth {
            expected: "8-bit",
            actual: pix_depth.bits(),
        });
    }
    Ok(())
}

/// Flood fill an 8 bpp image starting from a seed point
///
/// Replaces the connected region of pixels that share the seed's value with
/// `new_value`. Modifies the image in place.
///
/// # Arguments
///
/// * `pix` - Mutable 8 bpp image
/// * `seed_x` - X coordinate of the seed point
/// * `seed_y` - Y coordinate of the seed point
/// * `new_value` - Value to fill with (low byte is used)
/// * `connectivity` - Connectivity type
///
/// # Returns
///
/// The number of pixels that were filled.
///
/// # Errors
///
/// Returns an error if the seed position is out of bounds or the image is
/// not 8 bpp.
pub fn floodfill(
    pix: &mut PixMut,
    seed_x: u32,
    seed_y: u32,
    new_value: u32,
    connectivity: ConnectivityType,
) -> RegionResult<u32> {
    check_gray(pix.depth())?;

    let width = pix.width();
    let height = pix.height();
    let Some(old_value) = pix.get_pixel(seed_x, seed_y) else {
        return Err(RegionError::InvalidSeed {
            x: seed_x,
            y: seed_y,
        });
    };
    let new_value = new_value & 0xff;

    if old_value == new_value {
        return Ok(0);
    }

    let mut filled_count = 0u32;
    let mut queue = VecDeque::new();
    pix.set_pixel_unchecked(seed_x, seed_y, new_value);
    queue.push_back((seed_x, seed_y));

    while let Some((x, y)) = queue.pop_front() {
        filled_count += 1;

        let x0 = x.saturating_sub(1);
        let x1 = (x + 1).min(width - 1);
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(height - 1);
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                let diagonal = nx != x && ny != y;
                if (nx == x && ny == y)
                    || (diagonal && connectivity == ConnectivityType::FourWay)
                {
                    continue;
                }
                // Mark on push so each pixel is queued once
                if pix.get_pixel_unchecked(nx, ny) == old_value {
                    pix.set_pixel_unchecked(nx, ny, new_value);
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    Ok(filled_count)
}

/// Clear pixels connected to the border
///
/// Every non-zero region touching the image border is flood-filled with 0.
///
/// # Arguments
///
/// * `pix` - Input 8 bpp image
/// * `connectivity` - Connectivity type
///
/// # Returns
///
/// A new image with border-connected regions removed.
pub fn clear_border(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Pix> {
    check_gray(pix.depth())?;

    let width = pix.width();
    let height = pix.height();
    let mut result = pix.to_mut();

    let border = (0..width)
        .flat_map(|x| [(x, 0), (x, height - 1)])
        .chain((0..height).flat_map(|y| [(0, y), (width - 1, y)]));
    for (x, y) in border {
        if result.get_pixel_unchecked(x, y) != 0 {
            floodfill(&mut result, x, y, 0, connectivity)?;
        }
    }

    Ok(result.into())
}
