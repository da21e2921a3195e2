//! Depth conversion
//!
//! Gray conversion of RGB uses the ITU-R BT.601 luma weights with rounding.

use super::{Pix, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

/// Red weight for luma conversion
pub const RED_WEIGHT: f32 = 0.299;
/// Green weight for luma conversion
pub const GREEN_WEIGHT: f32 = 0.587;
/// Blue weight for luma conversion
pub const BLUE_WEIGHT: f32 = 0.114;

impl Pix {
    /// Convert 32 bpp RGB to 8 bpp luma.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the image is not 32 bpp.
    pub fn convert_rgb_to_gray(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }

        let w = self.width();
        let h = self.height();
        let mut pm = Pix::new(w, h, PixelDepth::Bit8)?.to_mut();
        for y in 0..h {
            for x in 0..w {
                let (r, g, b) = color::extract_rgb(self.get_pixel_unchecked(x, y));
                let gray = RED_WEIGHT * f32::from(r)
                    + GREEN_WEIGHT * f32::from(g)
                    + BLUE_WEIGHT * f32::from(b)
                    + 0.5;
                pm.set_pixel_unchecked(x, y, (gray as u32).min(255));
            }
        }
        Ok(pm.into())
    }

    /// Return an 8 bpp view of the image: a shared clone for gray input,
    /// luma for RGB.
    pub fn convert_to_8(&self) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit8 => Ok(self.clone()),
            PixelDepth::Bit32 => self.convert_rgb_to_gray(),
        }
    }

    /// Expand 8 bpp gray to 32 bpp RGB with equal channels.
    pub fn convert_8_to_32(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit8 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let mut pm = Pix::new(self.width(), self.height(), PixelDepth::Bit32)?.to_mut();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let v = self.get_pixel_unchecked(x, y) as u8;
                pm.set_pixel_unchecked(x, y, color::compose_rgb(v, v, v));
            }
        }
        Ok(pm.into())
    }
}
