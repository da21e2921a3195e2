//! RGB component operations
//!
//! Splitting a 32 bpp image into 8 bpp planes and merging them back. Every
//! per-channel stage (inpainting, blurring, normalization) goes through
//! these two functions.

use super::{Pix, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

/// Color component selector for RGB channel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbComponent {
    /// Red channel (bits 24-31)
    Red,
    /// Green channel (bits 16-23)
    Green,
    /// Blue channel (bits 8-15)
    Blue,
}

impl RgbComponent {
    /// The three components in storage order.
    pub const ALL: [RgbComponent; 3] = [RgbComponent::Red, RgbComponent::Green, RgbComponent::Blue];

    fn shift(self) -> u32 {
        match self {
            RgbComponent::Red => color::RED_SHIFT,
            RgbComponent::Green => color::GREEN_SHIFT,
            RgbComponent::Blue => color::BLUE_SHIFT,
        }
    }
}

impl Pix {
    /// Extract a single color component as an 8 bpp grayscale image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the image is not 32 bpp.
    pub fn get_rgb_component(&self, comp: RgbComponent) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let shift = comp.shift();
        let mut pm = Pix::new(self.width(), self.height(), PixelDepth::Bit8)?.to_mut();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let val = (self.get_pixel_unchecked(x, y) >> shift) & 0xff;
                pm.set_pixel_unchecked(x, y, val);
            }
        }
        Ok(pm.into())
    }

    /// Split an image into its 8 bpp planes: one for gray, three (R, G, B)
    /// for RGB.
    pub fn split_channels(&self) -> Result<Vec<Pix>> {
        match self.depth() {
            PixelDepth::Bit8 => Ok(vec![self.clone()]),
            PixelDepth::Bit32 => RgbComponent::ALL
                .iter()
                .map(|&c| self.get_rgb_component(c))
                .collect(),
        }
    }

    /// Inverse of [`Pix::split_channels`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless exactly 1 or 3 planes are
    /// given.
    pub fn merge_channels(planes: &[Pix]) -> Result<Pix> {
        match planes {
            [gray] => {
                if gray.depth() != PixelDepth::Bit8 {
                    return Err(Error::UnsupportedDepth(gray.depth().bits()));
                }
                Ok(gray.clone())
            }
            [r, g, b] => Pix::create_rgb_image(r, g, b),
            _ => Err(Error::InvalidParameter(format!(
                "expected 1 or 3 channel planes, got {}",
                planes.len()
            ))),
        }
    }

    /// Create a 32 bpp RGB image from three 8 bpp component images.
    ///
    /// All three images must have the same dimensions.
    pub fn create_rgb_image(pix_r: &Pix, pix_g: &Pix, pix_b: &Pix) -> Result<Pix> {
        for p in [pix_r, pix_g, pix_b] {
            if p.depth() != PixelDepth::Bit8 {
                return Err(Error::UnsupportedDepth(p.depth().bits()));
            }
        }

        let w = pix_r.width();
        let h = pix_r.height();
        for p in [pix_g, pix_b] {
            if p.width() != w || p.height() != h {
                return Err(Error::DimensionMismatch {
                    expected: (w, h),
                    actual: (p.width(), p.height()),
                });
            }
        }

        let mut pm = Pix::new(w, h, PixelDepth::Bit32)?.to_mut();
        for y in 0..h {
            for x in 0..w {
                let r = pix_r.get_pixel_unchecked(x, y) as u8;
                let g = pix_g.get_pixel_unchecked(x, y) as u8;
                let b = pix_b.get_pixel_unchecked(x, y) as u8;
                pm.set_pixel_unchecked(x, y, color::compose_rgb(r, g, b));
            }
        }
        Ok(pm.into())
    }
}
