//! FPix - Floating-point image
//!
//! `FPix` is a 2D array of `f32` values, used for distance fields and for
//! the diffusion planes of the inpainter where 8-bit precision is
//! insufficient.
//!
//! # Examples
//!
//! ```
//! use dhimg_core::FPix;
//!
//! let mut fpix = FPix::new(100, 100).unwrap();
//! fpix.set_pixel(10, 20, 0.5).unwrap();
//! assert_eq!(fpix.get_pixel(10, 20).unwrap(), 0.5);
//! ```

use crate::error::{Error, Result};
use crate::pix::{Pix, PixelDepth};

/// Floating-point image
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The pixel at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct FPix {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel data (row-major, no padding)
    data: Vec<f32>,
}

impl FPix {
    /// Create a new FPix with all pixels set to zero
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, 0.0)
    }

    /// Create a new FPix with all pixels set to the specified value
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(FPix {
            width,
            height,
            data: vec![value; size],
        })
    }

    /// Create a FPix from raw data
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `data` - Pixel data in row-major order
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected_size
            )));
        }

        Ok(FPix {
            width,
            height,
            data,
        })
    }

    /// Create a FPix holding the values of an 8 bpp image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] unless the image is 8 bpp.
    pub fn from_pix(pix: &Pix) -> Result<Self> {
        if pix.depth() != PixelDepth::Bit8 {
            return Err(Error::UnsupportedDepth(pix.depth().bits()));
        }
        let (w, h) = (pix.width(), pix.height());
        let mut data = Vec::with_capacity((w as usize) * (h as usize));
        for y in 0..h {
            for x in 0..w {
                data.push(pix.get_pixel_unchecked(x, y) as f32);
            }
        }
        Self::from_data(w, h, data)
    }

    /// Convert to an 8 bpp image, rounding to nearest and saturating to
    /// [0, 255]. NaN becomes 0.
    pub fn to_pix(&self) -> Result<Pix> {
        let mut pm = Pix::new(self.width, self.height, PixelDepth::Bit8)?.to_mut();
        for y in 0..self.height {
            for x in 0..self.width {
                let v = self.get_pixel_unchecked(x, y).round().clamp(0.0, 255.0);
                // `as` maps NaN to 0
                pm.set_pixel_unchecked(x, y, v as u32);
            }
        }
        Ok(pm.into())
    }

    /// Get the image width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the image dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get raw access to the pixel data
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a pixel value
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<f32> {
        self.check_bounds(x, y)?;
        Ok(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> f32 {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Set a pixel value
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: f32) -> Result<()> {
        self.check_bounds(x, y)?;
        self.set_pixel_unchecked(x, y, value);
        Ok(())
    }

    /// Set a pixel value without bounds checking
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, value: f32) {
        let idx = (y as usize) * (self.width as usize) + x as usize;
        self.data[idx] = value;
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }
        Ok(())
    }
}
