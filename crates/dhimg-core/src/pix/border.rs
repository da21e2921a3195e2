//! Border operations
//!
//! Growing an image by replicating its edge pixels outward. Used to give
//! windowed filters valid input beyond the image boundary.

use super::Pix;
use crate::error::{Error, Result};

impl Pix {
    /// Add a border of constant value `val` around all four sides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageTooLarge`] if the grown size overflows `u32`.
    pub fn add_border(&self, npix: u32, val: u32) -> Result<Pix> {
        let w = self.width();
        let h = self.height();
        let grow = |v: u32| v.checked_add(npix).and_then(|v| v.checked_add(npix));
        let (Some(wd), Some(hd)) = (grow(w), grow(h)) else {
            return Err(Error::ImageTooLarge {
                width: u64::from(w) + 2 * u64::from(npix),
                height: u64::from(h) + 2 * u64::from(npix),
            });
        };
        let mut pm = Pix::new(wd, hd, self.depth())?.to_mut();
        pm.set_all(val);
        for y in 0..h {
            for x in 0..w {
                pm.set_pixel_unchecked(x + npix, y + npix, self.get_pixel_unchecked(x, y));
            }
        }
        Ok(pm.into())
    }

    /// Add a border of replicated edge pixels.
    ///
    /// Every new pixel takes the value of the nearest pixel of the source,
    /// so corners receive the corresponding corner value.
    ///
    /// # Arguments
    ///
    /// * `left`, `right`, `top`, `bot` - Border widths on each side
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageTooLarge`] if the grown size overflows `u32`
    /// or cannot be allocated.
    pub fn add_border_replicate(&self, left: u32, right: u32, top: u32, bot: u32) -> Result<Pix> {
        let w = self.width();
        let h = self.height();
        let too_large = || Error::ImageTooLarge {
            width: u64::from(w) + u64::from(left) + u64::from(right),
            height: u64::from(h) + u64::from(top) + u64::from(bot),
        };
        let wd = w
            .checked_add(left)
            .and_then(|v| v.checked_add(right))
            .ok_or_else(too_large)?;
        let hd = h
            .checked_add(top)
            .and_then(|v| v.checked_add(bot))
            .ok_or_else(too_large)?;

        let mut pm = Pix::new(wd, hd, self.depth())?.to_mut();
        for yd in 0..hd {
            let ys = yd.saturating_sub(top).min(h - 1);
            for xd in 0..wd {
                let xs = xd.saturating_sub(left).min(w - 1);
                pm.set_pixel_unchecked(xd, yd, self.get_pixel_unchecked(xs, ys));
            }
        }
        Ok(pm.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelDepth;

    #[test]
    fn test_replicate_values() {
        let pix = Pix::from_gray_bytes(2, 2, &[1, 2, 3, 4]).unwrap();
        let padded = pix.add_border_replicate(2, 1, 1, 2).unwrap();
        assert_eq!(padded.width(), 5);
        assert_eq!(padded.height(), 5);
        // corners
        assert_eq!(padded.get_pixel(0, 0), Some(1));
        assert_eq!(padded.get_pixel(4, 0), Some(2));
        assert_eq!(padded.get_pixel(0, 4), Some(3));
        assert_eq!(padded.get_pixel(4, 4), Some(4));
        // interior copy
        assert_eq!(padded.get_pixel(2, 1), Some(1));
        assert_eq!(padded.get_pixel(3, 2), Some(4));
    }

    #[test]
    fn test_replicate_rgb() {
        let mut pm = Pix::new(1, 1, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_rgb(0, 0, 5, 6, 7).unwrap();
        let pix: Pix = pm.into();
        let padded = pix.add_border_replicate(1, 1, 1, 1).unwrap();
        assert_eq!(padded.get_rgb(2, 2), Some((5, 6, 7)));
    }

    #[test]
    fn test_constant_border() {
        let pix = Pix::from_gray_bytes(2, 1, &[9, 9]).unwrap();
        let padded = pix.add_border(1, 3).unwrap();
        assert_eq!((padded.width(), padded.height()), (4, 3));
        assert_eq!(padded.get_pixel(0, 0), Some(3));
        assert_eq!(padded.get_pixel(1, 1), Some(9));
        assert_eq!(padded.get_pixel(3, 2), Some(3));
    }

    #[test]
    fn test_overflowing_border() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        assert!(matches!(
            pix.add_border_replicate(u32::MAX, 0, 0, 0),
            Err(Error::ImageTooLarge { .. })
        ));
    }
}
