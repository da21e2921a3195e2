//! Windowed statistics using integral images
//!
//! Computes local mean and standard deviation over square sliding windows
//! in O(1) per pixel, using a pair of summed area tables (sum and sum of
//! squares).
//!
//! # Padding
//!
//! The source is padded by replication with `ceil(ws/2)` pixels on the low
//! side and `floor(ws/2)` on the high side of each axis. The window for
//! output pixel `(x, y)` then covers padded rows and columns
//! `x+1 ..= x+ws`, which extends `floor((ws-1)/2)` pixels before the centre
//! and `floor(ws/2)` after it. Odd windows are centred exactly.
//!
//! # Accumulators
//!
//! Tables are accumulated with wrapping arithmetic in the chosen
//! [`Accumulator`] type. Four-corner differences are exact modulo `2^bits`,
//! so a window total is exact whenever it fits the accumulator, which holds
//! for every 8 bpp window of size up to [`Accumulator::MAX_WINDOW_SIZE`].

use crate::{FilterError, FilterResult};
use dhimg_core::{Pix, PixelDepth};
use std::fmt;

/// Upper bound on the number of pixels in a padded working image.
pub const MAX_PADDED_PIXELS: u64 = i32::MAX as u64;

/// Unsigned integer type used to accumulate integral images.
pub trait Accumulator: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Largest window whose sum of squared 8-bit values fits this type,
    /// i.e. the largest `ws` with `ws² · 255² < 2^bits`.
    const MAX_WINDOW_SIZE: u32;

    fn from_u32(v: u32) -> Self;
    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn to_f64(self) -> f64;
}

impl Accumulator for u32 {
    const MAX_WINDOW_SIZE: u32 = 257;

    #[inline]
    fn from_u32(v: u32) -> Self {
        v
    }
    #[inline]
    fn wrapping_add(self, rhs: Self) -> Self {
        u32::wrapping_add(self, rhs)
    }
    #[inline]
    fn wrapping_sub(self, rhs: Self) -> Self {
        u32::wrapping_sub(self, rhs)
    }
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Accumulator for u64 {
    const MAX_WINDOW_SIZE: u32 = 16_843_009;

    #[inline]
    fn from_u32(v: u32) -> Self {
        u64::from(v)
    }
    #[inline]
    fn wrapping_add(self, rhs: Self) -> Self {
        u64::wrapping_add(self, rhs)
    }
    #[inline]
    fn wrapping_sub(self, rhs: Self) -> Self {
        u64::wrapping_sub(self, rhs)
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Runtime selection of the accumulator type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulatorWidth {
    /// 32-bit tables: half the memory, windows up to 257
    U32,
    /// 64-bit tables
    #[default]
    U64,
}

impl AccumulatorWidth {
    /// Largest window size supported by this width.
    pub fn max_window_size(self) -> u32 {
        match self {
            AccumulatorWidth::U32 => <u32 as Accumulator>::MAX_WINDOW_SIZE,
            AccumulatorWidth::U64 => <u64 as Accumulator>::MAX_WINDOW_SIZE,
        }
    }
}

/// Validate `1 <= window_size <= max`.
pub fn check_window_size(window_size: u32, max: u32) -> FilterResult<()> {
    if window_size == 0 || window_size > max {
        return Err(FilterError::WindowSizeOutOfRange {
            size: window_size,
            max,
        });
    }
    Ok(())
}

/// Validate that padding a `width x height` image by `window_size` on each
/// axis stays within [`MAX_PADDED_PIXELS`].
pub fn check_padded_size(width: u32, height: u32, window_size: u32) -> FilterResult<()> {
    let pw = u64::from(width) + u64::from(window_size);
    let ph = u64::from(height) + u64::from(window_size);
    let axis_limit = i32::MAX as u64;
    if pw > axis_limit || ph > axis_limit || pw * ph > MAX_PADDED_PIXELS {
        return Err(FilterError::ImageTooLarge {
            width,
            height,
            padding: window_size,
            limit: MAX_PADDED_PIXELS,
        });
    }
    Ok(())
}

/// Pair of inclusive summed area tables over an 8 bpp image.
///
/// `sum(x, y)` is the total of all values in `[0, x] × [0, y]`, and
/// `sum_sq(x, y)` the total of their squares.
#[derive(Debug, Clone)]
pub struct IntegralImage<A: Accumulator = u64> {
    width: u32,
    height: u32,
    sum: Vec<A>,
    sum_sq: Vec<A>,
}

impl<A: Accumulator> IntegralImage<A> {
    /// Build the tables.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnsupportedDepth`] unless the image is 8 bpp.
    pub fn new(pix: &Pix) -> FilterResult<Self> {
        check_8bpp(pix)?;

        let w = pix.width() as usize;
        let h = pix.height() as usize;
        let mut sum = vec![A::default(); w * h];
        let mut sum_sq = vec![A::default(); w * h];

        for y in 0..h {
            let mut row = A::default();
            let mut row_sq = A::default();
            for x in 0..w {
                let v = pix.get_pixel_unchecked(x as u32, y as u32);
                row = row.wrapping_add(A::from_u32(v));
                row_sq = row_sq.wrapping_add(A::from_u32(v * v));
                let idx = y * w + x;
                if y == 0 {
                    sum[idx] = row;
                    sum_sq[idx] = row_sq;
                } else {
                    sum[idx] = row.wrapping_add(sum[idx - w]);
                    sum_sq[idx] = row_sq.wrapping_add(sum_sq[idx - w]);
                }
            }
        }

        Ok(IntegralImage {
            width: pix.width(),
            height: pix.height(),
            sum,
            sum_sq,
        })
    }

    /// Width of the tables.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the tables.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Table entries at (x, y); (-1, _) and (_, -1) read as zero.
    #[inline]
    fn at(&self, x: i64, y: i64) -> (A, A) {
        if x < 0 || y < 0 {
            return (A::default(), A::default());
        }
        let idx = (y as usize) * (self.width as usize) + x as usize;
        (self.sum[idx], self.sum_sq[idx])
    }

    /// Totals of values and squared values over the `w × h` rectangle with
    /// top-left corner `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameters`] if the rectangle is empty
    /// or extends past the tables.
    pub fn rect_sums(&self, x: u32, y: u32, w: u32, h: u32) -> FilterResult<(f64, f64)> {
        let fits = |start: u32, len: u32, limit: u32| {
            start.checked_add(len).is_some_and(|end| end <= limit)
        };
        if w == 0 || h == 0 || !fits(x, w, self.width) || !fits(y, h, self.height) {
            return Err(FilterError::InvalidParameters(format!(
                "rectangle {w}x{h} at ({x}, {y}) outside {}x{} integral image",
                self.width, self.height
            )));
        }
        Ok(self.rect_sums_unchecked(x, y, w, h))
    }

    #[inline]
    fn rect_sums_unchecked(&self, x: u32, y: u32, w: u32, h: u32) -> (f64, f64) {
        let x0 = i64::from(x) - 1;
        let y0 = i64::from(y) - 1;
        let x1 = x0 + i64::from(w);
        let y1 = y0 + i64::from(h);

        let (a, a2) = self.at(x1, y1);
        let (b, b2) = self.at(x0, y1);
        let (c, c2) = self.at(x1, y0);
        let (d, d2) = self.at(x0, y0);
        let s1 = a.wrapping_sub(b).wrapping_sub(c).wrapping_add(d);
        let s2 = a2.wrapping_sub(b2).wrapping_sub(c2).wrapping_add(d2);
        (s1.to_f64(), s2.to_f64())
    }
}

/// Mean and standard deviation of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    /// Window mean
    pub mean: f64,
    /// Population standard deviation
    pub stddev: f64,
}

/// Windowed mean and standard deviation for every pixel of an image.
#[derive(Debug, Clone)]
pub struct WindowedStatistics<A: Accumulator = u64> {
    window_size: u32,
    source: Pix,
    integral: IntegralImage<A>,
}

impl<A: Accumulator> WindowedStatistics<A> {
    /// Pad `pix` for `window_size` and build the integral tables.
    ///
    /// # Errors
    ///
    /// - [`FilterError::UnsupportedDepth`] if the image is not 8 bpp
    /// - [`FilterError::WindowSizeOutOfRange`] if `window_size` is 0 or
    ///   exceeds `A::MAX_WINDOW_SIZE`
    /// - [`FilterError::ImageTooLarge`] if the padded image is too large
    pub fn new(pix: &Pix, window_size: u32) -> FilterResult<Self> {
        check_8bpp(pix)?;
        check_window_size(window_size, A::MAX_WINDOW_SIZE)?;
        check_padded_size(pix.width(), pix.height(), window_size)?;

        let (low, high) = Self::padding(window_size);
        let padded = pix.add_border_replicate(low, high, low, high)?;
        let integral = IntegralImage::new(&padded)?;

        Ok(WindowedStatistics {
            window_size,
            source: pix.clone(),
            integral,
        })
    }

    /// Padding `(low, high)` applied to each axis for `window_size`.
    pub fn padding(window_size: u32) -> (u32, u32) {
        (window_size - window_size / 2, window_size / 2)
    }

    /// The window size.
    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    /// Width of the unpadded image.
    pub fn width(&self) -> u32 {
        self.source.width()
    }

    /// Height of the unpadded image.
    pub fn height(&self) -> u32 {
        self.source.height()
    }

    /// Value of the unpadded source pixel.
    #[inline]
    pub fn source(&self, x: u32, y: u32) -> u32 {
        self.source.get_pixel_unchecked(x, y)
    }

    /// Window statistics centred on unpadded pixel (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the unpadded image.
    #[inline]
    pub fn stats(&self, x: u32, y: u32) -> WindowStats {
        let ws = self.window_size;
        let (s1, s2) = self.integral.rect_sums_unchecked(x + 1, y + 1, ws, ws);
        let n = f64::from(ws) * f64::from(ws);
        let mean = s1 / n;
        let variance = s2 / n - mean * mean;
        WindowStats {
            mean,
            stddev: variance.max(0.0).sqrt(),
        }
    }
}

fn check_8bpp(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8-bpp grayscale",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}
