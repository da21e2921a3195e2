//! Convolution kernels
//!
//! Small dense kernels with an explicit origin. Besides the generic
//! constructors there are the two kernels the background pipeline needs:
//! the 3x3 diffusion stencil used by inpainting and 1-D Gaussians for
//! separable blurring.

use crate::{FilterError, FilterResult};

/// Corner weight of the inpainting diffusion stencil
pub const DIFFUSION_CORNER: f32 = 0.073235;
/// Edge weight of the inpainting diffusion stencil
pub const DIFFUSION_EDGE: f32 = 0.176765;

/// A 2D convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// X coordinate of the center
    cx: u32,
    /// Y coordinate of the center
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// Create a zero kernel with the given dimensions, centered at
    /// `(width / 2, height / 2)`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; (width as usize) * (height as usize)],
        })
    }

    /// Create a kernel from row-major values.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values for a {width}x{height} kernel, got {}",
                kernel.data.len(),
                data.len()
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Create a box (averaging) kernel.
    ///
    /// All values are `1/(size*size)`.
    pub fn box_kernel(size: u32) -> FilterResult<Self> {
        let mut kernel = Self::new(size, size)?;
        let v = 1.0 / (size as f32 * size as f32);
        kernel.data.fill(v);
        Ok(kernel)
    }

    /// The 3x3 stencil used for harmonic inpainting.
    ///
    /// ```text
    /// a b a
    /// b 0 b      a = 0.073235, b = 0.176765
    /// a b a
    /// ```
    ///
    /// The weights sum to one.
    pub fn diffusion() -> Self {
        let a = DIFFUSION_CORNER;
        let b = DIFFUSION_EDGE;
        Self {
            width: 3,
            height: 3,
            cx: 1,
            cy: 1,
            data: vec![a, b, a, b, 0.0, b, a, b, a],
        }
    }

    /// Horizontal 1-D Gaussian of odd `size`, normalized to sum 1.
    ///
    /// A non-positive `sigma` is derived from the size as
    /// `0.3 · ((size − 1) / 2 − 1) + 0.8`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] for an even or zero size.
    pub fn gaussian_1d(size: u32, sigma: f64) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian size must be odd, got {size}"
            )));
        }
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            auto_sigma(size)
        };

        let half = (size / 2) as i64;
        let weights: Vec<f64> = (-half..=half)
            .map(|i| {
                let d = i as f64;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let mut kernel = Self::new(size, 1)?;
        for (k, w) in kernel.data.iter_mut().zip(&weights) {
            *k = (w / total) as f32;
        }
        Ok(kernel)
    }

    /// The same kernel turned on its side (width and height swapped).
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.width {
            for y in 0..self.height {
                data.push(self.data[(y * self.width + x) as usize]);
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cx: self.cy,
            cy: self.cx,
            data,
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

/// Sigma for a Gaussian of `size` taps when none is given.
pub fn auto_sigma(size: u32) -> f64 {
    0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8
}
