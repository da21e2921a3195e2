//! dhimg-region - Region processing for dhimg
//!
//! This crate provides the region primitives that mask morphology is
//! built on:
//!
//! - **Distance transform** - Exact L1 and L2 distance to the nearest zero pixel
//! - **Seed fill operations** - Flood fill and clearing of border-connected regions
//!
//! # Examples
//!
//! ```
//! use dhimg_region::{floodfill, ConnectivityType};
//! use dhimg_core::{Pix, PixelDepth};
//!
//! let pix = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
//! let mut pix_mut = pix.try_into_mut().unwrap();
//!
//! let count = floodfill(&mut pix_mut, 5, 5, 255, ConnectivityType::FourWay).unwrap();
//! assert_eq!(count, 100);
//! ```

pub mod distance;
pub mod error;
pub mod seedfill;

pub use distance::{BoundaryCondition, DistanceMetric, distance_transform};
pub use error::{RegionError, RegionResult};
pub use seedfill::{ConnectivityType, clear_border, floodfill};
