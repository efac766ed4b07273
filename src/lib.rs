//! Mosaicking of rasters in heterogeneous coordinate systems.
//!
//! * [`geo`]: affine transforms, coordinate systems, images and the resampling algorithms
//! * [`mosaic`]: grouping of granules per coordinate system, compositing and reprojection into the output grid

pub use geo;
pub use mosaic;
