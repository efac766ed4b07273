//! Pixel grid algorithms: affine warping, layout computation and reprojection.

pub mod affine;
pub mod layout;
#[cfg(feature = "proj4rs")]
pub mod warp;

pub use affine::{AffineWarp, affine};
pub use layout::layout_helper;
#[cfg(feature = "proj4rs")]
pub use warp::{WarpOptions, warp, warp_envelope};
