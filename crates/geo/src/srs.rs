//! Spatial reference system handling and coordinate transformations.

#[cfg(feature = "proj4rs")]
mod proj4rs;

#[cfg(feature = "proj4rs")]
#[cfg_attr(docsrs, doc(cfg(feature = "proj4rs")))]
pub use proj4rs::{CoordinateTransformer, SpatialReference};
