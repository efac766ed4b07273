#![warn(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Geometry and raster primitives: affine transforms, coordinate reference systems,
//! images with their validity masks and the resampling algorithms that operate on them.

pub type Result<T = ()> = std::result::Result<T, Error>;

pub mod algo;
mod colormodel;
mod coverage;
pub mod crs;
mod envelope;
mod error;
mod geotransform;
mod image;
mod interpolation;
pub mod point;
mod rastersize;
mod rect;
mod roi;
pub mod srs;

#[doc(inline)]
pub use colormodel::{ColorModel, Palette};
#[doc(inline)]
pub use coverage::GridCoverage;
#[doc(inline)]
pub use crs::{Crs, CrsDefinition, Epsg};
#[doc(inline)]
pub use envelope::Envelope;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use geotransform::{AFFINE_IDENTITY_EPS, CENTER_TO_CORNER, CORNER_TO_CENTER, GeoTransform};
#[doc(inline)]
pub use image::Image;
#[doc(inline)]
pub use interpolation::Interpolation;
#[doc(inline)]
pub use point::Point;
#[doc(inline)]
pub use rastersize::{PixelBounds, RasterSize};
#[doc(inline)]
pub use rect::Rect;
#[doc(inline)]
pub use roi::Roi;
