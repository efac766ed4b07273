#![warn(clippy::unwrap_used)]

//! Mosaicking of granules that are expressed in different coordinate systems.
//!
//! Granules are grouped per coordinate system, every group is merged in its own coordinate system
//! and the merged rasters are reprojected and positioned in the output grid of the request.

mod bbox;
mod compositor;
mod context;
mod element;
mod error;
mod granule;
pub mod position;
mod producer;
mod reproject;
mod reprojecting;
mod resampler;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[doc(inline)]
pub use bbox::submosaic_bounding_box;
#[doc(inline)]
pub use compositor::{Compositor, FlatCompositor, MergeBehavior, MergedRaster};
#[doc(inline)]
pub use context::{MosaicOptions, ReprojectionContextFactory, TargetContext, WarpingContextFactory};
#[doc(inline)]
pub use element::{AuxiliaryMetadata, MosaicElement};
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use granule::{Granule, InMemorySource, PixelSource};
#[doc(inline)]
pub use producer::{CrsBoundProducer, GranuleCollector, SubmosaicProducer};
#[doc(inline)]
pub use reproject::{Reprojector, SUBMOSAIC_COVERAGE_NAME};
#[doc(inline)]
pub use reprojecting::{DroppedGranule, GroupInfo, GroupState, ReprojectingProducer};
#[cfg(feature = "proj4rs")]
#[doc(inline)]
pub use resampler::WarpResampler;
#[doc(inline)]
pub use resampler::Resampler;
