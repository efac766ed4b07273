use geo::{Crs, Envelope, GeoTransform, Interpolation, Point, RasterSize, Rect};

use crate::{Error, Granule, Result};

/// Rendering options of a mosaic request
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MosaicOptions {
    /// Resampling kernel used for reprojection and positioning (default = nearest)
    pub interpolation: Interpolation,
    /// Fill value per band for output pixels without data (default = 0)
    pub background_values: Vec<f64>,
    /// Only route the granules, no pixels are read and no elements are produced (default = false)
    pub dry_run: bool,
}

impl Default for MosaicOptions {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Nearest,
            background_values: vec![0.0],
            dry_run: false,
        }
    }
}

/// The output grid of a mosaic request.
///
/// Both transforms use the pixel corner convention: grid location (0, 0) is the top left corner of the first pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetContext {
    crs: Crs,
    grid_to_world: GeoTransform,
    world_to_grid: GeoTransform,
    raster_size: RasterSize,
    options: MosaicOptions,
}

impl TargetContext {
    pub fn new(crs: Crs, grid_to_world: GeoTransform, raster_size: RasterSize, options: MosaicOptions) -> Result<Self> {
        if raster_size.is_empty() {
            return Err(Error::Geo(geo::Error::InvalidArgument(format!(
                "Output raster size can not be empty ({raster_size})"
            ))));
        }

        Ok(TargetContext {
            crs,
            grid_to_world,
            world_to_grid: grid_to_world.invert()?,
            raster_size,
            options,
        })
    }

    /// North up output grid that covers the envelope with the requested amount of pixels
    pub fn from_envelope(envelope: &Envelope, raster_size: RasterSize, options: MosaicOptions) -> Result<Self> {
        let rect = envelope.rect();
        if rect.is_empty() {
            return Err(Error::Geo(geo::Error::InvalidArgument(format!(
                "Output envelope can not be empty ({envelope})"
            ))));
        }

        let grid_to_world = GeoTransform::from_top_left_and_cell_size(
            rect.top_left(),
            rect.width() / raster_size.cols as f64,
            -rect.height() / raster_size.rows as f64,
        );

        Self::new(envelope.crs().clone(), grid_to_world, raster_size, options)
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn grid_to_world(&self) -> &GeoTransform {
        &self.grid_to_world
    }

    pub fn world_to_grid(&self) -> &GeoTransform {
        &self.world_to_grid
    }

    pub fn raster_size(&self) -> RasterSize {
        self.raster_size
    }

    pub fn options(&self) -> &MosaicOptions {
        &self.options
    }

    pub fn interpolation(&self) -> Interpolation {
        self.options.interpolation
    }

    pub fn background_values(&self) -> &[f64] {
        &self.options.background_values
    }

    /// World extent covered by the output grid
    pub fn envelope(&self) -> Result<Envelope> {
        let cols = self.raster_size.cols as f64;
        let rows = self.raster_size.rows as f64;
        let mut corners = [
            Point::new(0.0, 0.0),
            Point::new(cols, 0.0),
            Point::new(cols, rows),
            Point::new(0.0, rows),
        ];
        self.grid_to_world.transform_points_in_place(&mut corners)?;

        let rect = Rect::bounding(&corners).ok_or_else(|| Error::Transform("No output grid corners".into()))?;
        Ok(Envelope::new(rect, self.crs.clone()))
    }
}

/// Derives the output context of a group of granules that share a coordinate system.
pub trait ReprojectionContextFactory: Send + Sync {
    /// The output grid expressed in the coordinate system of the granule
    fn reproject_to(&self, target: &TargetContext, granule: &Granule) -> Result<TargetContext>;
}

/// Reprojects the output extent into the coordinate system of the granule,
/// the number of output pixels is kept.
#[derive(Debug, Clone, Default)]
pub struct WarpingContextFactory {
    #[cfg(feature = "proj4rs")]
    warp_options: geo::algo::WarpOptions,
}

impl WarpingContextFactory {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "proj4rs")]
    pub fn with_edge_sample_count(edge_sample_count: usize) -> Self {
        WarpingContextFactory {
            warp_options: geo::algo::WarpOptions {
                edge_sample_count,
                ..Default::default()
            },
        }
    }
}

impl WarpingContextFactory {
    #[cfg(feature = "proj4rs")]
    fn context_in_crs(&self, target: &TargetContext, crs: &Crs) -> Result<TargetContext> {
        let envelope = geo::algo::warp_envelope(&target.envelope()?, crs, &self.warp_options).map_err(|e| Error::ContextSetup {
            crs: crs.to_string(),
            reason: e.to_string(),
        })?;

        TargetContext::from_envelope(&envelope, target.raster_size(), target.options().clone())
    }

    #[cfg(not(feature = "proj4rs"))]
    fn context_in_crs(&self, _target: &TargetContext, crs: &Crs) -> Result<TargetContext> {
        Err(Error::ContextSetup {
            crs: crs.to_string(),
            reason: "no projection backend available".into(),
        })
    }
}

impl ReprojectionContextFactory for WarpingContextFactory {
    fn reproject_to(&self, target: &TargetContext, granule: &Granule) -> Result<TargetContext> {
        let crs = granule.crs();
        if crs.equals_ignore_metadata(target.crs()) {
            return Ok(target.clone());
        }

        self.context_in_crs(target, crs)
    }
}
