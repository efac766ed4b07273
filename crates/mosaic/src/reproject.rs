use std::sync::Arc;

use geo::{Crs, GridCoverage};

use crate::{Error, MosaicElement, Resampler, Result, TargetContext, bbox::submosaic_bounding_box, position};

/// Name of the coverages that wrap a merged group raster
pub const SUBMOSAIC_COVERAGE_NAME: &str = "submosaic";

/// Brings merged group rasters into the coordinate system and pixel grid of the output.
#[derive(Clone)]
pub struct Reprojector {
    target: Arc<TargetContext>,
    resampler: Arc<dyn Resampler>,
}

impl Reprojector {
    pub fn new(target: Arc<TargetContext>, resampler: Arc<dyn Resampler>) -> Self {
        Reprojector { target, resampler }
    }

    /// Reprojects the element that was merged in `group_context`, the output grid of the group in `group_crs`.
    ///
    /// Elements that are already in the output coordinate system are returned as is,
    /// the bounding box of the element is only computed when a reprojection is needed.
    /// Returns `None` when the reprojected raster does not cover any output pixel.
    pub fn reproject(&self, element: MosaicElement, group_context: &TargetContext, group_crs: &Crs) -> Result<Option<MosaicElement>> {
        if group_crs.equals_ignore_metadata(self.target.crs()) {
            return Ok(Some(element));
        }

        let bbox = submosaic_bounding_box(group_context, group_crs, &element)?;
        let group_crs_name = group_crs.to_string();
        let reprojection_error = |e: Error| Error::Reprojection {
            crs: group_crs_name.clone(),
            source: Box::new(e),
        };

        let (image, roi, aux_metadata) = element.into_parts();
        let image = if image.roi().is_none() { image.with_roi(roi) } else { image };

        let coverage = GridCoverage::from_envelope(SUBMOSAIC_COVERAGE_NAME, image, bbox).map_err(|e| reprojection_error(e.into()))?;
        let resampled = self
            .resampler
            .resample(coverage, self.target.crs(), self.target.interpolation())
            .map_err(reprojection_error)?;

        let Some(positioned) = position::position_in_output_grid(resampled, &self.target).map_err(reprojection_error)? else {
            return Ok(None);
        };

        let alpha = if positioned.color_model().has_alpha() {
            positioned.alpha_band()
        } else {
            None
        };
        let roi = positioned.roi().cloned();

        Ok(Some(
            MosaicElement::new(positioned)
                .with_alpha(alpha)
                .with_roi(roi)
                .with_aux_metadata(aux_metadata),
        ))
    }
}

#[cfg(test)]
mod tests {
    use geo::{ColorModel, GeoTransform, Image, Interpolation, PixelBounds, RasterSize, Roi, crs::epsg};

    use super::*;
    use crate::{AuxiliaryMetadata, MosaicOptions};

    /// Pretends the coverage is expressed in the target coordinate system
    struct RelabelResampler;

    impl Resampler for RelabelResampler {
        fn resample(&self, coverage: GridCoverage, target: &Crs, _interpolation: Interpolation) -> Result<GridCoverage> {
            let grid_to_crs = coverage.grid_to_crs();
            let name = coverage.name().to_string();
            let image = coverage.into_image();
            let roi = Roi::full(image.bounds());
            Ok(GridCoverage::with_grid_to_crs(name, image.with_roi(Some(roi)), grid_to_crs, target.clone())?)
        }
    }

    struct FailingResampler;

    impl Resampler for FailingResampler {
        fn resample(&self, _coverage: GridCoverage, target: &Crs, _interpolation: Interpolation) -> Result<GridCoverage> {
            Err(Error::Geo(geo::Error::UnsupportedCrs(target.to_string())))
        }
    }

    fn context(crs: Crs, grid_to_world: GeoTransform) -> TargetContext {
        TargetContext::new(crs, grid_to_world, RasterSize::with_rows_cols(4, 4), MosaicOptions::default()).expect("valid context")
    }

    fn target() -> Arc<TargetContext> {
        Arc::new(context(Crs::from_epsg(epsg::WGS84), GeoTransform::new([0.0, 1.0, 0.0, 4.0, 0.0, -1.0])))
    }

    fn mercator_group(top_left_x: f64, top_left_y: f64) -> (TargetContext, Crs) {
        let crs = Crs::from_epsg(epsg::WGS84_WEB_MERCATOR);
        (
            context(crs.clone(), GeoTransform::new([top_left_x, 1.0, 0.0, top_left_y, 0.0, -1.0])),
            crs,
        )
    }

    fn element(color_model: ColorModel, band_count: usize) -> MosaicElement {
        let image = Image::filled(PixelBounds::new(0, 0, 2, 2), band_count, 1.0, color_model).expect("valid image");
        MosaicElement::new(image).with_aux_metadata(Some(AuxiliaryMetadata::new().with_property("key", "value")))
    }

    #[test]
    fn same_crs_passes_through() -> Result<()> {
        let reprojector = Reprojector::new(target(), Arc::new(FailingResampler));
        let input = element(ColorModel::opaque(), 1);
        let group_crs = Crs::from_epsg(epsg::WGS84).with_name("WGS 84");

        assert_eq!(reprojector.reproject(input.clone(), &target(), &group_crs)?, Some(input));

        Ok(())
    }

    #[test]
    fn pass_through_does_not_compute_the_bounding_box() -> Result<()> {
        let reprojector = Reprojector::new(target(), Arc::new(FailingResampler));
        // Mapping the element extent through this transform overflows
        let group = context(Crs::from_epsg(epsg::WGS84), GeoTransform::scale(1e308, 1e308));
        let input = MosaicElement::new(Image::filled(PixelBounds::new(0, 0, 100, 50), 1, 0.0, ColorModel::opaque())?);

        assert_eq!(reprojector.reproject(input.clone(), &group, group.crs())?, Some(input));

        Ok(())
    }

    #[test_log::test]
    fn other_crs_is_resampled_and_positioned() -> Result<()> {
        let reprojector = Reprojector::new(target(), Arc::new(RelabelResampler));
        let (group, crs) = mercator_group(1.0, 2.0);

        let output = reprojector
            .reproject(element(ColorModel::opaque(), 1), &group, &crs)?
            .expect("element covers the output grid");

        assert_eq!(output.image().bounds(), PixelBounds::new(1, 2, 2, 2));
        assert!(output.alpha().is_none());
        assert_eq!(output.roi().map(Roi::pixel_count), Some(4));
        assert_eq!(output.aux_metadata().and_then(|aux| aux.property("key")), Some("value"));

        Ok(())
    }

    #[test_log::test]
    fn alpha_is_extracted() -> Result<()> {
        let reprojector = Reprojector::new(target(), Arc::new(RelabelResampler));
        let (group, crs) = mercator_group(0.0, 4.0);

        let output = reprojector
            .reproject(element(ColorModel::with_alpha(), 4), &group, &crs)?
            .expect("element covers the output grid");

        let alpha = output.alpha().expect("alpha mask");
        assert_eq!(alpha.band_count(), 1);
        assert_eq!(alpha.bounds(), output.image().bounds());

        Ok(())
    }

    #[test]
    fn resample_failure_is_escalated() {
        let reprojector = Reprojector::new(target(), Arc::new(FailingResampler));
        let (group, crs) = mercator_group(0.0, 2.0);

        let result = reprojector.reproject(element(ColorModel::opaque(), 1), &group, &crs);
        assert!(matches!(result, Err(Error::Reprojection { .. })));
    }

    #[test]
    fn bounding_box_failure_is_escalated() -> Result<()> {
        let reprojector = Reprojector::new(target(), Arc::new(RelabelResampler));
        let crs = Crs::from_epsg(epsg::WGS84_WEB_MERCATOR);
        let group = context(crs.clone(), GeoTransform::scale(1e308, 1e308));
        let input = MosaicElement::new(Image::filled(PixelBounds::new(0, 0, 100, 50), 1, 0.0, ColorModel::opaque())?);

        let result = reprojector.reproject(input, &group, &crs);
        assert!(matches!(result, Err(Error::Transform(_))));

        Ok(())
    }
}
