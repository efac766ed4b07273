use geo::{AFFINE_IDENTITY_EPS, CENTER_TO_CORNER, GeoTransform, GridCoverage, Image, Interpolation, algo};

use crate::{Result, TargetContext};

/// Transform from the pixel grid of the coverage to the pixel grid of the output.
///
/// The pixel center based grid to world transform of the coverage is first concatenated with the
/// half pixel shift to obtain the corner based variant, the world to grid transform of the output is then
/// pre-concatenated so the coverage grid is mapped onto the output grid.
pub fn raster_to_output_grid(coverage: &GridCoverage, target: &TargetContext) -> GeoTransform {
    let mut transform = coverage.grid_to_crs();
    transform.concatenate(&CENTER_TO_CORNER);
    transform.pre_concatenate(target.world_to_grid());
    transform
}

/// Places the coverage in the output grid.
///
/// Returns `None` when the placement results in an empty raster.
/// When the coverage is already aligned with the output grid the image is returned untouched.
pub fn position_in_output_grid(coverage: GridCoverage, target: &TargetContext) -> Result<Option<Image>> {
    let transform = raster_to_output_grid(&coverage, target);
    let interpolation = target.interpolation();

    let layout = algo::layout_helper(
        coverage.image().bounds(),
        transform.scale_x(),
        transform.scale_y(),
        transform.translate_x(),
        transform.translate_y(),
        Some(interpolation),
    );

    if layout.is_empty() {
        log::info!(
            "Skipping coverage '{}' of {}: positioning it in the output grid with {interpolation} interpolation results in an empty raster",
            coverage.name(),
            coverage.image().bounds()
        );
        return Ok(None);
    }

    if transform.is_identity(AFFINE_IDENTITY_EPS) {
        return Ok(Some(coverage.into_image()));
    }

    let mut image = coverage.into_image();
    if interpolation != Interpolation::Nearest {
        image = image.expand_indexed();
    }

    let warped = algo::affine(&image, &transform, interpolation, target.background_values())?;
    let mut positioned = warped.image;
    if let Some(nodata) = warped.nodata {
        positioned = positioned.with_nodata(Some(nodata));
    }

    Ok(Some(positioned))
}
