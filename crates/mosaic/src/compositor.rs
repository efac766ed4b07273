use geo::{AFFINE_IDENTITY_EPS, ColorModel, GridCoverage, Image, Interpolation, PixelBounds, Roi, algo::affine};

use crate::{Error, Granule, MosaicElement, Result, TargetContext};

/// How the pixels of overlapping granules are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeBehavior {
    /// Granules are painted on top of each other, the first granule with valid data wins
    #[default]
    Flat,
    /// The bands of the granules are stacked into a single multi band raster
    Stack,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergedRaster {
    pub element: MosaicElement,
    pub has_alpha: bool,
}

/// Combines granules of the same coordinate system into a single raster in the grid of the context.
pub trait Compositor: Send + Sync {
    /// Returns `None` when none of the granules overlaps the output grid
    fn merge(&self, context: &TargetContext, granules: &[Granule], behavior: MergeBehavior) -> Result<Option<MergedRaster>>;
}

/// Compositor that positions every granule in the output grid using an affine warp
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatCompositor;

impl Compositor for FlatCompositor {
    fn merge(&self, context: &TargetContext, granules: &[Granule], behavior: MergeBehavior) -> Result<Option<MergedRaster>> {
        let canvas = PixelBounds::with_size(context.raster_size());

        let mut positioned = Vec::with_capacity(granules.len());
        for granule in granules {
            if let Some(image) = position_granule(context, granule)? {
                positioned.push(image);
            }
        }

        let bounds = positioned
            .iter()
            .fold(PixelBounds::default(), |acc, image| acc.union(&image.bounds()))
            .intersection(&canvas);

        if bounds.is_empty() {
            log::debug!("None of the {} granules overlaps the output grid", granules.len());
            return Ok(None);
        }

        let merged = match behavior {
            MergeBehavior::Flat => overlay(positioned, bounds, context.background_values())?,
            MergeBehavior::Stack => stack(&positioned, bounds, context.background_values())?,
        };

        let aux_metadata = granules.iter().find_map(|granule| granule.aux_metadata().cloned());
        Ok(Some(MergedRaster {
            element: merged.element.with_aux_metadata(aux_metadata),
            has_alpha: merged.has_alpha,
        }))
    }
}

/// Warps the granule pixels into the grid of the context, `None` when it does not cover any output pixel
fn position_granule(context: &TargetContext, granule: &Granule) -> Result<Option<Image>> {
    if !granule.crs().equals_ignore_metadata(context.crs()) {
        return Err(Error::Compositing(format!(
            "Granule in {} can not be composited in an output grid in {}",
            granule.crs(),
            context.crs()
        )));
    }

    let coverage = GridCoverage::from_envelope("granule", granule.read()?, granule.envelope().clone())?;
    let mut transform = coverage.grid_to_crs_corner();
    transform.pre_concatenate(context.world_to_grid());

    let interpolation = context.interpolation();
    let mut image = coverage.into_image();
    if interpolation != Interpolation::Nearest {
        image = image.expand_indexed();
    }

    if transform.is_identity(AFFINE_IDENTITY_EPS) {
        return Ok(Some(image));
    }

    let canvas = PixelBounds::with_size(context.raster_size());
    if affine::transformed_bounds(image.bounds(), &transform).intersection(&canvas).is_empty() {
        log::debug!("Granule {} does not cover any output pixel", granule.envelope());
        return Ok(None);
    }

    let warped = affine::affine_within(&image, &transform, canvas, interpolation, context.background_values())?;
    Ok(Some(warped.image.with_nodata(warped.nodata)))
}

/// Gives all images the same color model, indexed images with different palettes are expanded
fn harmonize_color_models(images: Vec<Image>) -> Result<(Vec<Image>, ColorModel)> {
    let Some(first) = images.first() else {
        return Ok((images, ColorModel::opaque()));
    };

    let color_model = first.color_model().clone();
    if images.iter().all(|image| *image.color_model() == color_model) {
        return Ok((images, color_model));
    }

    let images: Vec<Image> = images.into_iter().map(Image::expand_indexed).collect();
    let band_count = images[0].band_count();
    if images.iter().any(|image| image.band_count() != band_count) {
        return Err(Error::Compositing("Granules with a different number of bands can not be overlaid".into()));
    }

    let alpha = images.iter().any(|image| image.color_model().has_alpha());
    if alpha && images.iter().any(|image| !image.color_model().has_alpha()) {
        return Err(Error::Compositing("Granules with and without alpha channel can not be overlaid".into()));
    }

    Ok((images, ColorModel::Component { alpha }))
}

fn overlay(images: Vec<Image>, bounds: PixelBounds, background: &[f64]) -> Result<MergedRaster> {
    let (images, color_model) = harmonize_color_models(images)?;
    let band_count = images.first().map_or(1, Image::band_count);
    if images.iter().any(|image| image.band_count() != band_count) {
        return Err(Error::Compositing("Granules with a different number of bands can not be overlaid".into()));
    }

    let cell_count = bounds.size().cell_count();
    let mut bands: Vec<Vec<f64>> = (0..band_count)
        .map(|band| vec![affine::background_value(background, band); cell_count])
        .collect();
    let mut filled = vec![false; cell_count];

    for image in &images {
        let overlap = image.bounds().intersection(&bounds);
        for y in overlap.min_y..overlap.max_y() {
            for x in overlap.min_x..overlap.max_x() {
                let Some(index) = bounds.index_of(x, y) else {
                    continue;
                };

                if filled[index] || !image.is_valid(x, y) {
                    continue;
                }

                for (band_index, band) in bands.iter_mut().enumerate() {
                    band[index] = image.value(band_index, x, y).unwrap_or_default();
                }
                filled[index] = true;
            }
        }
    }

    let nodata = images.iter().find_map(Image::nodata);
    let roi = Roi::from_fn(bounds, |x, y| bounds.index_of(x, y).is_some_and(|index| filled[index]));
    let image = Image::new(bounds, bands, color_model)?.with_nodata(nodata);
    let has_alpha = image.color_model().has_alpha();
    let alpha = image.alpha_band();

    Ok(MergedRaster {
        element: MosaicElement::new(image).with_alpha(alpha).with_roi(Some(roi)),
        has_alpha,
    })
}

fn stack(images: &[Image], bounds: PixelBounds, background: &[f64]) -> Result<MergedRaster> {
    let cell_count = bounds.size().cell_count();
    let mut bands = Vec::new();
    let mut filled = vec![false; cell_count];

    for image in images {
        let overlap = image.bounds().intersection(&bounds);
        for band_index in 0..image.band_count() {
            let mut band = vec![affine::background_value(background, bands.len()); cell_count];
            for y in overlap.min_y..overlap.max_y() {
                for x in overlap.min_x..overlap.max_x() {
                    if let Some(index) = bounds.index_of(x, y)
                        && image.is_valid(x, y)
                    {
                        band[index] = image.value(band_index, x, y).unwrap_or_default();
                        filled[index] = true;
                    }
                }
            }
            bands.push(band);
        }
    }

    let roi = Roi::from_fn(bounds, |x, y| bounds.index_of(x, y).is_some_and(|index| filled[index]));
    let image = Image::new(bounds, bands, ColorModel::opaque())?;

    Ok(MergedRaster {
        element: MosaicElement::new(image).with_roi(Some(roi)),
        has_alpha: false,
    })
}
