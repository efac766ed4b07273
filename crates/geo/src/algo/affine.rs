use crate::{Error, GeoTransform, Image, Interpolation, PixelBounds, Point, Rect, Result, Roi};

/// Result of an affine warp
#[derive(Debug, Clone)]
pub struct AffineWarp {
    pub image: Image,
    /// The value written in destination pixels that received no source data,
    /// only set when the source image carried a nodata value.
    pub nodata: Option<f64>,
}

/// Background value for a band, bands without a dedicated value reuse the last provided one.
pub fn background_value(background: &[f64], band: usize) -> f64 {
    background.get(band).or(background.last()).copied().unwrap_or(0.0)
}

/// Destination bounds of the source image under the transform.
/// A destination pixel is part of the bounds when its center is covered by the transformed source extent.
pub fn transformed_bounds(source: PixelBounds, transform: &GeoTransform) -> PixelBounds {
    let min_x = source.min_x as f64;
    let min_y = source.min_y as f64;
    let max_x = source.max_x() as f64;
    let max_y = source.max_y() as f64;

    let corners = [
        transform.apply(min_x, min_y),
        transform.apply(max_x, min_y),
        transform.apply(max_x, max_y),
        transform.apply(min_x, max_y),
    ];

    let Some(rect) = Rect::bounding(&corners) else {
        return PixelBounds::default();
    };

    let x0 = (rect.min_x() - 0.5).ceil() as i64;
    let y0 = (rect.min_y() - 0.5).ceil() as i64;
    let x1 = (rect.max_x() - 0.5).ceil() as i64;
    let y1 = (rect.max_y() - 0.5).ceil() as i64;

    PixelBounds::new(x0, y0, usize::try_from(x1 - x0).unwrap_or(0), usize::try_from(y1 - y0).unwrap_or(0))
}

/// Warps the image using the provided raster to raster transform (pixel corner convention).
///
/// Destination pixels are sampled at their center, pixels that do not map onto valid source data
/// are filled with the background value of the band.
/// The color model of the source is kept, indexed images should be expanded by the caller if
/// the interpolation is not nearest neighbour.
/// When the source has a region of interest, the destination receives the region of the pixels that got data.
pub fn affine(image: &Image, transform: &GeoTransform, interpolation: Interpolation, background: &[f64]) -> Result<AffineWarp> {
    let bounds = transformed_bounds(image.bounds(), transform);
    if bounds.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "Affine warp of image {} with {:?} results in an empty image",
            image.bounds(),
            transform
        )));
    }

    warp_into(image, transform, bounds, interpolation, background)
}

/// Affine warp that only computes the destination pixels inside `clip`.
///
/// The work is bounded by the clip region, not by the transformed extent of the source.
pub fn affine_within(
    image: &Image,
    transform: &GeoTransform,
    clip: PixelBounds,
    interpolation: Interpolation,
    background: &[f64],
) -> Result<AffineWarp> {
    let bounds = transformed_bounds(image.bounds(), transform).intersection(&clip);
    if bounds.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "Affine warp of image {} with {:?} does not cover the region {clip}",
            image.bounds(),
            transform
        )));
    }

    warp_into(image, transform, bounds, interpolation, background)
}

fn warp_into(
    image: &Image,
    transform: &GeoTransform,
    bounds: PixelBounds,
    interpolation: Interpolation,
    background: &[f64],
) -> Result<AffineWarp> {
    let inverse = transform.invert()?;
    let band_count = image.band_count();
    let cell_count = bounds.size().cell_count();

    let mut bands: Vec<Vec<f64>> = (0..band_count)
        .map(|band| vec![background_value(background, band); cell_count])
        .collect();
    let mut has_data = vec![false; cell_count];

    let mut sample = vec![0.0; band_count];
    for (row, y) in (bounds.min_y..bounds.max_y()).enumerate() {
        for (col, x) in (bounds.min_x..bounds.max_x()).enumerate() {
            let src = inverse.apply_to_point(Point::new(x as f64 + 0.5, y as f64 + 0.5));
            if interpolation.sample(image, src.x(), src.y(), &mut sample) {
                let index = row * bounds.width + col;
                for (band, value) in bands.iter_mut().zip(&sample) {
                    band[index] = *value;
                }
                has_data[index] = true;
            }
        }
    }

    let roi = image.roi().map(|_| {
        Roi::from_fn(bounds, |x, y| {
            bounds
                .index_of(x, y)
                .is_some_and(|index| has_data[index])
        })
    });

    let nodata = image.nodata().map(|nodata| {
        if background.is_empty() {
            nodata
        } else {
            background_value(background, 0)
        }
    });

    Ok(AffineWarp {
        image: Image::new(bounds, bands, image.color_model().clone())?.with_roi(roi),
        nodata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorModel;

    fn image_2x2() -> Result<Image> {
        Image::new(PixelBounds::new(0, 0, 2, 2), vec![vec![1.0, 2.0, 3.0, 4.0]], ColorModel::opaque())
    }

    #[test]
    fn integer_translation_moves_image() -> Result<()> {
        let warped = affine(&image_2x2()?, &GeoTransform::translation(3.0, 1.0), Interpolation::Nearest, &[0.0])?;
        assert_eq!(warped.image.bounds(), PixelBounds::new(3, 1, 2, 2));
        assert_eq!(warped.image.band(0), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(warped.nodata, None);
        assert!(warped.image.roi().is_none());

        Ok(())
    }

    #[test]
    fn upscale_replicates_pixels() -> Result<()> {
        let warped = affine(&image_2x2()?, &GeoTransform::scale(2.0, 2.0), Interpolation::Nearest, &[0.0])?;
        assert_eq!(warped.image.bounds(), PixelBounds::new(0, 0, 4, 4));
        assert_eq!(
            warped.image.band(0),
            &[1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 3.0, 3.0, 4.0, 4.0]
        );

        Ok(())
    }

    #[test]
    fn nodata_becomes_background() -> Result<()> {
        let image = Image::new(PixelBounds::new(0, 0, 2, 1), vec![vec![1.0, -1.0]], ColorModel::opaque())?.with_nodata(Some(-1.0));
        let warped = affine(&image, &GeoTransform::translation(1.0, 0.0), Interpolation::Nearest, &[-9999.0])?;
        assert_eq!(warped.image.band(0), &[1.0, -9999.0]);
        assert_eq!(warped.nodata, Some(-9999.0));

        Ok(())
    }

    #[test]
    fn roi_follows_the_data() -> Result<()> {
        let image = image_2x2()?.with_roi(Some(Roi::from_fn(PixelBounds::new(0, 0, 2, 2), |x, _| x == 0)));
        let warped = affine(&image, &GeoTransform::translation(-1.0, 0.0), Interpolation::Nearest, &[0.0])?;
        let roi = warped.image.roi().expect("source roi should be propagated");
        assert!(roi.contains(-1, 0));
        assert!(!roi.contains(0, 0));
        assert_eq!(warped.image.band(0), &[1.0, 0.0, 3.0, 0.0]);

        Ok(())
    }

    #[test]
    fn clipped_warp_only_computes_the_clip() -> Result<()> {
        let image = Image::new(PixelBounds::new(0, 0, 10, 10), vec![(0..100).map(f64::from).collect()], ColorModel::opaque())?;
        // Every source pixel covers 300x300 destination pixels
        let transform = GeoTransform::new([-1500.0, 300.0, 0.0, -1500.0, 0.0, 300.0]);
        let clip = PixelBounds::new(0, 0, 4, 4);

        let warped = affine_within(&image, &transform, clip, Interpolation::Nearest, &[0.0])?;
        assert_eq!(warped.image.bounds(), clip);
        assert_eq!(warped.image.band(0), &[55.0; 16]);

        let outside = PixelBounds::new(5000, 5000, 4, 4);
        assert!(affine_within(&image, &transform, outside, Interpolation::Nearest, &[0.0]).is_err());

        Ok(())
    }

    #[test]
    fn background_per_band() {
        assert_eq!(background_value(&[1.0, 2.0], 1), 2.0);
        assert_eq!(background_value(&[1.0, 2.0], 5), 2.0);
        assert_eq!(background_value(&[], 0), 0.0);
    }
}
