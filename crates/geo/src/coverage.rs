use crate::{CORNER_TO_CENTER, CENTER_TO_CORNER, Crs, Envelope, Error, GeoTransform, Image, Point, Rect, Result};

/// A georeferenced image.
///
/// The grid to world transform follows the pixel center convention: grid location (i, j) maps onto the
/// center of pixel (i, j). Use [`GridCoverage::grid_to_crs_corner`] for the pixel corner variant.
#[derive(Debug, Clone)]
pub struct GridCoverage {
    name: String,
    image: Image,
    grid_to_crs: GeoTransform,
    envelope: Envelope,
}

impl GridCoverage {
    /// Georeferences the image by stretching its pixel extent over the envelope (north up).
    pub fn from_envelope(name: impl Into<String>, image: Image, envelope: Envelope) -> Result<Self> {
        let name = name.into();
        if image.bounds().is_empty() {
            return Err(Error::InvalidArgument(format!("Coverage '{name}' can not be created from an empty image")));
        }

        if envelope.rect().is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Coverage '{name}' can not be created from an empty envelope ({envelope})"
            )));
        }

        let rect = envelope.rect();
        let scale_x = rect.width() / image.width() as f64;
        let scale_y = -rect.height() / image.height() as f64;
        let mut grid_to_crs = GeoTransform::new([
            rect.min_x() - image.min_x() as f64 * scale_x,
            scale_x,
            0.0,
            rect.max_y() - image.min_y() as f64 * scale_y,
            0.0,
            scale_y,
        ]);
        grid_to_crs.concatenate(&CORNER_TO_CENTER);

        Ok(GridCoverage {
            name,
            image,
            grid_to_crs,
            envelope,
        })
    }

    /// Georeferences the image with a pixel center based grid to world transform.
    pub fn with_grid_to_crs(name: impl Into<String>, image: Image, grid_to_crs: GeoTransform, crs: Crs) -> Result<Self> {
        let mut corner = grid_to_crs;
        corner.concatenate(&CENTER_TO_CORNER);

        let bounds = image.bounds();
        let mut corners = [
            Point::new(bounds.min_x as f64, bounds.min_y as f64),
            Point::new(bounds.max_x() as f64, bounds.min_y as f64),
            Point::new(bounds.max_x() as f64, bounds.max_y() as f64),
            Point::new(bounds.min_x as f64, bounds.max_y() as f64),
        ];
        corner.transform_points_in_place(&mut corners)?;

        let rect = Rect::bounding(&corners).ok_or_else(|| Error::Runtime("No coverage corners".into()))?;
        Ok(GridCoverage {
            name: name.into(),
            image,
            grid_to_crs,
            envelope: Envelope::new(rect, crs),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn into_image(self) -> Image {
        self.image
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn crs(&self) -> &Crs {
        self.envelope.crs()
    }

    /// Pixel center based grid to world transform
    pub fn grid_to_crs(&self) -> GeoTransform {
        self.grid_to_crs
    }

    /// Pixel corner based grid to world transform
    pub fn grid_to_crs_corner(&self) -> GeoTransform {
        let mut corner = self.grid_to_crs;
        corner.concatenate(&CENTER_TO_CORNER);
        corner
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{ColorModel, PixelBounds, crs::epsg};

    #[test]
    fn envelope_georeferencing() -> Result<()> {
        let image = Image::filled(PixelBounds::new(0, 0, 100, 50), 1, 0.0, ColorModel::opaque())?;
        let envelope = Envelope::new(Rect::from_bounds(1000.0, 2000.0, 2000.0, 2500.0), Crs::from_epsg(epsg::BELGIAN_LAMBERT72));
        let coverage = GridCoverage::from_envelope("test", image, envelope)?;

        let corner = coverage.grid_to_crs_corner();
        assert_relative_eq!(corner.apply(0.0, 0.0), Point::new(1000.0, 2500.0));
        assert_relative_eq!(corner.apply(100.0, 50.0), Point::new(2000.0, 2000.0));
        assert_relative_eq!(coverage.grid_to_crs().apply(0.0, 0.0), Point::new(1005.0, 2495.0));

        Ok(())
    }

    #[test]
    fn offset_image_georeferencing() -> Result<()> {
        let image = Image::filled(PixelBounds::new(10, 20, 10, 10), 1, 0.0, ColorModel::opaque())?;
        let envelope = Envelope::new(Rect::from_bounds(0.0, 0.0, 10.0, 10.0), Crs::from_epsg(epsg::WGS84));
        let coverage = GridCoverage::from_envelope("offset", image, envelope)?;

        assert_relative_eq!(coverage.grid_to_crs_corner().apply(10.0, 20.0), Point::new(0.0, 10.0));

        Ok(())
    }

    #[test]
    fn grid_to_crs_envelope() -> Result<()> {
        let image = Image::filled(PixelBounds::new(0, 0, 4, 2), 1, 0.0, ColorModel::opaque())?;
        let grid_to_crs = GeoTransform::new([0.5, 1.0, 0.0, 1.5, 0.0, -1.0]);
        let coverage = GridCoverage::with_grid_to_crs("centered", image, grid_to_crs, Crs::from_epsg(epsg::WGS84))?;

        assert_relative_eq!(*coverage.envelope().rect(), Rect::from_bounds(0.0, 0.0, 4.0, 2.0));

        Ok(())
    }

    #[test]
    fn empty_envelope_is_rejected() -> Result<()> {
        let image = Image::filled(PixelBounds::new(0, 0, 1, 1), 1, 0.0, ColorModel::opaque())?;
        let envelope = Envelope::new(Rect::from_bounds(0.0, 0.0, 0.0, 10.0), Crs::from_epsg(epsg::WGS84));
        assert!(GridCoverage::from_envelope("empty", image, envelope).is_err());

        Ok(())
    }
}
