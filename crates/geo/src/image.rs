use crate::{ColorModel, Error, PixelBounds, Result, Roi};

/// A multi band raster image positioned in a pixel grid.
///
/// Band data is stored row major per band and covers the image bounds.
/// The optional nodata value and region of interest travel along with the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    bounds: PixelBounds,
    bands: Vec<Vec<f64>>,
    color_model: ColorModel,
    nodata: Option<f64>,
    roi: Option<Roi>,
}

impl Image {
    pub fn new(bounds: PixelBounds, bands: Vec<Vec<f64>>, color_model: ColorModel) -> Result<Self> {
        let cell_count = bounds.size().cell_count();
        if let Some(band) = bands.iter().find(|band| band.len() != cell_count) {
            return Err(Error::SizeMismatch {
                size1: (bounds.width, bounds.height),
                size2: (band.len(), 1),
            });
        }

        match &color_model {
            ColorModel::Indexed(_) if bands.len() != 1 => {
                return Err(Error::InvalidArgument(format!(
                    "Indexed images require exactly one band, got {}",
                    bands.len()
                )));
            }
            ColorModel::Component { alpha: true } if bands.len() < 2 => {
                return Err(Error::InvalidArgument("Images with alpha require at least two bands".into()));
            }
            _ => {}
        }

        if bands.is_empty() {
            return Err(Error::InvalidArgument("Images require at least one band".into()));
        }

        Ok(Image {
            bounds,
            bands,
            color_model,
            nodata: None,
            roi: None,
        })
    }

    /// Creates an image from typed band buffers, values that can not be represented become NaN
    pub fn from_typed<T: num::ToPrimitive>(bounds: PixelBounds, bands: Vec<Vec<T>>, color_model: ColorModel) -> Result<Self> {
        let bands = bands
            .into_iter()
            .map(|band| band.into_iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).collect())
            .collect();
        Self::new(bounds, bands, color_model)
    }

    pub fn filled(bounds: PixelBounds, band_count: usize, value: f64, color_model: ColorModel) -> Result<Self> {
        Self::new(bounds, vec![vec![value; bounds.size().cell_count()]; band_count], color_model)
    }

    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    pub fn with_roi(mut self, roi: Option<Roi>) -> Self {
        self.roi = roi;
        self
    }

    pub fn bounds(&self) -> PixelBounds {
        self.bounds
    }

    pub fn min_x(&self) -> i64 {
        self.bounds.min_x
    }

    pub fn min_y(&self) -> i64 {
        self.bounds.min_y
    }

    pub fn width(&self) -> usize {
        self.bounds.width
    }

    pub fn height(&self) -> usize {
        self.bounds.height
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn band(&self, index: usize) -> &[f64] {
        &self.bands[index]
    }

    pub fn color_model(&self) -> &ColorModel {
        &self.color_model
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn roi(&self) -> Option<&Roi> {
        self.roi.as_ref()
    }

    /// Sample value of a band at the grid location, `None` outside of the image
    pub fn value(&self, band: usize, x: i64, y: i64) -> Option<f64> {
        self.bounds.index_of(x, y).map(|index| self.bands[band][index])
    }

    pub fn is_nodata(&self, value: f64) -> bool {
        match self.nodata {
            Some(nodata) if nodata.is_nan() => value.is_nan(),
            Some(nodata) => value == nodata,
            None => false,
        }
    }

    /// A pixel is valid when it lies in the image and its region of interest, is not nodata
    /// and is not fully transparent.
    pub fn is_valid(&self, x: i64, y: i64) -> bool {
        let Some(index) = self.bounds.index_of(x, y) else {
            return false;
        };

        if self.roi.as_ref().is_some_and(|roi| !roi.contains(x, y)) {
            return false;
        }

        if self.is_nodata(self.bands[0][index]) {
            return false;
        }

        match &self.color_model {
            ColorModel::Component { alpha: true } => self.bands[self.bands.len() - 1][index] > 0.0,
            ColorModel::Indexed(palette) if palette.has_alpha() => {
                palette.entry(self.bands[0][index]).is_some_and(|entry| entry[3] > 0)
            }
            _ => true,
        }
    }

    /// Single band image containing the last band (the alpha band for images with alpha)
    pub fn retain_last_band(&self) -> Image {
        Image {
            bounds: self.bounds,
            bands: self.bands.last().cloned().into_iter().collect(),
            color_model: ColorModel::opaque(),
            nodata: None,
            roi: self.roi.clone(),
        }
    }

    /// The alpha channel as a standalone single band image, `None` when the color model has no alpha.
    /// Indexed images resolve the alpha component of their palette.
    pub fn alpha_band(&self) -> Option<Image> {
        match &self.color_model {
            ColorModel::Component { alpha: true } => Some(self.retain_last_band()),
            ColorModel::Indexed(palette) if palette.has_alpha() => {
                let alpha = self.bands[0]
                    .iter()
                    .map(|&index| palette.entry(index).map_or(0.0, |entry| f64::from(entry[3])))
                    .collect();

                Some(Image {
                    bounds: self.bounds,
                    bands: vec![alpha],
                    color_model: ColorModel::opaque(),
                    nodata: None,
                    roi: self.roi.clone(),
                })
            }
            _ => None,
        }
    }

    /// Converts an indexed image to its full color equivalent (RGB, or RGBA when the palette has alpha).
    /// Images that are not indexed are returned as is.
    pub fn expand_indexed(self) -> Image {
        let ColorModel::Indexed(palette) = &self.color_model else {
            return self;
        };

        let alpha = palette.has_alpha();
        let component_count = if alpha { 4 } else { 3 };
        let cell_count = self.bounds.size().cell_count();
        let mut bands = vec![Vec::with_capacity(cell_count); component_count];
        for &index in &self.bands[0] {
            // Unknown indexes expand to transparent black
            let entry = palette.entry(index).unwrap_or([0, 0, 0, 0]);
            for (band, component) in bands.iter_mut().zip(entry) {
                band.push(f64::from(component));
            }
        }

        Image {
            bounds: self.bounds,
            bands,
            color_model: ColorModel::Component { alpha },
            nodata: None,
            roi: self.roi,
        }
    }
}
