use geo::{Crs, GridCoverage, Interpolation};

use crate::Result;

/// Resamples a coverage into another coordinate system
pub trait Resampler: Send + Sync {
    fn resample(&self, coverage: GridCoverage, target: &Crs, interpolation: Interpolation) -> Result<GridCoverage>;
}

/// Resampler backed by the proj4rs based coverage warp
#[cfg(feature = "proj4rs")]
#[derive(Debug, Clone, Default)]
pub struct WarpResampler {
    options: geo::algo::WarpOptions,
}

#[cfg(feature = "proj4rs")]
impl WarpResampler {
    pub fn new(options: geo::algo::WarpOptions) -> Self {
        WarpResampler { options }
    }

    /// Resampler that fills pixels without source data with the background values
    pub fn with_background(background: Vec<f64>) -> Self {
        WarpResampler {
            options: geo::algo::WarpOptions {
                background,
                ..Default::default()
            },
        }
    }
}

#[cfg(feature = "proj4rs")]
impl Resampler for WarpResampler {
    fn resample(&self, coverage: GridCoverage, target: &Crs, interpolation: Interpolation) -> Result<GridCoverage> {
        let coverage = if interpolation != Interpolation::Nearest && coverage.image().color_model().is_indexed() {
            let grid_to_crs = coverage.grid_to_crs();
            let name = coverage.name().to_string();
            let crs = coverage.crs().clone();
            GridCoverage::with_grid_to_crs(name, coverage.into_image().expand_indexed(), grid_to_crs, crs)?
        } else {
            coverage
        };

        let options = geo::algo::WarpOptions {
            interpolation,
            ..self.options.clone()
        };

        Ok(geo::algo::warp(&coverage, target, &options)?)
    }
}
