use proj4rs::Proj;
use proj4rs::transform::transform;

use crate::Crs;
use crate::Error;
use crate::Point;
use crate::Result;

/// A coordinate reference system resolved into a usable projection.
#[derive(Debug, Clone)]
pub struct SpatialReference {
    srs: Proj,
    crs: Crs,
}

impl SpatialReference {
    pub fn from_crs(crs: &Crs) -> Result<Self> {
        let proj_str = crs
            .proj_definition()
            .ok_or_else(|| Error::UnsupportedCrs(format!("No projection definition available for {crs}")))?;

        Ok(Self {
            srs: Proj::from_proj_string(&proj_str)?,
            crs: crs.clone(),
        })
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn is_geographic(&self) -> bool {
        self.srs.is_latlong()
    }

    pub fn is_projected(&self) -> bool {
        !self.is_geographic()
    }

    fn proj(&self) -> &Proj {
        &self.srs
    }
}

/// Transforms points between two coordinate systems.
/// Geographic coordinates are expressed in degrees (x = longitude, y = latitude).
pub struct CoordinateTransformer {
    source: SpatialReference,
    target: SpatialReference,
}

impl CoordinateTransformer {
    pub fn new(source: &Crs, target: &Crs) -> Result<Self> {
        Ok(CoordinateTransformer {
            source: SpatialReference::from_crs(source)?,
            target: SpatialReference::from_crs(target)?,
        })
    }

    pub fn transform_point(&self, point: Point) -> Result<Point> {
        let mut p = point;
        self.transform_point_in_place(&mut p)?;
        Ok(p)
    }

    pub fn transform_point_in_place(&self, point: &mut Point) -> Result<()> {
        let input = *point;
        if self.source.is_geographic() {
            *point = point.to_radians();
        }

        transform(self.source.proj(), self.target.proj(), point)?;

        if self.target.is_geographic() {
            *point = point.to_degrees();
        }

        if !point.x().is_finite() || !point.y().is_finite() {
            return Err(Error::Transform(format!(
                "({}, {}) can not be transformed from {} to {}",
                input.x(),
                input.y(),
                self.source.crs(),
                self.target.crs()
            )));
        }

        Ok(())
    }

    pub fn transform_points_in_place(&self, points: &mut [Point]) -> Result<()> {
        for point in points.iter_mut() {
            self.transform_point_in_place(point)?;
        }
        Ok(())
    }

    pub fn source_crs(&self) -> &Crs {
        self.source.crs()
    }

    pub fn target_crs(&self) -> &Crs {
        self.target.crs()
    }
}
