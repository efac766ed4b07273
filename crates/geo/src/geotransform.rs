use std::fmt::Debug;

use approx::{AbsDiffEq, RelativeEq};

use crate::{Error, Point, Result};

/// Tolerance used to decide whether an affine transform is the identity.
pub const AFFINE_IDENTITY_EPS: f64 = 1e-6;

/// Affine transform mapping a pixel-center based grid location onto the pixel corner.
/// Concatenating it after a center based grid-to-world transform yields the corner based variant.
pub const CENTER_TO_CORNER: GeoTransform = GeoTransform::translation(-0.5, -0.5);

/// Affine transform mapping a pixel-corner based grid location onto the pixel center.
pub const CORNER_TO_CENTER: GeoTransform = GeoTransform::translation(0.5, 0.5);

/// A 2D affine transform in the GDAL coefficient layout.
///
/// For a grid location (col, row) the transformed point is:
/// x = c[0] + c[1] * col + c[2] * row
/// y = c[3] + c[4] * col + c[5] * row
#[derive(Clone, Copy, PartialEq)]
pub struct GeoTransform([f64; 6]);

impl Default for GeoTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl GeoTransform {
    /// Creates a new `GeoTransform` from the provided coefficients.
    ///
    /// The coefficients are in the order: [top left x, pixel width, rotation (0 if north is up), top left y, rotation (0 if north is up), pixel height].
    pub const fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }

    pub const fn identity() -> Self {
        Self::new([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new([tx, 1.0, 0.0, ty, 0.0, 1.0])
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new([0.0, sx, 0.0, 0.0, 0.0, sy])
    }

    pub fn from_top_left_and_cell_size(top_left: Point, cell_size_x: f64, cell_size_y: f64) -> Self {
        Self::new([top_left.x(), cell_size_x, 0.0, top_left.y(), 0.0, cell_size_y])
    }

    /// Translates a grid location to a point.
    /// Location (0, 0) maps onto the origin of the transform.
    pub fn apply(&self, col: f64, row: f64) -> Point<f64> {
        let x = self.0[0] + self.0[1] * col + self.0[2] * row;
        let y = self.0[3] + self.0[4] * col + self.0[5] * row;
        Point::new(x, y)
    }

    pub fn apply_to_point(&self, point: Point) -> Point {
        self.apply(point.x(), point.y())
    }

    /// Transforms the points in place, fails when a transformed coordinate is not finite.
    pub fn transform_points_in_place(&self, points: &mut [Point]) -> Result<()> {
        for point in points.iter_mut() {
            let transformed = self.apply_to_point(*point);
            if !transformed.x().is_finite() || !transformed.y().is_finite() {
                return Err(Error::Transform(format!(
                    "{:?} does not map ({}, {}) onto a finite location",
                    self,
                    point.x(),
                    point.y()
                )));
            }

            *point = transformed;
        }

        Ok(())
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.0[0], self.0[3])
    }

    /// The horizontal cell size
    pub fn cell_size_x(&self) -> f64 {
        self.0[1]
    }

    /// The verical cell size
    pub fn cell_size_y(&self) -> f64 {
        self.0[5]
    }

    pub fn scale_x(&self) -> f64 {
        self.0[1]
    }

    pub fn scale_y(&self) -> f64 {
        self.0[5]
    }

    pub fn shear_x(&self) -> f64 {
        self.0[2]
    }

    pub fn shear_y(&self) -> f64 {
        self.0[4]
    }

    pub fn translate_x(&self) -> f64 {
        self.0[0]
    }

    pub fn translate_y(&self) -> f64 {
        self.0[3]
    }

    /// Returns the coefficients of the transformation.
    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// `self = self ∘ other`: `other` is applied first, then `self`.
    ///
    /// Used to switch the input convention of a transform, e.g. concatenating
    /// [`CENTER_TO_CORNER`] onto a pixel-center grid-to-world transform.
    pub fn concatenate(&mut self, other: &GeoTransform) {
        *self = Self::compose(self, other);
    }

    /// `self = other ∘ self`: `self` is applied first, then `other`.
    ///
    /// Used to switch the output space of a transform, e.g. pre-concatenating a
    /// world-to-grid transform onto a grid-to-world transform.
    pub fn pre_concatenate(&mut self, other: &GeoTransform) {
        *self = Self::compose(other, self);
    }

    /// Returns `outer ∘ inner`
    fn compose(outer: &GeoTransform, inner: &GeoTransform) -> GeoTransform {
        let a = &outer.0;
        let b = &inner.0;

        GeoTransform([
            a[0] + a[1] * b[0] + a[2] * b[3],
            a[1] * b[1] + a[2] * b[4],
            a[1] * b[2] + a[2] * b[5],
            a[3] + a[4] * b[0] + a[5] * b[3],
            a[4] * b[1] + a[5] * b[4],
            a[4] * b[2] + a[5] * b[5],
        ])
    }

    /// True when every coefficient is within `eps` of the identity transform.
    pub fn is_identity(&self, eps: f64) -> bool {
        let c = &self.0;
        (c[1] - 1.0).abs() <= eps
            && (c[5] - 1.0).abs() <= eps
            && c[2].abs() <= eps
            && c[4].abs() <= eps
            && c[0].abs() <= eps
            && c[3].abs() <= eps
    }

    pub fn invert(&self) -> Result<Self> {
        let gt_in = &self.0;

        if gt_in[2] == 0.0 && gt_in[4] == 0.0 && gt_in[1] != 0.0 && gt_in[5] != 0.0 {
            // No rotation: avoid computing the determinant and the precision loss that comes with it.
            // X = gt_in[0] + x * gt_in[1]
            // Y = gt_in[3] + y * gt_in[5]
            // -->
            // x = -gt_in[0] / gt_in[1] + (1 / gt_in[1]) * X
            // y = -gt_in[3] / gt_in[5] + (1 / gt_in[5]) * Y
            return Ok(GeoTransform([
                -gt_in[0] / gt_in[1],
                1.0 / gt_in[1],
                0.0,
                -gt_in[3] / gt_in[5],
                0.0,
                1.0 / gt_in[5],
            ]));
        }

        // Assume a 3rd row that is [1 0 0].
        let det = gt_in[1] * gt_in[5] - gt_in[2] * gt_in[4];
        let magnitude = f64::max(f64::max(gt_in[1].abs(), gt_in[2].abs()), f64::max(gt_in[4].abs(), gt_in[5].abs()));

        if det.abs() <= 1e-10 * magnitude * magnitude {
            return Err(Error::Transform(
                "GeoTransform::invert: Determinate is too small, cannot compute inverse.".to_string(),
            ));
        }

        let inv_det = 1.0 / det;

        // Compute adjoint, and divide by determinate
        let mut gt_out = [0.0; 6];
        gt_out[1] = gt_in[5] * inv_det;
        gt_out[4] = -gt_in[4] * inv_det;

        gt_out[2] = -gt_in[2] * inv_det;
        gt_out[5] = gt_in[1] * inv_det;

        gt_out[0] = (gt_in[2] * gt_in[3] - gt_in[0] * gt_in[5]) * inv_det;
        gt_out[3] = (-gt_in[1] * gt_in[3] + gt_in[0] * gt_in[4]) * inv_det;

        Ok(gt_out.into())
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(geo_trans: GeoTransform) -> [f64; 6] {
        geo_trans.0
    }
}

impl Debug for GeoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GeoTransform(origin: ({}, {}), scale: ({}, {}), shear: ({}, {}))",
            self.0[0],
            self.0[3],
            self.scale_x(),
            self.scale_y(),
            self.shear_x(),
            self.shear_y()
        )
    }
}

impl AbsDiffEq for GeoTransform {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for GeoTransform {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}
