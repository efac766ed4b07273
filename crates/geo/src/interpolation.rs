use crate::Image;

/// Resampling kernel used when pixels are mapped between grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    #[default]
    Nearest,
    Bilinear,
    Bicubic,
}

impl Interpolation {
    /// Number of source pixels needed left of the sample position
    pub const fn left_padding(&self) -> i64 {
        match self {
            Interpolation::Nearest | Interpolation::Bilinear => 0,
            Interpolation::Bicubic => 1,
        }
    }

    /// Number of source pixels needed right of the sample position
    pub const fn right_padding(&self) -> i64 {
        match self {
            Interpolation::Nearest => 0,
            Interpolation::Bilinear => 1,
            Interpolation::Bicubic => 2,
        }
    }

    pub const fn top_padding(&self) -> i64 {
        self.left_padding()
    }

    pub const fn bottom_padding(&self) -> i64 {
        self.right_padding()
    }

    /// Samples all the bands of the image at a continuous grid position.
    ///
    /// The position is expressed in pixel corner convention: pixel (i, j) spans [i, i + 1) x [j, j + 1).
    /// Returns false when the position does not hit a valid pixel, `out` is left untouched in that case.
    /// Kernels that need neighbours that are missing or invalid fall back to the nearest pixel.
    pub fn sample(&self, image: &Image, x: f64, y: f64, out: &mut [f64]) -> bool {
        let nearest_x = x.floor() as i64;
        let nearest_y = y.floor() as i64;
        if !image.is_valid(nearest_x, nearest_y) {
            return false;
        }

        let interpolated = match self {
            Interpolation::Nearest => false,
            Interpolation::Bilinear => sample_bilinear(image, x - 0.5, y - 0.5, out),
            Interpolation::Bicubic => sample_bicubic(image, x - 0.5, y - 0.5, out),
        };

        if !interpolated {
            for (band, value) in out.iter_mut().enumerate() {
                *value = image.value(band, nearest_x, nearest_y).unwrap_or_default();
            }
        }

        true
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interpolation::Nearest => write!(f, "nearest"),
            Interpolation::Bilinear => write!(f, "bilinear"),
            Interpolation::Bicubic => write!(f, "bicubic"),
        }
    }
}

fn neighbourhood_is_valid(image: &Image, x0: i64, y0: i64, size: i64) -> bool {
    (y0..y0 + size).all(|y| (x0..x0 + size).all(|x| image.is_valid(x, y)))
}

/// `u` and `v` are in pixel center convention
fn sample_bilinear(image: &Image, u: f64, v: f64, out: &mut [f64]) -> bool {
    let x0 = u.floor() as i64;
    let y0 = v.floor() as i64;
    if !neighbourhood_is_valid(image, x0, y0, 2) {
        return false;
    }

    let fx = u - x0 as f64;
    let fy = v - y0 as f64;
    for (band, value) in out.iter_mut().enumerate() {
        let px = |x, y| image.value(band, x, y).unwrap_or_default();
        let top = px(x0, y0) * (1.0 - fx) + px(x0 + 1, y0) * fx;
        let bottom = px(x0, y0 + 1) * (1.0 - fx) + px(x0 + 1, y0 + 1) * fx;
        *value = top * (1.0 - fy) + bottom * fy;
    }

    true
}

/// Keys cubic convolution kernel (a = -0.5)
fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.5;
    let t = t.abs();
    if t <= 1.0 {
        (A + 2.0) * t * t * t - (A + 3.0) * t * t + 1.0
    } else if t < 2.0 {
        A * t * t * t - 5.0 * A * t * t + 8.0 * A * t - 4.0 * A
    } else {
        0.0
    }
}

fn sample_bicubic(image: &Image, u: f64, v: f64, out: &mut [f64]) -> bool {
    let x0 = u.floor() as i64;
    let y0 = v.floor() as i64;
    if !neighbourhood_is_valid(image, x0 - 1, y0 - 1, 4) {
        return false;
    }

    let fx = u - x0 as f64;
    let fy = v - y0 as f64;
    let wx: [f64; 4] = std::array::from_fn(|i| cubic_weight(fx - (i as f64 - 1.0)));
    let wy: [f64; 4] = std::array::from_fn(|j| cubic_weight(fy - (j as f64 - 1.0)));

    for (band, value) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (j, weight_y) in wy.iter().enumerate() {
            for (i, weight_x) in wx.iter().enumerate() {
                let px = image.value(band, x0 - 1 + i as i64, y0 - 1 + j as i64).unwrap_or_default();
                sum += px * weight_x * weight_y;
            }
        }
        *value = sum;
    }

    true
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{ColorModel, PixelBounds, Result};

    fn gradient() -> Result<Image> {
        // 4x4 image where the value equals the column index
        let data = (0..16).map(|i| (i % 4) as f64).collect();
        Image::new(PixelBounds::new(0, 0, 4, 4), vec![data], ColorModel::opaque())
    }

    #[test]
    fn nearest_picks_containing_pixel() -> Result<()> {
        let image = gradient()?;
        let mut out = [0.0];
        assert!(Interpolation::Nearest.sample(&image, 2.9, 1.1, &mut out));
        assert_eq!(out[0], 2.0);
        assert!(!Interpolation::Nearest.sample(&image, 4.1, 1.1, &mut out));

        Ok(())
    }

    #[test]
    fn bilinear_interpolates_between_centers() -> Result<()> {
        let image = gradient()?;
        let mut out = [0.0];
        assert!(Interpolation::Bilinear.sample(&image, 2.0, 2.0, &mut out));
        assert_relative_eq!(out[0], 1.5);

        Ok(())
    }

    #[test]
    fn bicubic_reproduces_linear_gradient() -> Result<()> {
        let image = gradient()?;
        let mut out = [0.0];
        assert!(Interpolation::Bicubic.sample(&image, 2.25, 2.0, &mut out));
        assert_relative_eq!(out[0], 1.75, epsilon = 1e-9);

        Ok(())
    }

    #[test]
    fn edges_fall_back_to_nearest() -> Result<()> {
        let image = gradient()?;
        let mut out = [0.0];
        assert!(Interpolation::Bicubic.sample(&image, 0.2, 0.2, &mut out));
        assert_eq!(out[0], 0.0);

        Ok(())
    }

    #[test]
    fn cubic_kernel_properties() {
        assert_relative_eq!(cubic_weight(0.0), 1.0);
        assert_relative_eq!(cubic_weight(1.0), 0.0);
        assert_relative_eq!(cubic_weight(2.0), 0.0);
    }
}
