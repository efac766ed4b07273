/// Raster size represented by rows and columns.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterSize {
    pub rows: usize,
    pub cols: usize,
}

impl RasterSize {
    pub const fn with_rows_cols(rows: usize, cols: usize) -> Self {
        RasterSize { rows, cols }
    }

    pub const fn square(size: usize) -> Self {
        RasterSize { rows: size, cols: size }
    }

    pub fn empty() -> Self {
        Self::with_rows_cols(0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

impl std::fmt::Display for RasterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(rows: {}, cols: {})", self.rows, self.cols)
    }
}

impl std::fmt::Debug for RasterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Pixel extent of an image: the origin of its first pixel and its size.
/// The origin is not necessarily (0, 0), images that are placed in a larger pixel grid carry their offset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelBounds {
    pub min_x: i64,
    pub min_y: i64,
    pub width: usize,
    pub height: usize,
}

impl PixelBounds {
    pub const fn new(min_x: i64, min_y: i64, width: usize, height: usize) -> Self {
        PixelBounds {
            min_x,
            min_y,
            width,
            height,
        }
    }

    pub const fn with_size(size: RasterSize) -> Self {
        Self::new(0, 0, size.cols, size.rows)
    }

    pub fn size(&self) -> RasterSize {
        RasterSize::with_rows_cols(self.height, self.width)
    }

    /// Exclusive end on the x axis
    pub fn max_x(&self) -> i64 {
        self.min_x + self.width as i64
    }

    /// Exclusive end on the y axis
    pub fn max_y(&self) -> i64 {
        self.min_y + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.min_x && x < self.max_x() && y >= self.min_y && y < self.max_y()
    }

    /// Index of the pixel in a row major buffer covering these bounds, `None` when the pixel is outside.
    pub fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }

        Some((y - self.min_y) as usize * self.width + (x - self.min_x) as usize)
    }

    /// Smallest bounds containing both, an empty bounds does not contribute.
    pub fn union(&self, other: &PixelBounds) -> PixelBounds {
        if self.is_empty() {
            return *other;
        }

        if other.is_empty() {
            return *self;
        }

        let min_x = self.min_x.min(other.min_x);
        let min_y = self.min_y.min(other.min_y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        PixelBounds::new(min_x, min_y, (max_x - min_x) as usize, (max_y - min_y) as usize)
    }

    /// Overlapping part of both bounds, empty when they do not overlap.
    pub fn intersection(&self, other: &PixelBounds) -> PixelBounds {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        if max_x <= min_x || max_y <= min_y {
            return PixelBounds::new(min_x, min_y, 0, 0);
        }

        PixelBounds::new(min_x, min_y, (max_x - min_x) as usize, (max_y - min_y) as usize)
    }
}

impl std::fmt::Display for PixelBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[x: {}, y: {}, width: {}, height: {}]", self.min_x, self.min_y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_index() {
        let bounds = PixelBounds::new(10, 20, 3, 2);
        assert_eq!(bounds.index_of(10, 20), Some(0));
        assert_eq!(bounds.index_of(12, 21), Some(5));
        assert_eq!(bounds.index_of(13, 21), None);
        assert_eq!(bounds.index_of(9, 20), None);
    }

    #[test]
    fn union_ignores_empty() {
        let bounds = PixelBounds::new(-2, 0, 4, 4);
        assert_eq!(bounds.union(&PixelBounds::default()), bounds);
        assert_eq!(bounds.union(&PixelBounds::new(1, 3, 5, 2)), PixelBounds::new(-2, 0, 8, 5));
    }

    #[test]
    fn intersection_of_bounds() {
        let bounds = PixelBounds::new(0, 0, 10, 10);
        assert_eq!(bounds.intersection(&PixelBounds::new(5, -5, 10, 10)), PixelBounds::new(5, 0, 5, 5));
        assert!(bounds.intersection(&PixelBounds::new(10, 0, 5, 5)).is_empty());
    }
}
