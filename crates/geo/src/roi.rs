use crate::PixelBounds;

/// Region of interest: a mask marking the pixels of an image that carry meaningful data.
/// Pixels outside of the mask bounds are outside the region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roi {
    bounds: PixelBounds,
    mask: Vec<bool>,
}

impl Roi {
    /// Region covering every pixel of the bounds
    pub fn full(bounds: PixelBounds) -> Self {
        Roi {
            bounds,
            mask: vec![true; bounds.size().cell_count()],
        }
    }

    pub fn from_fn(bounds: PixelBounds, mut inside: impl FnMut(i64, i64) -> bool) -> Self {
        let mut mask = Vec::with_capacity(bounds.size().cell_count());
        for y in bounds.min_y..bounds.max_y() {
            for x in bounds.min_x..bounds.max_x() {
                mask.push(inside(x, y));
            }
        }

        Roi { bounds, mask }
    }

    pub fn bounds(&self) -> PixelBounds {
        self.bounds
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.bounds.index_of(x, y).is_some_and(|index| self.mask[index])
    }

    pub fn is_empty(&self) -> bool {
        !self.mask.iter().any(|&inside| inside)
    }

    pub fn pixel_count(&self) -> usize {
        self.mask.iter().filter(|&&inside| inside).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_lookup() {
        let roi = Roi::from_fn(PixelBounds::new(5, 5, 2, 2), |x, y| x == y);
        assert!(roi.contains(5, 5));
        assert!(roi.contains(6, 6));
        assert!(!roi.contains(5, 6));
        assert!(!roi.contains(7, 7));
        assert_eq!(roi.pixel_count(), 2);
        assert!(!roi.is_empty());
    }
}
