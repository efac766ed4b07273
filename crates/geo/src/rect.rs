//! Axis aligned world space rectangles.

use approx::{AbsDiffEq, RelativeEq};

use crate::Point;

/// World space rectangle, always stored normalized (min <= max on both axes).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Rect {
    /// Creates the rectangle spanned by two corner points, in any order.
    pub fn from_points(p1: Point, p2: Point) -> Self {
        Rect {
            min_x: p1.x().min(p2.x()),
            min_y: p1.y().min(p2.y()),
            max_x: p1.x().max(p2.x()),
            max_y: p1.y().max(p2.y()),
        }
    }

    pub fn from_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::from_points(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Bounding rectangle of all the points, `None` for an empty slice
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        Some(points.iter().skip(1).fold(Rect::from_points(*first, *first), |rect, p| Rect {
            min_x: rect.min_x.min(p.x()),
            min_y: rect.min_y.min(p.y()),
            max_x: rect.max_x.max(p.x()),
            max_y: rect.max_y.max(p.y()),
        }))
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.min_x, self.max_y)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.max_x, self.min_y)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}

impl AbsDiffEq for Rect {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.top_left().abs_diff_eq(&other.top_left(), epsilon) && self.bottom_right().abs_diff_eq(&other.bottom_right(), epsilon)
    }
}

impl RelativeEq for Rect {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        Point::relative_eq(&self.top_left(), &other.top_left(), epsilon, max_relative)
            && Point::relative_eq(&self.bottom_right(), &other.bottom_right(), epsilon, max_relative)
    }
}
