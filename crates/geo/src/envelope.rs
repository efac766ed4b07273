use crate::{Crs, Rect};

/// A world space rectangle tagged with the coordinate reference system it is expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    rect: Rect,
    crs: Crs,
}

impl Envelope {
    pub fn new(rect: Rect, crs: Crs) -> Self {
        Envelope { rect, crs }
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}] - [{}, {}] ({})",
            self.rect.min_x(),
            self.rect.min_y(),
            self.rect.max_x(),
            self.rect.max_y(),
            self.crs
        )
    }
}
