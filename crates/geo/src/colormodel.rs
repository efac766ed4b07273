/// Describes how the bands of an image are to be interpreted as color.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorModel {
    /// Every band is a color (or data) component, when `alpha` is set the last band is the alpha channel.
    Component { alpha: bool },
    /// A single band of palette indexes.
    Indexed(Palette),
}

impl ColorModel {
    pub const fn opaque() -> Self {
        ColorModel::Component { alpha: false }
    }

    pub const fn with_alpha() -> Self {
        ColorModel::Component { alpha: true }
    }

    pub fn has_alpha(&self) -> bool {
        match self {
            ColorModel::Component { alpha } => *alpha,
            ColorModel::Indexed(palette) => palette.has_alpha(),
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, ColorModel::Indexed(_))
    }
}

impl Default for ColorModel {
    fn default() -> Self {
        ColorModel::opaque()
    }
}

/// RGBA palette for indexed images.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    entries: Vec<[u8; 4]>,
}

impl Palette {
    pub fn new(entries: Vec<[u8; 4]>) -> Self {
        Palette { entries }
    }

    pub fn from_rgb(entries: &[[u8; 3]]) -> Self {
        Palette {
            entries: entries.iter().map(|&[r, g, b]| [r, g, b, u8::MAX]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A palette has alpha as soon as one of its entries is not fully opaque
    pub fn has_alpha(&self) -> bool {
        self.entries.iter().any(|entry| entry[3] != u8::MAX)
    }

    /// Lookup of a palette entry, values that are not a valid index yield `None`
    pub fn entry(&self, index: f64) -> Option<[u8; 4]> {
        if !index.is_finite() || index < 0.0 {
            return None;
        }

        self.entries.get(index as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_alpha() {
        assert!(!Palette::from_rgb(&[[0, 0, 0], [255, 255, 255]]).has_alpha());
        assert!(Palette::new(vec![[0, 0, 0, 0], [255, 255, 255, 255]]).has_alpha());
        assert!(ColorModel::Indexed(Palette::new(vec![[0, 0, 0, 128]])).has_alpha());
        assert!(!ColorModel::opaque().has_alpha());
    }

    #[test]
    fn palette_lookup() {
        let palette = Palette::from_rgb(&[[1, 2, 3]]);
        assert_eq!(palette.entry(0.0), Some([1, 2, 3, 255]));
        assert_eq!(palette.entry(1.0), None);
        assert_eq!(palette.entry(-1.0), None);
        assert_eq!(palette.entry(f64::NAN), None);
    }
}
