use std::collections::BTreeMap;

use geo::{Image, Roi};

/// Per pixel side channel metadata of a raster (statistics, band descriptions, ...).
/// It is carried along unchanged through compositing and reprojection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuxiliaryMetadata {
    properties: BTreeMap<String, String>,
}

impl AuxiliaryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A raster ready for the final mosaic together with its validity information.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicElement {
    image: Image,
    alpha: Option<Image>,
    roi: Option<Roi>,
    aux_metadata: Option<AuxiliaryMetadata>,
}

impl MosaicElement {
    pub fn new(image: Image) -> Self {
        MosaicElement {
            image,
            alpha: None,
            roi: None,
            aux_metadata: None,
        }
    }

    pub fn with_alpha(mut self, alpha: Option<Image>) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_roi(mut self, roi: Option<Roi>) -> Self {
        self.roi = roi;
        self
    }

    pub fn with_aux_metadata(mut self, aux_metadata: Option<AuxiliaryMetadata>) -> Self {
        self.aux_metadata = aux_metadata;
        self
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn alpha(&self) -> Option<&Image> {
        self.alpha.as_ref()
    }

    pub fn roi(&self) -> Option<&Roi> {
        self.roi.as_ref()
    }

    pub fn aux_metadata(&self) -> Option<&AuxiliaryMetadata> {
        self.aux_metadata.as_ref()
    }

    /// Splits the element in its raster and the auxiliary metadata
    pub fn into_parts(self) -> (Image, Option<Roi>, Option<AuxiliaryMetadata>) {
        (self.image, self.roi, self.aux_metadata)
    }
}
