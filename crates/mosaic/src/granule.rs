use std::sync::Arc;

use geo::{Crs, Envelope, Image};

use crate::AuxiliaryMetadata;

/// Provides the pixels of a granule, reading is deferred until the granule gets composited.
pub trait PixelSource: std::fmt::Debug + Send + Sync {
    fn read(&self) -> geo::Result<Image>;
}

/// Pixel source for images that are already in memory
#[derive(Debug, Clone)]
pub struct InMemorySource {
    image: Image,
}

impl InMemorySource {
    pub fn new(image: Image) -> Self {
        InMemorySource { image }
    }
}

impl PixelSource for InMemorySource {
    fn read(&self) -> geo::Result<Image> {
        Ok(self.image.clone())
    }
}

/// An input raster tile, its envelope determines where the pixels of the source are located.
#[derive(Debug, Clone)]
pub struct Granule {
    envelope: Envelope,
    source: Arc<dyn PixelSource>,
    aux_metadata: Option<AuxiliaryMetadata>,
}

impl Granule {
    pub fn new(envelope: Envelope, source: Arc<dyn PixelSource>) -> Self {
        Granule {
            envelope,
            source,
            aux_metadata: None,
        }
    }

    pub fn in_memory(envelope: Envelope, image: Image) -> Self {
        Self::new(envelope, Arc::new(InMemorySource::new(image)))
    }

    pub fn with_aux_metadata(mut self, aux_metadata: Option<AuxiliaryMetadata>) -> Self {
        self.aux_metadata = aux_metadata;
        self
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn crs(&self) -> &Crs {
        self.envelope.crs()
    }

    pub fn source(&self) -> &Arc<dyn PixelSource> {
        &self.source
    }

    pub fn aux_metadata(&self) -> Option<&AuxiliaryMetadata> {
        self.aux_metadata.as_ref()
    }

    pub fn read(&self) -> geo::Result<Image> {
        self.source.read()
    }
}
