use std::sync::Arc;

use geo::Crs;

use crate::{Compositor, Granule, MergeBehavior, MosaicElement, Result, TargetContext};

/// Accepts granules and turns them into mosaic elements.
pub trait SubmosaicProducer {
    /// Returns true when the granule was absorbed by the producer
    fn accept(&mut self, granule: Granule) -> bool;
    /// Composites the accepted granules
    fn create_mosaic(&mut self) -> Result<Vec<MosaicElement>>;
    /// True when the last created mosaic carries an alpha channel
    fn has_alpha(&self) -> bool;
}

/// Collects granules and merges them in the grid of its context.
pub struct GranuleCollector {
    context: Arc<TargetContext>,
    compositor: Arc<dyn Compositor>,
    granules: Vec<Granule>,
    accepted: usize,
    has_alpha: bool,
}

impl GranuleCollector {
    pub fn new(context: Arc<TargetContext>, compositor: Arc<dyn Compositor>) -> Self {
        GranuleCollector {
            context,
            compositor,
            granules: Vec::new(),
            accepted: 0,
            has_alpha: false,
        }
    }

    pub fn context(&self) -> &Arc<TargetContext> {
        &self.context
    }

    /// Number of granules accepted so far, also counts the granules of a dry run
    pub fn granule_count(&self) -> usize {
        self.accepted
    }
}

impl SubmosaicProducer for GranuleCollector {
    fn accept(&mut self, granule: Granule) -> bool {
        self.accepted += 1;
        if !self.context.options().dry_run {
            self.granules.push(granule);
        }

        true
    }

    fn create_mosaic(&mut self) -> Result<Vec<MosaicElement>> {
        let granules = std::mem::take(&mut self.granules);
        if granules.is_empty() {
            return Ok(Vec::new());
        }

        Ok(match self.compositor.merge(&self.context, &granules, MergeBehavior::Flat)? {
            Some(merged) => {
                self.has_alpha = merged.has_alpha;
                vec![merged.element]
            }
            None => Vec::new(),
        })
    }

    fn has_alpha(&self) -> bool {
        self.has_alpha
    }
}

/// Only accepts granules in a single coordinate system.
pub struct CrsBoundProducer {
    crs: Crs,
    collector: GranuleCollector,
}

impl CrsBoundProducer {
    /// The seed granule determines the coordinate system and is always accepted.
    pub fn new(context: Arc<TargetContext>, compositor: Arc<dyn Compositor>, seed: Granule) -> Self {
        let mut collector = GranuleCollector::new(context, compositor);
        let crs = seed.crs().clone();
        collector.accept(seed);

        CrsBoundProducer { crs, collector }
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn context(&self) -> &Arc<TargetContext> {
        self.collector.context()
    }

    pub fn granule_count(&self) -> usize {
        self.collector.granule_count()
    }

    pub fn accepts(&self, granule: &Granule) -> bool {
        granule.crs().equals_ignore_metadata(&self.crs)
    }
}

impl SubmosaicProducer for CrsBoundProducer {
    fn accept(&mut self, granule: Granule) -> bool {
        if !self.accepts(&granule) {
            return false;
        }

        self.collector.accept(granule)
    }

    fn create_mosaic(&mut self) -> Result<Vec<MosaicElement>> {
        self.collector.create_mosaic()
    }

    fn has_alpha(&self) -> bool {
        self.collector.has_alpha()
    }
}
