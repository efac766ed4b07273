use std::sync::Arc;

use geo::{Crs, Envelope};

use crate::{
    Compositor, CrsBoundProducer, Granule, MosaicElement, ReprojectionContextFactory, Reprojector, Resampler, Result, SubmosaicProducer,
    TargetContext,
};

/// The group that receives the incoming granules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupState {
    #[default]
    NoGroup,
    /// Index in the list of groups
    Group(usize),
}

/// A granule that was not absorbed because no output context could be derived for its coordinate system
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedGranule {
    pub envelope: Envelope,
    pub reason: String,
}

impl DroppedGranule {
    pub fn crs(&self) -> &Crs {
        self.envelope.crs()
    }
}

/// Read only view on a group of granules
#[derive(Debug, Clone, PartialEq)]
pub struct GroupInfo {
    pub crs: Crs,
    pub granule_count: usize,
}

/// Groups consecutive granules that share a coordinate system, merges every group in its own coordinate system
/// and reprojects the merged rasters into the output grid.
///
/// Granules are expected to be sorted on coordinate system: a change of coordinate system always starts a new group,
/// groups that were left are never reopened.
pub struct ReprojectingProducer {
    target: Arc<TargetContext>,
    context_factory: Arc<dyn ReprojectionContextFactory>,
    compositor: Arc<dyn Compositor>,
    reprojector: Reprojector,
    groups: Vec<CrsBoundProducer>,
    state: GroupState,
    dropped: Vec<DroppedGranule>,
    has_alpha: bool,
}

impl ReprojectingProducer {
    pub fn new(
        target: Arc<TargetContext>,
        context_factory: Arc<dyn ReprojectionContextFactory>,
        compositor: Arc<dyn Compositor>,
        resampler: Arc<dyn Resampler>,
    ) -> Self {
        ReprojectingProducer {
            reprojector: Reprojector::new(target.clone(), resampler),
            target,
            context_factory,
            compositor,
            groups: Vec::new(),
            state: GroupState::NoGroup,
            dropped: Vec::new(),
            has_alpha: false,
        }
    }

    /// Producer with the default collaborators: warping context factory, flat compositor and warp resampler
    #[cfg(feature = "proj4rs")]
    pub fn with_defaults(target: Arc<TargetContext>) -> Self {
        let resampler = crate::WarpResampler::with_background(target.background_values().to_vec());
        Self::new(
            target,
            Arc::new(crate::WarpingContextFactory::new()),
            Arc::new(crate::FlatCompositor),
            Arc::new(resampler),
        )
    }

    pub fn target(&self) -> &TargetContext {
        &self.target
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    pub fn groups(&self) -> Vec<GroupInfo> {
        self.groups
            .iter()
            .map(|group| GroupInfo {
                crs: group.crs().clone(),
                granule_count: group.granule_count(),
            })
            .collect()
    }

    pub fn dropped_granules(&self) -> &[DroppedGranule] {
        &self.dropped
    }

    fn open_group(&mut self, granule: Granule) -> bool {
        let context = match self.context_factory.reproject_to(&self.target, &granule) {
            Ok(context) => context,
            Err(e) => {
                log::warn!("Dropping granule {}: failed to set up the output context ({e})", granule.envelope());
                self.dropped.push(DroppedGranule {
                    envelope: granule.envelope().clone(),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        log::debug!("Opening submosaic group {} for {}", self.groups.len(), granule.crs());
        self.groups
            .push(CrsBoundProducer::new(Arc::new(context), self.compositor.clone(), granule));
        self.state = GroupState::Group(self.groups.len() - 1);
        true
    }
}

impl SubmosaicProducer for ReprojectingProducer {
    fn accept(&mut self, granule: Granule) -> bool {
        if let GroupState::Group(index) = self.state
            && let Some(group) = self.groups.get_mut(index)
            && group.accepts(&granule)
        {
            return group.accept(granule);
        }

        self.open_group(granule)
    }

    fn create_mosaic(&mut self) -> Result<Vec<MosaicElement>> {
        let mut elements = Vec::new();
        let mut has_alpha = false;

        for group in &mut self.groups {
            let merged = group.create_mosaic()?;
            has_alpha |= group.has_alpha();

            for element in merged {
                match self.reprojector.reproject(element, group.context(), group.crs())? {
                    Some(element) => elements.push(element),
                    None => log::info!("Submosaic of {} is not part of the output", group.crs()),
                }
            }
        }

        self.has_alpha = has_alpha;
        Ok(elements)
    }

    fn has_alpha(&self) -> bool {
        self.has_alpha
    }
}
