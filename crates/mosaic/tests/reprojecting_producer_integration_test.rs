use std::sync::Arc;

use geo::{ColorModel, Crs, Envelope, GeoTransform, GridCoverage, Image, Interpolation, PixelBounds, RasterSize, Rect, Roi, crs::epsg};
use mosaic::{
    AuxiliaryMetadata, Error, FlatCompositor, Granule, GroupState, MosaicOptions, ReprojectingProducer, ReprojectionContextFactory, Resampler,
    Result, SubmosaicProducer, TargetContext,
};

/// Output grid of 4x4 pixels of 1 unit, top left at (0, 4)
fn target(interpolation: Interpolation) -> Arc<TargetContext> {
    let options = MosaicOptions {
        interpolation,
        background_values: vec![0.0],
        dry_run: false,
    };

    Arc::new(
        TargetContext::new(
            Crs::from_epsg(epsg::BELGIAN_LAMBERT72),
            GeoTransform::new([0.0, 1.0, 0.0, 4.0, 0.0, -1.0]),
            RasterSize::with_rows_cols(4, 4),
            options,
        )
        .expect("valid target"),
    )
}

/// Reuses the output grid for every coordinate system, fails for geographic systems
struct SharedGridFactory;

impl ReprojectionContextFactory for SharedGridFactory {
    fn reproject_to(&self, target: &TargetContext, granule: &Granule) -> Result<TargetContext> {
        if granule.crs().equals_ignore_metadata(&Crs::from_epsg(epsg::WGS84)) {
            return Err(Error::ContextSetup {
                crs: granule.crs().to_string(),
                reason: "geographic coordinate systems are not supported".into(),
            });
        }

        TargetContext::new(
            granule.crs().clone(),
            *target.grid_to_world(),
            target.raster_size(),
            target.options().clone(),
        )
    }
}

/// Relabels the coverage in the target coordinate system and marks all pixels as valid
struct RelabelResampler;

impl Resampler for RelabelResampler {
    fn resample(&self, coverage: GridCoverage, target: &Crs, _interpolation: Interpolation) -> Result<GridCoverage> {
        let grid_to_crs = coverage.grid_to_crs();
        let name = coverage.name().to_string();
        let image = coverage.into_image();
        let roi = Roi::full(image.bounds());
        Ok(GridCoverage::with_grid_to_crs(
            name,
            image.with_roi(Some(roi)),
            grid_to_crs,
            target.clone(),
        )?)
    }
}

fn granule(rect: Rect, crs: Crs, width: usize, height: usize, value: f64) -> Granule {
    let image = Image::filled(PixelBounds::new(0, 0, width, height), 1, value, ColorModel::opaque()).expect("valid image");
    Granule::in_memory(Envelope::new(rect, crs), image)
}

fn lambert() -> Crs {
    Crs::from_epsg(epsg::BELGIAN_LAMBERT72)
}

fn utm() -> Crs {
    Crs::from_epsg(epsg::WGS84_UTM31N)
}

fn producer(interpolation: Interpolation) -> ReprojectingProducer {
    ReprojectingProducer::new(
        target(interpolation),
        Arc::new(SharedGridFactory),
        Arc::new(FlatCompositor),
        Arc::new(RelabelResampler),
    )
}

#[test_log::test]
fn granules_are_grouped_per_crs_run() -> Result<()> {
    let mut producer = producer(Interpolation::Nearest);

    assert!(producer.accept(granule(Rect::from_bounds(0.0, 2.0, 2.0, 4.0), lambert(), 2, 2, 1.0)));
    assert!(producer.accept(granule(
        Rect::from_bounds(2.0, 2.0, 4.0, 4.0),
        lambert().with_name("Belge 1972 / Belgian Lambert 72"),
        2,
        2,
        2.0
    )));
    assert!(producer.accept(granule(Rect::from_bounds(0.0, 0.0, 2.0, 2.0), utm(), 2, 2, 3.0)));

    let groups = producer.groups();
    assert_eq!(groups.len(), 2);
    assert!(groups[0].crs.equals_ignore_metadata(&lambert()));
    assert_eq!(groups[0].granule_count, 2);
    assert!(groups[1].crs.equals_ignore_metadata(&utm()));
    assert_eq!(groups[1].granule_count, 1);
    assert_eq!(producer.state(), GroupState::Group(1));

    let elements = producer.create_mosaic()?;
    assert_eq!(elements.len(), 2);

    Ok(())
}

#[test_log::test]
fn crs_change_never_reopens_a_group() {
    let mut producer = producer(Interpolation::Nearest);

    producer.accept(granule(Rect::from_bounds(0.0, 2.0, 2.0, 4.0), lambert(), 2, 2, 1.0));
    producer.accept(granule(Rect::from_bounds(0.0, 0.0, 2.0, 2.0), utm(), 2, 2, 3.0));
    producer.accept(granule(Rect::from_bounds(2.0, 2.0, 4.0, 4.0), lambert(), 2, 2, 2.0));

    let groups = producer.groups();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups.iter().map(|group| group.granule_count).collect::<Vec<_>>(), vec![1, 1, 1]);
    assert!(groups[2].crs.equals_ignore_metadata(&lambert()));
}

#[test_log::test]
fn target_crs_passes_through_other_crs_is_resampled() -> Result<()> {
    let mut producer = producer(Interpolation::Nearest);

    let aux = AuxiliaryMetadata::new().with_property("STATISTICS_MAXIMUM", "3");
    producer.accept(granule(Rect::from_bounds(0.0, 2.0, 2.0, 4.0), lambert(), 2, 2, 1.0));
    producer.accept(granule(Rect::from_bounds(1.0, 0.0, 3.0, 2.0), utm(), 2, 2, 3.0).with_aux_metadata(Some(aux.clone())));

    let elements = producer.create_mosaic()?;
    assert_eq!(elements.len(), 2);

    // Merged in the target grid, not resampled
    let lambert_element = &elements[0];
    assert_eq!(lambert_element.image().bounds(), PixelBounds::new(0, 0, 2, 2));
    assert_eq!(lambert_element.image().band(0), &[1.0; 4]);

    // Resampled and positioned in the target grid
    let utm_element = &elements[1];
    assert_eq!(utm_element.image().bounds(), PixelBounds::new(1, 2, 2, 2));
    assert_eq!(utm_element.image().band(0), &[3.0; 4]);
    assert_eq!(utm_element.roi().map(Roi::pixel_count), Some(4));
    assert!(utm_element.alpha().is_none());
    assert_eq!(utm_element.aux_metadata(), Some(&aux));

    assert!(!producer.has_alpha());

    Ok(())
}

#[test_log::test]
fn context_setup_failure_drops_the_granule() -> Result<()> {
    let mut producer = producer(Interpolation::Nearest);

    assert!(!producer.accept(granule(Rect::from_bounds(0.0, 0.0, 1.0, 1.0), Crs::from_epsg(epsg::WGS84), 2, 2, 9.0)));
    assert_eq!(producer.state(), GroupState::NoGroup);
    assert!(producer.groups().is_empty());

    let dropped = producer.dropped_granules();
    assert_eq!(dropped.len(), 1);
    assert!(dropped[0].crs().equals_ignore_metadata(&Crs::from_epsg(epsg::WGS84)));
    assert!(dropped[0].reason.contains("not supported"));

    assert!(producer.accept(granule(Rect::from_bounds(0.0, 2.0, 2.0, 4.0), lambert(), 2, 2, 1.0)));
    assert_eq!(producer.groups().len(), 1);
    assert_eq!(producer.create_mosaic()?.len(), 1);

    Ok(())
}

#[test_log::test]
fn degenerate_layout_omits_the_element() -> Result<()> {
    let mut producer = producer(Interpolation::Bicubic);

    producer.accept(granule(Rect::from_bounds(0.0, 0.0, 2.0, 4.0), lambert(), 2, 4, 1.0));
    // Single pixel wide source: the bicubic kernel does not fit
    producer.accept(granule(Rect::from_bounds(2.0, 0.0, 3.0, 4.0), utm(), 1, 4, 2.0));

    let elements = producer.create_mosaic()?;
    assert_eq!(producer.groups().len(), 2);
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].image().band(0), &[1.0; 8]);

    Ok(())
}

#[test_log::test]
fn dry_run_routes_without_output() -> Result<()> {
    let options = MosaicOptions {
        dry_run: true,
        ..Default::default()
    };
    let target = Arc::new(TargetContext::new(
        lambert(),
        GeoTransform::new([0.0, 1.0, 0.0, 4.0, 0.0, -1.0]),
        RasterSize::with_rows_cols(4, 4),
        options,
    )?);

    let mut producer = ReprojectingProducer::new(target, Arc::new(SharedGridFactory), Arc::new(FlatCompositor), Arc::new(RelabelResampler));
    assert!(producer.accept(granule(Rect::from_bounds(0.0, 2.0, 2.0, 4.0), lambert(), 2, 2, 1.0)));
    assert!(producer.accept(granule(Rect::from_bounds(0.0, 0.0, 2.0, 2.0), utm(), 2, 2, 3.0)));

    assert_eq!(producer.groups().len(), 2);
    assert!(producer.create_mosaic()?.is_empty());

    Ok(())
}

#[cfg(feature = "proj4rs")]
#[test_log::test]
fn reproject_geographic_granule_into_lambert() -> Result<()> {
    let target = Arc::new(TargetContext::from_envelope(
        &Envelope::new(Rect::from_bounds(100000.0, 190000.0, 120000.0, 200000.0), lambert()),
        RasterSize::with_rows_cols(100, 200),
        MosaicOptions::default(),
    )?);

    let mut producer = ReprojectingProducer::with_defaults(target);
    assert!(producer.accept(granule(
        Rect::from_bounds(100000.0, 190000.0, 120000.0, 200000.0),
        lambert(),
        200,
        100,
        1.0
    )));
    assert!(producer.accept(granule(
        Rect::from_bounds(3.70, 51.02, 3.72, 51.04),
        Crs::from_epsg(epsg::WGS84),
        20,
        20,
        2.0
    )));

    let elements = producer.create_mosaic()?;
    assert_eq!(elements.len(), 2);
    assert!(producer.dropped_granules().is_empty());

    // Aligned with the output grid, kept as is
    assert_eq!(elements[0].image().bounds(), PixelBounds::new(0, 0, 200, 100));

    let reprojected = &elements[1];
    let roi = reprojected.roi().expect("reprojected elements carry a roi");
    assert!(roi.pixel_count() > 0);
    assert!(!reprojected.image().bounds().intersection(&PixelBounds::new(0, 0, 200, 100)).is_empty());

    Ok(())
}
