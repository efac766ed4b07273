use crate::{
    CORNER_TO_CENTER, Crs, Envelope, Error, GeoTransform, GridCoverage, Image, Interpolation, PixelBounds, Point, Rect, Result, Roi,
    algo::affine::background_value, point, srs::CoordinateTransformer,
};

const DEFAULT_EDGE_SAMPLE_COUNT: usize = 25;
const MIN_EDGE_POINTS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarpOptions {
    /// Number of points sampled on each edge of the source extent to compute the target extent (default = 25)
    pub edge_sample_count: usize,
    /// Resampling kernel (default = nearest)
    pub interpolation: Interpolation,
    /// Fill value per band for target pixels that have no source data (default = 0)
    pub background: Vec<f64>,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            edge_sample_count: DEFAULT_EDGE_SAMPLE_COUNT,
            interpolation: Interpolation::Nearest,
            background: vec![0.0],
        }
    }
}

/// Warp a bounding box to a different coordinate system with configurable edge sampling
///
/// Points are sampled along the edges and the bounding box of all transformed points is returned.
/// This is more accurate than just transforming the four corners when the transformation involves curvature.
fn warp_bounding_box_with_edge_sampling(bbox: &Rect, coord_trans: &CoordinateTransformer, edge_points: usize) -> Result<Rect> {
    let points_per_edge = edge_points.max(MIN_EDGE_POINTS);

    let calculate_t = |i: usize| -> f64 {
        let t = i as f64 / (points_per_edge - 1) as f64;
        if t > 0.99 { 1.0 } else { t }
    };

    let add_edge_points = |points: &mut Vec<Point>, start: Point, end: Point, include_start: bool, include_end: bool| {
        let range_start = if include_start { 0 } else { 1 };
        let range_end = if include_end { points_per_edge } else { points_per_edge - 1 };

        for i in range_start..range_end {
            let t = calculate_t(i);
            points.push(Point::new(start.x() + t * (end.x() - start.x()), start.y() + t * (end.y() - start.y())));
        }
    };

    let mut all_points = Vec::with_capacity(points_per_edge * 4);
    add_edge_points(&mut all_points, bbox.top_left(), bbox.top_right(), true, true);
    add_edge_points(&mut all_points, bbox.top_right(), bbox.bottom_right(), false, false);
    add_edge_points(&mut all_points, bbox.bottom_right(), bbox.bottom_left(), false, true);
    add_edge_points(&mut all_points, bbox.bottom_left(), bbox.top_left(), false, false);

    coord_trans.transform_points_in_place(&mut all_points)?;

    Rect::bounding(&all_points).ok_or_else(|| Error::Transform("No points to compute the warped bounding box".into()))
}

/// Reprojects an envelope into the target coordinate system
pub fn warp_envelope(envelope: &Envelope, target: &Crs, opts: &WarpOptions) -> Result<Envelope> {
    let coord_trans = CoordinateTransformer::new(envelope.crs(), target)?;
    let rect = warp_bounding_box_with_edge_sampling(envelope.rect(), &coord_trans, opts.edge_sample_count)?;
    Ok(Envelope::new(rect, target.clone()))
}

/// Target cell size that keeps the same number of pixels on the diagonal of the source extent
fn calculate_optimal_resolution(coverage: &GridCoverage, coord_trans: &CoordinateTransformer) -> Result<f64> {
    let src_bbox = coverage.envelope().rect();
    let src_cell_size = coverage.grid_to_crs().cell_size_x().abs();

    let src_diagonal = point::euclidean_distance(src_bbox.top_left(), src_bbox.bottom_right());
    let src_diagonal_pixels = src_diagonal / src_cell_size;

    let dst_tl = coord_trans.transform_point(src_bbox.top_left())?;
    let dst_br = coord_trans.transform_point(src_bbox.bottom_right())?;
    let dst_diagonal = point::euclidean_distance(dst_tl, dst_br);

    let resolution = dst_diagonal / src_diagonal_pixels;
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(Error::Transform(format!(
            "Could not determine the target resolution for coverage '{}'",
            coverage.name()
        )));
    }

    Ok(resolution)
}

/// Reprojects a coverage to the target coordinate system.
///
/// The target grid is north up with square pixels, its extent is the edge sampled extent of the source.
/// Every target pixel center is mapped back into the source grid and sampled with the configured interpolation.
/// The resulting image always carries a region of interest that marks the pixels that received source data.
pub fn warp(coverage: &GridCoverage, target: &Crs, opts: &WarpOptions) -> Result<GridCoverage> {
    let coord_trans = CoordinateTransformer::new(coverage.crs(), target)?;
    let inverse_trans = CoordinateTransformer::new(target, coverage.crs())?;

    let bbox = warp_bounding_box_with_edge_sampling(coverage.envelope().rect(), &coord_trans, opts.edge_sample_count)?;
    let resolution = calculate_optimal_resolution(coverage, &coord_trans)?;

    let cols = ((bbox.width() / resolution).round() as usize).max(1);
    let rows = ((bbox.height() / resolution).round() as usize).max(1);
    let bounds = PixelBounds::new(0, 0, cols, rows);
    let target_corner = GeoTransform::from_top_left_and_cell_size(bbox.top_left(), resolution, -resolution);

    log::debug!(
        "Warp coverage '{}' from {} to {}: {}x{} pixels of {resolution}",
        coverage.name(),
        coverage.crs(),
        target,
        cols,
        rows
    );

    let src_image = coverage.image();
    let world_to_src = coverage.grid_to_crs_corner().invert()?;
    let band_count = src_image.band_count();
    let cell_count = bounds.size().cell_count();

    let mut bands: Vec<Vec<f64>> = (0..band_count)
        .map(|band| vec![background_value(&opts.background, band); cell_count])
        .collect();
    let mut has_data = vec![false; cell_count];

    let mut sample = vec![0.0; band_count];
    for row in 0..rows {
        for col in 0..cols {
            let world = target_corner.apply(col as f64 + 0.5, row as f64 + 0.5);
            // Target locations outside of the source projection domain receive no data
            let Ok(src_world) = inverse_trans.transform_point(world) else {
                continue;
            };

            let src = world_to_src.apply_to_point(src_world);
            if opts.interpolation.sample(src_image, src.x(), src.y(), &mut sample) {
                let index = row * cols + col;
                for (band, value) in bands.iter_mut().zip(&sample) {
                    band[index] = *value;
                }
                has_data[index] = true;
            }
        }
    }

    let roi = Roi::from_fn(bounds, |x, y| bounds.index_of(x, y).is_some_and(|index| has_data[index]));
    let nodata = src_image.nodata().map(|nodata| {
        if opts.background.is_empty() {
            nodata
        } else {
            background_value(&opts.background, 0)
        }
    });

    let image = Image::new(bounds, bands, src_image.color_model().clone())?
        .with_nodata(nodata)
        .with_roi(Some(roi));

    let mut grid_to_crs = target_corner;
    grid_to_crs.concatenate(&CORNER_TO_CENTER);
    GridCoverage::with_grid_to_crs(coverage.name(), image, grid_to_crs, target.clone())
}
