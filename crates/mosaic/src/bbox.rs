use geo::{Crs, Envelope, Point, Rect};

use crate::{Error, MosaicElement, Result, TargetContext};

/// World extent of a merged element in the coordinate system of its group.
///
/// The pixel extent of the element is mapped through the corner based grid to world transform of the group context,
/// the resulting envelope is tagged with the group coordinate system.
pub fn submosaic_bounding_box(context: &TargetContext, crs: &Crs, element: &MosaicElement) -> Result<Envelope> {
    let bounds = element.image().bounds();
    let mut corners = [
        Point::new(bounds.min_x as f64, bounds.min_y as f64),
        Point::new(bounds.max_x() as f64, bounds.max_y() as f64),
    ];

    context
        .grid_to_world()
        .transform_points_in_place(&mut corners)
        .map_err(|e| Error::Transform(format!("Failed to compute the submosaic bounding box ({e})")))?;

    Ok(Envelope::new(Rect::from_points(corners[0], corners[1]), crs.clone()))
}
