use crate::{Interpolation, PixelBounds};

/// Computes the destination layout of a scale + translate operation on an image.
///
/// The source bounds are shrunk by the padding the interpolation kernel needs, so small images combined
/// with wide kernels or strong downscaling factors can produce an empty layout.
/// Callers are expected to check [`PixelBounds::is_empty`] on the result before warping.
pub fn layout_helper(
    source: PixelBounds,
    scale_x: f64,
    scale_y: f64,
    translate_x: f64,
    translate_y: f64,
    interpolation: Option<Interpolation>,
) -> PixelBounds {
    let mut x0 = source.min_x;
    let mut y0 = source.min_y;
    let mut width = source.width as i64;
    let mut height = source.height as i64;

    if let Some(interp) = interpolation {
        x0 += interp.left_padding();
        y0 += interp.top_padding();
        width -= interp.left_padding() + interp.right_padding();
        height -= interp.top_padding() + interp.bottom_padding();
    }

    if width <= 0 || height <= 0 {
        return PixelBounds::new(x0, y0, 0, 0);
    }

    let (min_x, max_x) = scaled_range(x0, width, scale_x, translate_x);
    let (min_y, max_y) = scaled_range(y0, height, scale_y, translate_y);

    PixelBounds::new(
        min_x,
        min_y,
        usize::try_from(max_x - min_x).unwrap_or(0),
        usize::try_from(max_y - min_y).unwrap_or(0),
    )
}

/// Destination pixel range covered by the scaled source range.
/// A destination pixel is covered when its center lies in the scaled range.
fn scaled_range(start: i64, len: i64, scale: f64, translate: f64) -> (i64, i64) {
    let d0 = start as f64 * scale + translate;
    let d1 = (start + len) as f64 * scale + translate;
    let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };

    ((lo - 0.5).ceil() as i64, (hi - 0.5).ceil() as i64)
}
