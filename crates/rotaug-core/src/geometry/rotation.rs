//! Point rotation matching the pixel-rotation primitive.
//!
//! The pixel pipeline mirrors the image horizontally (optional) and then
//! rotates it clockwise about the canvas center. A label point has to go
//! through exactly the same composition:
//!
//! ```text
//! x1 = flip ? w - x : x          // mirror about the vertical centerline
//! y1 = h - y                     // to a y-up frame
//! (x2, y2) = R(-angle) * (x1 - cx, y1 - cy) + (cx, cy)
//! y' = h - y2                    // back to y-down
//! ```
//!
//! Swapping the order (rotate then flip) or the sign of the angle gives
//! labels that no longer line up with the rotated pixels.

use super::types::{Canvas, Point, Quad, Transform};

/// Sine and cosine of an angle in degrees.
///
/// Quarter turns return exact values so 90/180/270 rotations carry no
/// residual error from `sin(pi/2)` style rounding.
pub(crate) fn sin_cos_deg(degrees: f64) -> (f64, f64) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

/// Rotate a point clockwise by `angle_degrees` about the canvas center,
/// mirroring it horizontally first when `flip` is set.
///
/// # Example
///
/// ```
/// use rotaug_core::geometry::{rotate_point, Canvas};
///
/// let p = rotate_point([0.1, 0.5], 90.0, false, Canvas::UNIT);
/// assert!((p[0] - 0.5).abs() < 1e-9 && (p[1] - 0.1).abs() < 1e-9);
/// ```
pub fn rotate_point(point: Point, angle_degrees: f64, flip: bool, canvas: Canvas) -> Point {
    let Canvas { width, height } = canvas;

    let x1 = if flip { width - point[0] } else { point[0] };

    // Fast path: mirror only, no round trip through the y-up frame
    if angle_degrees.rem_euclid(360.0) == 0.0 {
        return [x1, point[1]];
    }

    let y1 = height - point[1];

    let [cx, cy] = canvas.center();
    let cy = height - cy;

    let (sin, cos) = sin_cos_deg(-angle_degrees);
    let dx = x1 - cx;
    let dy = y1 - cy;

    let x = dx * cos - dy * sin + cx;
    let y = dx * sin + dy * cos + cy;

    [x, height - y]
}

/// Apply a transform to every corner of a box, keeping the corner order.
pub fn rotate_quad(quad: &Quad, transform: Transform, canvas: Canvas) -> Quad {
    quad.map(|p| rotate_point(p, transform.angle as f64, transform.flip, canvas))
}

/// Like [`rotate_quad`], but expressed in the frame of the rotated image.
///
/// A 90 or 270 degree turn of a `W x H` image yields an `H x W` image whose
/// center sits at `(H/2, W/2)`, so the rotated corners are shifted by
/// `((H - W) / 2, (W - H) / 2)`. On square canvases this is `rotate_quad`.
pub fn rotate_quad_to_frame(quad: &Quad, transform: Transform, canvas: Canvas) -> Quad {
    let rotated = rotate_quad(quad, transform, canvas);
    let frame = canvas.after(transform);
    if frame == canvas {
        return rotated;
    }
    let dx = (frame.width - canvas.width) / 2.0;
    let dy = (frame.height - canvas.height) / 2.0;
    rotated.map(|[x, y]| [x + dx, y + dy])
}


// ============================================================================
// Property-Based Tests
// ============================================================================
