//! Image rotation paired with [`rotate_point`](crate::geometry::rotate_point).
//!
//! # Algorithm
//!
//! The image is mirrored horizontally first (if requested), then rotated
//! clockwise about its center:
//!
//! - 90/180/270 degrees use exact pixel permutations; 90 and 270 swap the
//!   image dimensions
//! - any other angle uses inverse mapping on a canvas of the same size:
//!   for each output pixel we find the source location and interpolate
//!   bilinearly, filling locations outside the source with a constant color
//!
//! For a clockwise angle θ in y-down pixel coordinates the inverse map is:
//! ```text
//! src_x = cx + dx * cos(θ) + dy * sin(θ)
//! src_y = cy - dx * sin(θ) + dy * cos(θ)
//! ```
//! where `(dx, dy)` is the output pixel center relative to `(cx, cy) =
//! (w / 2, h / 2)`.

use image::{DynamicImage, Rgb, RgbImage};

use crate::geometry::{sin_cos_deg, Transform};

/// Apply a flip/rotation variant to an image.
///
/// The output size is always `Canvas::after(transform)` of the input size.
pub fn rotate_image(image: &DynamicImage, transform: Transform, fill: [u8; 3]) -> DynamicImage {
    if transform.is_identity() {
        return image.clone();
    }

    let mirrored = if transform.flip {
        image.fliph()
    } else {
        image.clone()
    };

    if !transform.is_quarter_turn() {
        let angle = (transform.angle % 360) as f64;
        return DynamicImage::ImageRgb8(warp(&mirrored.to_rgb8(), angle, fill));
    }

    match transform.angle % 360 {
        90 => mirrored.rotate90(),
        180 => mirrored.rotate180(),
        270 => mirrored.rotate270(),
        _ => mirrored,
    }
}

/// Rotate clockwise by an arbitrary angle, keeping the canvas size.
fn warp(image: &RgbImage, angle_degrees: f64, fill: [u8; 3]) -> RgbImage {
    let (width, height) = image.dimensions();
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let (sin, cos) = sin_cos_deg(angle_degrees);

    RgbImage::from_fn(width, height, |x, y| {
        // Sample at pixel centers
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;

        let src_x = cx + dx * cos + dy * sin - 0.5;
        let src_y = cy - dx * sin + dy * cos - 0.5;

        Rgb(sample_bilinear(image, src_x, src_y, fill))
    })
}

/// Sample a pixel using bilinear interpolation.
///
/// Neighbors outside the image contribute the fill color, so edges blend
/// into the border instead of being cut hard.
fn sample_bilinear(image: &RgbImage, x: f64, y: f64, fill: [u8; 3]) -> [u8; 3] {
    let (w, h) = (image.width() as i64, image.height() as i64);

    if x <= -1.0 || x >= w as f64 || y <= -1.0 || y >= h as f64 {
        return fill;
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let pixel = |px: i64, py: i64| -> [f64; 3] {
        let [r, g, b] = if px < 0 || py < 0 || px >= w || py >= h {
            fill
        } else {
            image.get_pixel(px as u32, py as u32).0
        };
        [r as f64, g as f64, b as f64]
    };

    let p00 = pixel(x0, y0);
    let p10 = pixel(x0 + 1, y0);
    let p01 = pixel(x0, y0 + 1);
    let p11 = pixel(x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}
