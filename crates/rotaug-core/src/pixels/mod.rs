//! Pixel-side counterpart of the label transforms.
//!
//! Every augmented label file is paired with an image produced by
//! [`rotate_image`] under the same [`Transform`](crate::geometry::Transform),
//! so the two always stay in geometric correspondence.

mod rotate;

use std::path::Path;

use image::DynamicImage;

use crate::labels::LabelError;

pub use rotate::rotate_image;

/// Default border color for arbitrary-angle rotations.
pub const DEFAULT_FILL: [u8; 3] = [114, 114, 0];

/// File extensions picked up as source images.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// True if the path has one of the [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage, LabelError> {
    image::open(path).map_err(|source| LabelError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode an image, picking the format from the extension.
///
/// JPEG has no alpha channel, so images are reduced to RGB first.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<(), LabelError> {
    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false);

    let result = if is_jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)
    } else {
        image.save(path)
    };

    result.map_err(|source| LabelError::Image {
        path: path.to_path_buf(),
        source,
    })
}
