//! Directory-level drivers.
//!
//! Each source file is one unit of work on the rayon pool; all variants of
//! a file are produced sequentially by the worker that owns it. No two
//! units share an output path, so no locking is needed.

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::AugmentOptions;
use crate::geometry::Transform;
use crate::labels::{
    convert_annotation_file, log_skipped, normalize_annotation_file, read_text,
    transform_label_text, write_text, AnnotationDocument, LabelError, LabelFormat, ShapeKind,
};
use crate::pixels::{is_image_path, load_image, rotate_image, save_image};

use super::naming::{has_extension, list_sources, variant_name, with_extension};
use super::report::{BatchReport, FailedFile};

/// Extension assumed for the paired image when a document does not name one.
const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Run one file-level unit, turning a failure into a report entry so the
/// rest of the batch carries on.
fn isolate(src: &Path, unit: impl FnOnce() -> Result<BatchReport, LabelError>) -> BatchReport {
    match unit() {
        Ok(report) => report,
        Err(error) => {
            warn!("failed to process {}: {}", src.display(), error);
            BatchReport {
                failed: vec![FailedFile {
                    path: src.to_path_buf(),
                    error,
                }],
                ..Default::default()
            }
        }
    }
}

fn create_dir(dir: &Path) -> Result<(), LabelError> {
    fs::create_dir_all(dir).map_err(|e| LabelError::io(dir, e))
}

fn merge(mut a: BatchReport, b: BatchReport) -> BatchReport {
    a.merge(b);
    a
}

/// Write every (angle, flip) variant of each label file in `src_dir` to
/// `dst_dir`.
///
/// The transform list is validated against the label format before any
/// file is read or written.
pub fn augment_label_dir(
    src_dir: &Path,
    dst_dir: &Path,
    options: &AugmentOptions,
) -> Result<BatchReport, LabelError> {
    let transforms = options.transforms()?;
    let format = options.label_format;

    let sources = list_sources(src_dir, has_extension(format.extension()))?;
    create_dir(dst_dir)?;
    debug!(
        "augmenting {} {} label files from {} ({} variants each)",
        sources.len(),
        format.as_str(),
        src_dir.display(),
        transforms.len()
    );

    Ok(sources
        .par_iter()
        .map(|src| isolate(src, || augment_label_file(format, src, dst_dir, &transforms)))
        .reduce(BatchReport::default, merge))
}

/// All variants of one label file.
///
/// The source is parsed before the first write, so a malformed file
/// produces no output at all.
pub fn augment_label_file(
    format: LabelFormat,
    src: &Path,
    dst_dir: &Path,
    transforms: &[Transform],
) -> Result<BatchReport, LabelError> {
    let text = read_text(src)?;

    let image_ext = match format {
        LabelFormat::Annotation => {
            let doc = AnnotationDocument::from_json(&text)?;
            Some(
                Path::new(&doc.image_path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or(DEFAULT_IMAGE_EXTENSION)
                    .to_string(),
            )
        }
        LabelFormat::Obb | LabelFormat::Rect => None,
    };

    let mut report = BatchReport {
        files: 1,
        ..Default::default()
    };

    for &transform in transforms {
        let name = variant_name(src, transform)?;
        let dst = dst_dir.join(&name);
        let image_name = image_ext.as_deref().map(|ext| with_extension(&name, ext));

        let output = transform_label_text(format, &text, transform, image_name.as_deref())?;
        log_skipped(&output.report, src, &dst);
        write_text(&dst, &output.contents)?;

        report.variants += 1;
        report.dropped += output.report.dropped;
        report.skipped += output.report.skipped.len();
        debug!("wrote {}", dst.display());
    }

    Ok(report)
}

/// Write every (angle, flip) variant of each image in `src_dir` to
/// `dst_dir`, named to pair with [`augment_label_dir`] output.
pub fn augment_image_dir(
    src_dir: &Path,
    dst_dir: &Path,
    options: &AugmentOptions,
) -> Result<BatchReport, LabelError> {
    let transforms = options.transforms()?;

    let sources = list_sources(src_dir, is_image_path)?;
    create_dir(dst_dir)?;
    debug!(
        "augmenting {} images from {} ({} variants each)",
        sources.len(),
        src_dir.display(),
        transforms.len()
    );

    Ok(sources
        .par_iter()
        .map(|src| isolate(src, || augment_image_file(src, dst_dir, &transforms, options.fill)))
        .reduce(BatchReport::default, merge))
}

/// All variants of one image.
pub fn augment_image_file(
    src: &Path,
    dst_dir: &Path,
    transforms: &[Transform],
    fill: [u8; 3],
) -> Result<BatchReport, LabelError> {
    let image = load_image(src)?;

    let mut report = BatchReport {
        files: 1,
        ..Default::default()
    };

    for &transform in transforms {
        let dst = dst_dir.join(variant_name(src, transform)?);
        save_image(&rotate_image(&image, transform, fill), &dst)?;
        report.variants += 1;
        debug!("wrote {}", dst.display());
    }

    Ok(report)
}

/// Normalize every annotation document in `dir` in place.
pub fn normalize_annotation_dir(
    dir: &Path,
    target: ShapeKind,
    force: bool,
) -> Result<BatchReport, LabelError> {
    let sources = list_sources(dir, has_extension("json"))?;

    Ok(sources
        .par_iter()
        .map(|path| {
            isolate(path, || {
                let file_report = normalize_annotation_file(path, target, force)?;
                let mut report = BatchReport {
                    files: 1,
                    ..Default::default()
                };
                report.add_file_report(&file_report);
                Ok(report)
            })
        })
        .reduce(BatchReport::default, merge))
}

/// Convert every annotation document in `src_dir` to `format` text files
/// of the same stem in `dst_dir`.
pub fn convert_annotation_dir(
    src_dir: &Path,
    dst_dir: &Path,
    format: LabelFormat,
) -> Result<BatchReport, LabelError> {
    let sources = list_sources(src_dir, has_extension("json"))?;
    create_dir(dst_dir)?;

    Ok(sources
        .par_iter()
        .map(|src| {
            isolate(src, || {
                let name = src.with_extension(format.extension());
                let name = name.file_name().ok_or_else(|| {
                    LabelError::Validation(format!("no file name in {}", src.display()))
                })?;
                convert_annotation_file(src, &dst_dir.join(name), format)?;
                Ok(BatchReport {
                    files: 1,
                    variants: 1,
                    ..Default::default()
                })
            })
        })
        .reduce(BatchReport::default, merge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use tempfile::TempDir;

    const OBB: &str = "\
0 0.1000000 0.1000000 0.3000000 0.1000000 0.3000000 0.2000000 0.1000000 0.2000000
3 0.4000000 0.4000000 0.6000000 0.4000000 0.6000000 0.6000000 0.4000000 0.6000000
";

    const RECT: &str = "1 0.2500000 0.5000000 0.1000000 0.2000000\n";

    const DOC: &str = r#"{
  "shapes": [
    {
      "label": "crack",
      "points": [[20.0, 10.0], [60.0, 10.0], [60.0, 30.0], [20.0, 30.0]],
      "shape_type": "rotation"
    }
  ],
  "imagePath": "part.jpg",
  "imageHeight": 80,
  "imageWidth": 100
}
"#;

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_obb_dir_produces_eight_variants_per_file() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), OBB).unwrap();
        fs::write(src.path().join("b.txt"), OBB).unwrap();
        fs::write(src.path().join("notes.md"), "ignored").unwrap();

        let report = augment_label_dir(src.path(), dst.path(), &AugmentOptions::default()).unwrap();
        assert_eq!(report.files, 2);
        assert_eq!(report.variants, 16);
        assert!(report.is_clean());

        let out = names(dst.path());
        assert_eq!(out.len(), 16);
        assert!(out.contains(&"a_0000.txt".to_string()));
        assert!(out.contains(&"b_1270.txt".to_string()));

        // Identity variant reproduces the source
        let identity = fs::read_to_string(dst.path().join("a_0000.txt")).unwrap();
        assert_eq!(identity, OBB);
    }

    #[test]
    fn test_malformed_file_is_isolated() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("good.txt"), OBB).unwrap();
        fs::write(src.path().join("bad.txt"), "0 0.1 0.2\n").unwrap();

        let report = augment_label_dir(src.path(), dst.path(), &AugmentOptions::default()).unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].path.ends_with("bad.txt"));
        assert!(names(dst.path()).iter().all(|n| n.starts_with("good_")));
    }

    #[test]
    fn test_rect_rejects_step_before_touching_files() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), RECT).unwrap();
        let out = dst.path().join("out");

        let options = AugmentOptions {
            angle_step: 45,
            label_format: LabelFormat::Rect,
            ..Default::default()
        };
        let err = augment_label_dir(src.path(), &out, &options).unwrap_err();
        assert!(matches!(err, LabelError::Validation(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_rect_dir() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("a.txt"), RECT).unwrap();

        let options = AugmentOptions {
            label_format: LabelFormat::Rect,
            include_flips: false,
            ..Default::default()
        };
        let report = augment_label_dir(src.path(), dst.path(), &options).unwrap();
        assert_eq!(report.variants, 4);
        assert_eq!(
            fs::read_to_string(dst.path().join("a_0090.txt")).unwrap(),
            "1 0.5000000 0.2500000 0.2000000 0.1000000\n"
        );
    }

    #[test]
    fn test_annotation_variants_reference_their_image() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("part.json"), DOC).unwrap();

        let options = AugmentOptions {
            label_format: LabelFormat::Annotation,
            ..Default::default()
        };
        let report = augment_label_dir(src.path(), dst.path(), &options).unwrap();
        assert_eq!(report.variants, 8);

        let text = fs::read_to_string(dst.path().join("part_1180.json")).unwrap();
        let doc = AnnotationDocument::from_json(&text).unwrap();
        assert_eq!(doc.image_path, "part_1180.jpg");
        assert_eq!(doc.shapes.len(), 1);
        assert!(doc.shapes[0].direction.is_some());

        // Quarter-turn variants describe the portrait image
        let text = fs::read_to_string(dst.path().join("part_0090.json")).unwrap();
        let doc = AnnotationDocument::from_json(&text).unwrap();
        assert_eq!((doc.image_width, doc.image_height), (80, 100));
        assert_eq!(
            doc.shapes[0].points,
            vec![[70.0, 20.0], [70.0, 60.0], [50.0, 60.0], [50.0, 20.0]]
        );
    }

    #[test]
    fn test_image_dir_names_match_labels() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, Rgb([9, 9, 9])));
        save_image(&img, &src.path().join("a.png")).unwrap();
        fs::write(src.path().join("a.txt"), OBB).unwrap();

        let options = AugmentOptions::default();
        let images = dst.path().join("images");
        let labels = dst.path().join("labels");
        augment_image_dir(src.path(), &images, &options).unwrap();
        augment_label_dir(src.path(), &labels, &options).unwrap();

        let image_stems: Vec<_> = names(&images)
            .into_iter()
            .map(|n| n.trim_end_matches(".png").to_string())
            .collect();
        let label_stems: Vec<_> = names(&labels)
            .into_iter()
            .map(|n| n.trim_end_matches(".txt").to_string())
            .collect();
        assert_eq!(image_stems, label_stems);

        let rotated = load_image(&images.join("a_0090.png")).unwrap();
        assert_eq!((rotated.width(), rotated.height()), (4, 6));
    }

    #[test]
    fn test_normalize_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), DOC).unwrap();
        fs::write(dir.path().join("b.json"), DOC.replace("rotation", "polygon")).unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();

        let report = normalize_annotation_dir(dir.path(), ShapeKind::Rotation, false).unwrap();
        assert_eq!(report.files, 2);
        assert_eq!(report.variants, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.failed.len(), 1);

        let a = fs::read_to_string(dir.path().join("a.json")).unwrap();
        assert_eq!(a, DOC);
    }

    #[test]
    fn test_convert_dir() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("part.json"), DOC).unwrap();

        let report = convert_annotation_dir(src.path(), dst.path(), LabelFormat::Obb).unwrap();
        assert_eq!(report.variants, 1);
        assert_eq!(
            fs::read_to_string(dst.path().join("part.txt")).unwrap(),
            "2 0.2000000 0.1250000 0.6000000 0.1250000 0.6000000 0.3750000 0.2000000 0.3750000\n"
        );
    }
}
