//! File-level entry points: read, transform in memory, write once.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::geometry::Transform;

use super::annotation::{normalize_annotation, transform_annotation, AnnotationDocument, ShapeKind};
use super::convert::{annotation_to_obb_text, annotation_to_rect_text};
use super::obb::transform_obb_text;
use super::rect::transform_rect_text;
use super::types::{FileReport, LabelError, LabelOutput};
use super::LabelFormat;

pub(crate) fn read_text(path: &Path) -> Result<String, LabelError> {
    fs::read_to_string(path).map_err(|e| LabelError::io(path, e))
}

pub(crate) fn write_text(path: &Path, contents: &str) -> Result<(), LabelError> {
    fs::write(path, contents).map_err(|e| LabelError::io(path, e))
}

pub(crate) fn log_skipped(report: &FileReport, src: &Path, dst: &Path) {
    for skipped in &report.skipped {
        warn!(
            "skipped record {} of {} ({:?}) while writing {}: {}",
            skipped.index,
            src.display(),
            skipped.coords,
            dst.display(),
            skipped.error
        );
    }
}

/// Transform the contents of one label file in memory.
///
/// `image_path` only applies to annotation documents, where it replaces
/// the referenced image name.
pub fn transform_label_text(
    format: LabelFormat,
    text: &str,
    transform: Transform,
    image_path: Option<&str>,
) -> Result<LabelOutput, LabelError> {
    match format {
        LabelFormat::Obb => transform_obb_text(text, transform),
        LabelFormat::Rect => transform_rect_text(text, transform),
        LabelFormat::Annotation => {
            let doc = AnnotationDocument::from_json(text)?;
            let mut output = transform_annotation(&doc, transform, image_path)?;
            output.report.unchanged = !output.modified;
            Ok(LabelOutput {
                contents: output.document.to_json()?,
                report: output.report,
            })
        }
    }
}

/// Transform `src` into `dst`.
///
/// The output is built completely in memory and written in one go, so a
/// parse error never leaves a half-written file behind. Rewriting a file
/// in place is skipped when nothing changed.
pub fn transform_label_file(
    format: LabelFormat,
    src: &Path,
    dst: &Path,
    transform: Transform,
    image_path: Option<&str>,
) -> Result<FileReport, LabelError> {
    let text = read_text(src)?;
    let output = transform_label_text(format, &text, transform, image_path)?;

    log_skipped(&output.report, src, dst);

    if output.report.unchanged && src == dst {
        info!("no change to {}", dst.display());
        return Ok(output.report);
    }

    write_text(dst, &output.contents)?;
    debug!(
        "wrote {} ({} kept, {} dropped, {} skipped)",
        dst.display(),
        output.report.written,
        output.report.dropped,
        output.report.skipped.len()
    );
    Ok(output.report)
}

/// Normalize the shapes of an annotation file in place.
pub fn normalize_annotation_file(
    path: &Path,
    target: ShapeKind,
    force: bool,
) -> Result<FileReport, LabelError> {
    let doc = AnnotationDocument::from_json(&read_text(path)?)?;
    let output = normalize_annotation(&doc, target, force);

    for skipped in &output.report.skipped {
        warn!(
            "shape {} of {} left as is: {}",
            skipped.index,
            path.display(),
            skipped.error
        );
    }

    if output.modified {
        write_text(path, &output.document.to_json()?)?;
        info!("write {}", path.display());
    } else {
        info!("no change to {}", path.display());
    }
    Ok(output.report)
}

/// Convert an annotation document to normalized OBB or rect text.
pub fn convert_annotation_file(
    src: &Path,
    dst: &Path,
    format: LabelFormat,
) -> Result<(), LabelError> {
    let doc = AnnotationDocument::from_json(&read_text(src)?)?;
    let text = match format {
        LabelFormat::Obb => annotation_to_obb_text(&doc)?,
        LabelFormat::Rect => annotation_to_rect_text(&doc)?,
        LabelFormat::Annotation => {
            return Err(LabelError::Validation(
                "annotation documents can only be converted to obb or rect".to_string(),
            ))
        }
    };
    write_text(dst, &text)?;
    debug!("converted {} -> {}", src.display(), dst.display());
    Ok(())
}
