//! Label formats and their per-record transform pipeline.
//!
//! Every format runs its records through the same states:
//! parsed -> rotated -> clipped (or dropped / skipped) -> serialized.
//!
//! # Formats
//!
//! - [`LabelFormat::Obb`]: `class x1 y1 ... x4 y4`, normalized, clipped with
//!   the shape-preserving clipper
//! - [`LabelFormat::Rect`]: `class cx cy w h`, normalized, quarter turns only
//! - [`LabelFormat::Annotation`]: LabelMe-style JSON in pixel space
//!
//! # Error Policy
//!
//! Parse and I/O errors abort the file being processed. Geometry errors are
//! isolated to the record: it is left out of the output and listed in the
//! [`FileReport`] so the rest of the file still gets written.

mod annotation;
mod convert;
mod files;
mod obb;
mod rect;
mod text;
mod types;

use serde::{Deserialize, Serialize};

pub use annotation::{
    normalize_annotation, shape_record, transform_annotation, AnnotationDocument,
    AnnotationOutput, AnnotationShape, ShapeKind,
};
pub use convert::{annotation_to_obb_text, annotation_to_rect_text};
pub use files::{
    convert_annotation_file, normalize_annotation_file, transform_label_file,
    transform_label_text,
};
pub(crate) use files::{log_skipped, read_text, write_text};
pub use obb::{parse_obb_line, transform_obb_record, transform_obb_text, write_obb_text};
pub use rect::{
    parse_rect_line, rect_params, transform_rect_record, transform_rect_text,
    validate_rect_transform,
};
pub use text::COORD_DECIMALS;
pub use types::{
    ClassId, FileReport, LabelError, LabelOutput, LabelRecord, RecordOutcome, SkippedRecord,
};

/// On-disk label format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    /// Oriented boxes as normalized text.
    #[default]
    Obb,
    /// Axis-aligned boxes as normalized text.
    Rect,
    /// Pixel-space polygon annotation documents.
    Annotation,
}

impl LabelFormat {
    /// File extension of label files in this format.
    pub fn extension(self) -> &'static str {
        match self {
            LabelFormat::Obb | LabelFormat::Rect => "txt",
            LabelFormat::Annotation => "json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabelFormat::Obb => "obb",
            LabelFormat::Rect => "rect",
            LabelFormat::Annotation => "annotation",
        }
    }
}

impl std::str::FromStr for LabelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "obb" => Ok(LabelFormat::Obb),
            "rect" => Ok(LabelFormat::Rect),
            "annotation" | "json" => Ok(LabelFormat::Annotation),
            other => Err(format!("unknown label format '{}'", other)),
        }
    }
}
