//! Core types for label parsing and transformation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GeometryError, Quad};

/// Error types for label operations.
#[derive(Debug, Error)]
pub enum LabelError {
    /// A record is malformed: wrong field count, bad number, unknown class.
    #[error("parse error at record {record}: {reason}")]
    Parse { record: usize, reason: String },

    /// A box could not be repaired into the canvas.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// The requested transform is not valid for the label format.
    #[error("invalid transform: {0}")]
    Validation(String),

    /// I/O error on a source or output path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The annotation document is not valid JSON or misses required fields.
    #[error("annotation JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The paired image could not be decoded or encoded.
    #[error("image error on {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl LabelError {
    pub(crate) fn parse(record: usize, reason: impl Into<String>) -> Self {
        LabelError::Parse {
            record,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        LabelError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The fixed defect class table shared by every label format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ClassId {
    Contusion = 0,
    Scratches = 1,
    Crack = 2,
    Spot = 3,
}

impl ClassId {
    pub const ALL: [ClassId; 4] = [
        ClassId::Contusion,
        ClassId::Scratches,
        ClassId::Crack,
        ClassId::Spot,
    ];

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ClassId::Contusion => "contusion",
            ClassId::Scratches => "scratches",
            ClassId::Crack => "crack",
            ClassId::Spot => "spot",
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed label: class, four corners and the derived direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRecord {
    pub class: ClassId,
    pub quad: Quad,
    /// Radians in `[0, 2*pi)`, derived from `quad[0] -> quad[1]`.
    pub direction: f64,
}

/// What happened to one record under one transform.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Rotated, clipped and ready to serialize.
    Kept(LabelRecord),
    /// Rotated completely out of frame.
    Dropped,
    /// Could not be clipped; the rotated corners are kept for reporting.
    Skipped { coords: Quad, error: GeometryError },
}

/// A record that was left out of the output because of a geometry fault.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Zero-based line (text formats) or shape index (annotations).
    pub index: usize,
    pub coords: Quad,
    pub error: GeometryError,
}

/// Per-file accounting of a label transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileReport {
    /// Records serialized to the output.
    pub written: usize,
    /// Records that rotated out of frame.
    pub dropped: usize,
    /// Records rejected by the clipper.
    pub skipped: Vec<SkippedRecord>,
    /// True when nothing changed and the file was left untouched.
    pub unchanged: bool,
}

impl FileReport {
    pub(crate) fn record(&mut self, index: usize, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Kept(_) => self.written += 1,
            RecordOutcome::Dropped => self.dropped += 1,
            RecordOutcome::Skipped { coords, error } => self.skipped.push(SkippedRecord {
                index,
                coords: *coords,
                error: error.clone(),
            }),
        }
    }
}

/// Serialized output of one transformed label file, plus its report.
#[derive(Debug, Clone, Default)]
pub struct LabelOutput {
    pub contents: String,
    pub report: FileReport,
}
