//! Rotaug Core - rotation/flip augmentation for oriented-box datasets
//!
//! This crate generates rotated and mirrored variants of detection images
//! together with their labels, keeping both in exact geometric
//! correspondence: label points go through the same flip-then-rotate
//! composition as the pixels, boxes pushed past the image edge are slid
//! back inside without losing their shape, and boxes that leave the frame
//! entirely are dropped.
//!
//! # Modules
//!
//! - [`geometry`]: point rotation, shape-preserving clipping, direction
//! - [`labels`]: OBB text, rect text and polygon annotation formats
//! - [`pixels`]: the paired image rotation
//! - [`batch`]: directory fan-out with deterministic variant names
//!
//! # Examples
//!
//! ```ignore
//! use rotaug_core::{augment_label_dir, AugmentOptions};
//!
//! let report = augment_label_dir(src.as_ref(), dst.as_ref(), &AugmentOptions::default())?;
//! println!("{} variants written", report.variants);
//! ```

pub mod batch;
pub mod config;
pub mod geometry;
pub mod labels;
pub mod pixels;

pub use batch::{
    augment_image_dir, augment_label_dir, convert_annotation_dir, normalize_annotation_dir,
    variant_name, BatchReport,
};
pub use config::AugmentOptions;
pub use geometry::{
    clip_to_canvas, direction, is_missing, rotate_point, Canvas, GeometryError, Quad, Transform,
};
pub use labels::{ClassId, FileReport, LabelError, LabelFormat, ShapeKind};
pub use pixels::rotate_image;
