//! Batch augmentation over directories of images and labels.
//!
//! For an angle step `s` and the flip dimension, every source file yields
//! one output per (angle, flip) pair, named `{stem}_{flip}{angle:03}.{ext}`.
//! Image and label variants of the same source share that name so the
//! dataset stays paired.
//!
//! # Failure Handling
//!
//! Invalid options fail the whole call before anything is written. After
//! that, a source file that cannot be read or parsed is recorded in the
//! [`BatchReport`] and the remaining files are still processed.

mod augment;
mod naming;
mod report;

pub use augment::{
    augment_image_dir, augment_image_file, augment_label_dir, augment_label_file,
    convert_annotation_dir, normalize_annotation_dir,
};
pub use naming::{list_sources, variant_name};
pub use report::{BatchReport, FailedFile};
