//! Normalize command - rewrite annotation shapes in place

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use rotaug_core::labels::normalize_annotation_file;
use rotaug_core::{normalize_annotation_dir, BatchReport, ShapeKind};

use super::finish;

#[derive(Args)]
pub struct NormalizeCommand {
    /// Annotation document or folder of documents
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Target shape: rotation or rectangle
    #[arg(long, default_value = "rotation")]
    target: ShapeKind,

    /// Also rewrite shapes already of the target kind
    #[arg(long)]
    force: bool,
}

impl NormalizeCommand {
    pub fn execute(self) -> Result<()> {
        let report = if self.path.is_dir() {
            normalize_annotation_dir(&self.path, self.target, self.force)
                .with_context(|| format!("Failed to normalize {}", self.path.display()))?
        } else {
            let file_report = normalize_annotation_file(&self.path, self.target, self.force)
                .with_context(|| format!("Failed to normalize {}", self.path.display()))?;
            let mut report = BatchReport {
                files: 1,
                ..Default::default()
            };
            report.add_file_report(&file_report);
            report
        };

        finish(&report, "normalize")
    }
}
