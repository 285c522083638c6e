//! Convert command - annotation documents to YOLO label text

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::Args;
use rotaug_core::labels::convert_annotation_file;
use rotaug_core::{convert_annotation_dir, BatchReport, LabelFormat};

use super::finish;

#[derive(Args)]
pub struct ConvertCommand {
    /// Annotation document or folder of documents
    #[arg(value_name = "SRC")]
    src: PathBuf,

    /// Output text file, or output folder when SRC is a folder
    #[arg(value_name = "DST")]
    dst: PathBuf,

    /// Output format: obb or rect
    #[arg(long, default_value = "obb")]
    format: LabelFormat,
}

impl ConvertCommand {
    pub fn execute(self) -> Result<()> {
        if self.format == LabelFormat::Annotation {
            bail!("--format must be obb or rect");
        }

        let report = if self.src.is_dir() {
            convert_annotation_dir(&self.src, &self.dst, self.format)
                .with_context(|| format!("Failed to convert {}", self.src.display()))?
        } else {
            convert_annotation_file(&self.src, &self.dst, self.format)
                .with_context(|| format!("Failed to convert {}", self.src.display()))?;
            BatchReport {
                files: 1,
                variants: 1,
                ..Default::default()
            }
        };

        finish(&report, "convert")
    }
}
