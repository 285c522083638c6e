//! Augment command - expand a whole dataset
//!
//! Expects the conventional layout `<root>/<image-folder>/<split>` and
//! `<root>/labels/<split>` and mirrors it under the output root.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use rotaug_core::{
    augment_image_dir, augment_label_dir, AugmentOptions, BatchReport, LabelError, LabelFormat,
};
use tracing::{info, warn};

use super::finish;

#[derive(Args)]
pub struct AugmentCommand {
    /// Dataset root containing image folders and `labels/`
    #[arg(value_name = "ROOT")]
    root: PathBuf,

    /// Output dataset root
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// JSON file with augmentation options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Angle step in degrees (must divide 360)
    #[arg(long)]
    step: Option<u32>,

    /// Label format: obb, rect or annotation
    #[arg(long)]
    format: Option<LabelFormat>,

    /// Border color for arbitrary angles, as R,G,B
    #[arg(long, value_delimiter = ',', num_args = 3)]
    fill: Option<Vec<u8>>,

    /// Only write unmirrored variants
    #[arg(long)]
    no_flip: bool,

    /// Image folder under the root (repeatable)
    #[arg(long = "image-folder", default_value = "images")]
    image_folders: Vec<String>,

    /// Dataset split (repeatable)
    #[arg(long = "split", default_values = ["train", "val"])]
    splits: Vec<String>,

    /// Print the effective options as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl AugmentCommand {
    pub fn execute(self) -> Result<()> {
        let options = self.options()?;

        if self.print_config {
            println!("{}", serde_json::to_string_pretty(&options)?);
            return Ok(());
        }

        // Reject bad steps before any folder is created
        let variants = options.transforms()?.len();
        info!(
            "Generating x{} dataset from {} into {}",
            variants,
            self.root.display(),
            self.output.display()
        );

        let report = self.run(&options)?;
        finish(&report, "augment")
    }

    fn options(&self) -> Result<AugmentOptions> {
        let mut options = match &self.config {
            Some(path) => AugmentOptions::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AugmentOptions::default(),
        };

        if let Some(step) = self.step {
            options.angle_step = step;
        }
        if let Some(format) = self.format {
            options.label_format = format;
        }
        if let Some(fill) = &self.fill {
            options.fill = fill
                .as_slice()
                .try_into()
                .context("--fill takes exactly three values")?;
        }
        if self.no_flip {
            options.include_flips = false;
        }
        Ok(options)
    }

    fn run(&self, options: &AugmentOptions) -> Result<BatchReport> {
        let mut total = BatchReport::default();

        for split in &self.splits {
            for folder in &self.image_folders {
                let src = self.root.join(folder).join(split);
                let dst = self.output.join(folder).join(split);
                if let Some(report) = run_dir(&src, || augment_image_dir(&src, &dst, options))? {
                    total.merge(report);
                }
            }

            let src = self.root.join("labels").join(split);
            let dst = self.output.join("labels").join(split);
            if let Some(report) = run_dir(&src, || augment_label_dir(&src, &dst, options))? {
                total.merge(report);
            }
        }

        Ok(total)
    }
}

/// Run a directory batch if the source folder exists.
fn run_dir(
    src: &Path,
    batch: impl FnOnce() -> std::result::Result<BatchReport, LabelError>,
) -> Result<Option<BatchReport>> {
    if !src.is_dir() {
        warn!("Skipping missing folder: {}", src.display());
        return Ok(None);
    }
    let report = batch().with_context(|| format!("Failed to augment {}", src.display()))?;
    report.log_summary(&src.display().to_string());
    Ok(Some(report))
}
