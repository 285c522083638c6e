pub mod augment;
pub mod convert;
pub mod normalize;

use anyhow::{bail, Result};
use rotaug_core::BatchReport;
use tracing::error;

/// Log the summary and turn file-level failures into a non-zero exit.
pub(crate) fn finish(report: &BatchReport, label: &str) -> Result<()> {
    report.log_summary(label);
    if report.failed.is_empty() {
        return Ok(());
    }
    for failed in &report.failed {
        error!("{}: {}", failed.path.display(), failed.error);
    }
    bail!("{} source files failed", report.failed.len())
}
