//! Aggregated counts for a directory run.

use std::path::PathBuf;

use tracing::info;

use crate::labels::{FileReport, LabelError};

/// A source file that failed as a whole, e.g. on a parse error.
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: LabelError,
}

/// Totals over every source file of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Source files processed without a file-level error.
    pub files: usize,
    /// Output files written.
    pub variants: usize,
    /// Records that rotated out of frame, summed over variants.
    pub dropped: usize,
    /// Records rejected by the clipper, summed over variants.
    pub skipped: usize,
    /// In-place rewrites left untouched because nothing changed.
    pub unchanged: usize,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    /// Fold one label file report into the totals.
    pub fn add_file_report(&mut self, report: &FileReport) {
        self.dropped += report.dropped;
        self.skipped += report.skipped.len();
        if report.unchanged {
            self.unchanged += 1;
        } else {
            self.variants += 1;
        }
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.files += other.files;
        self.variants += other.variants;
        self.dropped += other.dropped;
        self.skipped += other.skipped;
        self.unchanged += other.unchanged;
        self.failed.extend(other.failed);
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped == 0
    }

    /// Log a one-line summary under `label`.
    pub fn log_summary(&self, label: &str) {
        info!(
            "{}: {} files, {} written, {} unchanged, {} boxes dropped, {} records skipped, {} files failed",
            label,
            self.files,
            self.variants,
            self.unchanged,
            self.dropped,
            self.skipped,
            self.failed.len()
        );
    }
}

impl FromIterator<BatchReport> for BatchReport {
    fn from_iter<I: IntoIterator<Item = BatchReport>>(iter: I) -> Self {
        let mut total = BatchReport::default();
        for report in iter {
            total.merge(report);
        }
        total
    }
}
