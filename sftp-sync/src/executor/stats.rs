//! Run-level counters and the end-of-run summary.

use super::{DownloadOutcome, FolderOutcome};
use crate::utils::logger::SyncLogger;
use std::time::Duration;

/// Totals accumulated over one run. Only the executor writes to it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStatistics {
    pub folders_processed: usize,
    pub files_downloaded: usize,
    /// Sum of the sizes reported by the remote listing
    pub bytes_downloaded: u64,
    pub files_deleted: usize,
    pub folders_with_error: usize,
}

impl RunStatistics {
    /// Account for a folder that finished its pass
    pub fn record(&mut self, outcome: &FolderOutcome) {
        self.folders_processed += 1;

        if let FolderOutcome::Synced {
            download, deleted, ..
        } = outcome
        {
            if let DownloadOutcome::Downloaded { bytes, .. } = download {
                self.files_downloaded += 1;
                self.bytes_downloaded += *bytes;
            }
            self.files_deleted += *deleted;
        }
    }

    /// Account for a folder whose pass ended in an error
    pub fn record_error(&mut self) {
        self.folders_processed += 1;
        self.folders_with_error += 1;
    }

    pub fn log_summary(&self, elapsed: Duration, logger: &dyn SyncLogger) {
        let secs = elapsed.as_secs();
        logger.info("=== Run summary ===");
        logger.info(&format!("Total duration: {} min {} sec", secs / 60, secs % 60));
        logger.info(&format!("Folders processed: {}", self.folders_processed));
        logger.info(&format!("Files downloaded: {}", self.files_downloaded));
        logger.info(&format!(
            "Bytes downloaded: {} ({})",
            format_count(self.bytes_downloaded),
            format_bytes(self.bytes_downloaded)
        ));
        logger.info(&format!("Local files deleted: {}", self.files_deleted));
        logger.info(&format!("Folders with errors: {}", self.folders_with_error));
        logger.info("=== Sync finished ===");
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Group digits in thousands: `1234567` becomes `1,234,567`
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
