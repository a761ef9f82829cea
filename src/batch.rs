//! Batch orchestration: scan a folder, read every score, count, accumulate
//!
//! Files are processed one at a time on the calling thread. The progress
//! callback runs after every counted file and is where an interactive front
//! end gets to repaint.

use crate::counter::count_measures;
use crate::musicxml::read_score;
use crate::scan::{validate_folder, DirectoryScanner, ValidationError};
use crate::settings::CountSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Totals accumulated across runs until reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningTotals {
    pub files_processed: u64,
    pub measures: u64,
}

impl RunningTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_file(&mut self, measures: u64) {
        self.files_processed += 1;
        self.measures += measures;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Reported after each successfully counted file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchProgress {
    pub path: PathBuf,
    pub measures_in_file: u64,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchProgress {
    /// Processed / discovered × 100 (0 when nothing was discovered)
    pub fn percent(&self) -> f64 {
        if self.files_discovered == 0 {
            return 0.0;
        }
        self.files_processed as f64 / self.files_discovered as f64 * 100.0
    }
}

/// A file that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub measures: u64,
    pub skipped: Vec<SkippedFile>,
}

impl BatchReport {
    pub fn percent_complete(&self) -> f64 {
        if self.files_discovered == 0 {
            return 0.0;
        }
        self.files_processed as f64 / self.files_discovered as f64 * 100.0
    }
}

/// Validate `folder`, then count every matching score under it
///
/// Unreadable scores are skipped and listed in the report; they never abort
/// the batch and never touch `totals`.
pub fn process_folder<F>(
    folder: &str,
    settings: &CountSettings,
    totals: &mut RunningTotals,
    on_progress: F,
) -> Result<BatchReport, ValidationError>
where
    F: FnMut(&BatchProgress),
{
    let root = validate_folder(folder)?;
    let files = DirectoryScanner::new(settings.file_filter()).scan(&root);
    log::info!("Found {} score files under {}", files.len(), root.display());

    Ok(process_files(&files, settings, totals, on_progress))
}

/// Count an already-discovered list of files
pub fn process_files<F>(
    files: &[PathBuf],
    settings: &CountSettings,
    totals: &mut RunningTotals,
    mut on_progress: F,
) -> BatchReport
where
    F: FnMut(&BatchProgress),
{
    let mut report = BatchReport {
        files_discovered: files.len(),
        ..BatchReport::default()
    };

    for path in files {
        let Some(measures) = count_file(path, settings, &mut report) else {
            continue;
        };

        totals.record_file(measures);
        report.files_processed += 1;
        report.measures += measures;
        log::info!("Processed file: {} ({} measures)", path.display(), measures);

        on_progress(&BatchProgress {
            path: path.clone(),
            measures_in_file: measures,
            files_processed: report.files_processed,
            files_discovered: report.files_discovered,
        });
    }

    log::info!(
        "Batch done: {}/{} files, {} measures, {} skipped",
        report.files_processed,
        report.files_discovered,
        report.measures,
        report.skipped.len()
    );
    report
}

fn count_file(path: &Path, settings: &CountSettings, report: &mut BatchReport) -> Option<u64> {
    match read_score(path) {
        Ok(score) => Some(count_measures(&score, &settings.excluded_parts)),
        Err(e) => {
            log::warn!("Skipping {}: {}", path.display(), e);
            report.skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            None
        }
    }
}
