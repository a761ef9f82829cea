//! Headless model of the counting form
//!
//! Holds the two text inputs, the status line, the progress value and the
//! two result labels that an interactive front end renders. The front end
//! forwards user actions (browse, process, reset) and draws `form()`.

use crate::batch::{process_folder, BatchProgress, BatchReport, RunningTotals};
use crate::counter::parse_exclusions;
use crate::scan::ValidationError;
use crate::settings::CountSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const STATUS_EMPTY_PATH: &str = "Please enter a folder path.";
pub const STATUS_NOT_FOUND: &str = "Folder not found.";
pub const STATUS_PROCESSING: &str = "Processing files...";

/// Everything the form displays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub folder_path: String,
    /// Comma-separated part names
    pub excluded_parts: String,
    pub status: String,
    /// 0..=100
    pub progress: f64,
    pub processed_files_label: String,
    pub total_measures_label: String,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    form: FormState,
    settings: CountSettings,
    totals: RunningTotals,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use non-default scan options
    ///
    /// Exclusions in `settings` always apply; names typed into the form are
    /// added on top of them for each run.
    pub fn with_settings(settings: CountSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn totals(&self) -> RunningTotals {
        self.totals
    }

    pub fn set_folder_path(&mut self, path: impl Into<String>) {
        self.form.folder_path = path.into();
    }

    pub fn set_excluded_parts(&mut self, names: impl Into<String>) {
        self.form.excluded_parts = names.into();
    }

    /// Apply a folder picked in a chooser; a cancelled pick changes nothing
    pub fn browse(&mut self, chosen: Option<PathBuf>) {
        if let Some(path) = chosen {
            self.form.folder_path = path.to_string_lossy().into_owned();
        }
    }

    /// Run one batch over the folder in the form
    pub fn process<F>(&mut self, mut on_progress: F) -> Result<BatchReport, ValidationError>
    where
        F: FnMut(&FormState, &BatchProgress),
    {
        let excluded = self
            .settings
            .excluded_parts
            .union(&parse_exclusions(&self.form.excluded_parts));
        let settings = self.settings.clone().with_excluded_parts(excluded);

        self.form.status = STATUS_PROCESSING.to_string();

        let folder = self.form.folder_path.clone();
        let form = &mut self.form;
        let result = process_folder(&folder, &settings, &mut self.totals, |progress| {
            form.progress = progress.percent();
            on_progress(form, progress);
        });

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                self.form.status = match e {
                    ValidationError::EmptyPath => STATUS_EMPTY_PATH,
                    ValidationError::NotFound(_) | ValidationError::NotADirectory(_) => STATUS_NOT_FOUND,
                }
                .to_string();
                log::warn!("{}", e);
                return Err(e);
            }
        };

        self.form.status = format!("Processed {} files.", report.files_processed);
        self.form.processed_files_label = format!("Total files processed: {}", report.files_processed);
        self.form.total_measures_label = format!("Total measures: {}", self.totals.measures);
        Ok(report)
    }

    /// Clear results and zero the running totals; inputs are kept
    pub fn reset(&mut self) {
        self.form.status.clear();
        self.form.progress = 0.0;
        self.form.processed_files_label.clear();
        self.totals.reset();
        self.form.total_measures_label = format!("Total measures: {}", self.totals.measures);
    }
}
