//! Configuration for a counting run

use crate::counter::ExclusionSet;
use crate::scan::{DuplicateMarkerFilter, ExtensionFilter, ScoreFileFilter};
use serde::{Deserialize, Serialize};

/// Options for scanning and counting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountSettings {
    /// File extension to collect (case-insensitive)
    pub extension: String,

    /// Filename marker of duplicate downloads; `None` keeps every file
    pub duplicate_marker: Option<String>,

    /// Part display names left out of the count
    pub excluded_parts: ExclusionSet,
}

impl Default for CountSettings {
    fn default() -> Self {
        Self {
            extension: "mxl".to_string(),
            duplicate_marker: Some(DuplicateMarkerFilter::DEFAULT_MARKER.to_string()),
            excluded_parts: ExclusionSet::new(),
        }
    }
}

impl CountSettings {
    pub fn with_excluded_parts(mut self, excluded_parts: ExclusionSet) -> Self {
        self.excluded_parts = excluded_parts;
        self
    }

    /// Filename filter for the scanner
    pub fn file_filter(&self) -> ScoreFileFilter {
        let duplicates = match &self.duplicate_marker {
            Some(marker) => DuplicateMarkerFilter::new(marker.as_str()),
            None => DuplicateMarkerFilter::disabled(),
        };
        ScoreFileFilter::new(ExtensionFilter::new(&self.extension), duplicates)
    }
}
