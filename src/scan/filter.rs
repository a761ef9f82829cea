//! Filename filters for the corpus scanner

use std::path::Path;

/// Decides whether a discovered file belongs to the corpus
pub trait FileFilter {
    fn should_include(&self, path: &Path) -> bool;
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Case-insensitive filename suffix match (".mxl")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffix: String,
}

impl ExtensionFilter {
    /// Accepts "mxl" or ".mxl"
    pub fn new(extension: &str) -> Self {
        let extension = extension.trim().trim_start_matches('.').to_lowercase();
        Self {
            suffix: format!(".{}", extension),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl FileFilter for ExtensionFilter {
    fn should_include(&self, path: &Path) -> bool {
        file_name(path).map_or(false, |name| name.to_lowercase().ends_with(&self.suffix))
    }
}

/// Skips re-downloaded duplicates, recognised by a marker such as "(1)"
/// in the filename. A filter without a marker lets everything through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMarkerFilter {
    marker: Option<String>,
}

impl DuplicateMarkerFilter {
    pub const DEFAULT_MARKER: &'static str = "(1)";

    pub fn new(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        Self {
            marker: (!marker.is_empty()).then_some(marker),
        }
    }

    pub fn disabled() -> Self {
        Self { marker: None }
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }
}

impl Default for DuplicateMarkerFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MARKER)
    }
}

impl FileFilter for DuplicateMarkerFilter {
    fn should_include(&self, path: &Path) -> bool {
        match (&self.marker, file_name(path)) {
            (Some(marker), Some(name)) => !name.contains(marker.as_str()),
            _ => true,
        }
    }
}

/// Extension match plus duplicate skipping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreFileFilter {
    pub extension: ExtensionFilter,
    pub duplicates: DuplicateMarkerFilter,
}

impl ScoreFileFilter {
    pub fn new(extension: ExtensionFilter, duplicates: DuplicateMarkerFilter) -> Self {
        Self {
            extension,
            duplicates,
        }
    }
}

impl Default for ScoreFileFilter {
    fn default() -> Self {
        Self::new(ExtensionFilter::new("mxl"), DuplicateMarkerFilter::default())
    }
}

impl FileFilter for ScoreFileFilter {
    fn should_include(&self, path: &Path) -> bool {
        self.extension.should_include(path) && self.duplicates.should_include(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        let filter = ExtensionFilter::new(".MXL");
        assert_eq!(filter.suffix(), ".mxl");
        assert!(filter.should_include(Path::new("a/b/Song.Mxl")));
        assert!(filter.should_include(Path::new("song.mxl")));
        assert!(!filter.should_include(Path::new("song.xml")));
        assert!(!filter.should_include(Path::new("mxl")));
    }

    #[test]
    fn test_duplicate_marker() {
        let filter = DuplicateMarkerFilter::default();
        assert!(!filter.should_include(Path::new("song(1).mxl")));
        assert!(!filter.should_include(Path::new("song (1) final.mxl")));
        assert!(filter.should_include(Path::new("song(2).mxl")));
        // marker applies to the filename only
        assert!(filter.should_include(Path::new("dir(1)/song.mxl")));
    }

    #[test]
    fn test_duplicate_marker_override() {
        let copy = DuplicateMarkerFilter::new(" - Copy");
        assert!(!copy.should_include(Path::new("song - Copy.mxl")));
        assert!(copy.should_include(Path::new("song(1).mxl")));

        assert!(DuplicateMarkerFilter::disabled().should_include(Path::new("song(1).mxl")));
        assert_eq!(DuplicateMarkerFilter::new("").marker(), None);
    }

    #[test]
    fn test_score_file_filter() {
        let filter = ScoreFileFilter::default();
        assert!(filter.should_include(Path::new("x.mxl")));
        assert!(!filter.should_include(Path::new("y(1).mxl")));
        assert!(!filter.should_include(Path::new("z.xml")));
    }
}
