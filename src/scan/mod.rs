//! Corpus scanner
//!
//! Recursively lists the notation files under a folder. The folder itself is
//! validated first with [`validate_folder`]; scanning never fails and never
//! touches the filesystem beyond reading directory entries.

mod filter;

pub use filter::{DuplicateMarkerFilter, ExtensionFilter, FileFilter, ScoreFileFilter};

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Folder input rejected before any scan starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No folder path given")]
    EmptyPath,

    #[error("Folder not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a folder: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Check that `input` names an existing directory
pub fn validate_folder(input: &str) -> Result<PathBuf, ValidationError> {
    if input.is_empty() {
        return Err(ValidationError::EmptyPath);
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        return Err(ValidationError::NotFound(path));
    }
    if !path.is_dir() {
        return Err(ValidationError::NotADirectory(path));
    }
    Ok(path)
}

/// Walks a directory tree collecting files accepted by a filter
pub struct DirectoryScanner<F: FileFilter> {
    filter: F,
}

impl<F: FileFilter> DirectoryScanner<F> {
    pub const fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Matching files under `root`, sorted by path
    pub fn scan(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && self.filter.should_include(e.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();
        files.sort();
        files
    }
}

/// Scan with the default `.mxl` filter (duplicates skipped)
pub fn scan(root: &Path) -> Vec<PathBuf> {
    DirectoryScanner::new(ScoreFileFilter::default()).scan(root)
}
