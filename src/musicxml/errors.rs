//! Error types for reading notation files
//!
//! Every variant is recoverable at batch level: the offending file is
//! skipped and the batch moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a file into a `Score`
#[derive(Debug, Error)]
pub enum ParseError {
    /// File could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Compressed container is damaged or has no score inside
    #[error("Invalid MXL archive: {0}")]
    InvalidArchive(String),

    /// XML is malformed (not well-formed, or not UTF-8)
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Durations or time signatures too large for exact 64-bit arithmetic
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// MusicXML format not supported (e.g., timewise instead of partwise)
    #[error("Unsupported MusicXML format: {0}")]
    UnsupportedFormat(String),
}

impl From<zip::result::ZipError> for ParseError {
    fn from(err: zip::result::ZipError) -> Self {
        ParseError::InvalidArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::InvalidXml(err.to_string())
    }
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        ParseError::InvalidXml(format!("XML parse error: {}", err))
    }
}
