//! MusicXML reading
//!
//! Turns a notation file on disk into a [`Score`]. Compressed `.mxl`
//! containers and plain `.xml` / `.musicxml` documents are both accepted;
//! anything unreadable comes back as a recoverable [`ParseError`].

pub mod archive;
pub mod errors;
pub mod parser;

pub use errors::ParseError;
pub use parser::parse_score;

use crate::models::Score;
use std::fs;
use std::path::Path;

/// Read and parse one notation file
pub fn read_score(path: &Path) -> Result<Score, ParseError> {
    let bytes = fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let xml = if is_compressed(path, &bytes) {
        archive::extract_root_document(&bytes)?
    } else {
        parser::decode_document(bytes)?
    };

    parse_score(&xml)
}

/// `.mxl` by name, or a ZIP by content
fn is_compressed(path: &Path, bytes: &[u8]) -> bool {
    let by_name = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("mxl"));
    by_name || bytes.starts_with(archive::ZIP_MAGIC)
}
