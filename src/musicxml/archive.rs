//! Compressed MusicXML (`.mxl`) container access
//!
//! An `.mxl` file is a ZIP archive. `META-INF/container.xml` names the root
//! score through `<rootfile full-path="...">`; older writers sometimes omit
//! the container, in which case the first MusicXML entry is used.

use super::errors::ParseError;
use super::parser::decode_document;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const CONTAINER_PATH: &str = "META-INF/container.xml";

/// ZIP local file header magic
pub const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Extract the root MusicXML document from `.mxl` bytes
pub fn extract_root_document(bytes: &[u8]) -> Result<String, ParseError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let root_path = match read_entry(&mut archive, CONTAINER_PATH) {
        Ok(container) => rootfile_path(&container)?,
        Err(ParseError::InvalidArchive(_)) => None,
        Err(e) => return Err(e),
    };

    let root_path = match root_path {
        Some(path) => path,
        None => first_score_entry(&archive).ok_or_else(|| {
            ParseError::InvalidArchive("no MusicXML document in archive".to_string())
        })?,
    };

    log::debug!("MXL root document: {}", root_path);
    let raw = read_entry(&mut archive, &root_path)?;
    decode_document(raw)
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Vec<u8>, ParseError> {
    let mut file = archive.by_name(name)?;
    let mut raw = Vec::new();
    file.read_to_end(&mut raw)
        .map_err(|e| ParseError::InvalidArchive(format!("{}: {}", name, e)))?;
    Ok(raw)
}

/// Find the first `<rootfile full-path>` in container.xml
fn rootfile_path(container: &[u8]) -> Result<Option<String>, ParseError> {
    let mut reader = Reader::from_reader(container);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"rootfile" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    if attr.key.as_ref() == b"full-path" {
                        let path = attr.unescape_value()?.trim().to_string();
                        if !path.is_empty() {
                            return Ok(Some(path));
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(None)
}

fn first_score_entry(archive: &ZipArchive<Cursor<&[u8]>>) -> Option<String> {
    archive
        .file_names()
        .filter(|name| !name.starts_with("META-INF/"))
        .find(|name| {
            let lower = name.to_lowercase();
            lower.ends_with(".xml") || lower.ends_with(".musicxml")
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const SCORE: &str = r#"<?xml version="1.0"?><score-partwise><part-list/></score-partwise>"#;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut out));
            for (name, content) in entries {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        out
    }

    fn container(path: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<container>
  <rootfiles>
    <rootfile full-path="{}" media-type="application/vnd.recordare.musicxml+xml"/>
  </rootfiles>
</container>"#,
            path
        )
    }

    #[test]
    fn test_root_from_container() {
        let bytes = build_zip(&[
            ("META-INF/container.xml", &container("scores/song.xml")),
            ("aaa.xml", "<not-this/>"),
            ("scores/song.xml", SCORE),
        ]);
        assert!(bytes.starts_with(ZIP_MAGIC));
        assert_eq!(extract_root_document(&bytes).unwrap(), SCORE);
    }

    #[test]
    fn test_root_without_container() {
        let bytes = build_zip(&[("readme.txt", "hello"), ("song.musicxml", SCORE)]);
        assert_eq!(extract_root_document(&bytes).unwrap(), SCORE);
    }

    #[test]
    fn test_container_points_at_missing_entry() {
        let bytes = build_zip(&[("META-INF/container.xml", &container("gone.xml"))]);
        assert!(matches!(
            extract_root_document(&bytes),
            Err(ParseError::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_archive_without_score() {
        let bytes = build_zip(&[("readme.txt", "hello")]);
        assert!(matches!(
            extract_root_document(&bytes),
            Err(ParseError::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            extract_root_document(b"definitely not a zip"),
            Err(ParseError::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_rootfile_path_parsing() {
        assert_eq!(
            rootfile_path(container("a &amp; b.xml").as_bytes()).unwrap(),
            Some("a & b.xml".to_string())
        );
        assert_eq!(rootfile_path(b"<container/>").unwrap(), None);
    }
}
