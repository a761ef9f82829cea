//! Builders for on-disk score fixtures

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// One part: (id, name, measures); each measure is a list of (duration, staff)
pub struct PartSpec<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub staves: usize,
    pub measures: Vec<Vec<(u32, usize)>>,
}

impl<'a> PartSpec<'a> {
    pub fn single(id: &'a str, name: &'a str, measures: Vec<Vec<u32>>) -> Self {
        Self {
            id,
            name,
            staves: 1,
            measures: measures
                .into_iter()
                .map(|m| m.into_iter().map(|d| (d, 1)).collect())
                .collect(),
        }
    }
}

/// Partwise MusicXML in 4/4 with divisions=1
pub fn score_xml(parts: &[PartSpec]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN"
  "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="4.0">
  <part-list>
"#,
    );
    for part in parts {
        xml.push_str(&format!(
            "    <score-part id=\"{}\"><part-name>{}</part-name></score-part>\n",
            part.id, part.name
        ));
    }
    xml.push_str("  </part-list>\n");

    for part in parts {
        xml.push_str(&format!("  <part id=\"{}\">\n", part.id));
        for (index, notes) in part.measures.iter().enumerate() {
            xml.push_str(&format!("    <measure number=\"{}\">\n", index + 1));
            if index == 0 {
                xml.push_str(&format!(
                    "      <attributes><divisions>1</divisions><staves>{}</staves>\
                     <time><beats>4</beats><beat-type>4</beat-type></time></attributes>\n",
                    part.staves
                ));
            }
            let mut previous_staff = None;
            let mut elapsed = 0;
            for (duration, staff) in notes {
                if previous_staff.is_some_and(|s| s != *staff) {
                    xml.push_str(&format!("      <backup><duration>{}</duration></backup>\n", elapsed));
                    elapsed = 0;
                }
                xml.push_str(&format!(
                    "      <note><pitch><step>C</step><octave>4</octave></pitch>\
                     <duration>{}</duration><staff>{}</staff></note>\n",
                    duration, staff
                ));
                elapsed += duration;
                previous_staff = Some(*staff);
            }
            xml.push_str("    </measure>\n");
        }
        xml.push_str("  </part>\n");
    }
    xml.push_str("</score-partwise>\n");
    xml
}

/// Wrap a document in an `.mxl` container
pub fn mxl_bytes(xml: &str) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut out));
        let options = SimpleFileOptions::default();
        zip.start_file("META-INF/container.xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<container>
  <rootfiles>
    <rootfile full-path="score.xml" media-type="application/vnd.recordare.musicxml+xml"/>
  </rootfiles>
</container>"#,
        )
        .unwrap();
        zip.start_file("score.xml", options).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    out
}

pub fn write_mxl(dir: &Path, name: &str, parts: &[PartSpec]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, mxl_bytes(&score_xml(parts))).unwrap();
    path
}
