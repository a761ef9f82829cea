//! MusicXML partwise parsing into the Score graph
//!
//! Uses roxmltree to walk `<part>` / `<measure>` elements. Each measure is
//! replayed with a time cursor (notes, `<backup>`, `<forward>`) to find how
//! much of the bar every staff fills; the active `<time>` gives the bar length.

use super::errors::ParseError;
use crate::models::{Measure, Part, Rational, Score, TimeSignature};
use num_traits::{CheckedAdd, CheckedDiv, CheckedSub};
use roxmltree::{Document, Node};
use std::borrow::Cow;
use std::collections::HashMap;

/// Upper bound for `<staves>` / `<staff>` values we honour
const MAX_STAVES: usize = 64;

// ============================================================================
// DOCUMENT ENTRY POINTS
// ============================================================================

/// Decode raw file bytes to text (UTF-8, or UTF-16 with a BOM)
pub fn decode_document(raw: Vec<u8>) -> Result<String, ParseError> {
    if let [0xFF, 0xFE, rest @ ..] = raw.as_slice() {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let [0xFE, 0xFF, rest @ ..] = raw.as_slice() {
        return decode_utf16(rest, u16::from_be_bytes);
    }

    let text = String::from_utf8(raw)
        .map_err(|e| ParseError::InvalidXml(format!("Invalid UTF-8: {}", e)))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String, ParseError> {
    let pairs = bytes.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        return Err(ParseError::InvalidXml(
            "Invalid UTF-16: odd number of bytes".to_string(),
        ));
    }
    let units = pairs.map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| ParseError::InvalidXml(format!("Invalid UTF-16: {}", e)))
}

/// Remove the DOCTYPE declaration (roxmltree rejects DTDs)
///
/// MusicXML writers usually split the declaration over two lines, so this
/// cuts from `<!DOCTYPE` to its closing `>` rather than dropping lines.
pub fn strip_doctype(xml: &str) -> Cow<'_, str> {
    let Some(start) = xml.find("<!DOCTYPE") else {
        return Cow::Borrowed(xml);
    };

    let rest = &xml[start..];
    let end = match (rest.find('['), rest.find('>')) {
        // internal subset: <!DOCTYPE x [ ... ]>
        (Some(open), Some(close)) if open < close => rest.find("]>").map(|i| i + 2),
        (_, Some(close)) => Some(close + 1),
        _ => None,
    };

    match end {
        Some(end) => Cow::Owned(format!("{}{}", &xml[..start], &rest[end..])),
        None => Cow::Borrowed(xml),
    }
}

/// Parse a partwise MusicXML document
pub fn parse_score(xml: &str) -> Result<Score, ParseError> {
    let xml = strip_doctype(xml);
    let doc = Document::parse(&xml)?;
    let root = doc.root_element();

    match root.tag_name().name() {
        "score-partwise" => {}
        "score-timewise" => {
            return Err(ParseError::UnsupportedFormat(
                "score-timewise documents are not supported".to_string(),
            ))
        }
        other => {
            return Err(ParseError::UnsupportedFormat(format!(
                "Expected score-partwise, found {}",
                other
            )))
        }
    }

    let names = part_names(root);
    let mut parts = Vec::new();
    for (index, part_node) in children_named(root, "part").enumerate() {
        let id = part_node
            .attribute("id")
            .map(str::to_string)
            .unwrap_or_else(|| format!("P{}", index + 1));
        let name = names.get(id.as_str()).cloned();
        parts.extend(read_part(part_node, &id, name)?);
    }

    Ok(Score::new(parts))
}

/// Map score-part id -> display name from `<part-list>`
fn part_names<'a>(root: Node<'a, '_>) -> HashMap<&'a str, String> {
    let mut names = HashMap::new();
    let Some(part_list) = get_child(root, "part-list") else {
        return names;
    };

    for score_part in children_named(part_list, "score-part") {
        let Some(id) = score_part.attribute("id") else {
            continue;
        };
        if let Some(name) = get_child_text(score_part, "part-name") {
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                names.insert(id, trimmed.to_string());
            }
        }
    }
    names
}

// ============================================================================
// PART AND MEASURE REPLAY
// ============================================================================

/// Attribute state carried from one measure to the next within a part
#[derive(Debug, Clone)]
struct PartState {
    /// Divisions per quarter note
    divisions: Rational,
    bar_duration: Rational,
    staves: usize,
}

impl Default for PartState {
    fn default() -> Self {
        Self {
            divisions: Rational::from_integer(1),
            // 4/4
            bar_duration: Rational::from_integer(4),
            staves: 1,
        }
    }
}

impl PartState {
    fn apply_attributes(&mut self, attributes: Node) -> Result<(), ParseError> {
        if let Some(divisions) = get_child_text(attributes, "divisions").and_then(|s| parse_decimal(&s)) {
            if divisions > Rational::from_integer(0) {
                self.divisions = divisions;
            }
        }

        if let Some(staves) = get_child_text(attributes, "staves").and_then(|s| s.trim().parse::<usize>().ok()) {
            if (1..=MAX_STAVES).contains(&staves) {
                self.staves = staves;
            }
        }

        if let Some(time) = get_child(attributes, "time") {
            if let Some(bar) = parse_time(time)? {
                self.bar_duration = bar;
            }
        }
        Ok(())
    }

    /// `<duration>` of a note/backup/forward in quarter notes
    fn duration_of(&self, node: Node) -> Result<Rational, ParseError> {
        let zero = Rational::from_integer(0);
        match get_child_text(node, "duration")
            .and_then(|s| parse_decimal(&s))
            .filter(|d| *d >= zero)
        {
            Some(divs) => divs
                .checked_div(&self.divisions)
                .ok_or_else(|| out_of_range("duration", &divs)),
            None => Ok(zero),
        }
    }
}

/// Filled duration per staff for one measure
struct MeasureReading {
    number: String,
    staff_ends: Vec<Rational>,
    bar_duration: Rational,
}

impl MeasureReading {
    fn record(&mut self, staff: usize, end: Rational) {
        if self.staff_ends.len() < staff {
            self.staff_ends.resize(staff, Rational::from_integer(0));
        }
        let slot = &mut self.staff_ends[staff - 1];
        *slot = (*slot).max(end);
    }
}

/// Read one `<part>` into one `Part` per staff
fn read_part(node: Node, id: &str, name: Option<String>) -> Result<Vec<Part>, ParseError> {
    let mut state = PartState::default();
    let readings = children_named(node, "measure")
        .map(|measure| read_measure(measure, &mut state))
        .collect::<Result<Vec<MeasureReading>, ParseError>>()?;

    let staff_count = readings
        .iter()
        .map(|r| r.staff_ends.len())
        .max()
        .unwrap_or(1)
        .max(1);

    Ok((1..=staff_count)
        .map(|staff| {
            let measures = readings
                .iter()
                .map(|r| {
                    let filled = r
                        .staff_ends
                        .get(staff - 1)
                        .copied()
                        .unwrap_or_else(|| Rational::from_integer(0));
                    Measure::new(r.number.clone(), filled, r.bar_duration)
                })
                .collect();
            Part {
                id: id.to_string(),
                name: name.clone(),
                staff,
                measures,
            }
        })
        .collect())
}

fn read_measure(node: Node, state: &mut PartState) -> Result<MeasureReading, ParseError> {
    let zero = Rational::from_integer(0);
    let mut reading = MeasureReading {
        number: node.attribute("number").unwrap_or("").to_string(),
        staff_ends: vec![zero; state.staves],
        bar_duration: state.bar_duration,
    };

    let mut cursor = zero;
    let mut last_onset = zero;

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "attributes" => {
                state.apply_attributes(child)?;
                reading.bar_duration = state.bar_duration;
                if reading.staff_ends.len() < state.staves {
                    reading.staff_ends.resize(state.staves, zero);
                }
            }
            "note" => {
                if get_child(child, "grace").is_some() {
                    continue;
                }
                let duration = state.duration_of(child)?;
                let onset = if get_child(child, "chord").is_some() {
                    last_onset
                } else {
                    last_onset = cursor;
                    cursor = advance(cursor, duration)?;
                    last_onset
                };
                reading.record(staff_of(child), advance(onset, duration)?);
            }
            "backup" => {
                let duration = state.duration_of(child)?;
                cursor = cursor
                    .checked_sub(&duration)
                    .ok_or_else(|| out_of_range("backup", &duration))?
                    .max(zero);
            }
            "forward" => {
                cursor = advance(cursor, state.duration_of(child)?)?;
                reading.record(staff_of(child), cursor);
            }
            _ => {}
        }
    }

    Ok(reading)
}

fn advance(offset: Rational, duration: Rational) -> Result<Rational, ParseError> {
    offset
        .checked_add(&duration)
        .ok_or_else(|| out_of_range("offset", &offset))
}

fn out_of_range(what: &str, value: &Rational) -> ParseError {
    ParseError::OutOfRange(format!("{} {} overflows measure arithmetic", what, value))
}

fn staff_of(node: Node) -> usize {
    get_child_text(node, "staff")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|s| (1..=MAX_STAVES).contains(s))
        .unwrap_or(1)
}

// ============================================================================
// VALUE PARSING
// ============================================================================

/// Bar length of a `<time>` element in quarter notes
///
/// Composite signatures (several beats/beat-type pairs) and additive beats
/// ("3+2") are summed. `<senza-misura>` or an unreadable signature yields
/// `Ok(None)`; a signature too large to represent is an error.
pub fn parse_time(time: Node) -> Result<Option<Rational>, ParseError> {
    let mut total: Option<Rational> = None;
    let mut pending_beats: Option<i64> = None;

    for child in time.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "beats" => {
                pending_beats = child.text().and_then(parse_beats);
            }
            "beat-type" => {
                let beat_type = child.text().and_then(|s| s.trim().parse::<i64>().ok());
                if let (Some(beats), Some(beat_type)) = (pending_beats.take(), beat_type) {
                    let Some(signature) = TimeSignature::new(beats, beat_type) else {
                        return Ok(None);
                    };
                    let bar = signature.bar_duration().ok_or_else(|| {
                        ParseError::OutOfRange(format!("time signature {}/{}", beats, beat_type))
                    })?;
                    total = Some(match total {
                        Some(t) => t.checked_add(&bar).ok_or_else(|| out_of_range("bar", &t))?,
                        None => bar,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(total)
}

/// Sum of additive beats; `None` when unreadable or overflowing
fn parse_beats(text: &str) -> Option<i64> {
    text.split('+')
        .try_fold(0i64, |acc, part| acc.checked_add(part.trim().parse::<i64>().ok()?))
}

/// Parse a MusicXML decimal ("3", "1.5", ".25") into an exact rational
pub fn parse_decimal(text: &str) -> Option<Rational> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let scale = 10i64.checked_pow(frac.len() as u32)?;
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac: i64 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    let numer = whole.checked_mul(scale)?.checked_add(frac)?;

    Some(Rational::new(if negative { -numer } else { numer }, scale))
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

/// Get first child element with given tag name
fn get_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Get text content of first child with given tag
fn get_child_text(node: Node, tag: &str) -> Option<String> {
    get_child(node, tag).and_then(|n| n.text()).map(|s| s.to_string())
}
