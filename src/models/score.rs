//! Score / Part / Measure graph produced by reading one notation file.
//!
//! Durations are exact rationals measured in quarter notes, so the
//! completeness test (`filled == expected`) never suffers float drift.

use num_rational::Rational64;
use num_traits::CheckedDiv;

/// Exact duration value in quarter notes
pub type Rational = Rational64;

/// A parsed score: parts in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    pub parts: Vec<Part>,
}

impl Score {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Total number of measures across all parts, complete or not
    pub fn measure_count(&self) -> usize {
        self.parts.iter().map(|p| p.measures.len()).sum()
    }
}

/// One notated line (one staff of an instrument)
///
/// A multi-staff MusicXML part is split into one `Part` per staff. Every
/// staff keeps the instrument's display name and structural id.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Structural id from the file (e.g. "P1")
    pub id: String,

    /// Display name from `<part-name>`; `None` when the file has none
    pub name: Option<String>,

    /// 1-based staff index within the instrument
    pub staff: usize,

    pub measures: Vec<Measure>,
}

impl Part {
    pub fn new(id: impl Into<String>, name: Option<String>, measures: Vec<Measure>) -> Self {
        Self {
            id: id.into(),
            name,
            staff: 1,
            measures,
        }
    }

    /// Convenience constructor for a named single-staff part
    pub fn named(name: &str, measures: Vec<Measure>) -> Self {
        Self::new(name, Some(name.to_string()), measures)
    }

    /// Display name, or "" when the part is unnamed
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// A single bar with its filled and expected durations
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    /// Measure number as written (may be "0" or "X1" for pickups)
    pub number: String,

    /// Highest offset reached by the measure's content
    pub filled: Rational,

    /// Bar length implied by the active time signature
    pub bar_duration: Rational,
}

impl Measure {
    pub fn new(number: impl Into<String>, filled: Rational, bar_duration: Rational) -> Self {
        Self {
            number: number.into(),
            filled,
            bar_duration,
        }
    }

    /// A measure exactly filling a 4/4 bar
    pub fn full_common_time(number: impl Into<String>) -> Self {
        Self::new(number, Rational::from_integer(4), Rational::from_integer(4))
    }

    /// Ratio of filled duration to bar duration (1 == complete)
    ///
    /// A zero-length bar has proportion 0. `None` when the ratio does not
    /// fit in 64-bit terms.
    pub fn duration_proportion(&self) -> Option<Rational> {
        if self.bar_duration == Rational::from_integer(0) {
            return Some(Rational::from_integer(0));
        }
        self.filled.checked_div(&self.bar_duration)
    }

    /// Exactly full, with no tolerance band
    pub fn is_complete(&self) -> bool {
        self.bar_duration > Rational::from_integer(0) && self.filled == self.bar_duration
    }
}

/// Time signature as beats over beat-type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub beats: i64,
    pub beat_type: i64,
}

impl TimeSignature {
    /// Returns `None` for signatures that cannot describe a bar (zero parts)
    pub fn new(beats: i64, beat_type: i64) -> Option<Self> {
        if beats <= 0 || beat_type <= 0 {
            return None;
        }
        Some(Self { beats, beat_type })
    }

    /// Bar length in quarter notes: beats * 4 / beat-type
    ///
    /// `None` when `beats * 4` overflows.
    pub fn bar_duration(&self) -> Option<Rational> {
        self.beats
            .checked_mul(4)
            .map(|quarters| Rational::new(quarters, self.beat_type))
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats: 4,
            beat_type: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_duration() {
        assert_eq!(TimeSignature::default().bar_duration(), Some(Rational::from_integer(4)));
        assert_eq!(TimeSignature::new(3, 4).unwrap().bar_duration(), Some(Rational::from_integer(3)));
        assert_eq!(TimeSignature::new(6, 8).unwrap().bar_duration(), Some(Rational::from_integer(3)));
        assert_eq!(TimeSignature::new(5, 16).unwrap().bar_duration(), Some(Rational::new(5, 4)));
        assert!(TimeSignature::new(0, 4).is_none());
        assert!(TimeSignature::new(4, 0).is_none());
    }

    #[test]
    fn test_huge_beats_do_not_overflow() {
        let huge = TimeSignature::new(4_611_686_018_427_387_904, 4).unwrap();
        assert_eq!(huge.bar_duration(), None);

        let largest = TimeSignature::new(i64::MAX / 4, 1).unwrap();
        assert_eq!(largest.bar_duration(), Some(Rational::from_integer(i64::MAX / 4 * 4)));
    }

    #[test]
    fn test_measure_proportion() {
        let half = Measure::new("1", Rational::from_integer(2), Rational::from_integer(4));
        assert_eq!(half.duration_proportion(), Some(Rational::new(1, 2)));
        assert!(!half.is_complete());

        assert!(Measure::full_common_time("2").is_complete());

        // overfull bars are not complete either
        let over = Measure::new("3", Rational::from_integer(5), Rational::from_integer(4));
        assert!(!over.is_complete());
    }

    #[test]
    fn test_zero_bar_duration_is_never_complete() {
        let m = Measure::new("1", Rational::from_integer(0), Rational::from_integer(0));
        assert_eq!(m.duration_proportion(), Some(Rational::from_integer(0)));
        assert!(!m.is_complete());
    }

    #[test]
    fn test_extreme_durations_compare_without_dividing() {
        let bar = Rational::new(i64::MAX, 3);
        let full = Measure::new("1", bar, bar);
        assert!(full.is_complete());

        let tiny = Measure::new("2", Rational::new(1, i64::MAX), Rational::new(i64::MAX, 1));
        assert!(!tiny.is_complete());
        assert_eq!(tiny.duration_proportion(), None);
    }

    #[test]
    fn test_display_name() {
        let unnamed = Part::new("P1", None, Vec::new());
        assert_eq!(unnamed.display_name(), "");

        let violin = Part::named("Violin", Vec::new());
        assert_eq!(violin.display_name(), "Violin");
        assert_eq!(violin.staff, 1);
    }

    #[test]
    fn test_measure_count() {
        let score = Score::new(vec![
            Part::named("A", vec![Measure::full_common_time("1"), Measure::full_common_time("2")]),
            Part::named("B", vec![Measure::full_common_time("1")]),
        ]);
        assert_eq!(score.measure_count(), 3);
        assert_eq!(Score::default().measure_count(), 0);
    }
}
