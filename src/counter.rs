//! Measure counting and part exclusion
//!
//! Parts are excluded by display name rather than structural id, so every
//! staff of a grouped instrument (e.g. a piano's two staves) goes together.

use crate::models::{Part, Score};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of part display names to leave out of the count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive name match
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Whether this part's display name is excluded. Unnamed parts never are.
    pub fn excludes(&self, part: &Part) -> bool {
        match part.name.as_deref() {
            Some(name) if !name.is_empty() => self.contains(name),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Names excluded by either set
    pub fn union(&self, other: &ExclusionSet) -> ExclusionSet {
        Self(self.0.union(&other.0).cloned().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.is_empty())
                .collect(),
        )
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for ExclusionSet {
    fn from(names: [S; N]) -> Self {
        names.into_iter().collect()
    }
}

/// Parse comma-separated part names, trimming each token
///
/// Empty tokens (from blank input or stray commas) are dropped.
pub fn parse_exclusions(text: &str) -> ExclusionSet {
    text.split(',').map(str::trim).collect()
}

/// Count complete measures in every part not named in `excluded`
///
/// A measure counts only when its duration proportion is exactly 1.
pub fn count_measures(score: &Score, excluded: &ExclusionSet) -> u64 {
    let mut total = 0u64;
    for part in &score.parts {
        if excluded.excludes(part) {
            log::debug!("Skipping excluded part '{}' ({})", part.display_name(), part.id);
            continue;
        }
        total += part.measures.iter().filter(|m| m.is_complete()).count() as u64;
    }
    total
}
