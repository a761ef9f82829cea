//! MXL Measure Counter
//!
//! Counts rhythmically complete measures across a folder of compressed
//! MusicXML scores, leaving out parts by instrument name.
//!
//! The core operations are [`scan`], [`count_measures`] and
//! [`parse_exclusions`]; [`process_folder`] strings them together over a
//! folder and [`Session`] wraps that in the state a form front end shows.

pub mod batch;
pub mod counter;
pub mod models;
pub mod musicxml;
pub mod scan;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use batch::{process_folder, BatchProgress, BatchReport, RunningTotals, SkippedFile};
pub use counter::{count_measures, parse_exclusions, ExclusionSet};
pub use models::{Measure, Part, Rational, Score, TimeSignature};
pub use musicxml::{read_score, ParseError};
pub use scan::{scan, validate_folder, ValidationError};
pub use session::{FormState, Session};
pub use settings::CountSettings;
