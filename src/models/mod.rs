//! Models module
//!
//! The in-memory score graph the counter works on.

pub mod score;

pub use score::{Measure, Part, Rational, Score, TimeSignature};
