//! Odds-movement diff module
//!
//! Turns the two odds histories of one match into an aligned sequence of
//! movement rows: win/lose movement against the opening prices plus the
//! handicapped-draw vs unconditional-draw movement at each update.

mod analyzer;
mod types;

pub use analyzer::{AnalyzerConfig, OddsDiffAnalyzer, DEFAULT_TOLERANCE_SECS};
pub use types::{DiffRow, Sign};
