//! Odds history supplier boundary
//!
//! Typed snapshot model for the two update series of one match, plus parsing
//! of the raw feed payload. The boundary applies the safe numeric coercion
//! rule so the diff analyzer only ever sees clean decimals.

mod raw;
mod types;

pub use raw::{
    coerce_decimal, parse_history_payload, HistoryError, RawHandicapRecord, RawOddsRecord,
};
pub use types::{HandicapSnapshot, OddsSnapshot};
