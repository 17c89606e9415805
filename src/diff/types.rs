//! Diff output types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a computed movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    /// Movement of zero or more
    Positive,
    /// Movement below zero
    Negative,
}

impl Sign {
    /// Sign of a movement; zero counts as positive
    pub fn of(diff: Decimal) -> Self {
        if diff >= Decimal::ZERO {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// One correlated movement row
///
/// `win_diff`/`lose_diff` are `None` when no primary snapshot could be
/// attributed to the row. `dd_diff` is `None` only on a reconciliation row
/// that has no secondary sample at or before the primary update; consumers
/// render `None` as a placeholder, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRow {
    /// Win price movement against the primary baseline
    pub win_diff: Option<Decimal>,
    /// Lose price movement against the primary baseline
    pub lose_diff: Option<Decimal>,
    /// Handicapped draw price minus the draw price judged current
    pub dd_diff: Option<Decimal>,
    pub win_sign: Option<Sign>,
    pub lose_sign: Option<Sign>,
    pub dd_sign: Option<Sign>,
    /// True when any present diff is negative; consumers use this for
    /// row highlighting
    pub any_negative: bool,
}

impl DiffRow {
    /// Build a row from computed diffs, deriving signs and the negative flag
    pub fn from_diffs(
        win_diff: Option<Decimal>,
        lose_diff: Option<Decimal>,
        dd_diff: Option<Decimal>,
    ) -> Self {
        let any_negative = [win_diff, lose_diff, dd_diff]
            .iter()
            .flatten()
            .any(|d| *d < Decimal::ZERO);
        Self {
            win_sign: win_diff.map(Sign::of),
            lose_sign: lose_diff.map(Sign::of),
            dd_sign: dd_diff.map(Sign::of),
            any_negative,
            win_diff,
            lose_diff,
            dd_diff,
        }
    }
}
