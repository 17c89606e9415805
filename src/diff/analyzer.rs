//! Odds-movement diff analyzer
//!
//! Correlates the unconditional (primary) and handicapped (secondary)
//! odds-update histories of one match into a single aligned sequence of
//! movement rows. The two series update at different times and with
//! different cardinalities; each secondary row is matched to the nearest
//! same-day primary update within a fixed tolerance, and every primary
//! update contributes a win/lose movement exactly once.
//!
//! The computation is pure and synchronous: no clock, no I/O, no shared
//! state. Identical inputs always produce identical output.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::history::{HandicapSnapshot, OddsSnapshot};

use super::types::DiffRow;

/// Same-calendar-day matching tolerance in seconds
///
/// Tuned to the observed update cadence of the upstream feed. Downstream
/// rendering depends on the exact row count and ordering this produces.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Configuration for the diff analyzer
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Maximum absolute time-of-day difference for a same-day match
    pub tolerance_secs: i64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

/// Two-pass correlator over a match's two odds histories
pub struct OddsDiffAnalyzer {
    config: AnalyzerConfig,
}

/// Primary indices consumed by the main pass
///
/// The single value handed from the main pass to the reconciliation pass;
/// no other state is shared between the two.
#[derive(Debug, Default)]
struct Attribution {
    /// Indices whose win/lose prices already produced a movement row
    used_wl: BTreeSet<usize>,
    /// Indices whose draw price already anchored some row's dd diff
    dd_covered: BTreeSet<usize>,
}

impl OddsDiffAnalyzer {
    /// Create an analyzer with default configuration
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
        }
    }

    /// Create an analyzer with custom configuration
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Correlate the two histories into movement rows
    ///
    /// Returns main-pass rows in secondary-index order followed by
    /// reconciliation rows in ascending primary-index order. An ineligible
    /// input (not enough samples to show movement) yields an empty vector;
    /// that is a policy outcome, not an error.
    pub fn analyze(
        &self,
        primary: &[OddsSnapshot],
        secondary: &[HandicapSnapshot],
    ) -> Vec<DiffRow> {
        let eligible = if primary.is_empty() {
            secondary.len() >= 2
        } else {
            !secondary.is_empty()
        };
        if !eligible {
            tracing::debug!(
                primary_len = primary.len(),
                secondary_len = secondary.len(),
                "Not enough history to show movement"
            );
            return Vec::new();
        }

        if primary.is_empty() {
            return secondary_only_rows(secondary);
        }

        let (mut rows, attribution) = self.main_pass(primary, secondary);
        rows.extend(reconciliation_pass(primary, secondary, &attribution));
        rows
    }

    /// Main pass: one row per secondary update
    fn main_pass(
        &self,
        primary: &[OddsSnapshot],
        secondary: &[HandicapSnapshot],
    ) -> (Vec<DiffRow>, Attribution) {
        let base_win = primary[0].win;
        let base_lose = primary[0].lose;
        let mut attribution = Attribution::default();
        // Carried forward when a row finds no usable draw source of its own
        let mut draw_baseline = primary[0].draw;
        let mut rows = Vec::with_capacity(secondary.len());

        for (r, hhad) in secondary.iter().enumerate() {
            let mut win_diff = None;
            let mut lose_diff = None;

            if r == 0 {
                if let Some(next) = primary.get(1) {
                    win_diff = Some(diff_against(next.win, base_win));
                    lose_diff = Some(diff_against(next.lose, base_lose));
                    attribution.used_wl.insert(1);
                }
                // Row 0 always measures dd against the opening draw price,
                // independent of the win/lose attribution
                draw_baseline = primary[0].draw;
                attribution.dd_covered.insert(0);
            } else {
                match nearest_same_day(primary, hhad, self.config.tolerance_secs) {
                    Some(idx) if !attribution.used_wl.contains(&idx) => {
                        win_diff = Some(diff_against(primary[idx].win, base_win));
                        lose_diff = Some(diff_against(primary[idx].lose, base_lose));
                        attribution.used_wl.insert(idx);
                        attribution.dd_covered.insert(idx);
                        draw_baseline = primary[idx].draw;
                        tracing::debug!(row = r, index = idx, "Attributed primary update");
                    }
                    Some(idx) => {
                        // Nearest match already consumed for win/lose;
                        // its draw still anchors this row
                        attribution.dd_covered.insert(idx);
                        draw_baseline = primary[idx].draw;
                    }
                    None => {
                        if let Some(prior) =
                            latest_at_or_before(primary, hhad.timestamp(), OddsSnapshot::timestamp)
                        {
                            draw_baseline = prior.draw;
                        }
                        // No prior sample: keep the previous row's baseline
                    }
                }
            }

            let dd_diff = diff_against(hhad.draw, draw_baseline);
            rows.push(DiffRow::from_diffs(win_diff, lose_diff, Some(dd_diff)));
        }

        (rows, attribution)
    }
}

impl Default for OddsDiffAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconciliation pass: trailing rows for primary updates the main pass
/// did not fully consume, in ascending index order
fn reconciliation_pass(
    primary: &[OddsSnapshot],
    secondary: &[HandicapSnapshot],
    attribution: &Attribution,
) -> Vec<DiffRow> {
    let base_win = primary[0].win;
    let base_lose = primary[0].lose;
    let mut rows = Vec::new();

    for (idx, had) in primary.iter().enumerate().skip(1) {
        if attribution.used_wl.contains(&idx) && attribution.dd_covered.contains(&idx) {
            continue;
        }

        let (win_diff, lose_diff) = if attribution.used_wl.contains(&idx) {
            (None, None)
        } else {
            (
                Some(diff_against(had.win, base_win)),
                Some(diff_against(had.lose, base_lose)),
            )
        };

        let dd_diff =
            latest_at_or_before(secondary, had.timestamp(), HandicapSnapshot::timestamp)
                .map(|hhad| diff_against(hhad.draw, had.draw));

        tracing::debug!(index = idx, has_dd = dd_diff.is_some(), "Reconciliation row");
        rows.push(DiffRow::from_diffs(win_diff, lose_diff, dd_diff));
    }

    rows
}

/// Secondary-only case: movement of the handicapped draw price against its
/// own first sample
fn secondary_only_rows(secondary: &[HandicapSnapshot]) -> Vec<DiffRow> {
    let base_draw = secondary[0].draw;
    secondary[1..]
        .iter()
        .map(|hhad| DiffRow::from_diffs(None, None, Some(diff_against(hhad.draw, base_draw))))
        .collect()
}

/// Movement between two prices, rounded once at the point of subtraction
///
/// A zero operand means the price was missing upstream; the movement is
/// reported as zero rather than measured against a bogus value.
fn diff_against(current: Decimal, base: Decimal) -> Decimal {
    if current.is_zero() || base.is_zero() {
        return Decimal::ZERO;
    }
    (current - base).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Index of the primary snapshot on the same calendar date with the
/// smallest absolute time-of-day difference within the tolerance
///
/// Strictly-smaller comparison, so the earliest index wins ties. Snapshots
/// with unparsable timestamps compare as infinitely far and never match.
fn nearest_same_day(
    primary: &[OddsSnapshot],
    target: &HandicapSnapshot,
    tolerance_secs: i64,
) -> Option<usize> {
    let target_date = target.date?;
    let target_secs = target.seconds_of_day()?;
    let mut best: Option<(usize, i64)> = None;

    for (idx, had) in primary.iter().enumerate() {
        if had.date != Some(target_date) {
            continue;
        }
        let Some(had_secs) = had.seconds_of_day() else {
            continue;
        };
        let gap = (had_secs - target_secs).abs();
        if gap <= tolerance_secs && best.map_or(true, |(_, b)| gap < b) {
            best = Some((idx, gap));
        }
    }

    best.map(|(idx, _)| idx)
}

/// Most recent sample with a full timestamp at or before the cutoff
fn latest_at_or_before<T>(
    items: &[T],
    cutoff: Option<NaiveDateTime>,
    stamp: fn(&T) -> Option<NaiveDateTime>,
) -> Option<&T> {
    let cutoff = cutoff?;
    let mut best: Option<(NaiveDateTime, &T)> = None;

    for item in items {
        let Some(ts) = stamp(item) else {
            continue;
        };
        if ts <= cutoff && best.map_or(true, |(b, _)| ts > b) {
            best = Some((ts, item));
        }
    }

    best.map(|(_, item)| item)
}
