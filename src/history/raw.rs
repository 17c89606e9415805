//! Raw odds-history feed parsing
//!
//! The upstream odds-history endpoint returns an envelope of the form
//! `{"oddsHistory": {"hadList": [...], "hhadList": [...]}}` where each entry
//! carries `updateDate`, `updateTime` and the prices `h`/`d`/`a` (plus
//! `goalLine` on handicapped entries). Price fields arrive as numbers,
//! numeric strings (occasionally with a leading `+`), blanks or nulls.
//!
//! Only a malformed envelope is an error. Field-level garbage never fails
//! the parse: numerics coerce to zero and unparsable timestamps are kept as
//! `None` so that downstream correlation can still run.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

use super::types::{HandicapSnapshot, OddsSnapshot};

/// Odds-history boundary errors
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Payload envelope is not the expected JSON shape
    #[error("Invalid odds-history payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Primary-series entry as delivered by the feed
#[derive(Debug, Clone, Deserialize)]
pub struct RawOddsRecord {
    #[serde(rename = "updateDate", default)]
    pub update_date: Option<String>,
    #[serde(rename = "updateTime", default)]
    pub update_time: Option<String>,
    #[serde(rename = "h", default)]
    pub win: Value,
    #[serde(rename = "d", default)]
    pub draw: Value,
    #[serde(rename = "a", default)]
    pub lose: Value,
}

/// Secondary-series entry; same shape plus the goal line
#[derive(Debug, Clone, Deserialize)]
pub struct RawHandicapRecord {
    #[serde(rename = "updateDate", default)]
    pub update_date: Option<String>,
    #[serde(rename = "updateTime", default)]
    pub update_time: Option<String>,
    #[serde(rename = "goalLine", default)]
    pub goal_line: Value,
    #[serde(rename = "h", default)]
    pub win: Value,
    #[serde(rename = "d", default)]
    pub draw: Value,
    #[serde(rename = "a", default)]
    pub lose: Value,
}

#[derive(Debug, Deserialize)]
struct HistoryPayload {
    #[serde(rename = "oddsHistory", default)]
    odds_history: HistoryLists,
}

#[derive(Debug, Default, Deserialize)]
struct HistoryLists {
    #[serde(rename = "hadList", default)]
    had_list: Vec<RawOddsRecord>,
    #[serde(rename = "hhadList", default)]
    hhad_list: Vec<RawHandicapRecord>,
}

/// Coerce a loosely-typed feed value to a decimal
///
/// Blank, null and non-numeric input coerce to zero; a leading `+` is
/// stripped before parsing. JSON numbers pass through as-is.
pub fn coerce_decimal(raw: &Value) -> Decimal {
    match raw {
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap_or(Decimal::ZERO),
        Value::String(s) => {
            let trimmed = s.trim();
            let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
            Decimal::from_str(unsigned).unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    }
}

fn parse_date(raw: &Option<String>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.as_deref()?.trim(), "%Y-%m-%d").ok()
}

fn parse_time(raw: &Option<String>) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.as_deref()?.trim(), "%H:%M:%S").ok()
}

impl From<RawOddsRecord> for OddsSnapshot {
    fn from(raw: RawOddsRecord) -> Self {
        Self {
            date: parse_date(&raw.update_date),
            time: parse_time(&raw.update_time),
            win: coerce_decimal(&raw.win),
            draw: coerce_decimal(&raw.draw),
            lose: coerce_decimal(&raw.lose),
        }
    }
}

impl From<RawHandicapRecord> for HandicapSnapshot {
    fn from(raw: RawHandicapRecord) -> Self {
        Self {
            date: parse_date(&raw.update_date),
            time: parse_time(&raw.update_time),
            handicap: coerce_decimal(&raw.goal_line),
            win: coerce_decimal(&raw.win),
            draw: coerce_decimal(&raw.draw),
            lose: coerce_decimal(&raw.lose),
        }
    }
}

/// Parse a full odds-history payload into the two snapshot series
pub fn parse_history_payload(
    payload: &str,
) -> Result<(Vec<OddsSnapshot>, Vec<HandicapSnapshot>), HistoryError> {
    let parsed: HistoryPayload = serde_json::from_str(payload)?;
    let primary = parsed
        .odds_history
        .had_list
        .into_iter()
        .map(OddsSnapshot::from)
        .collect();
    let secondary = parsed
        .odds_history
        .hhad_list
        .into_iter()
        .map(HandicapSnapshot::from)
        .collect();
    Ok((primary, secondary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_coerce_decimal_numbers_and_strings() {
        assert_eq!(coerce_decimal(&json!(2.05)), dec!(2.05));
        assert_eq!(coerce_decimal(&json!("1.80")), dec!(1.80));
        assert_eq!(coerce_decimal(&json!("+0.25")), dec!(0.25));
        assert_eq!(coerce_decimal(&json!(3)), dec!(3));
    }

    #[test]
    fn test_coerce_decimal_garbage_is_zero() {
        assert_eq!(coerce_decimal(&Value::Null), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!("")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!("  ")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!("n/a")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!(true)), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!(["1.80"])), Decimal::ZERO);
    }

    #[test]
    fn test_parse_history_payload() {
        let payload = r#"{
            "oddsHistory": {
                "hadList": [
                    {"updateDate": "2025-01-01", "updateTime": "10:00:00",
                     "h": "1.80", "d": 3.20, "a": "4.50"},
                    {"updateDate": "2025-01-01", "updateTime": "10:05:00",
                     "h": "1.90", "d": "", "a": null}
                ],
                "hhadList": [
                    {"updateDate": "2025-01-01", "updateTime": "10:00:10",
                     "goalLine": "+1", "h": "1.95", "d": "3.40", "a": "3.80"}
                ]
            }
        }"#;

        let (primary, secondary) = parse_history_payload(payload).unwrap();
        assert_eq!(primary.len(), 2);
        assert_eq!(secondary.len(), 1);

        assert_eq!(primary[0].win, dec!(1.80));
        assert_eq!(primary[0].draw, dec!(3.20));
        assert_eq!(
            primary[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        // Blank and null prices coerce to zero
        assert_eq!(primary[1].draw, Decimal::ZERO);
        assert_eq!(primary[1].lose, Decimal::ZERO);

        assert_eq!(secondary[0].handicap, dec!(1));
        assert_eq!(secondary[0].draw, dec!(3.40));
    }

    #[test]
    fn test_parse_history_payload_malformed_timestamps() {
        let payload = r#"{
            "oddsHistory": {
                "hadList": [
                    {"updateDate": "not-a-date", "updateTime": "25:99:00",
                     "h": "1.80", "d": "3.20", "a": "4.50"},
                    {"h": "1.90", "d": "3.10", "a": "4.20"}
                ],
                "hhadList": []
            }
        }"#;

        let (primary, _) = parse_history_payload(payload).unwrap();
        assert_eq!(primary.len(), 2);
        assert!(primary[0].date.is_none());
        assert!(primary[0].time.is_none());
        assert!(primary[1].timestamp().is_none());
        // Prices survive even when the timestamp does not
        assert_eq!(primary[0].win, dec!(1.80));
    }

    #[test]
    fn test_parse_history_payload_empty_envelope() {
        let (primary, secondary) = parse_history_payload("{}").unwrap();
        assert!(primary.is_empty());
        assert!(secondary.is_empty());
    }

    #[test]
    fn test_parse_history_payload_invalid_envelope() {
        let result = parse_history_payload("not json at all");
        assert!(matches!(result, Err(HistoryError::Payload(_))));
    }
}
