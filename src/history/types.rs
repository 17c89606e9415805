//! Odds history snapshot types

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One observed update of the unconditional win/draw/lose prices
/// (the primary series)
///
/// The supplier delivers snapshots already sorted ascending by (date, time);
/// sort order is an input invariant and is not re-verified here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsSnapshot {
    /// Calendar date of the update; `None` when the feed timestamp
    /// could not be parsed
    pub date: Option<NaiveDate>,
    /// Clock time of the update; `None` when unparsable
    pub time: Option<NaiveTime>,
    /// Home win price
    pub win: Decimal,
    /// Draw price
    pub draw: Decimal,
    /// Away win price
    pub lose: Decimal,
}

/// One observed update of the handicapped win/draw/lose prices
/// (the secondary series)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandicapSnapshot {
    /// Calendar date of the update; `None` when unparsable
    pub date: Option<NaiveDate>,
    /// Clock time of the update; `None` when unparsable
    pub time: Option<NaiveTime>,
    /// Goal line the prices are conditioned on
    pub handicap: Decimal,
    /// Home win price at the goal line
    pub win: Decimal,
    /// Draw price at the goal line
    pub draw: Decimal,
    /// Away win price at the goal line
    pub lose: Decimal,
}

impl OddsSnapshot {
    /// Full timestamp, available only when both components parsed
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        Some(self.date?.and_time(self.time?))
    }

    /// Seconds since midnight of the time-of-day component
    pub fn seconds_of_day(&self) -> Option<i64> {
        self.time.map(|t| i64::from(t.num_seconds_from_midnight()))
    }
}

impl HandicapSnapshot {
    /// Full timestamp, available only when both components parsed
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        Some(self.date?.and_time(self.time?))
    }

    /// Seconds since midnight of the time-of-day component
    pub fn seconds_of_day(&self) -> Option<i64> {
        self.time.map(|t| i64::from(t.num_seconds_from_midnight()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_timestamp_requires_both_components() {
        let snapshot = OddsSnapshot {
            date: NaiveDate::from_ymd_opt(2025, 1, 1),
            time: None,
            win: dec!(1.80),
            draw: dec!(3.20),
            lose: dec!(4.50),
        };
        assert!(snapshot.timestamp().is_none());
        assert!(snapshot.seconds_of_day().is_none());

        let snapshot = OddsSnapshot {
            time: NaiveTime::from_hms_opt(10, 0, 30),
            ..snapshot
        };
        assert!(snapshot.timestamp().is_some());
        assert_eq!(snapshot.seconds_of_day(), Some(36030));
    }

    #[test]
    fn test_seconds_of_day_handicap() {
        let snapshot = HandicapSnapshot {
            date: NaiveDate::from_ymd_opt(2025, 1, 1),
            time: NaiveTime::from_hms_opt(0, 5, 0),
            handicap: dec!(-1),
            win: dec!(1.95),
            draw: dec!(3.40),
            lose: dec!(3.80),
        };
        assert_eq!(snapshot.seconds_of_day(), Some(300));
    }
}
