//! Progress subsystem configuration, including the calendar-day policy.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for the completion ledger, streak engine, and
/// achievement evaluator.
///
/// The calendar-day boundary is an explicit policy here, not an ambient
/// system-clock call inside algorithm code: all day math goes through
/// [`ProgressConfig::calendar_day`], so tests can drive it with fixed
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Fixed offset from UTC, in minutes, applied before truncating a
    /// timestamp to a calendar day. System-wide, never per-user — the
    /// idempotency key depends on it staying stable.
    pub day_offset_minutes: i32,

    /// How many days a streak survives without a new completion. 1 means
    /// "yesterday's streak is still alive today until the day elapses".
    pub streak_grace_days: i64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            day_offset_minutes: 0, // plain UTC midnight
            streak_grace_days: 1,
        }
    }
}

impl ProgressConfig {
    /// Map a wall-clock timestamp to its calendar day under this policy.
    pub fn calendar_day(&self, ts: DateTime<Utc>) -> NaiveDate {
        (ts + Duration::minutes(i64::from(self.day_offset_minutes))).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn utc_policy_truncates_to_utc_date() {
        let cfg = ProgressConfig::default();
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(
            cfg.calendar_day(ts),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn positive_offset_moves_late_evening_into_next_day() {
        let cfg = ProgressConfig {
            day_offset_minutes: 120,
            ..Default::default()
        };
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 23, 30, 0).unwrap();
        assert_eq!(
            cfg.calendar_day(ts),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
    }

    #[test]
    fn negative_offset_keeps_early_morning_in_previous_day() {
        let cfg = ProgressConfig {
            day_offset_minutes: -300,
            ..Default::default()
        };
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 0, 0).unwrap();
        assert_eq!(
            cfg.calendar_day(ts),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }
}
