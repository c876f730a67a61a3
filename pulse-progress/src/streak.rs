//! Streak engine: consecutive-day streak derived from ledger days.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use pulse_core::errors::PulseResult;
use pulse_core::models::{ProgressScope, StreakState};
use pulse_storage::pool::ReadPool;

use crate::ledger;

/// Walk a descending list of distinct completion days into a streak.
///
/// The streak is alive only if the most recent day is within
/// `grace_days` of `today` (grace 1 = "completed yesterday still counts
/// until today elapses"). A dead streak reads as 0 here; the next
/// recorded completion re-establishes it at 1 through this same walk.
pub fn streak_from_days(days_desc: &[NaiveDate], today: NaiveDate, grace_days: i64) -> StreakState {
    let Some(&latest) = days_desc.first() else {
        return StreakState::default();
    };

    let age = (today - latest).num_days();
    if age < 0 || age > grace_days {
        return StreakState::default();
    }

    let mut count: u32 = 1;
    let mut prev = latest;
    for &day in &days_desc[1..] {
        if prev - day == Duration::days(1) {
            count += 1;
            prev = day;
        } else {
            break;
        }
    }

    StreakState {
        count,
        last_counted_day: Some(latest),
    }
}

/// Recompute the streak for a scope from the ledger. Never reads the
/// streak cache.
pub fn compute(
    readers: &Arc<ReadPool>,
    user_id: &str,
    scope: &ProgressScope,
    today: NaiveDate,
    grace_days: i64,
) -> PulseResult<StreakState> {
    let days = ledger::query::distinct_days(readers, user_id, scope)?;
    Ok(streak_from_days(&days, today, grace_days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_ledger_is_zero() {
        assert_eq!(streak_from_days(&[], d(2025, 1, 5), 1), StreakState::default());
    }

    #[test]
    fn unbroken_run_counts_every_day() {
        let days = vec![d(2025, 1, 3), d(2025, 1, 2), d(2025, 1, 1)];
        let s = streak_from_days(&days, d(2025, 1, 3), 1);
        assert_eq!(s.count, 3);
        assert_eq!(s.last_counted_day, Some(d(2025, 1, 3)));
    }

    #[test]
    fn yesterday_keeps_the_streak_alive() {
        let days = vec![d(2025, 1, 2), d(2025, 1, 1)];
        let s = streak_from_days(&days, d(2025, 1, 3), 1);
        assert_eq!(s.count, 2);
    }

    #[test]
    fn two_day_silence_breaks_the_streak() {
        let days = vec![d(2025, 1, 2), d(2025, 1, 1)];
        assert_eq!(streak_from_days(&days, d(2025, 1, 4), 1).count, 0);
    }

    #[test]
    fn gap_in_history_stops_the_walk() {
        // Completed on the 5th and the 1st-2nd; gap at 3rd-4th.
        let days = vec![d(2025, 1, 5), d(2025, 1, 2), d(2025, 1, 1)];
        let s = streak_from_days(&days, d(2025, 1, 5), 1);
        assert_eq!(s.count, 1);
        assert_eq!(s.last_counted_day, Some(d(2025, 1, 5)));
    }

    #[test]
    fn future_latest_day_reads_as_broken() {
        let days = vec![d(2025, 1, 9)];
        assert_eq!(streak_from_days(&days, d(2025, 1, 5), 1).count, 0);
    }
}
