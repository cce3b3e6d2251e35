//! Circulation policy: the process-wide fine and due-date constants.
//!
//! The policy is fixed at startup (usually from [`crate::Config`]) and
//! passed by reference into the operations that need it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fine, block, and due-date parameters for the circulation ledger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CirculationPolicy {
    /// Fine per late calendar day, in minor currency units
    pub fine_per_day: u64,
    /// A member with outstanding fine at or over this limit is blocked
    pub max_fine_limit: u64,
    /// Loan period in days; due date = issue date + this
    pub issue_days: i64,
    /// Reminder window: active loans due within this many days are flagged
    pub due_soon_window_days: i64,
}

impl Default for CirculationPolicy {
    fn default() -> Self {
        Self {
            fine_per_day: 5,
            max_fine_limit: 500,
            issue_days: 14,
            due_soon_window_days: 2,
        }
    }
}

impl CirculationPolicy {
    /// Due date for a loan issued at `issued_at`
    pub fn due_date(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + chrono::Duration::days(self.issue_days)
    }

    /// Fine for a loan returned `late_days` calendar days late
    pub fn fine_for(&self, late_days: i64) -> u64 {
        if late_days <= 0 {
            0
        } else {
            late_days as u64 * self.fine_per_day
        }
    }

    /// The single block rule: fine at or over the limit blocks the member
    pub fn is_over_limit(&self, outstanding_fine: u64) -> bool {
        outstanding_fine >= self.max_fine_limit
    }
}

/// Signed calendar days from `from` to `to`, ignoring time-of-day.
///
/// Positive when `to` is on a later calendar date than `from`.
pub fn calendar_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to.date_naive() - from.date_naive()).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_default_policy_constants() {
        let policy = CirculationPolicy::default();
        assert_eq!(policy.fine_per_day, 5);
        assert_eq!(policy.max_fine_limit, 500);
        assert_eq!(policy.issue_days, 14);
        assert_eq!(policy.due_soon_window_days, 2);
    }

    #[test]
    fn test_due_date_is_issue_plus_period() {
        let policy = CirculationPolicy::default();
        assert_eq!(policy.due_date(day(1)), day(15));
    }

    #[test]
    fn test_fine_is_late_days_times_rate() {
        let policy = CirculationPolicy::default();
        assert_eq!(policy.fine_for(0), 0);
        assert_eq!(policy.fine_for(-3), 0);
        assert_eq!(policy.fine_for(6), 30);
    }

    #[test]
    fn test_block_rule_is_inclusive() {
        let policy = CirculationPolicy::default();
        assert!(!policy.is_over_limit(499));
        assert!(policy.is_over_limit(500));
        assert!(policy.is_over_limit(505));
    }

    #[test]
    fn test_calendar_days_between_ignores_time() {
        let from = Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 6, 2, 0, 1, 0).unwrap();
        assert_eq!(calendar_days_between(from, to), 1);
        assert_eq!(calendar_days_between(to, from), -1);
        assert_eq!(calendar_days_between(from, from), 0);
    }
}
