//! Recurrence rule evaluation
//!
//! Wraps RRULE text attached to events into a validated form and expands it
//! into concrete occurrence instants inside a date window. Enumeration is a
//! pure function of (rule, window); both window bounds are inclusive.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rrule::{RRule, RRuleSet, Tz, Unvalidated};
use tracing::warn;

use crate::utils::errors::RecurrenceError;

/// Cap on occurrences expanded per query. Windows are short (weeks, not
/// years), so hitting this means a pathological rule.
const MAX_OCCURRENCES: u16 = u16::MAX;

/// An inclusive `[after, before]` window of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub after: DateTime<Utc>,
    pub before: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        Self { after, before }
    }

    /// Window starting now, used for "upcoming events" filtering.
    pub fn upcoming(days: i64) -> Self {
        let now = Utc::now();
        Self::new(now, now + Duration::days(days))
    }

    /// Window starting at today's midnight, used when listing the dates of a
    /// single event.
    pub fn from_today(days: i64) -> Self {
        let today = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        Self::new(today, today + Duration::days(days))
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.after <= instant && instant <= self.before
    }
}

/// A validated recurrence rule anchored at its base instant (dtstart).
#[derive(Debug, Clone)]
pub struct Recurrence {
    set: RRuleSet,
}

impl Recurrence {
    /// Parse and validate RRULE text against a base instant.
    ///
    /// Malformed or unsupported rules fail here, not at expansion time.
    pub fn parse(rule_text: &str, dtstart: DateTime<Utc>) -> Result<Self, RecurrenceError> {
        let rule = rule_text
            .trim()
            .parse::<RRule<Unvalidated>>()
            .map_err(|e| RecurrenceError::InvalidRule(e.to_string()))?;
        let set = rule
            .build(dtstart.with_timezone(&Tz::UTC))
            .map_err(|e| RecurrenceError::InvalidRule(e.to_string()))?;
        Ok(Self { set })
    }

    /// Enumerate all occurrences inside the window, both bounds inclusive.
    pub fn between(&self, window: DateWindow) -> Vec<DateTime<Utc>> {
        let result = self.bounded(window).all(MAX_OCCURRENCES);
        if result.limited {
            warn!(
                limit = MAX_OCCURRENCES,
                "Occurrence expansion truncated; rule produces too many instances in window"
            );
        }
        result
            .dates
            .into_iter()
            .map(|d| d.with_timezone(&Utc))
            .collect()
    }

    /// Membership test: does at least one occurrence fall inside the window?
    pub fn occurs_within(&self, window: DateWindow) -> bool {
        !self.bounded(window).all(1).dates.is_empty()
    }

    fn bounded(&self, window: DateWindow) -> RRuleSet {
        // The lower bound is exclusive in rrule; pull it back one second so
        // an occurrence exactly on `after` is kept.
        let after = window.after - Duration::seconds(1);
        self.set
            .clone()
            .after(after.with_timezone(&Tz::UTC))
            .before(window.before.with_timezone(&Tz::UTC))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_invalid_rule_is_rejected() {
        let err = Recurrence::parse("FREQ=BOGUS", utc(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, RecurrenceError::InvalidRule(_)));
    }

    #[test]
    fn test_weekly_monday_window_is_inclusive() {
        // 2024-01-01 and 2024-01-15 are both Mondays; the window end is
        // inclusive so three occurrences land inside.
        let rule = Recurrence::parse("FREQ=WEEKLY;BYDAY=MO", utc(2024, 1, 1)).unwrap();
        let window = DateWindow::new(utc(2024, 1, 1), utc(2024, 1, 15));

        let occurrences = rule.between(window);
        assert_eq!(
            occurrences,
            vec![utc(2024, 1, 1), utc(2024, 1, 8), utc(2024, 1, 15)]
        );
        assert!(rule.occurs_within(window));
    }

    #[test]
    fn test_window_end_before_next_occurrence() {
        let rule = Recurrence::parse("FREQ=WEEKLY;BYDAY=MO", utc(2024, 1, 1)).unwrap();
        let window = DateWindow::new(utc(2024, 1, 2), utc(2024, 1, 7));
        assert!(rule.between(window).is_empty());
        assert!(!rule.occurs_within(window));
    }

    #[test]
    fn test_boundary_occurrence_included() {
        let rule = Recurrence::parse("FREQ=DAILY;COUNT=1", utc(2024, 3, 1)).unwrap();

        // occurrence exactly on the lower bound
        let window = DateWindow::new(utc(2024, 3, 1), utc(2024, 4, 30));
        assert!(rule.occurs_within(window));

        // occurrence exactly on the upper bound
        let window = DateWindow::new(utc(2024, 2, 1), utc(2024, 3, 1));
        assert!(rule.occurs_within(window));

        // occurrence one day past the upper bound
        let window = DateWindow::new(utc(2024, 2, 1), utc(2024, 2, 29));
        assert!(!rule.occurs_within(window));
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let rule = Recurrence::parse("FREQ=DAILY", utc(2024, 1, 1)).unwrap();
        let window = DateWindow::new(utc(2024, 1, 1), utc(2024, 1, 10));
        assert_eq!(rule.between(window), rule.between(window));
        assert_eq!(rule.between(window).len(), 10);
    }

    #[test]
    fn test_window_contains() {
        let window = DateWindow::new(utc(2024, 1, 1), utc(2024, 1, 15));
        assert!(window.contains(utc(2024, 1, 1)));
        assert!(window.contains(utc(2024, 1, 15)));
        assert!(!window.contains(utc(2024, 1, 16)));
    }
}
