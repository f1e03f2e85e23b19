//! Elapsed-broadcast-time math
//!
//! Pure functions over the configured event timeline. Nothing in here
//! touches the filesystem or spawns processes, so the labeling logic is
//! testable without any process-wide state.

use crate::config::EventTimeline;
use chrono::{DateTime, Duration, FixedOffset};
use std::fmt;

/// Why a scheduled capture was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// More than one hour before the event starts
    BeforeEventStart,
    /// Inside a scheduled break window
    DuringBreak,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BeforeEventStart => write!(f, "before event start"),
            SkipReason::DuringBreak => write!(f, "during a scheduled break"),
        }
    }
}

/// Decide whether this invocation should capture at all.
///
/// Returns a reason when `now` is more than one hour before the event
/// starts, or inside any break's `[start, end)` window. A skip is a
/// normal outcome, not an error.
pub fn should_skip(now: DateTime<FixedOffset>, timeline: &EventTimeline) -> Option<SkipReason> {
    if now < timeline.start - Duration::hours(1) {
        return Some(SkipReason::BeforeEventStart);
    }
    if timeline.breaks.iter().any(|brk| brk.contains(now)) {
        return Some(SkipReason::DuringBreak);
    }
    None
}

/// Elapsed broadcast time at `now`.
///
/// `now - start + correction`, minus the full length of every break
/// whose start is strictly before `now`. A break that is underway but
/// not yet over still has its entire length subtracted: the counter
/// assumes breaks complete as scheduled. Negative before event start.
pub fn compute_elapsed(now: DateTime<FixedOffset>, timeline: &EventTimeline) -> Duration {
    let mut diff = now - timeline.start + timeline.correction();
    for brk in &timeline.breaks {
        if now > brk.start {
            diff = diff - brk.length();
        }
    }
    diff
}

/// Split an elapsed duration into its (hours, minutes) slot label.
///
/// Hours are total elapsed hours, not hour-of-day, so they keep
/// accumulating past 23. Floor division throughout, so negative
/// durations floor toward negative infinity.
pub fn duration_to_hours_minutes(duration: Duration) -> (i64, i64) {
    let secs = duration.num_seconds();
    let hours = secs.div_euclid(3600);
    let minutes = secs.rem_euclid(3600) / 60;
    (hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreakInterval;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn timeline_with_breaks(correction_minutes: i64, breaks: Vec<BreakInterval>) -> EventTimeline {
        EventTimeline {
            start: at("2025-02-14T17:00:00-06:00"),
            correction_minutes,
            breaks,
        }
    }

    fn overnight_break() -> BreakInterval {
        BreakInterval {
            start: at("2025-02-15T00:00:00-06:00"),
            end: at("2025-02-15T08:00:00-06:00"),
        }
    }

    #[test]
    fn test_skip_before_event_start() {
        let timeline = timeline_with_breaks(0, vec![]);
        assert_eq!(
            should_skip(at("2025-02-14T15:30:00-06:00"), &timeline),
            Some(SkipReason::BeforeEventStart)
        );
        // Exactly one hour before is inside the allowed lead-in window
        assert_eq!(should_skip(at("2025-02-14T16:00:00-06:00"), &timeline), None);
        assert_eq!(should_skip(at("2025-02-14T17:00:00-06:00"), &timeline), None);
    }

    #[test]
    fn test_skip_during_break_window() {
        let timeline = timeline_with_breaks(0, vec![overnight_break()]);
        // Half-open window: start is in, end is out
        assert_eq!(
            should_skip(at("2025-02-15T00:00:00-06:00"), &timeline),
            Some(SkipReason::DuringBreak)
        );
        assert_eq!(
            should_skip(at("2025-02-15T03:00:00-06:00"), &timeline),
            Some(SkipReason::DuringBreak)
        );
        assert_eq!(should_skip(at("2025-02-15T08:00:00-06:00"), &timeline), None);
    }

    #[test]
    fn test_elapsed_simple() {
        let timeline = timeline_with_breaks(0, vec![]);
        let elapsed = compute_elapsed(at("2025-02-14T18:31:00-06:00"), &timeline);
        assert_eq!(elapsed, Duration::minutes(91));
    }

    #[test]
    fn test_elapsed_negative_before_start() {
        let timeline = timeline_with_breaks(0, vec![]);
        let elapsed = compute_elapsed(at("2025-02-14T16:30:00-06:00"), &timeline);
        assert_eq!(elapsed, Duration::minutes(-30));
    }

    #[test]
    fn test_elapsed_subtracts_full_break_once_started() {
        let timeline = timeline_with_breaks(0, vec![overnight_break()]);
        // 2am is mid-break: the full 8h is subtracted even though only
        // 2h of the break has passed
        let mid_break = compute_elapsed(at("2025-02-15T02:00:00-06:00"), &timeline);
        assert_eq!(mid_break, Duration::hours(9) - Duration::hours(8));

        // 9am, after the break: same subtraction
        let after_break = compute_elapsed(at("2025-02-15T09:00:00-06:00"), &timeline);
        assert_eq!(after_break, Duration::hours(8));
    }

    #[test]
    fn test_elapsed_with_multiple_breaks() {
        let second_break = BreakInterval {
            start: at("2025-02-16T00:00:00-06:00"),
            end: at("2025-02-16T08:00:00-06:00"),
        };
        let timeline = timeline_with_breaks(0, vec![overnight_break(), second_break]);

        // Sunday 10am: 41h wall-clock, minus two 8h breaks
        let elapsed = compute_elapsed(at("2025-02-16T10:00:00-06:00"), &timeline);
        assert_eq!(elapsed, Duration::hours(25));

        // Saturday noon: only the first break has started
        let elapsed = compute_elapsed(at("2025-02-15T12:00:00-06:00"), &timeline);
        assert_eq!(elapsed, Duration::hours(11));
    }

    #[test]
    fn test_elapsed_applies_correction() {
        let timeline = timeline_with_breaks(60, vec![]);
        let elapsed = compute_elapsed(at("2025-02-14T18:31:00-06:00"), &timeline);
        assert_eq!(duration_to_hours_minutes(elapsed), (2, 31));
    }

    #[test]
    fn test_hours_minutes_decomposition() {
        assert_eq!(duration_to_hours_minutes(Duration::seconds(0)), (0, 0));
        assert_eq!(duration_to_hours_minutes(Duration::seconds(3661)), (1, 1));
        assert_eq!(duration_to_hours_minutes(Duration::seconds(59)), (0, 0));
        // Hours accumulate past 23, no day wraparound
        assert_eq!(duration_to_hours_minutes(Duration::seconds(86400)), (24, 0));
        assert_eq!(
            duration_to_hours_minutes(Duration::hours(102) + Duration::minutes(5)),
            (102, 5)
        );
    }

    #[test]
    fn test_hours_minutes_floor_for_negative() {
        assert_eq!(duration_to_hours_minutes(Duration::seconds(-10)), (-1, 59));
        assert_eq!(duration_to_hours_minutes(Duration::hours(-1)), (-1, 0));
    }
}
