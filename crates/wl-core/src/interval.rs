//! Work interval reconstruction from status transitions.
//!
//! # Algorithm Summary
//!
//! 1. Walk consecutive transition pairs; a start-status transition directly
//!    followed by a stop-status transition yields one interval
//! 2. If the issue is still in the start status and the last transition moved it
//!    there, close the open interval at the end of the workday (or shortly after
//!    the transition when it happened after hours)
//!
//! Any other pattern (`start, other, stop`, `start, start, stop`, a stop without
//! a start) contributes nothing.

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::history::StatusChange;

/// Stop status recorded on intervals that are still open.
pub const NOT_FINISHED_STATUS: &str = "not finished";

/// How long an open interval lasts when it started after the workday ended.
const UNFINISHED_CUSHION_MINUTES: i64 = 10;

/// Status names that start and stop work on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStatuses {
    pub start: String,
    pub stop_primary: String,
    pub stop_secondary: String,
}

impl WorkflowStatuses {
    fn is_stop(&self, status: &str) -> bool {
        status == self.stop_primary || status == self.stop_secondary
    }
}

/// A period during which an issue sat in the working status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkInterval {
    pub start: DateTime<FixedOffset>,
    pub stop: DateTime<FixedOffset>,
    pub from_status: String,
    pub to_status: String,
}

impl WorkInterval {
    pub fn duration(&self) -> TimeDelta {
        self.stop - self.start
    }
}

/// Builds work intervals for one issue.
///
/// `changes` must be ordered oldest first. `workday_end` closes work that was
/// started and never stopped.
pub fn build_work_intervals(
    changes: &[StatusChange],
    current_status: Option<&str>,
    statuses: &WorkflowStatuses,
    workday_end: DateTime<FixedOffset>,
) -> Vec<WorkInterval> {
    let mut intervals: Vec<WorkInterval> = changes
        .windows(2)
        .filter(|pair| pair[0].to_status == statuses.start && statuses.is_stop(&pair[1].to_status))
        .map(|pair| WorkInterval {
            start: pair[0].occurred_at,
            stop: pair[1].occurred_at,
            from_status: pair[0].to_status.clone(),
            to_status: pair[1].to_status.clone(),
        })
        .collect();

    if let Some(last) = changes.last() {
        let still_working = current_status == Some(statuses.start.as_str());
        if still_working && last.to_status == statuses.start {
            let stop = if workday_end > last.occurred_at {
                workday_end
            } else {
                last.occurred_at + TimeDelta::minutes(UNFINISHED_CUSHION_MINUTES)
            };
            intervals.push(WorkInterval {
                start: last.occurred_at,
                stop,
                from_status: last.to_status.clone(),
                to_status: NOT_FINISHED_STATUS.to_string(),
            });
        }
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const START: &str = "In Progress";
    const REVIEW: &str = "Code Review";
    const DONE: &str = "Done";

    fn statuses() -> WorkflowStatuses {
        WorkflowStatuses {
            start: START.to_string(),
            stop_primary: REVIEW.to_string(),
            stop_secondary: DONE.to_string(),
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 4, hour, minute, 0)
            .unwrap()
    }

    fn change(hour: u32, minute: u32, to: &str) -> StatusChange {
        StatusChange {
            occurred_at: at(hour, minute),
            to_status: to.to_string(),
        }
    }

    #[test]
    fn test_start_then_stop_yields_one_interval() {
        let changes = vec![change(9, 0, START), change(11, 30, REVIEW)];

        let intervals = build_work_intervals(&changes, Some(REVIEW), &statuses(), at(17, 0));

        assert_eq!(
            intervals,
            vec![WorkInterval {
                start: at(9, 0),
                stop: at(11, 30),
                from_status: START.to_string(),
                to_status: REVIEW.to_string(),
            }]
        );
        assert_eq!(intervals[0].duration(), TimeDelta::minutes(150));
    }

    #[test]
    fn test_secondary_stop_status_closes_interval() {
        let changes = vec![change(9, 0, START), change(10, 0, DONE)];

        let intervals = build_work_intervals(&changes, Some(DONE), &statuses(), at(17, 0));

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].to_status, DONE);
    }

    #[test]
    fn test_non_adjacent_start_stop_yields_nothing() {
        let changes = vec![change(9, 0, START), change(10, 0, "Blocked"), change(11, 0, DONE)];

        let intervals = build_work_intervals(&changes, Some(DONE), &statuses(), at(17, 0));

        assert!(intervals.is_empty());
    }

    #[test]
    fn test_repeated_start_credits_only_second_start() {
        let changes = vec![change(9, 0, START), change(10, 0, START), change(11, 0, REVIEW)];

        let intervals = build_work_intervals(&changes, Some(REVIEW), &statuses(), at(17, 0));

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, at(10, 0));
    }

    #[test]
    fn test_stop_without_start_yields_nothing() {
        let changes = vec![change(9, 0, "To Do"), change(10, 0, DONE)];

        assert!(build_work_intervals(&changes, Some(DONE), &statuses(), at(17, 0)).is_empty());
    }

    #[test]
    fn test_multiple_work_sessions() {
        let changes = vec![
            change(9, 0, START),
            change(10, 0, REVIEW),
            change(13, 0, START),
            change(14, 15, DONE),
        ];

        let intervals = build_work_intervals(&changes, Some(DONE), &statuses(), at(17, 0));

        assert_eq!(intervals.len(), 2);
        let total: TimeDelta = intervals.iter().map(WorkInterval::duration).sum();
        assert_eq!(total, TimeDelta::minutes(135));
    }

    #[test]
    fn test_unfinished_work_runs_to_workday_end() {
        let changes = vec![change(9, 50, START)];

        let intervals = build_work_intervals(&changes, Some(START), &statuses(), at(17, 0));

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, at(9, 50));
        assert_eq!(intervals[0].stop, at(17, 0));
        assert_eq!(intervals[0].to_status, NOT_FINISHED_STATUS);
    }

    #[test]
    fn test_unfinished_work_after_hours_gets_cushion() {
        let changes = vec![change(18, 10, START)];

        let intervals = build_work_intervals(&changes, Some(START), &statuses(), at(17, 0));

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].stop, at(18, 20));
    }

    #[test]
    fn test_unfinished_work_started_exactly_at_workday_end_gets_cushion() {
        let changes = vec![change(17, 0, START)];

        let intervals = build_work_intervals(&changes, Some(START), &statuses(), at(17, 0));

        assert_eq!(intervals[0].stop, at(17, 10));
    }

    #[test]
    fn test_no_synthesis_when_current_status_differs() {
        let changes = vec![change(9, 50, START)];

        let intervals = build_work_intervals(&changes, Some("Blocked"), &statuses(), at(17, 0));

        assert!(intervals.is_empty());
    }

    #[test]
    fn test_no_synthesis_when_last_transition_is_not_start() {
        let changes = vec![change(9, 0, START), change(10, 0, REVIEW)];

        // Tracker says In Progress but history ends in review: nothing open.
        let intervals = build_work_intervals(&changes, Some(START), &statuses(), at(17, 0));

        assert_eq!(intervals.len(), 1);
        assert_ne!(intervals[0].to_status, NOT_FINISHED_STATUS);
    }

    #[test]
    fn test_closed_and_open_intervals_together() {
        let changes = vec![change(9, 0, START), change(10, 0, REVIEW), change(15, 0, START)];

        let intervals = build_work_intervals(&changes, Some(START), &statuses(), at(17, 0));

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[1].start, at(15, 0));
        assert_eq!(intervals[1].stop, at(17, 0));
    }

    #[test]
    fn test_empty_changes() {
        assert!(build_work_intervals(&[], Some(START), &statuses(), at(17, 0)).is_empty());
    }
}
