//! Per-issue aggregation of clipped work intervals into task events.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::event::TaskEvent;
use crate::history::{Issue, parse_status_history};
use crate::interval::{WorkInterval, WorkflowStatuses, build_work_intervals};
use crate::workday::WorkdayWindow;

/// Tracker workflow settings needed to turn issues into task events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Only issues assigned to this name are considered.
    pub assignee_name: String,
    /// Change-log field holding the status.
    pub status_field: String,
    pub statuses: WorkflowStatuses,
}

/// Sums the clipped durations of the intervals that touch the window's date.
pub fn clipped_work_time(intervals: &[WorkInterval], window: &WorkdayWindow) -> TimeDelta {
    intervals
        .iter()
        .filter(|interval| window.covers(interval))
        .map(|interval| window.clip(interval).duration())
        .fold(TimeDelta::zero(), |acc, duration| acc + duration)
}

/// Builds the task event for one issue, or `None` when the issue lacks a
/// change-log, a current status or an assignee.
pub fn issue_to_task_event(
    issue: &Issue,
    workflow: &WorkflowConfig,
    window: &WorkdayWindow,
) -> Option<TaskEvent> {
    let histories = issue.histories()?;
    let current_status = issue.current_status(&workflow.status_field)?;
    issue.assignee_name()?;

    let changes = parse_status_history(histories, &workflow.status_field);
    let intervals = build_work_intervals(
        &changes,
        Some(current_status),
        &workflow.statuses,
        window.end(),
    );
    let work_time = clipped_work_time(&intervals, window);

    tracing::debug!(
        key = %issue.key,
        transitions = changes.len(),
        intervals = intervals.len(),
        minutes = work_time.num_minutes(),
        "aggregated issue"
    );
    Some(TaskEvent::task(&issue.key, issue.title(), work_time))
}

/// Turns a batch of issues into task events for the window's date.
///
/// Issues assigned to someone else or missing mandatory fields are skipped.
/// Events with no work time and exact duplicates are dropped; the order of
/// first appearance is kept.
pub fn collect_task_events(
    issues: &[Issue],
    workflow: &WorkflowConfig,
    window: &WorkdayWindow,
) -> Vec<TaskEvent> {
    let mut events: Vec<TaskEvent> = Vec::new();

    for issue in issues {
        if issue.assignee_name() != Some(workflow.assignee_name.as_str()) {
            tracing::debug!(key = %issue.key, "discarded: not assigned to configured assignee");
            continue;
        }
        let Some(event) = issue_to_task_event(issue, workflow, window) else {
            tracing::debug!(key = %issue.key, "discarded: missing change-log or status");
            continue;
        };
        if event.work_duration() <= TimeDelta::zero() {
            tracing::debug!(key = %issue.key, "discarded: no work time on {}", window.date());
            continue;
        }
        if events.contains(&event) {
            continue;
        }
        events.push(event);
    }

    events
}
