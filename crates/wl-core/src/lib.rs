//! Core domain logic for worklog.
//!
//! This crate contains the fundamental types and logic for:
//! - History parsing: status transitions from an issue's change-log
//! - Intervals: pairing transitions into work intervals and clipping them to the workday
//! - Aggregation: one task event per issue for the target date
//! - Normalization: rescaling task time to fill the daily budget exactly
//! - Meetings: recurring meeting lookup for a date

mod aggregate;
pub mod event;
pub mod history;
pub mod interval;
pub mod meetings;
mod normalize;
pub mod workday;

pub use aggregate::{WorkflowConfig, clipped_work_time, collect_task_events, issue_to_task_event};
pub use event::{EventCategory, TaskEvent, total_duration};
pub use history::{Issue, SearchResponse, StatusChange, parse_status_history};
pub use interval::{NOT_FINISHED_STATUS, WorkInterval, WorkflowStatuses, build_work_intervals};
pub use meetings::{MeetingEntry, MeetingSchedule, ScheduleError, SprintCadence};
pub use normalize::{
    DEFAULT_DAILY_HOURS, DEFAULT_ROUNDING_MINUTES, NormalizeConfig, NormalizeError, normalize_tasks,
};
pub use workday::{WorkdayError, WorkdayWindow, ensure_weekday};
