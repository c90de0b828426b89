//! Task and meeting events carrying the time to be logged.

use chrono::TimeDelta;
use serde::{Serialize, Serializer};

/// Kind of logged work, encoded as a numeric code on the work-log endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Other,
    Task,
    Meeting,
}

impl EventCategory {
    /// Numeric code understood by the work-log endpoint.
    pub const fn code(self) -> u8 {
        match self {
            Self::Other => 1,
            Self::Task => 2,
            Self::Meeting => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Task => "task",
            Self::Meeting => "meeting",
        }
    }
}

impl Serialize for EventCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

/// A unit of logged work: one issue's aggregated time, or one meeting.
///
/// Events are values. Adjusting the duration (see [`TaskEvent::with_duration`])
/// yields a new event and leaves the original untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEvent {
    identifier: String,
    title: String,
    work_duration: TimeDelta,
    category: EventCategory,
}

impl TaskEvent {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        work_duration: TimeDelta,
        category: EventCategory,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            work_duration,
            category,
        }
    }

    /// Creates a task event for an issue.
    pub fn task(identifier: impl Into<String>, title: impl Into<String>, work_duration: TimeDelta) -> Self {
        Self::new(identifier, title, work_duration, EventCategory::Task)
    }

    /// Creates a meeting event. Meetings have no issue key.
    pub fn meeting(title: impl Into<String>, work_duration: TimeDelta) -> Self {
        Self::new(String::new(), title, work_duration, EventCategory::Meeting)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn work_duration(&self) -> TimeDelta {
        self.work_duration
    }

    pub const fn category(&self) -> EventCategory {
        self.category
    }

    /// Identifier and title joined by a space, skipping empty parts.
    pub fn description(&self) -> String {
        [self.identifier.as_str(), self.title.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Duration in whole minutes, truncated toward zero.
    pub fn minutes(&self) -> i64 {
        self.work_duration.num_minutes()
    }

    /// Returns a copy of this event with a different duration.
    #[must_use]
    pub fn with_duration(&self, work_duration: TimeDelta) -> Self {
        Self {
            work_duration,
            ..self.clone()
        }
    }
}

/// Sums the durations of a set of events.
pub fn total_duration(events: &[TaskEvent]) -> TimeDelta {
    events
        .iter()
        .fold(TimeDelta::zero(), |acc, event| acc + event.work_duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_joins_key_and_title() {
        let event = TaskEvent::task("WL-12", "Fix login redirect", TimeDelta::minutes(30));
        assert_eq!(event.description(), "WL-12 Fix login redirect");
    }

    #[test]
    fn description_skips_empty_key() {
        let event = TaskEvent::meeting("Daily standup", TimeDelta::minutes(15));
        assert_eq!(event.description(), "Daily standup");
    }

    #[test]
    fn minutes_truncate_partial_minutes() {
        let event = TaskEvent::task("WL-1", "", TimeDelta::seconds(299));
        assert_eq!(event.minutes(), 4);
    }

    #[test]
    fn with_duration_leaves_original_untouched() {
        let original = TaskEvent::task("WL-1", "Task", TimeDelta::minutes(40));
        let adjusted = original.with_duration(TimeDelta::minutes(280));

        assert_eq!(original.work_duration(), TimeDelta::minutes(40));
        assert_eq!(adjusted.work_duration(), TimeDelta::minutes(280));
        assert_eq!(adjusted.identifier(), "WL-1");
        assert_eq!(adjusted.category(), EventCategory::Task);
    }

    #[test]
    fn category_codes() {
        assert_eq!(EventCategory::Other.code(), 1);
        assert_eq!(EventCategory::Task.code(), 2);
        assert_eq!(EventCategory::Meeting.code(), 3);
        assert_eq!(serde_json::to_string(&EventCategory::Meeting).unwrap(), "3");
        assert_eq!(EventCategory::Task.as_str(), "task");
    }

    #[test]
    fn total_duration_sums_all_events() {
        let events = vec![
            TaskEvent::meeting("Standup", TimeDelta::minutes(15)),
            TaskEvent::meeting("Planning", TimeDelta::minutes(45)),
        ];
        assert_eq!(total_duration(&events), TimeDelta::hours(1));
    }
}
