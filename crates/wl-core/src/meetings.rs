//! Recurring meeting schedule.
//!
//! Every workday gets the daily meetings plus one entry from the sprint table.
//! Weekly sprints index the table by weekday (Monday = 0). Biweekly sprints use
//! a ten-entry table: the first five entries cover the first week counted from
//! `biweekly_start_date`, the last five the second week.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::TaskEvent;

/// Days in one biweekly sprint.
const SPRINT_DAYS: i64 = 14;

/// Offset into the biweekly table for the second week.
const SECOND_WEEK_OFFSET: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("no meetings are scheduled on weekends ({date})")]
    Weekend { date: NaiveDate },

    #[error("biweekly sprint requires biweekly_start_date")]
    MissingBiweeklyStart,

    #[error("biweekly_start_date {start} is after {date}")]
    StartAfterDate { start: NaiveDate, date: NaiveDate },

    #[error("{table} has no entry for index {index}")]
    MissingEntry { table: &'static str, index: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintCadence {
    #[default]
    Weekly,
    Biweekly,
}

/// One scheduled meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingEntry {
    pub title: String,
    /// Length in minutes.
    pub work_time: u32,
}

impl MeetingEntry {
    fn to_event(&self) -> TaskEvent {
        TaskEvent::meeting(&self.title, TimeDelta::minutes(i64::from(self.work_time)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSchedule {
    #[serde(default)]
    pub sprint: SprintCadence,
    #[serde(default)]
    pub biweekly_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub daily_events: Vec<MeetingEntry>,
    #[serde(default)]
    pub weekly_events: Vec<MeetingEntry>,
    #[serde(default)]
    pub biweekly_events: Vec<MeetingEntry>,
}

impl MeetingSchedule {
    /// Meetings for `date`: the daily ones followed by the sprint table entry.
    ///
    /// An empty sprint table contributes nothing; a table too short for the
    /// date is an error.
    pub fn meetings_for(&self, date: NaiveDate) -> Result<Vec<TaskEvent>, ScheduleError> {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Err(ScheduleError::Weekend { date });
        }
        let weekday = date.weekday().num_days_from_monday() as usize;

        let mut meetings: Vec<TaskEvent> = self.daily_events.iter().map(MeetingEntry::to_event).collect();

        let (table, name, index) = match self.sprint {
            SprintCadence::Weekly => (&self.weekly_events, "weekly_events", weekday),
            SprintCadence::Biweekly => {
                let start = self
                    .biweekly_start_date
                    .ok_or(ScheduleError::MissingBiweeklyStart)?;
                let offset = if is_first_sprint_week(start, date)? {
                    0
                } else {
                    SECOND_WEEK_OFFSET
                };
                (&self.biweekly_events, "biweekly_events", weekday + offset)
            }
        };

        if !table.is_empty() {
            let entry = table
                .get(index)
                .ok_or(ScheduleError::MissingEntry { table: name, index })?;
            meetings.push(entry.to_event());
        }

        Ok(meetings)
    }
}

/// Whether `date` falls in the first week of the sprint cycle that began on `start`.
///
/// Every 14th day from `start` opens a new first week.
fn is_first_sprint_week(start: NaiveDate, date: NaiveDate) -> Result<bool, ScheduleError> {
    if start > date {
        return Err(ScheduleError::StartAfterDate { start, date });
    }
    let days_into_sprint = (date - start).num_days() % SPRINT_DAYS;
    Ok(days_into_sprint < 7)
}
