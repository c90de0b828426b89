//! Working-hours window for a target date.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta, TimeZone, Weekday};
use chrono_tz::Tz;
use thiserror::Error;

use crate::interval::WorkInterval;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkdayError {
    #[error("cannot log work on a weekend ({date})")]
    Weekend { date: NaiveDate },

    #[error("workday start hour must be between 0 and 23, got {hour}")]
    InvalidStartHour { hour: u32 },

    #[error("workday length must be between 1 and 24 hours, got {hours}")]
    InvalidLength { hours: u32 },

    #[error("{date} {hour:02}:00 does not exist in {timezone}")]
    NonexistentStart {
        date: NaiveDate,
        hour: u32,
        timezone: Tz,
    },
}

/// Returns an error for Saturdays and Sundays.
pub fn ensure_weekday(date: NaiveDate) -> Result<(), WorkdayError> {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => Err(WorkdayError::Weekend { date }),
        _ => Ok(()),
    }
}

/// Billable time bounds for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkdayWindow {
    date: NaiveDate,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl WorkdayWindow {
    /// Builds the window starting at `start_hour` local time in `timezone`
    /// and lasting `hours` hours. Weekend dates are rejected.
    ///
    /// A start hour that falls in a DST fold resolves to the earlier instant.
    pub fn for_date(
        date: NaiveDate,
        timezone: Tz,
        start_hour: u32,
        hours: u32,
    ) -> Result<Self, WorkdayError> {
        ensure_weekday(date)?;
        if !(1..=24).contains(&hours) {
            return Err(WorkdayError::InvalidLength { hours });
        }
        let local_start = date
            .and_hms_opt(start_hour, 0, 0)
            .ok_or(WorkdayError::InvalidStartHour { hour: start_hour })?;
        let start = timezone
            .from_local_datetime(&local_start)
            .earliest()
            .ok_or(WorkdayError::NonexistentStart {
                date,
                hour: start_hour,
                timezone,
            })?
            .fixed_offset();

        Ok(Self {
            date,
            start,
            end: start + TimeDelta::hours(i64::from(hours)),
        })
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Whether the unclipped interval touches the target date.
    ///
    /// Dates are taken in the window's offset; both ends are inclusive so
    /// intervals crossing midnight count for every date they span.
    pub fn covers(&self, interval: &WorkInterval) -> bool {
        let offset = self.start.offset();
        let start_date = interval.start.with_timezone(offset).date_naive();
        let stop_date = interval.stop.with_timezone(offset).date_naive();
        start_date <= self.date && self.date <= stop_date
    }

    /// Restricts an interval to the working hours.
    ///
    /// The stop is only lowered to the workday end when the interval started
    /// before it, so after-hours work clips to its own (short) length. The
    /// result never ends before it starts.
    pub fn clip(&self, interval: &WorkInterval) -> WorkInterval {
        let start = interval.start.max(self.start);
        let stop = if interval.start >= self.end {
            interval.stop
        } else {
            interval.stop.min(self.end)
        };

        WorkInterval {
            start,
            stop: stop.max(start),
            from_status: interval.from_status.clone(),
            to_status: interval.to_status.clone(),
        }
    }
}
