//! `wl meetings`: show the scheduled meetings for a day.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use wl_core::{MeetingSchedule, ensure_weekday, total_duration};

use super::util::{format_duration, parse_date, today_in};
use crate::config::Config;

pub fn run<W: Write>(writer: &mut W, when: Option<&str>, config: &Config) -> Result<()> {
    let timezone = config.timezone().context("invalid configuration")?;
    let today = today_in(timezone);
    let date = when.map_or(Ok(today), |when| parse_date(when, today))?;
    write_meetings(writer, &config.meetings, date)
}

fn write_meetings<W: Write>(writer: &mut W, schedule: &MeetingSchedule, date: NaiveDate) -> Result<()> {
    ensure_weekday(date)?;
    let meetings = schedule
        .meetings_for(date)
        .with_context(|| format!("failed to look up meetings for {date}"))?;

    writeln!(writer, "Meetings on {date} ({})", date.format("%A"))?;
    for meeting in &meetings {
        writeln!(writer, "  {} - {}", format_duration(meeting.work_duration()), meeting.description())?;
    }
    writeln!(writer, "Total: {}", format_duration(total_duration(&meetings)))?;
    Ok(())
}
