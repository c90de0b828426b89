//! `wl log`: compute the day's work log and post it.
//!
//! Pipeline: fetch issues → task events for the date → normalize against the
//! daily budget minus meetings → print → confirm → post.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tokio::runtime::Runtime;
use wl_core::{
    Issue, MeetingSchedule, SearchResponse, TaskEvent, WorkdayWindow, collect_task_events,
    normalize_tasks, total_duration,
};
use wl_tracker::{Credentials, FileIssueSource, IssueSource, JiraClient, SearchQuery, WorkLogClient};

use super::util::{format_duration, parse_date, today_in};
use crate::cli::LogArgs;
use crate::config::{Config, IssueSourceKind};

/// The computed log for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayLog {
    pub date: NaiveDate,
    pub tasks: Vec<TaskEvent>,
    pub meetings: Vec<TaskEvent>,
}

impl DayLog {
    /// Tasks followed by meetings, in posting order.
    pub fn events(&self) -> Vec<TaskEvent> {
        self.tasks.iter().chain(&self.meetings).cloned().collect()
    }
}

/// Answer to the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Abort,
    Unknown,
}

/// Interprets the confirmation answer. An empty answer means yes.
pub fn parse_decision(answer: &str) -> Decision {
    match answer.trim() {
        "" | "Y" | "y" | "T" | "t" => Decision::Proceed,
        "N" | "n" | "No" | "no" => Decision::Abort,
        _ => Decision::Unknown,
    }
}

/// Reads one answer from `input`. A closed input aborts.
pub fn read_decision<R: BufRead>(input: &mut R) -> Result<Decision> {
    let mut answer = String::new();
    let read = input.read_line(&mut answer).context("failed to read answer")?;
    if read == 0 {
        return Ok(Decision::Abort);
    }
    Ok(parse_decision(&answer))
}

pub fn run<R: BufRead, W: Write>(input: &mut R, writer: &mut W, args: &LogArgs, config: &Config) -> Result<()> {
    config.validate().context("invalid configuration")?;
    config.validate_worklog().context("invalid configuration")?;

    let timezone = config.timezone()?;
    let date = match args.when.as_deref() {
        Some(when) => parse_date(when, today_in(timezone))?,
        None => today_in(timezone),
    };
    let meetings = resolve_meetings(args, &config.meetings, date)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize tokio runtime")?;
    let response = fetch_issues(&runtime, config)?;

    let log = build_day_log(&response.issues, config, date, meetings)?;
    write!(writer, "{}", render_summary(&log))?;

    if !args.yolo {
        write!(writer, "\nProceed with logging? [Y/n] ")?;
        writer.flush()?;
        match read_decision(input)? {
            Decision::Proceed => {}
            Decision::Abort => {
                writeln!(writer, "Aborted")?;
                return Ok(());
            }
            Decision::Unknown => {
                writeln!(writer, "Unknown answer, nothing logged")?;
                return Ok(());
            }
        }
    }

    writeln!(writer, "Logging work time for {date}")?;
    let client = WorkLogClient::new(
        config.worklog.base_url.clone(),
        config.worklog.project_id,
        config.worklog.auth.clone(),
    )?;
    let posted = runtime
        .block_on(client.post_log(date, &log.events()))
        .context("failed to post work log")?;
    writeln!(writer, "Logged {posted} entries")?;
    Ok(())
}

/// Meetings for the day: the override if given, otherwise the schedule plus
/// any extra meetings from the command line.
pub fn resolve_meetings(args: &LogArgs, schedule: &MeetingSchedule, date: NaiveDate) -> Result<Vec<TaskEvent>> {
    if let Some(meeting) = &args.override_meeting {
        return Ok(vec![meeting.clone()]);
    }
    let mut meetings = schedule
        .meetings_for(date)
        .with_context(|| format!("failed to look up meetings for {date}"))?;
    meetings.extend(args.meetings.iter().cloned());
    Ok(meetings)
}

fn fetch_issues(runtime: &Runtime, config: &Config) -> Result<SearchResponse> {
    match config.source {
        IssueSourceKind::Jira => {
            let client = JiraClient::new(
                config.jira.base_url.clone(),
                Credentials {
                    username: config.jira.username.clone(),
                    password: config.jira.password.clone(),
                },
                SearchQuery {
                    project: config.jira.project_abbr.clone(),
                    assignee: config.jira.assignee_name.clone(),
                    status_field: config.jira.status_field.clone(),
                },
            )?;
            fetch_from(runtime, &client)
        }
        IssueSourceKind::File => {
            let Some(path) = config.fixture_path.as_deref() else {
                bail!("fixture_path is required when source = \"file\"");
            };
            fetch_from(runtime, &FileIssueSource::new(path))
        }
    }
}

fn fetch_from<S: IssueSource>(runtime: &Runtime, source: &S) -> Result<SearchResponse> {
    runtime
        .block_on(source.fetch_issues())
        .context("failed to fetch issues")
}

/// Turns fetched issues into the normalized log for `date`.
pub fn build_day_log(
    issues: &[Issue],
    config: &Config,
    date: NaiveDate,
    meetings: Vec<TaskEvent>,
) -> Result<DayLog> {
    let window = WorkdayWindow::for_date(date, config.timezone()?, config.start_hour, config.work_hours)?;
    let raw_tasks = collect_task_events(issues, &config.workflow(), &window);
    tracing::debug!(issues = issues.len(), tasks = raw_tasks.len(), %date, "collected tasks");

    let tasks = normalize_tasks(&raw_tasks, &meetings, &config.normalize_config())
        .with_context(|| format!("cannot log {date}"))?;

    Ok(DayLog {
        date,
        tasks,
        meetings,
    })
}

/// One line per event, then totals for tasks and meetings.
pub fn render_summary(log: &DayLog) -> String {
    let mut output = String::new();
    for event in log.tasks.iter().chain(&log.meetings) {
        let _ = writeln!(output, "{} - {}", format_duration(event.work_duration()), event.description());
    }
    output.push('\n');

    let task_keys: Vec<&str> = log.tasks.iter().map(TaskEvent::identifier).collect();
    let meeting_titles: Vec<String> = log.meetings.iter().map(TaskEvent::description).collect();
    let _ = writeln!(
        output,
        "{} - {}",
        format_duration(total_duration(&log.tasks)),
        task_keys.join(", ")
    );
    let _ = writeln!(
        output,
        "{} - {}",
        format_duration(total_duration(&log.meetings)),
        meeting_titles.join(", ")
    );
    output
}
