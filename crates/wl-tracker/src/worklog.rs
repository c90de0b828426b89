//! Posting finished events to the time-logging endpoint.

use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use wl_core::{EventCategory, TaskEvent};

use crate::{TrackerError, build_http_client, endpoint, require};

const LOG_PATH: &str = "/api/project_logs/";

#[derive(Debug, Serialize)]
struct LogEntry {
    description: String,
    minutes: i64,
    when: NaiveDate,
    #[serde(rename = "type")]
    category: EventCategory,
    project: u64,
}

/// Work-log endpoint client.
pub struct WorkLogClient {
    http: reqwest::Client,
    base_url: String,
    project_id: u64,
    auth: String,
}

impl fmt::Debug for WorkLogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkLogClient")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("auth", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl WorkLogClient {
    pub fn new(
        base_url: impl Into<String>,
        project_id: u64,
        auth: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        let base_url = base_url.into();
        let auth = auth.into();
        require(&base_url, "work-log base_url")?;
        require(&auth, "work-log auth")?;

        Ok(Self {
            http: build_http_client()?,
            base_url,
            project_id,
            auth,
        })
    }

    fn entry(&self, when: NaiveDate, event: &TaskEvent) -> LogEntry {
        LogEntry {
            description: event.description(),
            minutes: event.minutes(),
            when,
            category: event.category(),
            project: self.project_id,
        }
    }

    /// Posts one log entry per event with positive duration.
    ///
    /// Stops at the first failure. Returns how many entries were posted.
    pub async fn post_log(&self, when: NaiveDate, events: &[TaskEvent]) -> Result<usize, TrackerError> {
        let url = endpoint(&self.base_url, LOG_PATH);
        let mut posted = 0;

        for event in events {
            if event.work_duration() <= TimeDelta::zero() {
                if event.category() != EventCategory::Meeting {
                    tracing::warn!(
                        description = %event.description(),
                        category = event.category().as_str(),
                        minutes = event.minutes(),
                        "skipping event without positive duration, logged total will be short"
                    );
                }
                continue;
            }
            let response = self
                .http
                .post(&url)
                .header(reqwest::header::AUTHORIZATION, &self.auth)
                .json(&self.entry(when, event))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(TrackerError::Api {
                    service: "work-log endpoint",
                    status,
                    body,
                });
            }
            tracing::info!(
                description = %event.description(),
                category = event.category().as_str(),
                minutes = event.minutes(),
                "logged"
            );
            posted += 1;
        }

        Ok(posted)
    }
}
