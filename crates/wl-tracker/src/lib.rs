//! Issue tracker and work-log integration for worklog.
//!
//! Provides:
//! - [`IssueSource`]: where issues with their change-logs come from, either the
//!   tracker's search API ([`JiraClient`]) or a fixture file ([`FileIssueSource`])
//! - [`WorkLogClient`]: posting the day's events to the time-logging endpoint

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use wl_core::SearchResponse;

mod file;
mod jira;
mod worklog;

pub use file::FileIssueSource;
pub use jira::{Credentials, JiraClient, SearchQuery};
pub use worklog::WorkLogClient;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracker and work-log errors.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A client setting was unusable.
    #[error("invalid {field}: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The remote service answered with a non-success status.
    #[error("{service} returned {status}: {body}")]
    Api {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    /// Failed to parse a response body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Failed to read an issue file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An issue file did not match the search response schema.
    #[error("invalid issue file {}: {source}", path.display())]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Somewhere to fetch candidate issues from.
pub trait IssueSource {
    /// Fetches issues with their change-logs expanded.
    fn fetch_issues(&self) -> impl Future<Output = Result<SearchResponse, TrackerError>> + Send;
}

fn build_http_client() -> Result<reqwest::Client, TrackerError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(TrackerError::ClientBuild)
}

fn require(value: &str, field: &'static str) -> Result<(), TrackerError> {
    if value.trim().is_empty() {
        return Err(TrackerError::InvalidSetting {
            field,
            reason: "cannot be empty",
        });
    }
    Ok(())
}

/// Joins a base URL and an absolute path without doubling the slash.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}
