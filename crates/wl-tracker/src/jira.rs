//! Issue search against the tracker's REST API.

use std::fmt;

use serde::Serialize;
use wl_core::SearchResponse;

use crate::{IssueSource, TrackerError, build_http_client, endpoint, require};

const SEARCH_PATH: &str = "/rest/api/3/search";
const MAX_RESULTS: u32 = 100;

/// Basic credentials sent with every search.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Which issues to search for.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub project: String,
    pub assignee: String,
    pub status_field: String,
}

impl SearchQuery {
    fn jql(&self) -> String {
        format!("project = {} AND assignee = {}", self.project, self.assignee)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    expand: [&'static str; 1],
    jql: String,
    max_results: u32,
    fields: [&'a str; 3],
    start_at: u32,
}

/// Tracker search client.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    query: SearchQuery,
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        query: SearchQuery,
    ) -> Result<Self, TrackerError> {
        let base_url = base_url.into();
        require(&base_url, "tracker base_url")?;
        require(&query.project, "project")?;
        require(&query.assignee, "assignee")?;

        Ok(Self {
            http: build_http_client()?,
            base_url,
            credentials,
            query,
        })
    }

    fn request_body(&self) -> SearchRequest<'_> {
        SearchRequest {
            expand: ["changelog"],
            jql: self.query.jql(),
            max_results: MAX_RESULTS,
            fields: ["summary", self.query.status_field.as_str(), "assignee"],
            start_at: 0,
        }
    }
}

impl IssueSource for JiraClient {
    async fn fetch_issues(&self) -> Result<SearchResponse, TrackerError> {
        let url = endpoint(&self.base_url, SEARCH_PATH);
        tracing::debug!(%url, jql = %self.query.jql(), "searching issues");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.request_body())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TrackerError::Api {
                service: "issue tracker",
                status,
                body,
            });
        }

        let result: SearchResponse = serde_json::from_str(&body)
            .map_err(|err| TrackerError::InvalidResponse(err.to_string()))?;
        tracing::debug!(issues = result.issues.len(), "fetched issues");
        Ok(result)
    }
}
