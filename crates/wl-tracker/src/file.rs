//! Issues loaded from a saved search response on disk.

use std::path::PathBuf;

use wl_core::SearchResponse;

use crate::{IssueSource, TrackerError};

/// Reads a search response previously saved as JSON.
#[derive(Debug, Clone)]
pub struct FileIssueSource {
    path: PathBuf,
}

impl FileIssueSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IssueSource for FileIssueSource {
    async fn fetch_issues(&self) -> Result<SearchResponse, TrackerError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| TrackerError::Io {
                path: self.path.clone(),
                source,
            })?;
        let response: SearchResponse =
            serde_json::from_str(&contents).map_err(|source| TrackerError::InvalidFile {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), issues = response.issues.len(), "loaded issues from file");
        Ok(response)
    }
}
