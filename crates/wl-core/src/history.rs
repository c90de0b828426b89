//! Issue records from the tracker and status-history parsing.
//!
//! The tracker returns change-log histories newest first. [`parse_status_history`]
//! keeps only status-field changes and returns them oldest first, ready for
//! interval building.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, ParseError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Timestamp layout used by the tracker's change-log (`2024-03-04T10:11:12.345+0100`).
const TRACKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Response body of an issue search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub issues: Vec<Issue>,
}

/// A single issue with its change-log expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: IssueFields,
    #[serde(default)]
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    /// Remaining fields, including the configurable status field.
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignee {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub histories: Vec<History>,
}

/// One change-log record: a timestamp and the fields it changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub field: String,
    #[serde(rename = "toString", default)]
    pub to_value: Option<String>,
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Issue {
    pub fn title(&self) -> &str {
        self.fields.summary.as_deref().unwrap_or_default()
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.fields.assignee.as_ref()?.name.as_deref()
    }

    /// Current value of `status_field`, given either as a plain string or as
    /// an object with a `name`.
    pub fn current_status(&self, status_field: &str) -> Option<&str> {
        match self.fields.other.get(status_field)? {
            Value::String(name) => Some(name),
            Value::Object(map) => map.get("name").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Change-log histories, if the issue has a non-empty change-log.
    pub fn histories(&self) -> Option<&[History]> {
        self.changelog
            .as_ref()
            .map(|changelog| changelog.histories.as_slice())
            .filter(|histories| !histories.is_empty())
    }
}

/// A recorded change of an issue's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub occurred_at: DateTime<FixedOffset>,
    pub to_status: String,
}

/// Parses a tracker change-log timestamp. RFC 3339 is accepted as well.
pub fn parse_tracker_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_str(value, TRACKER_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
}

/// Extracts status transitions from newest-first `histories`, oldest first.
///
/// A record counts only when its first item changes `status_field`. Records
/// with an unparseable timestamp or without a new value are skipped.
pub fn parse_status_history(histories: &[History], status_field: &str) -> Vec<StatusChange> {
    histories
        .iter()
        .rev()
        .filter_map(|history| {
            let item = history.items.first()?;
            if item.field != status_field {
                return None;
            }
            let Some(to_status) = item.to_value.clone() else {
                tracing::warn!(created = %history.created, "status change without new value, skipping");
                return None;
            };
            match parse_tracker_timestamp(&history.created) {
                Ok(occurred_at) => Some(StatusChange {
                    occurred_at,
                    to_status,
                }),
                Err(err) => {
                    tracing::warn!(created = %history.created, %err, "unparseable change-log timestamp, skipping");
                    None
                }
            }
        })
        .collect()
}
