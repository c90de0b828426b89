//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wl_core::{
    DEFAULT_DAILY_HOURS, DEFAULT_ROUNDING_MINUTES, MeetingSchedule, NormalizeConfig,
    WorkflowConfig, WorkflowStatuses,
};

/// Problems found when validating a loaded configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting `{field}`")]
    Missing { field: &'static str },

    #[error("unknown timezone `{value}`")]
    InvalidTimezone { value: String },

    #[error("`{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Where issues are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSourceKind {
    #[default]
    Jira,
    File,
}

/// Issue tracker settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub assignee_name: String,
    pub project_abbr: String,
    pub status_field: String,
    pub start_work_status: String,
    pub stop_work_status_primary: String,
    pub stop_work_status_secondary: String,
}

impl Default for JiraSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            assignee_name: String::new(),
            project_abbr: String::new(),
            status_field: "status".to_string(),
            start_work_status: String::new(),
            stop_work_status_primary: String::new(),
            stop_work_status_secondary: String::new(),
        }
    }
}

impl fmt::Debug for JiraSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("assignee_name", &self.assignee_name)
            .field("project_abbr", &self.project_abbr)
            .field("status_field", &self.status_field)
            .field("start_work_status", &self.start_work_status)
            .field("stop_work_status_primary", &self.stop_work_status_primary)
            .field("stop_work_status_secondary", &self.stop_work_status_secondary)
            .finish()
    }
}

/// Work-log endpoint settings.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkLogSettings {
    pub base_url: String,
    pub project_id: u64,
    pub auth: String,
}

impl fmt::Debug for WorkLogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkLogSettings")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("auth", &"[REDACTED]")
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA timezone the workday is expressed in.
    pub timezone: String,
    /// Local hour the workday starts at.
    pub start_hour: u32,
    /// Daily budget in hours.
    pub work_hours: u32,
    /// Rounding granularity in minutes.
    pub rounding_minutes: u32,
    pub source: IssueSourceKind,
    /// Saved search response used when `source = "file"`.
    pub fixture_path: Option<PathBuf>,
    pub jira: JiraSettings,
    pub worklog: WorkLogSettings,
    pub meetings: MeetingSchedule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string()),
            start_hour: 9,
            work_hours: DEFAULT_DAILY_HOURS,
            rounding_minutes: DEFAULT_ROUNDING_MINUTES,
            source: IssueSourceKind::default(),
            fixture_path: None,
            jira: JiraSettings::default(),
            worklog: WorkLogSettings::default(),
            meetings: MeetingSchedule::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WL_*, nested keys split on __)
        figment = figment.merge(Env::prefixed("WL_").split("__"));

        figment.extract()
    }

    /// Checks everything needed to compute a work log.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timezone()?;
        check_range("start_hour", self.start_hour, 0, 23)?;
        check_range("work_hours", self.work_hours, 1, 24)?;
        check_range("rounding_minutes", self.rounding_minutes, 1, 60)?;

        require("jira.assignee_name", &self.jira.assignee_name)?;
        require("jira.status_field", &self.jira.status_field)?;
        require("jira.start_work_status", &self.jira.start_work_status)?;
        require("jira.stop_work_status_primary", &self.jira.stop_work_status_primary)?;
        require("jira.stop_work_status_secondary", &self.jira.stop_work_status_secondary)?;

        match self.source {
            IssueSourceKind::Jira => {
                require("jira.base_url", &self.jira.base_url)?;
                require("jira.username", &self.jira.username)?;
                require("jira.project_abbr", &self.jira.project_abbr)?;
            }
            IssueSourceKind::File => {
                if self.fixture_path.is_none() {
                    return Err(ConfigError::Missing {
                        field: "fixture_path",
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks the settings needed to post to the work-log endpoint.
    pub fn validate_worklog(&self) -> Result<(), ConfigError> {
        require("worklog.base_url", &self.worklog.base_url)?;
        require("worklog.auth", &self.worklog.auth)?;
        if self.worklog.project_id == 0 {
            return Err(ConfigError::Missing {
                field: "worklog.project_id",
            });
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone {
                value: self.timezone.clone(),
            })
    }

    pub fn workflow(&self) -> WorkflowConfig {
        WorkflowConfig {
            assignee_name: self.jira.assignee_name.clone(),
            status_field: self.jira.status_field.clone(),
            statuses: WorkflowStatuses {
                start: self.jira.start_work_status.clone(),
                stop_primary: self.jira.stop_work_status_primary.clone(),
                stop_secondary: self.jira.stop_work_status_secondary.clone(),
            },
        }
    }

    pub fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig::new(self.work_hours, self.rounding_minutes)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing { field });
    }
    Ok(())
}

const fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Returns the platform-specific config directory for wl.
///
/// On Linux: `~/.config/wl`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wl"))
}
