//! Proportional normalization of task time to the daily budget.
//!
//! Raw task durations only say how the day was split. The normalizer rescales
//! them so tasks plus meetings fill the daily budget exactly, with every task
//! rounded to the configured granularity.
//!
//! # Algorithm Summary
//!
//! 1. Target = daily budget minus the meetings total
//! 2. Each task gets `raw / sum(raw) * target`, rounded half up to the granularity
//! 3. The rounding residual goes to a single task: the first smallest one when
//!    time is missing, the first largest one when rounding overshot
//!
//! Scaling is done on integer milliseconds as an exact fraction, so the result
//! does not depend on floating-point drift.

use chrono::TimeDelta;
use thiserror::Error;

use crate::event::{TaskEvent, total_duration};

/// Default daily budget in hours.
pub const DEFAULT_DAILY_HOURS: u32 = 8;

/// Default rounding granularity in minutes.
pub const DEFAULT_ROUNDING_MINUTES: u32 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Every raw task duration was zero.
    #[error("no tasks to log")]
    NoTasks,

    #[error("meetings take {meetings_minutes} minutes, more than the {budget_minutes} minute budget")]
    MeetingsExceedBudget {
        meetings_minutes: i64,
        budget_minutes: i64,
    },

    #[error("rounding granularity must be positive")]
    InvalidGranularity,
}

/// Settings for [`normalize_tasks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeConfig {
    pub daily_budget: TimeDelta,
    pub granularity: TimeDelta,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            daily_budget: TimeDelta::hours(i64::from(DEFAULT_DAILY_HOURS)),
            granularity: TimeDelta::minutes(i64::from(DEFAULT_ROUNDING_MINUTES)),
        }
    }
}

impl NormalizeConfig {
    pub fn new(daily_hours: u32, rounding_minutes: u32) -> Self {
        Self {
            daily_budget: TimeDelta::hours(i64::from(daily_hours)),
            granularity: TimeDelta::minutes(i64::from(rounding_minutes)),
        }
    }
}

/// Rescales `tasks` so that tasks and `meetings` together fill the daily budget.
///
/// Returns new events in input order; the inputs are left untouched.
pub fn normalize_tasks(
    tasks: &[TaskEvent],
    meetings: &[TaskEvent],
    config: &NormalizeConfig,
) -> Result<Vec<TaskEvent>, NormalizeError> {
    let granularity_ms = i128::from(config.granularity.num_milliseconds());
    if granularity_ms <= 0 {
        return Err(NormalizeError::InvalidGranularity);
    }

    let raw: Vec<i128> = tasks
        .iter()
        .map(|task| i128::from(task.work_duration().num_milliseconds().max(0)))
        .collect();
    let raw_total: i128 = raw.iter().sum();
    if raw_total == 0 {
        return Err(NormalizeError::NoTasks);
    }

    let meetings_total = total_duration(meetings);
    let target = config.daily_budget - meetings_total;
    if target < TimeDelta::zero() {
        return Err(NormalizeError::MeetingsExceedBudget {
            meetings_minutes: meetings_total.num_minutes(),
            budget_minutes: config.daily_budget.num_minutes(),
        });
    }
    let target_ms = i128::from(target.num_milliseconds());

    let mut rounded: Vec<i128> = raw
        .iter()
        .map(|&ms| round_half_up(target_ms * ms, raw_total, granularity_ms))
        .collect();

    let residual = target_ms - rounded.iter().sum::<i128>();
    if let Some(index) = correction_index(&rounded, residual) {
        rounded[index] += residual;
    }

    tracing::debug!(
        tasks = tasks.len(),
        target_minutes = target.num_minutes(),
        residual_ms = %residual,
        "normalized task time"
    );

    Ok(tasks
        .iter()
        .zip(rounded)
        .map(|(task, ms)| task.with_duration(millis_to_delta(ms)))
        .collect())
}

/// Rounds `numerator / denominator` to a multiple of `granularity`; a remainder
/// of at least half the granularity rounds up.
fn round_half_up(numerator: i128, denominator: i128, granularity: i128) -> i128 {
    (2 * numerator + denominator * granularity).div_euclid(2 * denominator * granularity) * granularity
}

/// Index of the task absorbing the residual: the first minimum when time is
/// missing, the first maximum otherwise.
fn correction_index(rounded: &[i128], residual: i128) -> Option<usize> {
    let mut best: Option<(usize, i128)> = None;
    for (index, &value) in rounded.iter().enumerate() {
        let better = match best {
            None => true,
            Some((_, current)) if residual > 0 => value < current,
            Some((_, current)) => value > current,
        };
        if better {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
}

#[allow(clippy::cast_possible_truncation)]
fn millis_to_delta(ms: i128) -> TimeDelta {
    TimeDelta::milliseconds(ms as i64)
}
