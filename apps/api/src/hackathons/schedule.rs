use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HackathonStatus {
    Upcoming,
    Active,
    Completed,
}

impl HackathonStatus {
    /// Status as of `now`. Both boundaries count as active.
    pub fn at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if start > now {
            HackathonStatus::Upcoming
        } else if end < now {
            HackathonStatus::Completed
        } else {
            HackathonStatus::Active
        }
    }

    /// `None` for `all`, an error for anything unrecognised.
    pub fn parse_filter(value: &str) -> Result<Option<Self>, AppError> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Ok(None),
            "upcoming" => Ok(Some(HackathonStatus::Upcoming)),
            "active" => Ok(Some(HackathonStatus::Active)),
            "completed" => Ok(Some(HackathonStatus::Completed)),
            other => Err(AppError::Validation(format!("unknown status '{other}'"))),
        }
    }
}

/// "React, Node.js,, SQL " → ["React", "Node.js", "SQL"]
pub fn parse_technologies(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
