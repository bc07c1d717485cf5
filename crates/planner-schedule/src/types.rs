use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Where a team member works on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScheduleStatus {
    /// The default. Never stored; it is the absence of an entry.
    #[default]
    #[serde(rename = "office")]
    Office,
    #[serde(rename = "smart")]
    SmartWorking,
    #[serde(rename = "away")]
    Away,
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScheduleStatus::Office => "office",
            ScheduleStatus::SmartWorking => "smart",
            ScheduleStatus::Away => "away",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "office" => Ok(ScheduleStatus::Office),
            "smart" => Ok(ScheduleStatus::SmartWorking),
            "away" => Ok(ScheduleStatus::Away),
            other => Err(format!("unknown schedule status: {other}")),
        }
    }
}

/// A stored, non-default status for one user on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    /// Store-assigned surrogate key.
    pub id: i64,
    /// Not checked against the user directory.
    pub user_id: i64,
    pub day: NaiveDate,
    pub status: ScheduleStatus,
}

/// Reject a range whose start lies after its end.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(ScheduleError::InvalidRange { start, end });
    }
    Ok(())
}
