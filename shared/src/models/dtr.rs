//! DTR Model (Daily Time Record / attendance)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attendance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtrStatus {
    ClockedIn,
    #[default]
    ClockedOut,
}

/// Time record - one clock-in/clock-out pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtrRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Crew member
    #[serde(alias = "user")]
    pub user_id: String,
    pub clock_in: DateTime<Utc>,
    #[serde(default)]
    pub clock_out: Option<DateTime<Utc>>,
    /// Duration computed by the server on clock-out
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    pub status: DtrStatus,
    #[serde(default)]
    pub branch_id: Option<String>,
}

impl DtrRecord {
    /// Worked minutes: server-computed duration, else derived from timestamps
    ///
    /// Open records (still clocked in) count as zero.
    pub fn worked_minutes(&self) -> i64 {
        if let Some(minutes) = self.duration_minutes {
            return minutes.max(0);
        }
        self.clock_out
            .map(|out| (out - self.clock_in).num_minutes().max(0))
            .unwrap_or(0)
    }
}

/// Current status response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtrStatusResponse {
    pub status: DtrStatus,
    /// Open record when clocked in
    #[serde(default)]
    pub record: Option<DtrRecord>,
}

/// Clock-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockIn {
    pub branch_id: Option<String>,
}
