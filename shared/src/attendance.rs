//! Attendance (DTR) state machine and monthly aggregation
//!
//! `clocked_out` is the initial state. Clock-in is only valid while clocked
//! out and clock-out only while clocked in. The duration is computed by the
//! server, so the local state changes only after a successful response.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{DtrRecord, DtrStatus};

/// Guard a clock-in attempt
pub fn check_clock_in(status: DtrStatus) -> AppResult<()> {
    match status {
        DtrStatus::ClockedOut => Ok(()),
        DtrStatus::ClockedIn => Err(AppError::new(ErrorCode::AlreadyClockedIn)),
    }
}

/// Guard a clock-out attempt
pub fn check_clock_out(status: DtrStatus) -> AppResult<()> {
    match status {
        DtrStatus::ClockedIn => Ok(()),
        DtrStatus::ClockedOut => Err(AppError::new(ErrorCode::NotClockedIn)),
    }
}

/// Status implied by the most recent record
pub fn current_status(records: &[DtrRecord]) -> DtrStatus {
    records
        .iter()
        .max_by_key(|r| r.clock_in)
        .map(|r| {
            if r.clock_out.is_none() {
                DtrStatus::ClockedIn
            } else {
                DtrStatus::ClockedOut
            }
        })
        .unwrap_or_default()
}

/// Monthly grouping key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthKey {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
}

/// Aggregated month for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub key: MonthKey,
    /// Distinct calendar days with at least one record
    pub days_worked: usize,
    pub total_minutes: i64,
    pub records: usize,
}

impl MonthlySummary {
    pub fn total_hours(&self) -> f64 {
        (self.total_minutes as f64 / 60.0 * 100.0).round() / 100.0
    }
}

/// Group records by (user, year, month) of their clock-in date
pub fn monthly_summaries(records: &[DtrRecord]) -> Vec<MonthlySummary> {
    let mut groups: BTreeMap<MonthKey, (BTreeSet<NaiveDate>, i64, usize)> = BTreeMap::new();

    for record in records {
        let day = record.clock_in.date_naive();
        let key = MonthKey {
            user_id: record.user_id.clone(),
            year: day.year(),
            month: day.month(),
        };
        let entry = groups.entry(key).or_default();
        entry.0.insert(day);
        entry.1 += record.worked_minutes();
        entry.2 += 1;
    }

    groups
        .into_iter()
        .map(|(key, (days, minutes, count))| MonthlySummary {
            key,
            days_worked: days.len(),
            total_minutes: minutes,
            records: count,
        })
        .collect()
}
