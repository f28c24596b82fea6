//! Attendance view - clock in/out and monthly time records

use std::sync::{Arc, Mutex};

use shared::attendance::{self, MonthlySummary};
use shared::models::{Capability, DtrRecord, DtrStatus, DtrStatusResponse};

use crate::ClientResult;
use crate::api::DtrApi;
use crate::session::Session;

pub struct AttendanceView {
    session: Arc<Session>,
    api: Arc<dyn DtrApi>,
    status: Mutex<DtrStatusResponse>,
    history: Mutex<Vec<DtrRecord>>,
}

impl AttendanceView {
    pub fn new(session: Arc<Session>, api: Arc<dyn DtrApi>) -> Self {
        Self {
            session,
            api,
            status: Mutex::new(DtrStatusResponse::default()),
            history: Mutex::new(Vec::new()),
        }
    }

    fn set_status(&self, response: DtrStatusResponse) {
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = response;
    }

    pub fn status(&self) -> DtrStatus {
        self.status.lock().unwrap_or_else(|e| e.into_inner()).status
    }

    /// Open record while clocked in
    pub fn open_record(&self) -> Option<DtrRecord> {
        self.status
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .record
            .clone()
    }

    pub async fn refresh_status(&self) -> ClientResult<DtrStatus> {
        self.session.require(Capability::TrackTime)?;
        let response = self.api.status().await?;
        let status = response.status;
        self.set_status(response);
        Ok(status)
    }

    /// Clock in at the selected branch
    ///
    /// The local status changes only after the server accepts.
    pub async fn clock_in(&self) -> ClientResult<DtrRecord> {
        let user = self.session.require(Capability::TrackTime)?;
        attendance::check_clock_in(self.status())?;

        let branch = self.session.branch();
        let record = self.api.clock_in(branch.as_deref()).await?;
        tracing::info!(user_id = %user.id, branch = ?branch, "Clocked in");
        self.set_status(DtrStatusResponse {
            status: DtrStatus::ClockedIn,
            record: Some(record.clone()),
        });
        Ok(record)
    }

    /// Clock out; the returned record carries the server-computed duration
    pub async fn clock_out(&self) -> ClientResult<DtrRecord> {
        let user = self.session.require(Capability::TrackTime)?;
        attendance::check_clock_out(self.status())?;

        let record = self.api.clock_out().await?;
        tracing::info!(user_id = %user.id, minutes = record.worked_minutes(), "Clocked out");
        self.set_status(DtrStatusResponse::default());
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(record)
    }

    /// Load one month of records and aggregate it per user
    pub async fn load_month(&self, year: i32, month: u32) -> ClientResult<Vec<MonthlySummary>> {
        self.session.require(Capability::TrackTime)?;
        let records = self.api.history(year, month).await?;
        let summaries = attendance::monthly_summaries(&records);
        *self.history.lock().unwrap_or_else(|e| e.into_inner()) = records;
        Ok(summaries)
    }

    /// Records from the last month loaded, plus clock-outs since
    pub fn history(&self) -> Vec<DtrRecord> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use crate::session::tests::started;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use shared::error::ErrorCode;
    use shared::models::Role;

    #[derive(Default)]
    struct FakeDtr {
        open: Mutex<Option<DtrRecord>>,
        clock_in_calls: Mutex<usize>,
        fail_clock_in: bool,
    }

    fn record(id: &str, day: u32, minutes: Option<i64>) -> DtrRecord {
        let clock_in = Utc.with_ymd_and_hms(2024, 6, day, 8, 0, 0).unwrap();
        DtrRecord {
            id: id.into(),
            user_id: "u1".into(),
            clock_in,
            clock_out: minutes.map(|m| clock_in + Duration::minutes(m)),
            duration_minutes: minutes,
            status: if minutes.is_some() { DtrStatus::ClockedOut } else { DtrStatus::ClockedIn },
            branch_id: Some("b1".into()),
        }
    }

    #[async_trait]
    impl DtrApi for FakeDtr {
        async fn status(&self) -> ClientResult<DtrStatusResponse> {
            let open = self.open.lock().unwrap().clone();
            Ok(DtrStatusResponse {
                status: if open.is_some() { DtrStatus::ClockedIn } else { DtrStatus::ClockedOut },
                record: open,
            })
        }
        async fn clock_in(&self, branch_id: Option<&str>) -> ClientResult<DtrRecord> {
            *self.clock_in_calls.lock().unwrap() += 1;
            if self.fail_clock_in {
                return Err(ClientError::Api { status: 503, code: ErrorCode::NetworkError, message: "down".into() });
            }
            assert_eq!(branch_id, Some("b1"));
            let open = record("d1", 3, None);
            *self.open.lock().unwrap() = Some(open.clone());
            Ok(open)
        }
        async fn clock_out(&self) -> ClientResult<DtrRecord> {
            self.open.lock().unwrap().take().unwrap();
            Ok(record("d1", 3, Some(480)))
        }
        async fn history(&self, _year: i32, _month: u32) -> ClientResult<Vec<DtrRecord>> {
            Ok(vec![record("d1", 3, Some(480)), record("d2", 3, Some(60)), record("d3", 4, Some(300))])
        }
    }

    #[tokio::test]
    async fn test_clock_cycle() {
        let view = AttendanceView::new(started(Role::Crew, "b1").await, Arc::new(FakeDtr::default()));
        assert_eq!(view.refresh_status().await.unwrap(), DtrStatus::ClockedOut);

        view.clock_in().await.unwrap();
        assert_eq!(view.status(), DtrStatus::ClockedIn);
        assert!(view.open_record().is_some());

        let err = view.clock_in().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyClockedIn);

        let closed = view.clock_out().await.unwrap();
        assert_eq!(closed.worked_minutes(), 480);
        assert_eq!(view.status(), DtrStatus::ClockedOut);
        assert_eq!(view.history().len(), 1);

        let err = view.clock_out().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotClockedIn);
    }

    #[tokio::test]
    async fn test_failed_clock_in_keeps_status() {
        let api = Arc::new(FakeDtr { fail_clock_in: true, ..Default::default() });
        let view = AttendanceView::new(started(Role::OrderTakerCrew, "b1").await, api.clone());
        assert!(view.clock_in().await.is_err());
        assert_eq!(view.status(), DtrStatus::ClockedOut);
        assert_eq!(*api.clock_in_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_order_taker_cannot_track_time() {
        let api = Arc::new(FakeDtr::default());
        let view = AttendanceView::new(started(Role::OrderTaker, "b1").await, api.clone());
        assert!(matches!(view.clock_in().await, Err(ClientError::Forbidden(_))));
        assert_eq!(*api.clock_in_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_load_month() {
        let view = AttendanceView::new(started(Role::Crew, "b1").await, Arc::new(FakeDtr::default()));
        let months = view.load_month(2024, 6).await.unwrap();
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].days_worked, 2);
        assert_eq!(months[0].total_minutes, 840);
        assert_eq!(months[0].total_hours(), 14.0);
        assert_eq!(view.history().len(), 3);
    }
}
