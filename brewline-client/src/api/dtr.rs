//! DTR (attendance) API

use async_trait::async_trait;
use serde::Serialize;
use shared::models::{ClockIn, DtrRecord, DtrStatusResponse};

use crate::{ClientResult, HttpClient};

#[derive(Debug, Serialize)]
struct MonthQuery {
    year: i32,
    month: u32,
}

#[async_trait]
pub trait DtrApi: Send + Sync {
    async fn status(&self) -> ClientResult<DtrStatusResponse>;
    async fn clock_in(&self, branch_id: Option<&str>) -> ClientResult<DtrRecord>;
    /// Clock out; the server computes the duration
    async fn clock_out(&self) -> ClientResult<DtrRecord>;
    /// Records of the current user for one month
    async fn history(&self, year: i32, month: u32) -> ClientResult<Vec<DtrRecord>>;
}

#[derive(Debug, Clone)]
pub struct DtrClient {
    http: HttpClient,
}

impl DtrClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DtrApi for DtrClient {
    async fn status(&self) -> ClientResult<DtrStatusResponse> {
        self.http.get("/api/dtr/status").await
    }

    async fn clock_in(&self, branch_id: Option<&str>) -> ClientResult<DtrRecord> {
        self.http
            .post(
                "/api/dtr/clock-in",
                &ClockIn {
                    branch_id: branch_id.map(str::to_string),
                },
            )
            .await
    }

    async fn clock_out(&self) -> ClientResult<DtrRecord> {
        self.http.post_empty("/api/dtr/clock-out").await
    }

    async fn history(&self, year: i32, month: u32) -> ClientResult<Vec<DtrRecord>> {
        self.http
            .get_query("/api/dtr/history", &MonthQuery { year, month })
            .await
    }
}
