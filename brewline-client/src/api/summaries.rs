//! Daily sales summary API

use async_trait::async_trait;
use shared::models::{DailySummary, DailySummaryCreate};

use super::BranchQuery;
use crate::{ClientResult, HttpClient};

#[async_trait]
pub trait SummaryApi: Send + Sync {
    async fn list(&self, branch_id: &str) -> ClientResult<Vec<DailySummary>>;
    /// Submit after checking that cash + GCash equals the items total
    async fn submit(&self, summary: &DailySummaryCreate) -> ClientResult<DailySummary>;
}

#[derive(Debug, Clone)]
pub struct SummariesClient {
    http: HttpClient,
}

impl SummariesClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SummaryApi for SummariesClient {
    async fn list(&self, branch_id: &str) -> ClientResult<Vec<DailySummary>> {
        self.http
            .get_query("/api/daily-summaries", &BranchQuery { branch_id })
            .await
    }

    async fn submit(&self, summary: &DailySummaryCreate) -> ClientResult<DailySummary> {
        summary.validate()?;
        let saved: DailySummary = self.http.post("/api/daily-summaries", summary).await?;
        tracing::info!(branch_id = %saved.branch_id, date = %saved.date, total = saved.total, "Daily summary submitted");
        Ok(saved)
    }
}
