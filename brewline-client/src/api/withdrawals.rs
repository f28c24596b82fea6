//! Withdrawals / purchases API

use async_trait::async_trait;
use shared::client::MessageResponse;
use shared::models::{Withdrawal, WithdrawalCreate};
use urlencoding::encode;

use super::BranchQuery;
use crate::{ClientResult, HttpClient};

#[async_trait]
pub trait WithdrawalApi: Send + Sync {
    /// All expenses of a branch; filtering happens locally
    async fn list(&self, branch_id: &str) -> ClientResult<Vec<Withdrawal>>;
    async fn create(&self, withdrawal: &WithdrawalCreate) -> ClientResult<Withdrawal>;
    async fn delete(&self, withdrawal_id: &str) -> ClientResult<()>;
}

#[derive(Debug, Clone)]
pub struct WithdrawalsClient {
    http: HttpClient,
}

impl WithdrawalsClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl WithdrawalApi for WithdrawalsClient {
    async fn list(&self, branch_id: &str) -> ClientResult<Vec<Withdrawal>> {
        self.http
            .get_query("/api/withdrawals", &BranchQuery { branch_id })
            .await
    }

    async fn create(&self, withdrawal: &WithdrawalCreate) -> ClientResult<Withdrawal> {
        withdrawal.validate()?;
        self.http.post("/api/withdrawals", withdrawal).await
    }

    async fn delete(&self, withdrawal_id: &str) -> ClientResult<()> {
        self.http
            .delete::<Option<MessageResponse>>(&format!("/api/withdrawals/{}", encode(withdrawal_id)))
            .await
            .map(|_| ())
    }
}
