//! Auth API

use async_trait::async_trait;
use shared::client::{CurrentUserResponse, LoginRequest, LoginResponse, MessageResponse};
use shared::error::AppError;
use shared::models::{Branch, User};

use crate::{ClientResult, HttpClient};

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Log in; the returned token is attached to every later request
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse>;

    /// Current user for the held token
    async fn me(&self) -> ClientResult<User>;

    /// Log out; the local token is dropped even when the call fails
    async fn logout(&self) -> ClientResult<()>;

    /// Branches visible to the current user
    async fn branches(&self) -> ClientResult<Vec<Branch>>;
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        if email.trim().is_empty() {
            return Err(AppError::required("email").into());
        }
        if password.is_empty() {
            return Err(AppError::required("password").into());
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post("/api/auth/login", &request).await?;
        self.http.set_token(Some(response.token.clone()));
        tracing::info!(user_id = %response.user.id, role = %response.user.role, "Logged in");
        Ok(response)
    }

    async fn me(&self) -> ClientResult<User> {
        let response: CurrentUserResponse = self.http.get("/api/auth/me").await?;
        Ok(response.user)
    }

    async fn logout(&self) -> ClientResult<()> {
        let result = self
            .http
            .post_empty::<Option<MessageResponse>>("/api/auth/logout")
            .await;
        self.http.set_token(None);
        if let Err(ref e) = result {
            tracing::warn!("Logout request failed, token dropped locally: {e}");
        }
        result.map(|_| ())
    }

    async fn branches(&self) -> ClientResult<Vec<Branch>> {
        self.http.get("/api/branches").await
    }
}
