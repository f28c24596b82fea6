//! HTTP client for the Brewline REST API

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, AppError, ErrorCode};
use uuid::Uuid;

use crate::{ClientConfig, ClientError, ClientResult};

/// Request id header attached to every call
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client shared by every resource facade
///
/// Cloning is cheap; clones share the bearer token, so logging in through one
/// facade authenticates them all.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// API base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the authentication token
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    /// Replace (or clear) the authentication token
    pub fn set_token(&self, token: Option<String>) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = token;
    }

    /// Get the current token
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build a request with auth and request id headers
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());

        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, self.request(Method::GET, path)).await
    }

    /// Make a GET request with query parameters
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(Method::GET, path, self.request(Method::GET, path).query(query))
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(Method::POST, path, self.request(Method::POST, path).json(body))
            .await
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::POST, path, self.request(Method::POST, path))
            .await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(Method::PUT, path, self.request(Method::PUT, path).json(body))
            .await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(Method::PATCH, path, self.request(Method::PATCH, path).json(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::DELETE, path, self.request(Method::DELETE, path))
            .await
    }

    /// Make a multipart POST request
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ClientResult<T> {
        self.send(Method::POST, path, self.request(Method::POST, path).multipart(form))
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        tracing::debug!(%method, path, "API request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "API request failed");
            ClientError::from(e)
        })?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = Self::decode_error(status, &bytes);
            tracing::debug!(status = status.as_u16(), code = %err.code, "API error: {}", err.message);
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
                StatusCode::FORBIDDEN => ClientError::Forbidden(err.message),
                StatusCode::NOT_FOUND => ClientError::NotFound(err.message),
                _ => ClientError::Api {
                    status: status.as_u16(),
                    code: err.code,
                    message: err.message,
                },
            });
        }

        // 204 and empty bodies decode as JSON null
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(|e| {
            ClientError::InvalidResponse(format!("Unexpected response body: {e}"))
        })
    }

    /// Decode a non-2xx body; non-JSON bodies keep their text as the message
    fn decode_error(status: StatusCode, body: &[u8]) -> AppError {
        match serde_json::from_slice::<ApiResponse<serde_json::Value>>(body) {
            Ok(parsed) => parsed.into_error(status),
            Err(_) => {
                let code = ErrorCode::from_http_status(status);
                let text = String::from_utf8_lossy(body).trim().to_string();
                if text.is_empty() {
                    AppError::new(code)
                } else {
                    AppError::with_message(code, text)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_json() {
        let err = HttpClient::decode_error(
            StatusCode::CONFLICT,
            br#"{"message":"Maximum of 6 active photos allowed","code":6202}"#,
        );
        assert_eq!(err.code, ErrorCode::ActivePhotoLimit);
        assert_eq!(err.message, "Maximum of 6 active photos allowed");
    }

    #[test]
    fn test_decode_error_message_only() {
        let err = HttpClient::decode_error(StatusCode::BAD_REQUEST, br#"{"message":"Customer name is required"}"#);
        assert_eq!(err.code, ErrorCode::from_http_status(StatusCode::BAD_REQUEST));
        assert_eq!(err.message, "Customer name is required");
    }

    #[test]
    fn test_decode_error_plain_text() {
        let err = HttpClient::decode_error(StatusCode::BAD_GATEWAY, b"upstream down");
        assert_eq!(err.message, "upstream down");
        let err = HttpClient::decode_error(StatusCode::INTERNAL_SERVER_ERROR, b"");
        assert_eq!(err.message, err.code.message());
    }

    #[test]
    fn test_token_shared_between_clones() {
        let client = HttpClient::new(&ClientConfig::default()).unwrap();
        let clone = client.clone();
        assert!(!clone.is_authenticated());
        client.set_token(Some("t0k3n".into()));
        assert_eq!(clone.token().as_deref(), Some("t0k3n"));
        clone.set_token(None);
        assert!(!client.is_authenticated());
        assert_eq!(client.url("/api/orders"), "http://localhost:5000/api/orders");
    }
}
