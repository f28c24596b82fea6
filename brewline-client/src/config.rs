//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::{ClientError, ClientResult};

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default reconnect attempts before the realtime client gives up
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 5;
/// Default fixed delay between reconnect attempts
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1000;

/// Client configuration for the Brewline API and realtime channel
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:5000")
    pub api_url: String,

    /// Realtime channel URL (e.g., "ws://localhost:5000/ws")
    pub ws_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Reconnect attempts after the realtime connection drops
    pub reconnect_attempts: u32,

    /// Fixed delay between reconnect attempts
    pub reconnect_delay: Duration,

    /// Local store file (selected branch, last user); `None` keeps it in memory
    pub store_path: Option<PathBuf>,

    /// Log filter (e.g., "info", "brewline_client=debug")
    pub log_level: String,

    /// Daily rolling log directory
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a configuration for `api_url`; the realtime URL is derived from it
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            ws_url: derive_ws_url(&api_url),
            api_url,
            timeout: DEFAULT_TIMEOUT_SECS,
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
            store_path: None,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }

    /// Load from the environment (and a `.env` file when present)
    ///
    /// Recognised variables: `BREWLINE_API_URL`, `BREWLINE_WS_URL`,
    /// `BREWLINE_TIMEOUT_SECS`, `BREWLINE_RECONNECT_ATTEMPTS`,
    /// `BREWLINE_RECONNECT_DELAY_MS`, `BREWLINE_STORE_PATH`, `BREWLINE_LOG`,
    /// `BREWLINE_LOG_DIR`.
    pub fn from_env() -> ClientResult<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!("Failed to read .env file: {e}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(get("BREWLINE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()));

        if let Some(ws_url) = get("BREWLINE_WS_URL") {
            config.ws_url = ws_url;
        }
        if let Some(timeout) = get("BREWLINE_TIMEOUT_SECS") {
            config.timeout = parse_number("BREWLINE_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(attempts) = get("BREWLINE_RECONNECT_ATTEMPTS") {
            config.reconnect_attempts = parse_number("BREWLINE_RECONNECT_ATTEMPTS", &attempts)?;
        }
        if let Some(delay) = get("BREWLINE_RECONNECT_DELAY_MS") {
            config.reconnect_delay =
                Duration::from_millis(parse_number("BREWLINE_RECONNECT_DELAY_MS", &delay)?);
        }
        config.store_path = get("BREWLINE_STORE_PATH").map(PathBuf::from);
        if let Some(level) = get("BREWLINE_LOG") {
            config.log_level = level;
        }
        config.log_dir = get("BREWLINE_LOG_DIR").map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Reject URLs the HTTP and WebSocket clients cannot use
    pub fn validate(&self) -> ClientResult<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "API URL must start with http:// or https://, got {}",
                self.api_url
            )));
        }
        if !(self.ws_url.starts_with("ws://") || self.ws_url.starts_with("wss://")) {
            return Err(ClientError::Config(format!(
                "Realtime URL must start with ws:// or wss://, got {}",
                self.ws_url
            )));
        }
        Ok(())
    }

    /// Set the realtime channel URL
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set reconnect attempts
    pub fn with_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.reconnect_attempts = attempts;
        self
    }

    /// Set the fixed reconnect delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the local store file
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Set the log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// `http(s)://host/api` → `ws(s)://host/ws`
fn derive_ws_url(api_url: &str) -> String {
    let ws = api_url
        .replacen("https://", "wss://", 1)
        .replacen("http://", "ws://", 1);
    let base = ws.trim_end_matches('/');
    let base = base.strip_suffix("/api").unwrap_or(base);
    format!("{base}/ws")
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ClientResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::Config(format!("{key} must be a number, got {value}")))
}
