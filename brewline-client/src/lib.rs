//! Brewline Client - order management client for the coffee shop API
//!
//! HTTP facades per resource, the realtime order feed, the session and the
//! view models the order-taker, kitchen and admin screens are built on.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod realtime;
pub mod session;
pub mod views;

pub use api::Api;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use realtime::{RealtimeClient, RealtimeConfig, Subscription};
pub use session::{LocalStore, Session};

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, MessageResponse};
pub use shared::error::ApiResponse;
pub use shared::message::{ChannelEvent, EventType, OrderEvent};
