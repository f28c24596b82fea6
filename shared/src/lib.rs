//! Shared types for Brewline
//!
//! Wire models, error codes, the realtime event envelope and the pure domain
//! logic (split accounting, photo ordering, attendance, reconciliation) used
//! by the client crate.

pub mod attendance;
pub mod client;
pub mod error;
pub mod gallery;
pub mod ledger;
pub mod message;
pub mod models;
pub mod money;
pub mod reconcile;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::{ChannelEvent, OrderEvent};
