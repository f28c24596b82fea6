//! Data models
//!
//! Wire shapes of the document-database records exposed by the API.
//! Fields are camelCase on the wire and ids arrive as `_id` (plain `id` is
//! accepted too).

pub mod branch;
pub mod category;
pub mod customer_photo;
pub mod daily_summary;
pub mod dtr;
pub mod inventory;
pub mod menu_item;
pub mod order;
pub mod upload;
pub mod user;
pub mod withdrawal;

// Re-exports
pub use branch::*;
pub use category::*;
pub use customer_photo::*;
pub use daily_summary::*;
pub use dtr::*;
pub use inventory::*;
pub use menu_item::*;
pub use order::*;
pub use upload::*;
pub use user::*;
pub use withdrawal::*;

/// Trim a user-entered string and require it to be non-empty
pub(crate) fn require_text(value: &str, field: &str) -> crate::error::AppResult<()> {
    if value.trim().is_empty() {
        return Err(crate::error::AppError::required(field));
    }
    Ok(())
}
