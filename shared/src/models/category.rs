//! Category Model

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    /// Owner attribution
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Create / rename category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

impl CategoryCreate {
    pub fn validate(&self) -> AppResult<()> {
        super::require_text(&self.name, "name")
    }
}
