//! Menu items and categories API

use async_trait::async_trait;
use serde::Serialize;
use shared::client::MessageResponse;
use shared::models::{Category, CategoryCreate, MenuItem, MenuItemCreate, MenuItemUpdate};
use urlencoding::encode;

use crate::{ClientResult, HttpClient};

/// Menu item list filter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_seller: Option<bool>,
}

impl MenuQuery {
    pub fn best_sellers() -> Self {
        Self {
            best_seller: Some(true),
            ..Default::default()
        }
    }

    pub fn in_category(category_id: impl Into<String>) -> Self {
        Self {
            category_id: Some(category_id.into()),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait MenuApi: Send + Sync {
    async fn list_items(&self, query: &MenuQuery) -> ClientResult<Vec<MenuItem>>;
    async fn create_item(&self, item: &MenuItemCreate) -> ClientResult<MenuItem>;
    async fn update_item(&self, item_id: &str, update: &MenuItemUpdate) -> ClientResult<MenuItem>;
    async fn delete_item(&self, item_id: &str) -> ClientResult<()>;

    async fn list_categories(&self) -> ClientResult<Vec<Category>>;
    async fn create_category(&self, category: &CategoryCreate) -> ClientResult<Category>;
    async fn rename_category(&self, category_id: &str, category: &CategoryCreate)
    -> ClientResult<Category>;
    async fn delete_category(&self, category_id: &str) -> ClientResult<()>;
}

#[derive(Debug, Clone)]
pub struct MenuClient {
    http: HttpClient,
}

impl MenuClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MenuApi for MenuClient {
    async fn list_items(&self, query: &MenuQuery) -> ClientResult<Vec<MenuItem>> {
        self.http.get_query("/api/menu-items", query).await
    }

    async fn create_item(&self, item: &MenuItemCreate) -> ClientResult<MenuItem> {
        item.validate()?;
        self.http.post("/api/menu-items", item).await
    }

    async fn update_item(&self, item_id: &str, update: &MenuItemUpdate) -> ClientResult<MenuItem> {
        update.validate()?;
        self.http
            .put(&format!("/api/menu-items/{}", encode(item_id)), update)
            .await
    }

    async fn delete_item(&self, item_id: &str) -> ClientResult<()> {
        self.http
            .delete::<Option<MessageResponse>>(&format!("/api/menu-items/{}", encode(item_id)))
            .await
            .map(|_| ())
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.http.get("/api/categories").await
    }

    async fn create_category(&self, category: &CategoryCreate) -> ClientResult<Category> {
        category.validate()?;
        self.http.post("/api/categories", category).await
    }

    async fn rename_category(
        &self,
        category_id: &str,
        category: &CategoryCreate,
    ) -> ClientResult<Category> {
        category.validate()?;
        self.http
            .put(&format!("/api/categories/{}", encode(category_id)), category)
            .await
    }

    async fn delete_category(&self, category_id: &str) -> ClientResult<()> {
        self.http
            .delete::<Option<MessageResponse>>(&format!("/api/categories/{}", encode(category_id)))
            .await
            .map(|_| ())
    }
}
