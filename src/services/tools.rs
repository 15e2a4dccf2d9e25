//! Tool inventory endpoints

use std::sync::Arc;

use crate::{
    error::AppResult,
    gateway::{ApiClient, ApiRequest},
    models::{CreateTool, StockAdjustment, Tool, UpdateTool},
};

#[derive(Clone)]
pub struct ToolsService {
    api: Arc<ApiClient>,
}

impl ToolsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> AppResult<Vec<Tool>> {
        self.api.get("/tools").await
    }

    pub async fn get(&self, id: i64) -> AppResult<Tool> {
        self.api.get(format!("/tools/{}", id)).await
    }

    pub async fn create(&self, tool: &CreateTool) -> AppResult<()> {
        self.api.post_json("/tools", tool).await
    }

    pub async fn update(&self, id: i64, tool: &UpdateTool) -> AppResult<()> {
        self.api.put_json(format!("/tools/{}", id), tool).await
    }

    pub async fn adjust_stock(&self, id: i64, adjustment: &StockAdjustment) -> AppResult<()> {
        self.api.patch_json(format!("/tools/{}/stock", id), adjustment).await
    }

    pub async fn decommission(&self, id: i64) -> AppResult<()> {
        self.api
            .execute(ApiRequest::patch(format!("/tools/{}/decommission", id)))
            .await
    }
}
