//! Tariff endpoints

use std::sync::Arc;

use crate::{error::AppResult, gateway::ApiClient, models::Tariff};

#[derive(Clone)]
pub struct TariffsService {
    api: Arc<ApiClient>,
}

impl TariffsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get(&self) -> AppResult<Tariff> {
        self.api.get("/tariffs").await
    }

    pub async fn update(&self, tariff: &Tariff) -> AppResult<()> {
        self.api.put_json("/tariffs", tariff).await
    }
}
