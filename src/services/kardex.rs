//! Kardex endpoints

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    gateway::ApiClient,
    models::{KardexMovement, KardexQuery},
};

#[derive(Clone)]
pub struct KardexService {
    api: Arc<ApiClient>,
}

impl KardexService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn by_tool(&self, tool_id: i64) -> AppResult<Vec<KardexMovement>> {
        self.api.get(format!("/kardex/tool/{}", tool_id)).await
    }

    /// Movements between the start of `start` and the end of `end`
    pub async fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<KardexMovement>> {
        self.api.get(date_range_path(start, end)).await
    }

    pub async fn search(&self, query: KardexQuery) -> AppResult<Vec<KardexMovement>> {
        match query {
            KardexQuery::ByTool(id) => self.by_tool(id).await,
            KardexQuery::ByDateRange { start, end } => self.by_date_range(start, end).await,
        }
    }
}

fn date_range_path(start: NaiveDate, end: NaiveDate) -> String {
    format!("/kardex/date?start={}T00:00:00&end={}T23:59:59", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::KardexForm, services::test_support::expect_one};
    use reqwest::{Method, StatusCode};

    #[tokio::test]
    async fn tool_seven_hits_tool_path() {
        let api = expect_one(Method::GET, "/kardex/tool/7", StatusCode::OK, "[]");
        let query = KardexForm::by_tool("7").query().unwrap();
        assert!(KardexService::new(api).search(query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn date_range_gets_full_day_bounds() {
        let api = expect_one(
            Method::GET,
            "/kardex/date?start=2024-01-01T00:00:00&end=2024-01-31T23:59:59",
            StatusCode::OK,
            "[]",
        );
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        KardexService::new(api).by_date_range(start, end).await.unwrap();
    }
}
