//! Client endpoints

use std::sync::Arc;

use crate::{
    error::AppResult,
    gateway::ApiClient,
    models::{Client, ClientStatus, CreateClient, StatusChange, UpdateClient},
};

#[derive(Clone)]
pub struct ClientsService {
    api: Arc<ApiClient>,
}

impl ClientsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> AppResult<Vec<Client>> {
        self.api.get("/clients").await
    }

    pub async fn get(&self, id: i64) -> AppResult<Client> {
        self.api.get(format!("/clients/{}", id)).await
    }

    pub async fn create(&self, client: &CreateClient) -> AppResult<()> {
        self.api.post_json("/clients", client).await
    }

    pub async fn update(&self, id: i64, client: &UpdateClient) -> AppResult<()> {
        self.api.put_json(format!("/clients/{}", id), client).await
    }

    pub async fn update_status(&self, id: i64, status: ClientStatus) -> AppResult<()> {
        self.api
            .patch_json(format!("/clients/{}/status", id), &StatusChange { status })
            .await
    }

    /// Ask the backend to reactivate a client. The backend refuses when the
    /// client still has debts, so the returned record carries whatever status
    /// it decided on.
    pub async fn attempt_reactivation(&self, id: i64) -> AppResult<Client> {
        self.api.patch_for(format!("/clients/{}/activate", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::expect_one;
    use reqwest::{Method, StatusCode};

    #[tokio::test]
    async fn reactivation_reports_backend_status() {
        let api = expect_one(
            Method::PATCH,
            "/clients/3/activate",
            StatusCode::OK,
            r#"{"id":3,"rut":"12.345.678-9","name":"Ana","phone":"912345678","email":"a@b.cl","status":"RESTRICTED"}"#,
        );
        let client = ClientsService::new(api).attempt_reactivation(3).await.unwrap();
        assert_eq!(client.status, ClientStatus::Restricted);
    }

    #[tokio::test]
    async fn status_change_patches_status() {
        let api = expect_one(Method::PATCH, "/clients/3/status", StatusCode::OK, "{}");
        ClientsService::new(api)
            .update_status(3, ClientStatus::Restricted)
            .await
            .unwrap();
    }
}
