//! Credential-aware backend client

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use super::{ApiRequest, ApiResponse, Transport};
use crate::{
    auth::{Credentials, TokenRefresher},
    error::AppResult,
};

/// Attaches the session's bearer credential to every call, refreshing it
/// first when it is about to expire. One attempt per call, no retries.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    refresher: Arc<dyn TokenRefresher>,
    credentials: Mutex<Option<Credentials>>,
    lookahead: Duration,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        refresher: Arc<dyn TokenRefresher>,
        credentials: Option<Credentials>,
        lookahead: Duration,
    ) -> Self {
        Self {
            transport,
            refresher,
            credentials: Mutex::new(credentials),
            lookahead,
        }
    }

    /// Credentials as they stand after any refresh
    pub async fn credentials(&self) -> Option<Credentials> {
        self.credentials.lock().await.clone()
    }

    /// Bearer token for the next call, or `None` when the call has to go
    /// out unauthenticated
    async fn bearer(&self) -> Option<String> {
        let mut guard = self.credentials.lock().await;
        let current = guard.as_ref()?;

        if !current.expires_within(self.lookahead, Utc::now()) {
            return Some(current.access_token.clone());
        }

        let Some(refresh_token) = current.refresh_token.clone() else {
            tracing::warn!("Access token about to expire and no refresh token available");
            return None;
        };

        match self.refresher.refresh(&refresh_token).await {
            Ok(tokens) => {
                let renewed = tokens.into_credentials(Some(refresh_token));
                let token = renewed.access_token.clone();
                *guard = Some(renewed);
                tracing::debug!("Access token refreshed");
                Some(token)
            }
            Err(e) => {
                tracing::warn!("Failed to refresh access token: {}", e);
                None
            }
        }
    }

    pub async fn send(&self, mut request: ApiRequest) -> AppResult<ApiResponse> {
        request.bearer = self.bearer().await;
        tracing::debug!(method = %request.method, path = %request.path, "Calling ToolRent backend");

        let response = self.transport.send(request).await?;
        if response.status.is_success() {
            Ok(response)
        } else {
            Err(response.into_error())
        }
    }

    /// Send and ignore the response body
    pub async fn execute(&self, request: ApiRequest) -> AppResult<()> {
        self.send(request).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: impl Into<String>) -> AppResult<T> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    pub async fn patch_for<T: DeserializeOwned>(&self, path: impl Into<String>) -> AppResult<T> {
        self.send(ApiRequest::patch(path)).await?.json()
    }

    pub async fn post_json<B: Serialize>(&self, path: impl Into<String>, body: &B) -> AppResult<()> {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put_json<B: Serialize>(&self, path: impl Into<String>, body: &B) -> AppResult<()> {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch_json<B: Serialize>(&self, path: impl Into<String>, body: &B) -> AppResult<()> {
        self.execute(ApiRequest::patch(path).json(body)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{keycloak::MockTokenRefresher, TokenSet},
        error::AppError,
        gateway::MockTransport,
    };
    use reqwest::StatusCode;

    fn credentials(ttl_secs: i64, refresh: Option<&str>) -> Credentials {
        Credentials {
            access_token: "current".to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
        }
    }

    fn ok_transport(expected_bearer: Option<&'static str>) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(move |req| req.bearer.as_deref() == expected_bearer)
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, "[]")));
        transport
    }

    fn client(
        transport: MockTransport,
        refresher: MockTokenRefresher,
        creds: Option<Credentials>,
    ) -> ApiClient {
        ApiClient::new(Arc::new(transport), Arc::new(refresher), creds, Duration::seconds(5))
    }

    #[tokio::test]
    async fn fresh_token_is_attached_without_refresh() {
        let mut refresher = MockTokenRefresher::new();
        refresher.expect_refresh().never();

        let api = client(ok_transport(Some("current")), refresher, Some(credentials(300, Some("r"))));
        let tools: Vec<serde_json::Value> = api.get("/tools").await.unwrap();
        assert!(tools.is_empty());
    }

    #[tokio::test]
    async fn expiring_token_is_refreshed_before_the_call() {
        let mut refresher = MockTokenRefresher::new();
        refresher
            .expect_refresh()
            .withf(|token| token.to_string() == "r")
            .times(1)
            .returning(|_| {
                Ok(TokenSet {
                    access_token: "renewed".to_string(),
                    refresh_token: Some("r2".to_string()),
                    expires_in: 300,
                })
            });

        let api = client(ok_transport(Some("renewed")), refresher, Some(credentials(3, Some("r"))));
        api.execute(ApiRequest::get("/tools")).await.unwrap();

        let creds = api.credentials().await.unwrap();
        assert_eq!(creds.access_token, "renewed");
        assert_eq!(creds.refresh_token.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn failed_refresh_sends_the_call_unauthenticated() {
        let mut refresher = MockTokenRefresher::new();
        refresher
            .expect_refresh()
            .times(1)
            .returning(|_| Err(AppError::Authentication("refresh expired".to_string())));

        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.bearer.is_none())
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::UNAUTHORIZED, "")));

        let api = client(transport, refresher, Some(credentials(1, Some("r"))));
        let result = api.execute(ApiRequest::get("/tariffs")).await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }

    #[tokio::test]
    async fn anonymous_session_sends_no_bearer() {
        let mut refresher = MockTokenRefresher::new();
        refresher.expect_refresh().never();

        let api = client(ok_transport(None), refresher, None);
        api.execute(ApiRequest::get("/tools")).await.unwrap();
    }

    #[tokio::test]
    async fn backend_errors_are_not_retried() {
        let mut refresher = MockTokenRefresher::new();
        refresher.expect_refresh().never();

        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "")));

        let api = client(transport, refresher, Some(credentials(300, None)));
        let result = api.execute(ApiRequest::put("/tariffs")).await;
        assert!(matches!(result, Err(AppError::Backend { status: 500, .. })));
    }
}
