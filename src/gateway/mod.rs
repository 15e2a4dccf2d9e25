//! Access to the ToolRent REST backend
//!
//! [`Transport`] is the raw HTTP seam; [`ApiClient`] layers credential
//! handling and error mapping on top of it and is what services use.

pub mod client;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
    validation::FieldErrors,
};

pub use client::ApiClient;

/// One outbound backend call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path and query string, appended verbatim to the backend base URL
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn json<B: serde::Serialize>(mut self, body: &B) -> AppResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| AppError::Internal(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Raw backend response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            AppError::Internal(format!("Unexpected backend response: {}", e))
        })
    }

    /// Map a non-success response to the console error taxonomy
    pub fn into_error(self) -> AppError {
        let status = self.status.as_u16();
        let parsed: Option<BackendErrorBody> = serde_json::from_slice(&self.body).ok();

        let (message, field_errors) = match parsed {
            Some(body) => {
                let fields = body.field_errors.map(|f| f.into_iter().collect::<FieldErrors>());
                let message = body
                    .message
                    .or(body.error)
                    .unwrap_or_else(|| default_message(self.status));
                (message, fields)
            }
            None => {
                let text = String::from_utf8_lossy(&self.body).trim().to_string();
                let message = if text.is_empty() {
                    default_message(self.status)
                } else {
                    text
                };
                (message, None)
            }
        };

        if self.status == StatusCode::UNAUTHORIZED {
            return AppError::Authentication(message);
        }

        AppError::Backend {
            status,
            message,
            field_errors,
        }
    }
}

fn default_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "Session expired or not authorized".to_string(),
        StatusCode::FORBIDDEN => "Not allowed to perform this action".to_string(),
        other => format!(
            "Request failed: {}",
            other.canonical_reason().unwrap_or("unknown error")
        ),
    }
}

/// Error payload produced by the backend's exception handler
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendErrorBody {
    error: Option<String>,
    message: Option<String>,
    field_errors: Option<BTreeMap<String, String>>,
}

/// Sends requests to the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse>;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method, url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_payload_keeps_field_errors() {
        let response = ApiResponse::new(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Validation Failed","message":"Validation error(s) occurred. Check 'fieldErrors' for details.","fieldErrors":{"replacementValue":"Replacement value cannot be negative"}}"#,
        );

        match response.into_error() {
            AppError::Backend {
                status,
                field_errors: Some(fields),
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(fields.get("replacementValue"), Some("Replacement value cannot be negative"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn plain_text_body_is_used_as_message() {
        let response = ApiResponse::new(StatusCode::CONFLICT, "RUT already registered");
        match response.into_error() {
            AppError::Backend { status, message, .. } => {
                assert_eq!(status, 409);
                assert_eq!(message, "RUT already registered");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unauthorized_is_an_authentication_error() {
        let response = ApiResponse::new(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(response.into_error(), AppError::Authentication(_)));
    }

    #[test]
    fn request_builders_set_method_and_body() {
        let req = ApiRequest::patch("/tools/3/stock")
            .json(&serde_json::json!({ "quantityChange": -2 }))
            .unwrap();
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.path, "/tools/3/stock");
        assert_eq!(req.body, Some(serde_json::json!({ "quantityChange": -2 })));
        assert!(req.bearer.is_none());
    }
}
