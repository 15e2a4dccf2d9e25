//! Error types for the ToolRent console

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{auth::Role, validation::FieldErrors};

/// Console error codes reported to the browser shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    Forbidden = 3,
    SessionLoading = 4,
    InvalidForm = 5,
    BackendRejected = 6,
    BackendUnavailable = 7,
    NotFound = 8,
    BadValue = 9,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// No usable session; the guard sends the user back to the entry point
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Session is still being resolved")]
    SessionLoading,

    /// The backend refused the credential attached to a call
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Access restricted: requires {}", format_roles(.required))]
    Forbidden { required: Vec<Role> },

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Backend error ({status}): {message}")]
    Backend {
        status: u16,
        message: String,
        field_errors: Option<FieldErrors>,
    },

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

fn format_roles(roles: &[Role]) -> String {
    roles.iter().map(Role::as_str).collect::<Vec<_>>().join(", ")
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.to_string())
    }
}

impl AppError {
    /// Text for the dismissible notification shown by the console
    pub fn notification_text(&self) -> String {
        match self {
            AppError::Backend {
                field_errors: Some(fields),
                ..
            } if !fields.is_empty() => fields.to_string(),
            AppError::Backend { message, .. } => message.clone(),
            AppError::Validation(fields) => fields.to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub field_errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_roles: Option<Vec<String>>,
    /// Where the console should navigate next
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut field_errors = None;
        let mut required_roles = None;
        let mut redirect = None;

        let (status, code, message) = match self {
            AppError::Unauthenticated => {
                redirect = Some("/".to_string());
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::NotAuthenticated,
                    "Sign in to continue".to_string(),
                )
            }
            AppError::SessionLoading => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::SessionLoading,
                "Loading secure session...".to_string(),
            ),
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated, msg)
            }
            AppError::Forbidden { required } => {
                let message = format!(
                    "Your account does not have sufficient permissions to access this section. Required roles: {}",
                    format_roles(&required)
                );
                required_roles = Some(required.iter().map(|r| r.as_str().to_string()).collect());
                redirect = Some("/".to_string());
                (StatusCode::FORBIDDEN, ErrorCode::Forbidden, message)
            }
            AppError::Validation(fields) => {
                let message = fields.to_string();
                field_errors = Some(fields);
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::InvalidForm, message)
            }
            AppError::Backend {
                status,
                message,
                field_errors: fields,
            } => {
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error())
                    .unwrap_or_else(|| {
                        tracing::error!("Backend failure ({}): {}", status, message);
                        StatusCode::BAD_GATEWAY
                    });
                let message = match &fields {
                    Some(f) if !f.is_empty() => f.to_string(),
                    _ => message,
                };
                field_errors = fields;
                (status, ErrorCode::BackendRejected, message)
            }
            AppError::Transport(msg) => {
                tracing::error!("Backend transport error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorCode::BackendUnavailable,
                    "The ToolRent service could not be reached".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            field_errors,
            required_roles,
            redirect,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_5xx_becomes_bad_gateway() {
        let response = AppError::Backend {
            status: 500,
            message: "boom".to_string(),
            field_errors: None,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn backend_4xx_is_passed_through() {
        let response = AppError::Backend {
            status: 400,
            message: "Client has unpaid debts".to_string(),
            field_errors: None,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn forbidden_lists_required_roles() {
        let err = AppError::Forbidden {
            required: vec![Role::Admin],
        };
        assert_eq!(err.to_string(), "Access restricted: requires ADMIN");
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn notification_prefers_field_errors() {
        let err = AppError::Backend {
            status: 400,
            message: "Validation error(s) occurred.".to_string(),
            field_errors: Some(FieldErrors::new().with("replacementValue", "Replacement value cannot be negative")),
        };
        assert_eq!(
            err.notification_text(),
            "• Replacement Value: Replacement value cannot be negative"
        );
    }
}
