//! ToolRent staff console
//!
//! Session-aware console for the ToolRent rental backend: tool inventory,
//! clients, loans and returns, tariffs, kardex and reports, each page gated
//! by the roles carried in the caller's Keycloak token.

use std::sync::Arc;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod services;
pub mod validation;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<auth::SessionResolver>,
    pub transport: Arc<dyn gateway::Transport>,
    pub refresher: Arc<dyn auth::TokenRefresher>,
}
