//! Console HTTP surface
//!
//! Every handler resolves the caller's session through [`Viewer`], runs the
//! route guard, then talks to the backend with the caller's own credentials.

pub mod clients;
pub mod forms;
pub mod health;
pub mod kardex;
pub mod loans;
pub mod openapi;
pub mod reports;
pub mod session;
pub mod tariffs;
pub mod tools;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    auth::{Session, SessionStatus},
    error::{AppError, AppResult},
    gateway::ApiClient,
    guard::{self, Route},
    services::Services,
    AppState,
};

/// Header carrying the refresh token issued alongside the access token
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Resolved session of the caller plus backend services bound to its
/// credentials
pub struct Viewer {
    pub status: SessionStatus,
    pub services: Services,
}

impl Viewer {
    /// Session of the caller, once the resolver is ready
    pub fn session(&self) -> AppResult<&Session> {
        self.status.session().ok_or(AppError::SessionLoading)
    }

    /// Run the route guard for `route`
    pub fn enter(&self, route: Route) -> AppResult<&Session> {
        guard::evaluate(route, &self.status).into_result()?;
        self.session()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A malformed header is treated like a missing one
        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        let refresh_token = parts
            .headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let status = state.sessions.resolve(bearer.as_deref(), refresh_token);
        let credentials = status.session().and_then(|s| s.credentials().cloned());

        let api = ApiClient::new(
            state.transport.clone(),
            state.refresher.clone(),
            credentials,
            chrono::Duration::seconds(state.config.keycloak.refresh_lookahead_secs as i64),
        );

        Ok(Viewer {
            status,
            services: Services::new(Arc::new(api)),
        })
    }
}

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let console = Router::new()
        // Session and navigation
        .route("/session", get(session::current_session))
        .route("/routes", get(session::check_route))
        .route("/forms/validate", post(forms::validate_form))
        // Tools
        .route("/tools", get(tools::list_tools).post(tools::create_tool))
        .route("/tools/:id", get(tools::get_tool).put(tools::update_tool))
        .route("/tools/:id/stock", post(tools::adjust_stock))
        .route("/tools/:id/decommission", post(tools::decommission_tool))
        // Clients
        .route("/clients", get(clients::list_clients).post(clients::create_client))
        .route("/clients/:id", get(clients::get_client).put(clients::update_client))
        .route("/clients/:id/restrict", post(clients::restrict_client))
        .route("/clients/:id/reactivate", post(clients::reactivate_client))
        .route("/clients/:id/debts", get(clients::list_debts))
        .route("/clients/:id/debts/:loan_id/pay", post(clients::pay_debt))
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::create_loan))
        .route("/loans/new", get(loans::loan_picker))
        .route("/loans/:id/return", get(loans::return_form).post(loans::return_loan))
        // Tariffs, kardex, reports
        .route("/tariffs", get(tariffs::get_tariffs).put(tariffs::update_tariffs))
        .route("/kardex", get(kardex::search_kardex))
        .route("/reports", get(reports::run_report))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state)
        .nest("/console", console)
        .merge(openapi::create_openapi_router())
}
