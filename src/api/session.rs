//! Session and navigation endpoints

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::Viewer;
use crate::{
    auth::{SessionStatus, SessionSummary},
    guard::{self, GuardDecision, NavLink, Route},
};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Loading,
    Resolved,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSummary>,
    /// Header links visible to this session
    pub navigation: Vec<NavLink>,
}

/// Current session as seen by the console header
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session state", body = SessionResponse)
    )
)]
pub async fn current_session(viewer: Viewer) -> Json<SessionResponse> {
    let response = match &viewer.status {
        SessionStatus::Initializing => SessionResponse {
            state: SessionState::Loading,
            session: None,
            navigation: Vec::new(),
        },
        SessionStatus::Resolved(session) => SessionResponse {
            state: SessionState::Resolved,
            session: Some(session.summary()),
            navigation: if session.is_authenticated() {
                guard::navigation(session)
            } else {
                Vec::new()
            },
        },
    };
    Json(response)
}

#[derive(Deserialize, IntoParams)]
pub struct RouteQuery {
    /// Console path, e.g. `/tools/edit/3`
    pub path: String,
}

/// Guard outcome for a console path
#[derive(Serialize, ToSchema)]
pub struct RouteCheck {
    pub path: String,
    /// loading, unauthenticated, authorized or forbidden
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_roles: Vec<String>,
}

impl RouteCheck {
    fn new(path: String, decision: GuardDecision) -> Self {
        let (state, redirect, required_roles) = match decision {
            GuardDecision::Loading => ("loading", None, Vec::new()),
            GuardDecision::Unauthenticated { redirect } => ("unauthenticated", Some(redirect), Vec::new()),
            GuardDecision::Authorized => ("authorized", None, Vec::new()),
            GuardDecision::Forbidden { required } => (
                "forbidden",
                Some(Route::Home.path()),
                required.iter().map(|r| r.as_str().to_string()).collect(),
            ),
        };
        Self {
            path,
            state: state.to_string(),
            redirect,
            required_roles,
        }
    }
}

/// Run the route guard for a navigation without loading the page
#[utoipa::path(
    get,
    path = "/routes",
    tag = "session",
    security((), ("bearer_auth" = [])),
    params(RouteQuery),
    responses(
        (status = 200, description = "Guard decision", body = RouteCheck)
    )
)]
pub async fn check_route(viewer: Viewer, Query(query): Query<RouteQuery>) -> Json<RouteCheck> {
    let route = Route::parse(&query.path);
    let decision = guard::evaluate(route, &viewer.status);
    Json(RouteCheck::new(query.path, decision))
}
