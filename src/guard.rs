//! Route guard
//!
//! Maps console paths to pages and decides, on every navigation, whether the
//! current session may see them. Decisions are never cached.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::{Permission, Role, Session, SessionStatus},
    error::{AppError, AppResult},
};

/// Pages of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Tools,
    AddTool,
    EditTool(i64),
    Loans,
    AddLoan,
    ReturnLoan(i64),
    Clients,
    AddClient,
    EditClient(i64),
    Tariffs,
    Reports,
    Kardex,
    NotFound,
}

/// What a route demands from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Requires(Permission),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let id = |raw: &str| raw.parse::<i64>().ok();

        match segments.as_slice() {
            [] => Route::Home,
            ["tools"] => Route::Tools,
            ["tools", "add"] => Route::AddTool,
            ["tools", "edit", raw] => id(*raw).map_or(Route::NotFound, Route::EditTool),
            ["loans"] => Route::Loans,
            ["loans", "add"] => Route::AddLoan,
            ["loans", "return", raw] => id(*raw).map_or(Route::NotFound, Route::ReturnLoan),
            ["clients"] => Route::Clients,
            ["clients", "add"] => Route::AddClient,
            ["clients", "edit", raw] => id(*raw).map_or(Route::NotFound, Route::EditClient),
            ["tariffs"] => Route::Tariffs,
            ["reports"] => Route::Reports,
            ["kardex"] => Route::Kardex,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home | Route::NotFound => "/".to_string(),
            Route::Tools => "/tools".to_string(),
            Route::AddTool => "/tools/add".to_string(),
            Route::EditTool(id) => format!("/tools/edit/{}", id),
            Route::Loans => "/loans".to_string(),
            Route::AddLoan => "/loans/add".to_string(),
            Route::ReturnLoan(id) => format!("/loans/return/{}", id),
            Route::Clients => "/clients".to_string(),
            Route::AddClient => "/clients/add".to_string(),
            Route::EditClient(id) => format!("/clients/edit/{}", id),
            Route::Tariffs => "/tariffs".to_string(),
            Route::Reports => "/reports".to_string(),
            Route::Kardex => "/kardex".to_string(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::NotFound => Access::Public,
            Route::Tools | Route::Loans => Access::Authenticated,
            Route::AddTool => Access::Requires(Permission::RegisterTools),
            Route::EditTool(_) => Access::Requires(Permission::EditTools),
            Route::AddLoan | Route::ReturnLoan(_) => Access::Requires(Permission::ManageLoans),
            Route::Clients | Route::AddClient | Route::EditClient(_) => {
                Access::Requires(Permission::ManageClients)
            }
            Route::Tariffs => Access::Requires(Permission::ManageTariffs),
            Route::Reports => Access::Requires(Permission::ViewReports),
            Route::Kardex => Access::Requires(Permission::ViewKardex),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not resolved yet
    Loading,
    Unauthenticated { redirect: String },
    Authorized,
    Forbidden { required: Vec<Role> },
}

impl GuardDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardDecision::Authorized)
    }

    pub fn into_result(self) -> AppResult<()> {
        match self {
            GuardDecision::Authorized => Ok(()),
            GuardDecision::Loading => Err(AppError::SessionLoading),
            GuardDecision::Unauthenticated { .. } => Err(AppError::Unauthenticated),
            GuardDecision::Forbidden { required } => Err(AppError::Forbidden { required }),
        }
    }
}

pub fn evaluate(route: Route, status: &SessionStatus) -> GuardDecision {
    let access = route.access();
    if access == Access::Public {
        return GuardDecision::Authorized;
    }

    let session = match status {
        SessionStatus::Initializing => return GuardDecision::Loading,
        SessionStatus::Resolved(session) => session,
    };

    if !session.is_authenticated() {
        return GuardDecision::Unauthenticated {
            redirect: Route::Home.path(),
        };
    }

    match access {
        Access::Requires(permission) if !session.can(permission) => GuardDecision::Forbidden {
            required: permission.granted_to(),
        },
        _ => GuardDecision::Authorized,
    }
}

/// Check a permission for an action inside an already-authorized page
pub fn require(session: &Session, permission: Permission) -> AppResult<()> {
    if !session.is_authenticated() {
        return Err(AppError::Unauthenticated);
    }
    if !session.can(permission) {
        return Err(AppError::Forbidden {
            required: permission.granted_to(),
        });
    }
    Ok(())
}

/// Header navigation entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NavLink {
    pub label: String,
    pub path: String,
}

fn nav(label: &str, path: String) -> NavLink {
    NavLink {
        label: label.to_string(),
        path,
    }
}

/// Navigation bar for a session; tariffs are only listed for admins
pub fn navigation(session: &Session) -> Vec<NavLink> {
    let mut links = vec![
        nav("Tools", Route::Tools.path()),
        nav("Loans", Route::Loans.path()),
        nav("Clients", Route::Clients.path()),
        nav("Reports", Route::Reports.path()),
        nav("Kardex", Route::Kardex.path()),
    ];
    if session.is_admin() {
        links.push(nav("Tariffs", Route::Tariffs.path()));
    }
    links
}
