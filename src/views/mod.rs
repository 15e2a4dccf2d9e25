//! Page documents returned to the browser shell
//!
//! Every list page owns a [`ViewModel`]: a fetched collection plus its load
//! state. Fetches are ticketed so that a response arriving after the view was
//! unmounted, or after a newer fetch started, is dropped instead of
//! overwriting fresher state.

pub mod clients;
pub mod kardex;
pub mod loans;
pub mod reports;
pub mod tariffs;
pub mod tools;

use std::future::Future;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Loading,
    Loaded,
    /// Fetch succeeded with no rows; the page shows its empty-state message
    Empty,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Dismissible message shown above a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notification {
    pub severity: Severity,
    pub text: String,
}

impl Notification {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    pub fn from_error(err: &AppError) -> Self {
        Self::error(err.notification_text())
    }
}

/// Identifies one fetch issued by a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// A fetched collection and its load state
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ViewModel<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub state: ViewState,
    pub rows: Vec<T>,
    /// Set when the state is `empty`
    pub empty_message: Option<String>,
    pub notification: Option<Notification>,
    #[serde(skip)]
    empty_text: &'static str,
    #[serde(skip)]
    ticket: u64,
    #[serde(skip)]
    mounted: bool,
}

impl<T> ViewModel<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Mounted view with nothing fetched yet
    pub fn new(empty_text: &'static str) -> Self {
        Self {
            state: ViewState::Idle,
            rows: Vec::new(),
            empty_message: None,
            notification: None,
            empty_text,
            ticket: 0,
            mounted: true,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Responses still in flight are discarded once the view is unmounted
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.ticket += 1;
        self.state = ViewState::Loading;
        FetchTicket(self.ticket)
    }

    /// Apply a fetch result. Returns `false` when the result was stale and
    /// dropped.
    pub fn apply(&mut self, ticket: FetchTicket, result: AppResult<Vec<T>>) -> bool {
        if !self.mounted || ticket.0 != self.ticket {
            tracing::debug!(ticket = ticket.0, current = self.ticket, "Discarding stale fetch result");
            return false;
        }

        match result {
            Ok(rows) if rows.is_empty() => {
                self.rows = rows;
                self.state = ViewState::Empty;
                self.empty_message = Some(self.empty_text.to_string());
            }
            Ok(rows) => {
                self.rows = rows;
                self.state = ViewState::Loaded;
                self.empty_message = None;
            }
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                self.state = ViewState::Failed;
                self.notification = Some(Notification::from_error(&e));
            }
        }
        true
    }

    /// Fetch and apply in one step
    pub async fn load<F>(&mut self, fetch: F)
    where
        F: Future<Output = AppResult<Vec<T>>>,
    {
        let ticket = self.begin_fetch();
        let result = fetch.await;
        self.apply(ticket, result);
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }
}

/// Body of every mutating page action
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct ConfirmRequest {
    /// The action runs only once the user has confirmed its prompt
    #[serde(default)]
    pub confirmed: bool,
}

/// Mutations that need an explicit confirmation. Prompts are built from the
/// request alone so that nothing reaches the backend before confirmation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingAction {
    RestrictClient { id: i64 },
    ReactivateClient { id: i64 },
    AdjustStock { id: i64, quantity_change: i32 },
    DecommissionTool { id: i64 },
    PayDebt { loan_id: i64 },
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match *self {
            PendingAction::RestrictClient { id } => {
                format!("Change the status of client #{} to RESTRICTED?", id)
            }
            PendingAction::ReactivateClient { id } => format!(
                "Try to reactivate client #{}? The client must have no debts or late loans.",
                id
            ),
            PendingAction::AdjustStock { id, quantity_change } if quantity_change < 0 => {
                format!("Remove {} unit(s) of tool #{} from stock?", -quantity_change, id)
            }
            PendingAction::AdjustStock { id, quantity_change } => {
                format!("Add {} unit(s) of tool #{} to stock?", quantity_change, id)
            }
            PendingAction::DecommissionTool { id } => {
                format!("Decommission tool #{}? This action cannot be undone.", id)
            }
            PendingAction::PayDebt { loan_id } => format!("Mark the debt of loan #{} as paid?", loan_id),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            PendingAction::RestrictClient { .. } => "restrict_client",
            PendingAction::ReactivateClient { .. } => "reactivate_client",
            PendingAction::AdjustStock { .. } => "adjust_stock",
            PendingAction::DecommissionTool { .. } => "decommission_tool",
            PendingAction::PayDebt { .. } => "pay_debt",
        }
    }

    pub fn confirmation(&self) -> Confirmation {
        Confirmation {
            action: self.kind().to_string(),
            prompt: self.prompt(),
        }
    }
}

/// Prompt the shell shows before repeating the request with `confirmed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Confirmation {
    pub action: String,
    pub prompt: String,
}

/// Answer to a page action: either a prompt to confirm, or the result with
/// the reloaded page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionResponse<P>
where
    P: for<'a> ToSchema<'a>,
{
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<P>,
}

impl<P> ActionResponse<P>
where
    P: for<'a> ToSchema<'a>,
{
    /// Prompt for `action` unless the request already carries the confirmation
    pub fn gate(request: ConfirmRequest, action: &PendingAction) -> Option<Self> {
        if request.confirmed {
            None
        } else {
            Some(Self::confirm(action))
        }
    }

    pub fn confirm(action: &PendingAction) -> Self {
        Self {
            confirmation: Some(action.confirmation()),
            notification: None,
            page: None,
        }
    }

    pub fn done(notification: Notification, page: P) -> Self {
        Self {
            confirmation: None,
            notification: Some(notification),
            page: Some(page),
        }
    }
}

/// Result of a successful create, edit or return submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormOutcome {
    pub notification: Notification,
    /// Route the shell navigates to next
    pub redirect: String,
}

impl FormOutcome {
    pub fn redirect(text: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self {
            notification: Notification::success(text),
            redirect: redirect.into(),
        }
    }
}
