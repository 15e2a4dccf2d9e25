//! Loan pages: list, creation picker and return form

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FormOutcome, Notification, ViewModel};
use crate::{
    auth::{Permission, Session},
    error::{AppError, AppResult},
    guard::{self, Route},
    models::{Client, Loan, LoanForm, ReturnForm, Tool, ToolStatus},
    services::Services,
};

const NO_LOANS: &str = "No loans registered.";

/// Loan row with its display label and whether it can be returned
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanRow {
    #[serde(flatten)]
    pub loan: Loan,
    pub status_label: String,
    pub returnable: bool,
}

/// Subset of loans shown by the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanFilter {
    #[default]
    All,
    Active,
    Late,
    /// Returned with an outstanding penalty
    ClosedUnpaid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoansPage {
    pub filter: LoanFilter,
    pub loans: ViewModel<LoanRow>,
    pub can_register: bool,
}

impl LoansPage {
    pub async fn load(services: &Services, session: &Session, filter: LoanFilter) -> Self {
        let can_manage = session.can(Permission::ManageLoans);
        let mut loans = ViewModel::new(NO_LOANS);
        let ticket = loans.begin_fetch();
        let fetched = match filter {
            LoanFilter::All => services.loans.list().await,
            LoanFilter::Active => services.loans.active().await,
            LoanFilter::Late => services.loans.late().await,
            LoanFilter::ClosedUnpaid => services.loans.closed_unpaid().await,
        };
        let rows = fetched.map(|loans| {
            loans
                .into_iter()
                .map(|loan| LoanRow {
                    status_label: loan.status.label().to_string(),
                    returnable: can_manage && loan.is_returnable(),
                    loan,
                })
                .collect()
        });
        loans.apply(ticket, rows);

        Self {
            filter,
            loans,
            can_register: can_manage,
        }
    }
}

/// Options offered by the new-loan form. Only ACTIVE clients and AVAILABLE
/// tools are selectable.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanPicker {
    pub clients: Vec<Client>,
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl LoanPicker {
    pub async fn load(services: &Services) -> AppResult<Self> {
        let (clients, tools) = tokio::try_join!(services.clients.list(), services.tools.list())?;
        Ok(Self::from_lists(clients, tools))
    }

    pub fn from_lists(clients: Vec<Client>, tools: Vec<Tool>) -> Self {
        let clients: Vec<Client> = clients.into_iter().filter(Client::is_active).collect();
        let tools: Vec<Tool> = tools
            .into_iter()
            .filter(|t| t.status == ToolStatus::Available)
            .collect();

        let notification = if clients.is_empty() || tools.is_empty() {
            Some(Notification::info(
                "A loan needs at least one active client and one available tool.",
            ))
        } else {
            None
        };

        Self {
            clients,
            tools,
            notification,
        }
    }
}

pub async fn add_loan(services: &Services, session: &Session, form: &LoanForm) -> AppResult<FormOutcome> {
    guard::require(session, Permission::ManageLoans)?;
    // Unfiltered, so a client restricted since the picker loaded is named as such
    let (clients, tools) = tokio::try_join!(services.clients.list(), services.tools.list())?;
    let body = form.submission(&clients, &tools)?;
    services.loans.create(&body).await?;
    tracing::info!(client_id = body.client_id, tool_id = body.tool_id, "Loan registered");
    Ok(FormOutcome::redirect("Loan registered.", Route::Loans.path()))
}

/// Return form for an open loan
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnPage {
    pub loan: Loan,
    /// Prefilled with today's date
    pub return_date: NaiveDate,
}

/// Answer when opening the return form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReturnPageResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<ReturnPage>,
    /// Set when the loan cannot be returned; the shell goes back to the list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<FormOutcome>,
}

impl ReturnPage {
    pub async fn load(services: &Services, id: i64) -> AppResult<ReturnPageResponse> {
        let loan = services.loans.get(id).await?;
        if !loan.is_returnable() {
            return Ok(ReturnPageResponse {
                page: None,
                redirect: Some(FormOutcome {
                    notification: Notification::warning("This loan is not in a state that allows a return."),
                    redirect: Route::Loans.path(),
                }),
            });
        }
        Ok(ReturnPageResponse {
            page: Some(ReturnPage {
                loan,
                return_date: Local::now().date_naive(),
            }),
            redirect: None,
        })
    }
}

pub async fn return_loan(
    services: &Services,
    session: &Session,
    id: i64,
    form: &ReturnForm,
) -> AppResult<FormOutcome> {
    guard::require(session, Permission::ManageLoans)?;
    let loan = services.loans.get(id).await?;
    if !loan.is_returnable() {
        return Err(AppError::BadRequest(format!(
            "Loan #{} is {} and cannot be returned",
            id,
            loan.status.label()
        )));
    }

    let body = form.submission(&loan)?;
    services.loans.return_loan(id, &body).await?;
    tracing::info!(loan_id = id, damaged = body.damaged, irreparable = body.irreparable, "Loan returned");
    Ok(FormOutcome::redirect("Return registered.", Route::Loans.path()))
}
