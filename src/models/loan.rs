//! Loan model, loan creation and return forms

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{client::Client, enums::LoanStatus, tool::Tool, ToolStatus};
use crate::{
    error::{AppError, AppResult},
    validation::{FieldErrors, FormReport},
};

/// Loan with its client and tool embedded. Lateness and penalties are
/// computed by the backend and only displayed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i64,
    pub client: Client,
    pub tool: Tool,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    #[serde(default)]
    pub total_penalty: f64,
}

impl Loan {
    pub fn is_returnable(&self) -> bool {
        self.status.is_returnable()
    }

    pub fn has_debt(&self) -> bool {
        self.total_penalty > 0.0
    }
}

/// Body of `POST /loans`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoan {
    pub client_id: i64,
    pub tool_id: i64,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanForm {
    pub client_id: Option<i64>,
    pub tool_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

impl LoanForm {
    /// Check the form against the known clients and tools: only ACTIVE
    /// clients and AVAILABLE tools can take part in a loan.
    pub fn report(&self, clients: &[Client], tools: &[Tool]) -> FormReport {
        let mut errors = FieldErrors::new();

        match self.client_id {
            None => errors.add("clientId", "Select a client"),
            Some(id) => match clients.iter().find(|c| c.id == id) {
                None => errors.add("clientId", "Unknown client"),
                Some(client) if !client.is_active() => {
                    errors.add("clientId", "Client is restricted and cannot take loans")
                }
                Some(_) => {}
            },
        }

        match self.tool_id {
            None => errors.add("toolId", "Select a tool"),
            Some(id) => match tools.iter().find(|t| t.id == id) {
                None => errors.add("toolId", "Unknown tool"),
                Some(tool) if tool.status != ToolStatus::Available => {
                    errors.add("toolId", format!("Tool is {} and cannot be loaned", tool.status))
                }
                Some(_) => {}
            },
        }

        if self.start_date.is_none() {
            errors.add("startDate", "Enter a start date");
        }
        if self.due_date.is_none() {
            errors.add("dueDate", "Enter a due date");
        }

        FormReport::from_errors(errors)
    }

    pub fn submission(&self, clients: &[Client], tools: &[Tool]) -> AppResult<CreateLoan> {
        self.report(clients, tools).into_result()?;
        match (self.client_id, self.tool_id, self.start_date, self.due_date) {
            (Some(client_id), Some(tool_id), Some(start_date), Some(due_date)) => Ok(CreateLoan {
                client_id,
                tool_id,
                start_date,
                due_date,
            }),
            _ => Err(AppError::Validation(FieldErrors::new())),
        }
    }
}

/// Body of `PUT /loans/{id}/return`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLoan {
    pub tool_id: i64,
    pub damaged: bool,
    pub irreparable: bool,
    pub return_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ReturnForm {
    pub return_date: Option<NaiveDate>,
    pub damaged: bool,
    pub irreparable: bool,
}

impl ReturnForm {
    /// Form opened on `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            return_date: Some(today),
            ..Self::default()
        }
    }

    /// Setting one damage flag clears the other
    pub fn toggle_damaged(&mut self, on: bool) {
        self.damaged = on;
        if on {
            self.irreparable = false;
        }
    }

    pub fn toggle_irreparable(&mut self, on: bool) {
        self.irreparable = on;
        if on {
            self.damaged = false;
        }
    }

    /// Check the form against the start date of the loan being returned
    pub fn report(&self, loan_start: NaiveDate) -> FormReport {
        let mut errors = FieldErrors::new();

        match self.return_date {
            None => errors.add("returnDate", "Enter a return date"),
            Some(date) if date < loan_start => errors.add(
                "returnDate",
                format!("Return date cannot be before the loan start ({})", loan_start),
            ),
            Some(_) => {}
        }

        if self.damaged && self.irreparable {
            errors.add("irreparable", "A tool cannot be both damaged and irreparable");
        }

        FormReport::from_errors(errors)
    }

    pub fn submission(&self, loan: &Loan) -> AppResult<ReturnLoan> {
        self.report(loan.start_date).into_result()?;
        let Some(return_date) = self.return_date else {
            return Err(AppError::Validation(FieldErrors::new()));
        };
        Ok(ReturnLoan {
            tool_id: loan.tool.id,
            damaged: self.damaged,
            irreparable: self.irreparable,
            return_date,
        })
    }
}
