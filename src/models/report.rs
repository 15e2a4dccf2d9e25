//! Report selection and rows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{client::Client, loan::Loan, tool::Tool};
use crate::{
    error::{AppError, AppResult},
    validation::{FieldErrors, FormReport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    ActiveLoans,
    LateLoans,
    #[default]
    LateClients,
    TopTools,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::ActiveLoans => "Active loans",
            ReportKind::LateLoans => "Late loans",
            ReportKind::LateClients => "Clients with late loans",
            ReportKind::TopTools => "Most loaned tools",
        }
    }

    pub fn requires_range(&self) -> bool {
        matches!(self, ReportKind::TopTools)
    }
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// `from=..&to=..` query fragment
    pub fn query(&self) -> String {
        format!("from={}&to={}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportForm {
    pub kind: ReportKind,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Validated report request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    pub kind: ReportKind,
    pub range: Option<DateRange>,
}

impl ReportForm {
    fn check(&self) -> Result<ReportQuery, FieldErrors> {
        let range = match (self.from, self.to) {
            (Some(from), Some(to)) if to < from => {
                return Err(FieldErrors::new().with("to", "End date cannot be before start date"))
            }
            (Some(from), Some(to)) => Some(DateRange { from, to }),
            (None, None) if self.kind.requires_range() => {
                return Err(FieldErrors::new()
                    .with("from", "Date range is mandatory for the top tools report"))
            }
            (None, None) => None,
            (Some(_), None) => {
                return Err(FieldErrors::new().with("to", "Both start and end dates are required"))
            }
            (None, Some(_)) => {
                return Err(FieldErrors::new().with("from", "Both start and end dates are required"))
            }
        };
        Ok(ReportQuery {
            kind: self.kind,
            range,
        })
    }

    pub fn report(&self) -> FormReport {
        FormReport::from_errors(self.check().err().unwrap_or_default())
    }

    pub fn query(&self) -> AppResult<ReportQuery> {
        self.check().map_err(AppError::Validation)
    }
}

/// Most-loaned tool; the backend sends `[tool, count]` pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(from = "(Tool, i64)")]
pub struct TopTool {
    pub tool: Tool,
    pub loans: i64,
}

impl From<(Tool, i64)> for TopTool {
    fn from((tool, loans): (Tool, i64)) -> Self {
        Self { tool, loans }
    }
}

/// Rows of whichever report was run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "camelCase")]
pub enum ReportRows {
    Loans(Vec<Loan>),
    Clients(Vec<Client>),
    TopTools(Vec<TopTool>),
}

impl ReportRows {
    pub fn is_empty(&self) -> bool {
        match self {
            ReportRows::Loans(rows) => rows.is_empty(),
            ReportRows::Clients(rows) => rows.is_empty(),
            ReportRows::TopTools(rows) => rows.is_empty(),
        }
    }
}
