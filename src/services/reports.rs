//! Report endpoints

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    gateway::ApiClient,
    models::{Client, DateRange, Loan, LoanStatus, ReportKind, ReportQuery, ReportRows, TopTool},
    validation::FieldErrors,
};

#[derive(Clone)]
pub struct ReportsService {
    api: Arc<ApiClient>,
}

impl ReportsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn loans_by_status(&self, status: LoanStatus, range: Option<DateRange>) -> AppResult<Vec<Loan>> {
        let mut path = format!("/reports/loans?status={}", status.as_str());
        if let Some(range) = range {
            path.push('&');
            path.push_str(&range.query());
        }
        self.api.get(path).await
    }

    pub async fn late_clients(&self, range: Option<DateRange>) -> AppResult<Vec<Client>> {
        let path = match range {
            Some(range) => format!("/reports/clients/late?{}", range.query()),
            None => "/reports/clients/late".to_string(),
        };
        self.api.get(path).await
    }

    pub async fn top_tools(&self, range: DateRange) -> AppResult<Vec<TopTool>> {
        self.api.get(format!("/reports/tools/top?{}", range.query())).await
    }

    /// Run a validated report
    pub async fn run(&self, query: ReportQuery) -> AppResult<ReportRows> {
        match query.kind {
            ReportKind::ActiveLoans => Ok(ReportRows::Loans(
                self.loans_by_status(LoanStatus::Active, query.range).await?,
            )),
            ReportKind::LateLoans => Ok(ReportRows::Loans(
                self.loans_by_status(LoanStatus::Late, query.range).await?,
            )),
            ReportKind::LateClients => Ok(ReportRows::Clients(self.late_clients(query.range).await?)),
            ReportKind::TopTools => {
                let range = query.range.ok_or_else(|| {
                    AppError::Validation(
                        FieldErrors::new().with("from", "Date range is mandatory for the top tools report"),
                    )
                })?;
                Ok(ReportRows::TopTools(self.top_tools(range).await?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::ReportForm, services::test_support::expect_one};
    use reqwest::{Method, StatusCode};

    #[tokio::test]
    async fn active_loans_without_range() {
        let api = expect_one(Method::GET, "/reports/loans?status=ACTIVE", StatusCode::OK, "[]");
        let query = ReportForm {
            kind: ReportKind::ActiveLoans,
            ..ReportForm::default()
        }
        .query()
        .unwrap();
        let rows = ReportsService::new(api).run(query).await.unwrap();
        assert!(matches!(rows, ReportRows::Loans(ref r) if r.is_empty()));
    }

    #[tokio::test]
    async fn top_tools_with_range() {
        let api = expect_one(
            Method::GET,
            "/reports/tools/top?from=2024-01-01&to=2024-01-31",
            StatusCode::OK,
            "[]",
        );
        let query = ReportForm {
            kind: ReportKind::TopTools,
            from: "2024-01-01".parse().ok(),
            to: "2024-01-31".parse().ok(),
        }
        .query()
        .unwrap();
        let rows = ReportsService::new(api).run(query).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn late_clients_with_range() {
        let api = expect_one(
            Method::GET,
            "/reports/clients/late?from=2024-02-01&to=2024-02-29",
            StatusCode::OK,
            "[]",
        );
        let range = DateRange {
            from: "2024-02-01".parse().unwrap(),
            to: "2024-02-29".parse().unwrap(),
        };
        ReportsService::new(api).late_clients(Some(range)).await.unwrap();
    }
}
