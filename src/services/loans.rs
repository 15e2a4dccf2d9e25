//! Loan endpoints

use std::sync::Arc;

use crate::{
    error::AppResult,
    gateway::{ApiClient, ApiRequest},
    models::{CreateLoan, Loan, ReturnLoan},
};

#[derive(Clone)]
pub struct LoansService {
    api: Arc<ApiClient>,
}

impl LoansService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        self.api.get("/loans").await
    }

    pub async fn get(&self, id: i64) -> AppResult<Loan> {
        self.api.get(format!("/loans/{}", id)).await
    }

    pub async fn create(&self, loan: &CreateLoan) -> AppResult<()> {
        self.api.post_json("/loans", loan).await
    }

    pub async fn return_loan(&self, id: i64, body: &ReturnLoan) -> AppResult<()> {
        self.api.put_json(format!("/loans/{}/return", id), body).await
    }

    /// Settle the penalty of a received loan
    pub async fn mark_paid(&self, id: i64) -> AppResult<()> {
        self.api.execute(ApiRequest::patch(format!("/loans/{}/pay", id))).await
    }

    pub async fn unpaid_by_client(&self, client_id: i64) -> AppResult<Vec<Loan>> {
        self.api.get(format!("/loans/client/{}/unpaid", client_id)).await
    }

    pub async fn active(&self) -> AppResult<Vec<Loan>> {
        self.api.get("/loans/active").await
    }

    pub async fn late(&self) -> AppResult<Vec<Loan>> {
        self.api.get("/loans/late").await
    }

    /// Returned loans whose penalty is still outstanding
    pub async fn closed_unpaid(&self) -> AppResult<Vec<Loan>> {
        self.api.get("/loans/closed/unpaid").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::expect_one;
    use reqwest::{Method, StatusCode};

    #[tokio::test]
    async fn pay_uses_patch() {
        let api = expect_one(Method::PATCH, "/loans/8/pay", StatusCode::OK, "{}");
        LoansService::new(api).mark_paid(8).await.unwrap();
    }

    #[tokio::test]
    async fn unpaid_by_client_path() {
        let api = expect_one(Method::GET, "/loans/client/2/unpaid", StatusCode::OK, "[]");
        assert!(LoansService::new(api).unpaid_by_client(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_return_surfaces_backend_message() {
        let api = expect_one(
            Method::PUT,
            "/loans/8/return",
            StatusCode::BAD_REQUEST,
            r#"{"message":"Loan already returned"}"#,
        );
        let body = ReturnLoan {
            tool_id: 2,
            damaged: false,
            irreparable: false,
            return_date: "2024-03-12".parse().unwrap(),
        };
        let err = LoansService::new(api).return_loan(8, &body).await.unwrap_err();
        assert_eq!(err.notification_text(), "Loan already returned");
    }
}
