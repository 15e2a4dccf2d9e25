//! Loan endpoints

use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::Viewer;
use crate::{
    error::AppResult,
    guard::Route,
    models::{LoanForm, ReturnForm},
    views::{
        loans::{self, LoanFilter, LoanPicker, LoansPage, ReturnPage, ReturnPageResponse},
        FormOutcome,
    },
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LoanListQuery {
    /// all, active, late or closed_unpaid
    #[serde(default)]
    pub filter: LoanFilter,
}

#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanListQuery),
    responses(
        (status = 200, description = "Loan list", body = LoansPage)
    )
)]
pub async fn list_loans(viewer: Viewer, Query(query): Query<LoanListQuery>) -> AppResult<Json<LoansPage>> {
    let session = viewer.enter(Route::Loans)?;
    Ok(Json(LoansPage::load(&viewer.services, session, query.filter).await))
}

/// Clients and tools selectable in the new-loan form
#[utoipa::path(
    get,
    path = "/loans/new",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active clients and available tools", body = LoanPicker)
    )
)]
pub async fn loan_picker(viewer: Viewer) -> AppResult<Json<LoanPicker>> {
    viewer.enter(Route::AddLoan)?;
    Ok(Json(LoanPicker::load(&viewer.services).await?))
}

#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = LoanForm,
    responses(
        (status = 200, description = "Loan registered", body = FormOutcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_loan(viewer: Viewer, Json(form): Json<LoanForm>) -> AppResult<Json<FormOutcome>> {
    let session = viewer.enter(Route::AddLoan)?;
    Ok(Json(loans::add_loan(&viewer.services, session, &form).await?))
}

/// Return form; loans that are not ACTIVE or LATE answer with a redirect
#[utoipa::path(
    get,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Return form or redirect", body = ReturnPageResponse)
    )
)]
pub async fn return_form(viewer: Viewer, Path(id): Path<i64>) -> AppResult<Json<ReturnPageResponse>> {
    viewer.enter(Route::ReturnLoan(id))?;
    Ok(Json(ReturnPage::load(&viewer.services, id).await?))
}

#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Loan ID")),
    request_body = ReturnForm,
    responses(
        (status = 200, description = "Return registered", body = FormOutcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_loan(
    viewer: Viewer,
    Path(id): Path<i64>,
    Json(form): Json<ReturnForm>,
) -> AppResult<Json<FormOutcome>> {
    let session = viewer.enter(Route::ReturnLoan(id))?;
    Ok(Json(loans::return_loan(&viewer.services, session, id, &form).await?))
}
