//! Report endpoint

use axum::{extract::Query, Json};

use super::Viewer;
use crate::{error::AppResult, guard::Route, models::ReportForm, views::reports::ReportPage};

#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(
        ("kind" = Option<crate::models::ReportKind>, Query, description = "Report to run, LATE_CLIENTS by default"),
        ("from" = Option<String>, Query, description = "First day (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Last day (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Report rows", body = ReportPage),
        (status = 422, description = "Incomplete date range", body = crate::error::ErrorResponse)
    )
)]
pub async fn run_report(viewer: Viewer, Query(form): Query<ReportForm>) -> AppResult<Json<ReportPage>> {
    let session = viewer.enter(Route::Reports)?;
    Ok(Json(ReportPage::run(&viewer.services, session, &form).await?))
}
