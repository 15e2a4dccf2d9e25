//! Kardex endpoint

use axum::{extract::Query, Json};

use super::Viewer;
use crate::{error::AppResult, guard::Route, models::KardexForm, views::kardex::KardexPage};

/// Search movements by tool id or date range
#[utoipa::path(
    get,
    path = "/kardex",
    tag = "kardex",
    security(("bearer_auth" = [])),
    params(
        ("toolId" = Option<String>, Query, description = "Tool ID"),
        ("start" = Option<String>, Query, description = "First day (YYYY-MM-DD)"),
        ("end" = Option<String>, Query, description = "Last day (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Movements", body = KardexPage),
        (status = 422, description = "Incomplete search", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_kardex(viewer: Viewer, Query(form): Query<KardexForm>) -> AppResult<Json<KardexPage>> {
    let session = viewer.enter(Route::Kardex)?;
    Ok(Json(KardexPage::search(&viewer.services, session, &form).await?))
}
