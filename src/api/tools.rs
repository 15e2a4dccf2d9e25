//! Tool inventory endpoints

use axum::{extract::Path, Json};

use super::Viewer;
use crate::{
    error::AppResult,
    guard::Route,
    models::{EditToolForm, ToolForm},
    views::{
        tools::{self, EditToolPage, StockAdjustmentRequest, ToolsPage},
        ActionResponse, ConfirmRequest, FormOutcome,
    },
};

/// Tool list page
#[utoipa::path(
    get,
    path = "/tools",
    tag = "tools",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active and decommissioned tools", body = ToolsPage),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_tools(viewer: Viewer) -> AppResult<Json<ToolsPage>> {
    let session = viewer.enter(Route::Tools)?;
    Ok(Json(ToolsPage::load(&viewer.services, session).await))
}

/// Register a tool
#[utoipa::path(
    post,
    path = "/tools",
    tag = "tools",
    security(("bearer_auth" = [])),
    request_body = ToolForm,
    responses(
        (status = 200, description = "Tool registered", body = FormOutcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_tool(viewer: Viewer, Json(form): Json<ToolForm>) -> AppResult<Json<FormOutcome>> {
    let session = viewer.enter(Route::AddTool)?;
    Ok(Json(tools::add_tool(&viewer.services, session, &form).await?))
}

/// Edit page for one tool
#[utoipa::path(
    get,
    path = "/tools/{id}",
    tag = "tools",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tool ID")),
    responses(
        (status = 200, description = "Tool with prefilled form", body = EditToolPage),
        (status = 403, description = "Requires ADMIN", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_tool(viewer: Viewer, Path(id): Path<i64>) -> AppResult<Json<EditToolPage>> {
    viewer.enter(Route::EditTool(id))?;
    Ok(Json(EditToolPage::load(&viewer.services, id).await?))
}

/// Update name, category and replacement value
#[utoipa::path(
    put,
    path = "/tools/{id}",
    tag = "tools",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tool ID")),
    request_body = EditToolForm,
    responses(
        (status = 200, description = "Tool updated", body = FormOutcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_tool(
    viewer: Viewer,
    Path(id): Path<i64>,
    Json(form): Json<EditToolForm>,
) -> AppResult<Json<FormOutcome>> {
    let session = viewer.enter(Route::EditTool(id))?;
    Ok(Json(tools::edit_tool(&viewer.services, session, id, &form).await?))
}

/// Increase or decrease stock, after confirmation
#[utoipa::path(
    post,
    path = "/tools/{id}/stock",
    tag = "tools",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tool ID")),
    request_body = StockAdjustmentRequest,
    responses(
        (status = 200, description = "Confirmation prompt, or the reloaded tool list", body = ActionResponse<ToolsPage>)
    )
)]
pub async fn adjust_stock(
    viewer: Viewer,
    Path(id): Path<i64>,
    Json(request): Json<StockAdjustmentRequest>,
) -> AppResult<Json<ActionResponse<ToolsPage>>> {
    let session = viewer.session()?;
    Ok(Json(tools::adjust_stock(&viewer.services, session, id, &request).await?))
}

/// Retire a tool permanently, after confirmation
#[utoipa::path(
    post,
    path = "/tools/{id}/decommission",
    tag = "tools",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tool ID")),
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Confirmation prompt, or the reloaded tool list", body = ActionResponse<ToolsPage>)
    )
)]
pub async fn decommission_tool(
    viewer: Viewer,
    Path(id): Path<i64>,
    Json(request): Json<ConfirmRequest>,
) -> AppResult<Json<ActionResponse<ToolsPage>>> {
    let session = viewer.session()?;
    Ok(Json(tools::decommission(&viewer.services, session, id, request).await?))
}
