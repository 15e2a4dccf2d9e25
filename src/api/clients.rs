//! Client endpoints

use axum::{extract::Path, Json};

use super::Viewer;
use crate::{
    auth::Permission,
    error::AppResult,
    guard::{self, Route},
    models::{ClientForm, EditClientForm},
    views::{
        clients::{self, ClientsPage, DebtsPage, EditClientPage},
        ActionResponse, ConfirmRequest, FormOutcome,
    },
};

#[utoipa::path(
    get,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Client list", body = ClientsPage),
        (status = 403, description = "Requires ADMIN", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_clients(viewer: Viewer) -> AppResult<Json<ClientsPage>> {
    let session = viewer.enter(Route::Clients)?;
    Ok(Json(ClientsPage::load(&viewer.services, session).await))
}

#[utoipa::path(
    post,
    path = "/clients",
    tag = "clients",
    security(("bearer_auth" = [])),
    request_body = ClientForm,
    responses(
        (status = 200, description = "Client registered", body = FormOutcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_client(viewer: Viewer, Json(form): Json<ClientForm>) -> AppResult<Json<FormOutcome>> {
    let session = viewer.enter(Route::AddClient)?;
    Ok(Json(clients::add_client(&viewer.services, session, &form).await?))
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client with prefilled form", body = EditClientPage)
    )
)]
pub async fn get_client(viewer: Viewer, Path(id): Path<i64>) -> AppResult<Json<EditClientPage>> {
    viewer.enter(Route::EditClient(id))?;
    Ok(Json(EditClientPage::load(&viewer.services, id).await?))
}

/// Update contact data; the RUT cannot change
#[utoipa::path(
    put,
    path = "/clients/{id}",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Client ID")),
    request_body = EditClientForm,
    responses(
        (status = 200, description = "Client updated", body = FormOutcome),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_client(
    viewer: Viewer,
    Path(id): Path<i64>,
    Json(form): Json<EditClientForm>,
) -> AppResult<Json<FormOutcome>> {
    let session = viewer.enter(Route::EditClient(id))?;
    Ok(Json(clients::edit_client(&viewer.services, session, id, &form).await?))
}

#[utoipa::path(
    post,
    path = "/clients/{id}/restrict",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Client ID")),
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Confirmation prompt, or the reloaded client list", body = ActionResponse<ClientsPage>)
    )
)]
pub async fn restrict_client(
    viewer: Viewer,
    Path(id): Path<i64>,
    Json(request): Json<ConfirmRequest>,
) -> AppResult<Json<ActionResponse<ClientsPage>>> {
    let session = viewer.session()?;
    Ok(Json(clients::restrict(&viewer.services, session, id, request).await?))
}

/// Ask the backend to reactivate a restricted client
#[utoipa::path(
    post,
    path = "/clients/{id}/reactivate",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Client ID")),
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Confirmation prompt, or the resulting status and client list", body = ActionResponse<ClientsPage>)
    )
)]
pub async fn reactivate_client(
    viewer: Viewer,
    Path(id): Path<i64>,
    Json(request): Json<ConfirmRequest>,
) -> AppResult<Json<ActionResponse<ClientsPage>>> {
    let session = viewer.session()?;
    Ok(Json(
        clients::attempt_reactivation(&viewer.services, session, id, request).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/clients/{id}/debts",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Unpaid received loans", body = DebtsPage)
    )
)]
pub async fn list_debts(viewer: Viewer, Path(id): Path<i64>) -> AppResult<Json<DebtsPage>> {
    guard::require(viewer.session()?, Permission::SettleDebts)?;
    Ok(Json(DebtsPage::load(&viewer.services, id).await))
}

#[utoipa::path(
    post,
    path = "/clients/{id}/debts/{loan_id}/pay",
    tag = "clients",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Client ID"),
        ("loan_id" = i64, Path, description = "Loan ID")
    ),
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Confirmation prompt, or the reloaded debts", body = ActionResponse<DebtsPage>)
    )
)]
pub async fn pay_debt(
    viewer: Viewer,
    Path((id, loan_id)): Path<(i64, i64)>,
    Json(request): Json<ConfirmRequest>,
) -> AppResult<Json<ActionResponse<DebtsPage>>> {
    let session = viewer.session()?;
    Ok(Json(
        clients::pay_debt(&viewer.services, session, id, loan_id, request).await?,
    ))
}
