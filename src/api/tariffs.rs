//! Tariff endpoints

use axum::Json;

use super::Viewer;
use crate::{
    error::AppResult,
    guard::Route,
    models::TariffForm,
    views::tariffs::{self, TariffPage},
};

#[utoipa::path(
    get,
    path = "/tariffs",
    tag = "tariffs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current tariffs", body = TariffPage),
        (status = 403, description = "Requires ADMIN", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_tariffs(viewer: Viewer) -> AppResult<Json<TariffPage>> {
    viewer.enter(Route::Tariffs)?;
    Ok(Json(TariffPage::load(&viewer.services).await?))
}

#[utoipa::path(
    put,
    path = "/tariffs",
    tag = "tariffs",
    security(("bearer_auth" = [])),
    request_body = TariffForm,
    responses(
        (status = 200, description = "Tariffs saved", body = TariffPage),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_tariffs(viewer: Viewer, Json(form): Json<TariffForm>) -> AppResult<Json<TariffPage>> {
    let session = viewer.enter(Route::Tariffs)?;
    Ok(Json(tariffs::update_tariff(&viewer.services, session, &form).await?))
}
