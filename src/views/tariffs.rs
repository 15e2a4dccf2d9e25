//! Tariff editor

use serde::Serialize;
use utoipa::ToSchema;

use super::Notification;
use crate::{
    auth::{Permission, Session},
    error::AppResult,
    guard,
    models::{Tariff, TariffForm},
    services::Services,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TariffPage {
    pub tariff: Tariff,
    pub form: TariffForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl TariffPage {
    pub async fn load(services: &Services) -> AppResult<Self> {
        let tariff = services.tariffs.get().await?;
        Ok(Self {
            form: TariffForm::from_tariff(&tariff),
            tariff,
            notification: None,
        })
    }
}

/// Save and answer with the stored values
pub async fn update_tariff(services: &Services, session: &Session, form: &TariffForm) -> AppResult<TariffPage> {
    guard::require(session, Permission::ManageTariffs)?;
    let tariff = form.submission()?;
    services.tariffs.update(&tariff).await?;
    tracing::info!(?tariff, "Tariffs updated");

    let mut page = TariffPage::load(services).await?;
    page.notification = Some(Notification::success("Tariffs updated."));
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        services::test_support::{services, session},
    };
    use reqwest::{Method, StatusCode};

    #[tokio::test]
    async fn saved_tariffs_are_reloaded() {
        let services = services(&[
            (Method::PUT, "/tariffs", StatusCode::OK, ""),
            (
                Method::GET,
                "/tariffs",
                StatusCode::OK,
                r#"{"dailyRentFee":2500,"dailyLateFee":1000,"repairFee":8000}"#,
            ),
        ]);
        let admin = session(&["ADMIN"]);
        let form = TariffForm {
            daily_rent_fee: Some(2500),
            daily_late_fee: Some(1000),
            repair_fee: Some(8000),
        };

        let page = update_tariff(&services, &admin, &form).await.unwrap();

        assert_eq!(page.tariff.daily_rent_fee, 2500);
        assert!(page.notification.is_some());
    }

    #[tokio::test]
    async fn negative_fee_never_reaches_backend() {
        let services = services(&[]);
        let admin = session(&["ADMIN"]);
        let form = TariffForm {
            daily_rent_fee: Some(-5),
            daily_late_fee: Some(1000),
            repair_fee: Some(8000),
        };

        let result = update_tariff(&services, &admin, &form).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
