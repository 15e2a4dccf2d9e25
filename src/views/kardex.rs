//! Kardex viewer

use serde::Serialize;
use utoipa::ToSchema;

use super::ViewModel;
use crate::{
    auth::{Permission, Session},
    error::AppResult,
    guard,
    models::{KardexForm, KardexMovement},
    services::Services,
};

const NO_MOVEMENTS: &str = "No movements found for the specified criteria.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KardexPage {
    pub movements: ViewModel<KardexMovement>,
}

impl KardexPage {
    /// Run a search; incomplete input is rejected before any backend call
    pub async fn search(services: &Services, session: &Session, form: &KardexForm) -> AppResult<Self> {
        guard::require(session, Permission::ViewKardex)?;
        let query = form.query()?;

        let mut movements = ViewModel::new(NO_MOVEMENTS);
        movements.load(services.kardex.search(query)).await;
        Ok(Self { movements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        services::test_support::{services, session},
        views::ViewState,
    };
    use reqwest::{Method, StatusCode};

    #[tokio::test]
    async fn tool_search_shows_empty_state() {
        let services = services(&[(Method::GET, "/kardex/tool/7", StatusCode::OK, "[]")]);
        let user = session(&["USER"]);

        let page = KardexPage::search(&services, &user, &KardexForm::by_tool("7")).await.unwrap();

        assert_eq!(page.movements.state, ViewState::Empty);
        assert_eq!(page.movements.empty_message.as_deref(), Some(NO_MOVEMENTS));
    }

    #[tokio::test]
    async fn non_numeric_tool_id_is_rejected() {
        let services = services(&[]);
        let user = session(&["USER"]);

        let result = KardexPage::search(&services, &user, &KardexForm::by_tool("drill")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
