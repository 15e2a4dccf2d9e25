//! Client pages and debt settlement

use serde::Serialize;
use utoipa::ToSchema;

use super::{ActionResponse, ConfirmRequest, FormOutcome, Notification, PendingAction, ViewModel};
use crate::{
    auth::{Permission, Session},
    error::AppResult,
    guard::{self, Route},
    models::{Client, ClientForm, ClientStatus, EditClientForm, Loan},
    services::Services,
};

const NO_CLIENTS: &str = "No clients registered.";
const NO_DEBTS: &str = "No pending debts (status RECEIVED) for this client.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClientActions {
    pub can_add: bool,
    pub can_edit: bool,
    /// Restrict and reactivate
    pub can_change_status: bool,
    pub can_settle_debts: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClientsPage {
    pub clients: ViewModel<Client>,
    pub actions: ClientActions,
}

impl ClientsPage {
    pub async fn load(services: &Services, session: &Session) -> Self {
        let mut clients = ViewModel::new(NO_CLIENTS);
        clients.load(services.clients.list()).await;
        Self {
            clients,
            actions: ClientActions {
                can_add: session.can(Permission::ManageClients),
                can_edit: session.can(Permission::ManageClients),
                can_change_status: session.can(Permission::ManageClientStatus),
                can_settle_debts: session.can(Permission::SettleDebts),
            },
        }
    }
}

/// Unpaid received loans of one client
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DebtsPage {
    pub client_id: i64,
    pub debts: ViewModel<Loan>,
}

impl DebtsPage {
    pub async fn load(services: &Services, client_id: i64) -> Self {
        let mut debts = ViewModel::new(NO_DEBTS);
        debts.load(services.loans.unpaid_by_client(client_id)).await;
        Self { client_id, debts }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditClientPage {
    pub client: Client,
    pub form: EditClientForm,
}

impl EditClientPage {
    pub async fn load(services: &Services, id: i64) -> AppResult<Self> {
        let client = services.clients.get(id).await?;
        let form = EditClientForm::from_client(&client);
        Ok(Self { client, form })
    }
}

pub async fn add_client(services: &Services, session: &Session, form: &ClientForm) -> AppResult<FormOutcome> {
    guard::require(session, Permission::ManageClients)?;
    let body = form.submission()?;
    services.clients.create(&body).await?;
    tracing::info!(rut = %body.rut, "Client registered");
    Ok(FormOutcome::redirect(
        format!("Client {} registered.", body.name),
        Route::Clients.path(),
    ))
}

pub async fn edit_client(
    services: &Services,
    session: &Session,
    id: i64,
    form: &EditClientForm,
) -> AppResult<FormOutcome> {
    guard::require(session, Permission::ManageClients)?;
    let body = form.submission()?;
    services.clients.update(id, &body).await?;
    Ok(FormOutcome::redirect("Client updated.", Route::Clients.path()))
}

pub async fn restrict(
    services: &Services,
    session: &Session,
    id: i64,
    request: ConfirmRequest,
) -> AppResult<ActionResponse<ClientsPage>> {
    guard::require(session, Permission::ManageClientStatus)?;
    if let Some(prompt) = ActionResponse::gate(request, &PendingAction::RestrictClient { id }) {
        return Ok(prompt);
    }

    services.clients.update_status(id, ClientStatus::Restricted).await?;
    tracing::info!(client_id = id, "Client restricted");

    let page = ClientsPage::load(services, session).await;
    Ok(ActionResponse::done(
        Notification::success(format!("Client #{} restricted.", id)),
        page,
    ))
}

/// Single request; the backend decides whether the client is reactivated
/// and the page reports the status it answered with.
pub async fn attempt_reactivation(
    services: &Services,
    session: &Session,
    id: i64,
    request: ConfirmRequest,
) -> AppResult<ActionResponse<ClientsPage>> {
    guard::require(session, Permission::ManageClientStatus)?;
    if let Some(prompt) = ActionResponse::gate(request, &PendingAction::ReactivateClient { id }) {
        return Ok(prompt);
    }

    let client = services.clients.attempt_reactivation(id).await?;
    tracing::info!(client_id = id, status = %client.status, "Reactivation attempted");

    let text = format!(
        "Reactivation attempted for {}. Final status: {}.",
        client.name, client.status
    );
    let notification = if client.is_active() {
        Notification::success(text)
    } else {
        Notification::warning(text)
    };

    let page = ClientsPage::load(services, session).await;
    Ok(ActionResponse::done(notification, page))
}

pub async fn pay_debt(
    services: &Services,
    session: &Session,
    client_id: i64,
    loan_id: i64,
    request: ConfirmRequest,
) -> AppResult<ActionResponse<DebtsPage>> {
    guard::require(session, Permission::SettleDebts)?;
    if let Some(prompt) = ActionResponse::gate(request, &PendingAction::PayDebt { loan_id }) {
        return Ok(prompt);
    }

    services.loans.mark_paid(loan_id).await?;
    tracing::info!(client_id, loan_id, "Debt settled");

    let page = DebtsPage::load(services, client_id).await;
    Ok(ActionResponse::done(
        Notification::success(format!("Payment registered for loan #{}.", loan_id)),
        page,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        services::test_support::{services, session},
        views::Severity,
    };
    use reqwest::{Method, StatusCode};

    const CONFIRMED: ConfirmRequest = ConfirmRequest { confirmed: true };

    #[tokio::test]
    async fn restriction_needs_confirmation() {
        let services = services(&[]);
        let admin = session(&["ADMIN"]);

        let response = restrict(&services, &admin, 3, ConfirmRequest::default()).await.unwrap();
        assert_eq!(
            response.confirmation.unwrap().prompt,
            "Change the status of client #3 to RESTRICTED?"
        );
    }

    #[tokio::test]
    async fn user_cannot_change_client_status() {
        let services = services(&[]);
        let user = session(&["USER"]);

        let result = restrict(&services, &user, 3, CONFIRMED).await;
        assert!(matches!(result, Err(AppError::Forbidden { .. })));

        let result = attempt_reactivation(&services, &user, 3, CONFIRMED).await;
        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn reactivation_reports_backend_status() {
        let services = services(&[
            (
                Method::PATCH,
                "/clients/3/activate",
                StatusCode::OK,
                r#"{"id":3,"rut":"12.345.678-9","name":"Ana","phone":"912345678","email":"ana@toolrent.cl","status":"RESTRICTED"}"#,
            ),
            (Method::GET, "/clients", StatusCode::OK, "[]"),
        ]);
        let admin = session(&["ADMIN"]);

        let response = attempt_reactivation(&services, &admin, 3, CONFIRMED).await.unwrap();

        let notification = response.notification.unwrap();
        assert_eq!(notification.severity, Severity::Warning);
        assert!(notification.text.contains("RESTRICTED"), "{}", notification.text);
        let page = response.page.unwrap();
        assert!(page.actions.can_change_status);
        assert!(page.actions.can_settle_debts);
    }

    #[tokio::test]
    async fn user_may_settle_debts() {
        let services = services(&[
            (Method::PATCH, "/loans/8/pay", StatusCode::OK, ""),
            (Method::GET, "/loans/client/3/unpaid", StatusCode::OK, "[]"),
        ]);
        let user = session(&["USER"]);

        let response = pay_debt(&services, &user, 3, 8, CONFIRMED).await.unwrap();
        assert!(response.page.is_some());
    }

    #[tokio::test]
    async fn paying_a_debt_reloads_the_client_debts() {
        let services = services(&[
            (Method::PATCH, "/loans/8/pay", StatusCode::OK, ""),
            (Method::GET, "/loans/client/3/unpaid", StatusCode::OK, "[]"),
        ]);
        let admin = session(&["ADMIN"]);

        let response = pay_debt(&services, &admin, 3, 8, CONFIRMED).await.unwrap();

        let page = response.page.unwrap();
        assert_eq!(page.client_id, 3);
        assert_eq!(page.debts.empty_message.as_deref(), Some(NO_DEBTS));
    }

    #[tokio::test]
    async fn user_cannot_edit_clients() {
        let services = services(&[]);
        let user = session(&["USER"]);
        let form = EditClientForm {
            name: "Ana".to_string(),
            phone: "912345678".to_string(),
            email: "ana@toolrent.cl".to_string(),
        };

        let result = edit_client(&services, &user, 3, &form).await;
        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }
}
