//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{clients, forms, health, kardex, loans, reports, session, tariffs, tools};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ToolRent Console API",
        version = "1.0.0",
        description = "Staff console for the ToolRent rental backend"
    ),
    servers(
        (url = "/console", description = "Console pages")
    ),
    modifiers(&BearerAuth),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Session
        session::current_session,
        session::check_route,
        forms::validate_form,
        // Tools
        tools::list_tools,
        tools::create_tool,
        tools::get_tool,
        tools::update_tool,
        tools::adjust_stock,
        tools::decommission_tool,
        // Clients
        clients::list_clients,
        clients::create_client,
        clients::get_client,
        clients::update_client,
        clients::restrict_client,
        clients::reactivate_client,
        clients::list_debts,
        clients::pay_debt,
        // Loans
        loans::list_loans,
        loans::loan_picker,
        loans::create_loan,
        loans::return_form,
        loans::return_loan,
        // Tariffs, kardex, reports
        tariffs::get_tariffs,
        tariffs::update_tariffs,
        kardex::search_kardex,
        reports::run_report,
    ),
    components(
        schemas(
            // Models
            crate::models::Tool,
            crate::models::ToolForm,
            crate::models::EditToolForm,
            crate::models::StockAdjustmentForm,
            crate::models::AdjustmentDirection,
            crate::models::Client,
            crate::models::ClientForm,
            crate::models::EditClientForm,
            crate::models::Loan,
            crate::models::LoanForm,
            crate::models::ReturnForm,
            crate::models::Tariff,
            crate::models::TariffForm,
            crate::models::KardexForm,
            crate::models::KardexMovement,
            crate::models::kardex::MovementUser,
            crate::models::ReportForm,
            crate::models::ReportKind,
            crate::models::DateRange,
            crate::models::TopTool,
            crate::models::ToolStatus,
            crate::models::ClientStatus,
            crate::models::LoanStatus,
            crate::models::MovementType,
            // Pages
            crate::views::tools::ToolsPage,
            crate::views::tools::ToolActions,
            crate::views::tools::EditToolPage,
            crate::views::tools::StockAdjustmentRequest,
            crate::views::clients::ClientsPage,
            crate::views::clients::ClientActions,
            crate::views::clients::DebtsPage,
            crate::views::clients::EditClientPage,
            crate::views::loans::LoansPage,
            crate::views::loans::LoanRow,
            crate::views::loans::LoanFilter,
            crate::views::loans::LoanPicker,
            crate::views::loans::ReturnPage,
            crate::views::loans::ReturnPageResponse,
            crate::views::tariffs::TariffPage,
            crate::views::kardex::KardexPage,
            crate::views::reports::ReportPage,
            crate::views::ViewState,
            crate::views::Severity,
            crate::views::Notification,
            crate::views::ConfirmRequest,
            crate::views::Confirmation,
            crate::views::FormOutcome,
            // Session
            session::SessionResponse,
            session::SessionState,
            session::RouteCheck,
            crate::auth::SessionSummary,
            crate::guard::NavLink,
            forms::FormKind,
            forms::ValidateFormRequest,
            crate::validation::FormReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Session, navigation and route guard"),
        (name = "forms", description = "Live form validation"),
        (name = "tools", description = "Tool inventory"),
        (name = "clients", description = "Client management"),
        (name = "loans", description = "Loans and returns"),
        (name = "tariffs", description = "Rental tariffs"),
        (name = "kardex", description = "Inventory movements"),
        (name = "reports", description = "Reports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
