//! Live form validation
//!
//! The console re-checks a form on every change; this endpoint answers with
//! the per-field errors and whether submission is enabled.

use axum::Json;
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;

use super::Viewer;
use crate::{
    auth::Permission,
    error::{AppError, AppResult},
    guard,
    models::{
        Client, ClientForm, EditClientForm, EditToolForm, KardexForm, LoanForm, ReportForm, ReturnForm,
        StockAdjustmentForm, TariffForm, Tool, ToolForm,
    },
    validation::FormReport,
};

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Tool,
    EditTool,
    Client,
    EditClient,
    Tariff,
    StockAdjustment,
    Kardex,
    Report,
    Loan,
    Return,
}

impl FormKind {
    /// Permission needed to submit the form
    pub fn permission(self) -> Permission {
        match self {
            FormKind::Tool => Permission::RegisterTools,
            FormKind::EditTool => Permission::EditTools,
            FormKind::Client | FormKind::EditClient => Permission::ManageClients,
            FormKind::Tariff => Permission::ManageTariffs,
            FormKind::StockAdjustment => Permission::ManageInventory,
            FormKind::Kardex => Permission::ViewKardex,
            FormKind::Report => Permission::ViewReports,
            FormKind::Loan | FormKind::Return => Permission::ManageLoans,
        }
    }
}

/// Form values plus the page data the shell already holds. Validation never
/// calls the backend; submission re-checks against fresh data.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateFormRequest {
    pub form: FormKind,
    /// Current field values, as the form would submit them
    #[schema(value_type = Object)]
    pub values: serde_json::Value,
    /// Picker clients, for `loan` forms
    #[serde(default)]
    pub clients: Vec<Client>,
    /// Picker tools, for `loan` forms
    #[serde(default)]
    pub tools: Vec<Tool>,
    /// Start date of the loan being returned, for `return` forms
    pub loan_start: Option<NaiveDate>,
}

fn values<T: DeserializeOwned>(raw: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(raw).map_err(|e| AppError::BadRequest(format!("Invalid form values: {}", e)))
}

#[utoipa::path(
    post,
    path = "/forms/validate",
    tag = "forms",
    security(("bearer_auth" = [])),
    request_body = ValidateFormRequest,
    responses(
        (status = 200, description = "Field errors and submit state", body = FormReport),
        (status = 400, description = "Values do not match the form", body = crate::error::ErrorResponse),
        (status = 401, description = "No authenticated session", body = crate::error::ErrorResponse),
        (status = 403, description = "Form not available to the caller's roles", body = crate::error::ErrorResponse)
    )
)]
pub async fn validate_form(viewer: Viewer, Json(request): Json<ValidateFormRequest>) -> AppResult<Json<FormReport>> {
    guard::require(viewer.session()?, request.form.permission())?;
    let raw = request.values;

    let report = match request.form {
        FormKind::Tool => values::<ToolForm>(raw)?.report(),
        FormKind::EditTool => values::<EditToolForm>(raw)?.report(),
        FormKind::Client => values::<ClientForm>(raw)?.report(),
        FormKind::EditClient => values::<EditClientForm>(raw)?.report(),
        FormKind::Tariff => values::<TariffForm>(raw)?.report(),
        FormKind::StockAdjustment => values::<StockAdjustmentForm>(raw)?.report(),
        FormKind::Kardex => values::<KardexForm>(raw)?.report(),
        FormKind::Report => values::<ReportForm>(raw)?.report(),
        FormKind::Loan => values::<LoanForm>(raw)?.report(&request.clients, &request.tools),
        FormKind::Return => {
            let loan_start = request
                .loan_start
                .ok_or_else(|| AppError::BadRequest("loan_start is required for return forms".to_string()))?;
            values::<ReturnForm>(raw)?.report(loan_start)
        }
    };

    Ok(Json(report))
}
