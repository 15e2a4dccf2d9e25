//! Tool inventory pages

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ActionResponse, ConfirmRequest, FormOutcome, Notification, PendingAction, ViewModel};
use crate::{
    auth::{Permission, Session},
    error::AppResult,
    guard::{self, Route},
    models::{AdjustmentDirection, EditToolForm, StockAdjustmentForm, Tool, ToolForm},
    services::Services,
};

const NO_TOOLS: &str = "No tools registered.";

/// Which row actions the viewer may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ToolActions {
    pub can_add: bool,
    pub can_edit: bool,
    pub can_adjust_stock: bool,
    pub can_decommission: bool,
}

impl ToolActions {
    pub fn for_session(session: &Session) -> Self {
        Self {
            can_add: session.can(Permission::RegisterTools),
            can_edit: session.can(Permission::EditTools),
            can_adjust_stock: session.can(Permission::ManageInventory),
            can_decommission: session.can(Permission::ManageInventory),
        }
    }
}

/// Tool list; decommissioned tools are listed apart from the active inventory
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolsPage {
    pub inventory: ViewModel<Tool>,
    pub decommissioned: Vec<Tool>,
    pub actions: ToolActions,
}

impl ToolsPage {
    pub async fn load(services: &Services, session: &Session) -> Self {
        let mut inventory = ViewModel::new(NO_TOOLS);
        let ticket = inventory.begin_fetch();

        let (active, decommissioned) = match services.tools.list().await {
            Ok(tools) => {
                let (retired, active): (Vec<Tool>, Vec<Tool>) =
                    tools.into_iter().partition(Tool::is_decommissioned);
                (Ok(active), retired)
            }
            Err(e) => (Err(e), Vec::new()),
        };
        inventory.apply(ticket, active);

        Self {
            inventory,
            decommissioned,
            actions: ToolActions::for_session(session),
        }
    }
}

/// Edit page, prefilled from the stored tool
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditToolPage {
    pub tool: Tool,
    pub form: EditToolForm,
}

impl EditToolPage {
    pub async fn load(services: &Services, id: i64) -> AppResult<Self> {
        let tool = services.tools.get(id).await?;
        let form = EditToolForm::from_tool(&tool);
        Ok(Self { tool, form })
    }
}

pub async fn add_tool(services: &Services, session: &Session, form: &ToolForm) -> AppResult<FormOutcome> {
    guard::require(session, Permission::RegisterTools)?;
    let body = form.submission()?;
    services.tools.create(&body).await?;
    tracing::info!(name = %body.name, "Tool registered");
    Ok(FormOutcome::redirect(
        format!("Tool \"{}\" registered.", body.name),
        Route::Tools.path(),
    ))
}

pub async fn edit_tool(
    services: &Services,
    session: &Session,
    id: i64,
    form: &EditToolForm,
) -> AppResult<FormOutcome> {
    guard::require(session, Permission::EditTools)?;
    let body = form.submission()?;
    services.tools.update(id, &body).await?;
    Ok(FormOutcome::redirect("Tool updated.", Route::Tools.path()))
}

/// Stock dialog submission
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentRequest {
    pub direction: AdjustmentDirection,
    pub quantity: i32,
    #[serde(default)]
    pub confirmed: bool,
}

pub async fn adjust_stock(
    services: &Services,
    session: &Session,
    id: i64,
    request: &StockAdjustmentRequest,
) -> AppResult<ActionResponse<ToolsPage>> {
    guard::require(session, Permission::ManageInventory)?;
    let form = StockAdjustmentForm {
        direction: request.direction,
        quantity: request.quantity,
    };
    let adjustment = form.submission()?;

    let pending = PendingAction::AdjustStock {
        id,
        quantity_change: adjustment.quantity_change,
    };
    let confirm = ConfirmRequest {
        confirmed: request.confirmed,
    };
    if let Some(prompt) = ActionResponse::gate(confirm, &pending) {
        return Ok(prompt);
    }

    services.tools.adjust_stock(id, &adjustment).await?;
    tracing::info!(tool_id = id, change = adjustment.quantity_change, "Stock adjusted");

    let page = ToolsPage::load(services, session).await;
    Ok(ActionResponse::done(Notification::success("Stock updated."), page))
}

pub async fn decommission(
    services: &Services,
    session: &Session,
    id: i64,
    request: ConfirmRequest,
) -> AppResult<ActionResponse<ToolsPage>> {
    guard::require(session, Permission::ManageInventory)?;
    if let Some(prompt) = ActionResponse::gate(request, &PendingAction::DecommissionTool { id }) {
        return Ok(prompt);
    }

    services.tools.decommission(id).await?;
    tracing::info!(tool_id = id, "Tool decommissioned");

    let page = ToolsPage::load(services, session).await;
    Ok(ActionResponse::done(Notification::success("Tool decommissioned."), page))
}
