//! Tool inventory model and forms

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ToolStatus;
use crate::{
    error::{AppError, AppResult},
    validation::{FieldErrors, FormReport, MIN_REPLACEMENT_VALUE},
};

/// Tool as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub status: ToolStatus,
    pub stock: i32,
    #[serde(default)]
    pub in_repair: i32,
    pub replacement_value: i32,
}

impl Tool {
    pub fn is_decommissioned(&self) -> bool {
        self.status == ToolStatus::Decommissioned
    }
}

/// Body of `POST /tools`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTool {
    pub name: String,
    pub category: String,
    pub stock: i32,
    pub in_repair: i32,
    pub replacement_value: i32,
}

/// Body of `PUT /tools/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTool {
    pub name: String,
    pub category: String,
    pub replacement_value: i32,
}

/// Add-tool form values
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolForm {
    #[validate(length(min = 1, message = "Enter a name"))]
    pub name: String,
    #[validate(length(min = 1, message = "Enter a category"))]
    pub category: String,
    /// Initial stock
    #[validate(
        required(message = "Enter a value"),
        range(min = 0, message = "Stock cannot be negative")
    )]
    pub stock: Option<i32>,
    #[validate(
        required(message = "Enter a value"),
        range(min = MIN_REPLACEMENT_VALUE, message = "Replacement value must be at least 1000")
    )]
    pub replacement_value: Option<i32>,
}

impl ToolForm {
    const FIELDS: &'static [&'static str] = &["name", "category", "stock", "replacement_value"];

    pub fn report(&self) -> FormReport {
        FormReport::from_errors(field_errors(self.validate(), Self::FIELDS))
    }

    pub fn submission(&self) -> AppResult<CreateTool> {
        self.report().into_result()?;
        let (Some(stock), Some(replacement_value)) = (self.stock, self.replacement_value) else {
            return Err(AppError::Validation(FieldErrors::new()));
        };
        Ok(CreateTool {
            name: self.name.clone(),
            category: self.category.clone(),
            stock,
            in_repair: 0,
            replacement_value,
        })
    }
}

/// Edit-tool form values; stock is managed through adjustments only
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EditToolForm {
    #[validate(length(min = 1, message = "Enter a name"))]
    pub name: String,
    #[validate(length(min = 1, message = "Enter a category"))]
    pub category: String,
    #[validate(
        required(message = "Enter a value"),
        range(min = MIN_REPLACEMENT_VALUE, message = "Replacement value must be at least 1000")
    )]
    pub replacement_value: Option<i32>,
}

impl EditToolForm {
    const FIELDS: &'static [&'static str] = &["name", "category", "replacement_value"];

    /// Form prefilled from the stored tool
    pub fn from_tool(tool: &Tool) -> Self {
        Self {
            name: tool.name.clone(),
            category: tool.category.clone(),
            replacement_value: Some(tool.replacement_value),
        }
    }

    pub fn report(&self) -> FormReport {
        FormReport::from_errors(field_errors(self.validate(), Self::FIELDS))
    }

    pub fn submission(&self) -> AppResult<UpdateTool> {
        self.report().into_result()?;
        let Some(replacement_value) = self.replacement_value else {
            return Err(AppError::Validation(FieldErrors::new()));
        };
        Ok(UpdateTool {
            name: self.name.clone(),
            category: self.category.clone(),
            replacement_value,
        })
    }
}

/// Direction of a manual stock adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentDirection {
    Increase,
    Decrease,
}

/// Stock adjustment dialog values
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentForm {
    pub direction: AdjustmentDirection,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Body of `PATCH /tools/{id}/stock`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    /// Positive to add units, negative to remove them
    pub quantity_change: i32,
}

impl StockAdjustmentForm {
    pub fn report(&self) -> FormReport {
        FormReport::from_errors(field_errors(self.validate(), &["quantity"]))
    }

    pub fn submission(&self) -> AppResult<StockAdjustment> {
        self.report().into_result()?;
        let quantity_change = match self.direction {
            AdjustmentDirection::Increase => self.quantity,
            AdjustmentDirection::Decrease => -self.quantity,
        };
        Ok(StockAdjustment { quantity_change })
    }
}

pub(crate) fn field_errors(result: Result<(), validator::ValidationErrors>, order: &[&str]) -> FieldErrors {
    match result {
        Ok(()) => FieldErrors::new(),
        Err(errors) => FieldErrors::from_validation(&errors, order),
    }
}
