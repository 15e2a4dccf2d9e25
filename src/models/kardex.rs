//! Kardex: the append-only ledger of inventory movements

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{enums::MovementType, tool::Tool};
use crate::{
    error::{AppError, AppResult},
    validation::{FieldErrors, FormReport},
};

/// Who recorded a movement. The backend embeds its user entity, so only the
/// identifying fields are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementUser {
    pub id: Option<i64>,
    #[serde(default, alias = "name")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KardexMovement {
    pub id: i64,
    pub movement_date: NaiveDateTime,
    pub tool: Tool,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i32,
    pub user: Option<MovementUser>,
}

impl KardexMovement {
    pub fn recorded_by(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .unwrap_or("-")
    }
}

/// Validated kardex lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KardexQuery {
    ByTool(i64),
    ByDateRange { start: NaiveDate, end: NaiveDate },
}

/// Kardex search box: a tool id or a complete date range
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct KardexForm {
    pub tool_id: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl KardexForm {
    pub fn by_tool(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: Some(tool_id.into()),
            ..Self::default()
        }
    }

    pub fn by_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            tool_id: None,
            start: Some(start),
            end: Some(end),
        }
    }

    fn tool_text(&self) -> Option<&str> {
        self.tool_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn check(&self) -> Result<KardexQuery, FieldErrors> {
        if let Some(text) = self.tool_text() {
            return text
                .parse::<i64>()
                .map(KardexQuery::ByTool)
                .map_err(|_| FieldErrors::new().with("toolId", "Tool id must be a number"));
        }

        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => {
                Err(FieldErrors::new().with("end", "End date cannot be before start date"))
            }
            (Some(start), Some(end)) => Ok(KardexQuery::ByDateRange { start, end }),
            (Some(_), None) => Err(FieldErrors::new().with("end", "Enter an end date")),
            (None, Some(_)) => Err(FieldErrors::new().with("start", "Enter a start date")),
            (None, None) => Err(FieldErrors::new()
                .with("toolId", "Enter a tool id or a date range")),
        }
    }

    pub fn report(&self) -> FormReport {
        FormReport::from_errors(self.check().err().unwrap_or_default())
    }

    pub fn query(&self) -> AppResult<KardexQuery> {
        self.check().map_err(AppError::Validation)
    }
}
