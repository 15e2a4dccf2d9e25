//! Tariff singleton

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::tool::field_errors;
use crate::{
    error::{AppError, AppResult},
    validation::{FieldErrors, FormReport},
};

/// Daily fees applied by the backend when pricing loans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    pub daily_rent_fee: i32,
    pub daily_late_fee: i32,
    pub repair_fee: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TariffForm {
    #[validate(
        required(message = "Enter a value"),
        range(min = 0, message = "Fee cannot be negative")
    )]
    pub daily_rent_fee: Option<i32>,
    #[validate(
        required(message = "Enter a value"),
        range(min = 0, message = "Fee cannot be negative")
    )]
    pub daily_late_fee: Option<i32>,
    #[validate(
        required(message = "Enter a value"),
        range(min = 0, message = "Fee cannot be negative")
    )]
    pub repair_fee: Option<i32>,
}

impl TariffForm {
    const FIELDS: &'static [&'static str] = &["daily_rent_fee", "daily_late_fee", "repair_fee"];

    pub fn from_tariff(tariff: &Tariff) -> Self {
        Self {
            daily_rent_fee: Some(tariff.daily_rent_fee),
            daily_late_fee: Some(tariff.daily_late_fee),
            repair_fee: Some(tariff.repair_fee),
        }
    }

    pub fn report(&self) -> FormReport {
        FormReport::from_errors(field_errors(self.validate(), Self::FIELDS))
    }

    pub fn submission(&self) -> AppResult<Tariff> {
        self.report().into_result()?;
        match (self.daily_rent_fee, self.daily_late_fee, self.repair_fee) {
            (Some(daily_rent_fee), Some(daily_late_fee), Some(repair_fee)) => Ok(Tariff {
                daily_rent_fee,
                daily_late_fee,
                repair_fee,
            }),
            _ => Err(AppError::Validation(FieldErrors::new())),
        }
    }
}
