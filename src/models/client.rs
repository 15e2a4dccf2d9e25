//! Client model and forms

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{enums::ClientStatus, tool::field_errors};
use crate::{
    error::AppResult,
    validation::{is_valid_person_name, FieldErrors, FormReport, EMAIL_REGEX, PHONE_REGEX, RUT_REGEX},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub rut: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub status: ClientStatus,
}

impl Client {
    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}

/// Body of `POST /clients`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
    pub rut: String,
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Body of `PUT /clients/{id}`; the RUT never changes after creation
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Body of `PATCH /clients/{id}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusChange {
    pub status: ClientStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientForm {
    pub name: String,
    #[validate(regex(path = *RUT_REGEX, message = "RUT must look like 12.345.678-9"))]
    pub rut: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 9 digits starting with 9"))]
    pub phone: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Enter a valid email address"))]
    pub email: String,
}

impl ClientForm {
    const FIELDS: &'static [&'static str] = &["name", "rut", "phone", "email"];

    pub fn report(&self) -> FormReport {
        let mut errors = name_errors(&self.name);
        errors.extend(field_errors(self.validate(), Self::FIELDS));
        FormReport::from_errors(errors)
    }

    pub fn submission(&self) -> AppResult<CreateClient> {
        self.report().into_result()?;
        Ok(CreateClient {
            rut: self.rut.clone(),
            name: self.name.trim().to_string(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EditClientForm {
    pub name: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 9 digits starting with 9"))]
    pub phone: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Enter a valid email address"))]
    pub email: String,
}

impl EditClientForm {
    const FIELDS: &'static [&'static str] = &["name", "phone", "email"];

    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
        }
    }

    pub fn report(&self) -> FormReport {
        let mut errors = name_errors(&self.name);
        errors.extend(field_errors(self.validate(), Self::FIELDS));
        FormReport::from_errors(errors)
    }

    pub fn submission(&self) -> AppResult<UpdateClient> {
        self.report().into_result()?;
        Ok(UpdateClient {
            name: self.name.trim().to_string(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        })
    }
}

fn name_errors(name: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !is_valid_person_name(name) {
        errors.add("name", "Name must have at least 3 characters");
    }
    errors
}
