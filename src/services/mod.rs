//! Typed bindings to the ToolRent REST backend
//!
//! Each service is a thin wrapper over one [`ApiClient`]; the container is
//! built per request around the viewer's credentials.

pub mod clients;
pub mod kardex;
pub mod loans;
pub mod reports;
pub mod tariffs;
pub mod tools;

use std::sync::Arc;

use crate::gateway::ApiClient;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub tools: tools::ToolsService,
    pub clients: clients::ClientsService,
    pub loans: loans::LoansService,
    pub tariffs: tariffs::TariffsService,
    pub kardex: kardex::KardexService,
    pub reports: reports::ReportsService,
}

impl Services {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            tools: tools::ToolsService::new(api.clone()),
            clients: clients::ClientsService::new(api.clone()),
            loans: loans::LoansService::new(api.clone()),
            tariffs: tariffs::TariffsService::new(api.clone()),
            kardex: kardex::KardexService::new(api.clone()),
            reports: reports::ReportsService::new(api),
        }
    }
}
