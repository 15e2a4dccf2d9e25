//! Report viewer

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::{Permission, Session},
    error::AppResult,
    guard,
    models::{DateRange, ReportForm, ReportKind, ReportRows},
    services::Services,
};

const NO_RESULTS: &str = "No results found for the selected criteria.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportPage {
    pub kind: ReportKind,
    pub title: String,
    pub range: Option<DateRange>,
    #[schema(value_type = Object)]
    pub rows: ReportRows,
    pub empty_message: Option<String>,
}

impl ReportPage {
    pub async fn run(services: &Services, session: &Session, form: &ReportForm) -> AppResult<Self> {
        guard::require(session, Permission::ViewReports)?;
        let query = form.query()?;
        let rows = services.reports.run(query).await?;
        let empty_message = rows.is_empty().then(|| NO_RESULTS.to_string());

        Ok(Self {
            kind: query.kind,
            title: query.kind.title().to_string(),
            range: query.range,
            rows,
            empty_message,
        })
    }
}
