//! Registry query service: paginated, filtered registration lists

use std::sync::Arc;

use validator::Validate;

use crate::{
    adapter,
    api::AdminApi,
    error::AppResult,
    models::{EmailVerifiedFilter, RegistrationPage, RegistrationQuery},
};

#[derive(Clone)]
pub struct RegistryService {
    api: Arc<dyn AdminApi>,
}

impl RegistryService {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    /// Fetch one page of registrations.
    ///
    /// Name and status filter on the server. The email verification filter is
    /// applied here, to the returned page only; totals stay the server's.
    pub async fn list(&self, query: &RegistrationQuery) -> AppResult<RegistrationPage> {
        query.validate()?;

        let name = query.name.trim();
        let response = self
            .api
            .get_library_list(query.page, name, query.status, query.email_verified)
            .await?;

        let mut page = adapter::page::registration_page(&response.data, query.page)?;
        let fetched = page.records.len();

        if query.email_verified != EmailVerifiedFilter::All {
            page.records.retain(|r| query.email_verified.matches(r));
            tracing::debug!(
                "Email filter {} kept {}/{} registrations",
                query.email_verified,
                page.records.len(),
                fetched
            );
        }

        tracing::info!(
            "Loaded {} registrations (page {}/{}, {} total)",
            page.records.len(),
            page.page,
            page.total_pages,
            page.total_items
        );

        Ok(page)
    }
}
