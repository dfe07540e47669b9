//! Registration review screen state
//!
//! Owns the displayed page, the filter/pagination cursor and the set of
//! records with an action in flight. At most one action per record may be in
//! flight; actions on different records run independently. The lock is never
//! held across a backend call.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use super::{confirm::ApprovalRisk, confirm::ConfirmDialog, render::RegistrationRow};
use crate::{
    error::{AppError, AppResult},
    models::{
        EmailVerifiedFilter, RegistrationAction, RegistrationPage, RegistrationQuery,
        RegistrationRecord, StatusFilter,
    },
    services::{actions::ActionOutcome, Services},
};

/// Result line shown after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMessage {
    pub text: String,
    pub success: bool,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct ScreenState {
    page: RegistrationPage,
    query: RegistrationQuery,
    loading: bool,
    error: Option<String>,
    in_flight: HashSet<String>,
    message: Option<ActionMessage>,
    /// Bumped per list load; older loads finishing late are dropped
    generation: u64,
    closed: bool,
}

pub struct RegistrationsScreen {
    services: Arc<Services>,
    state: Mutex<ScreenState>,
    message_ttl: Duration,
}

impl RegistrationsScreen {
    pub fn new(services: Arc<Services>, message_ttl: Duration) -> Self {
        Self {
            services,
            state: Mutex::new(ScreenState::default()),
            message_ttl,
        }
    }

    fn state(&self) -> MutexGuard<'_, ScreenState> {
        // Every critical section leaves the state consistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -----------------------------------------------------------------------
    // Loading and navigation
    // -----------------------------------------------------------------------

    /// Load the current query
    pub async fn load(&self) -> AppResult<()> {
        let query = self.state().query.clone();
        self.fetch(query).await
    }

    /// Replay the last query after a failed load
    pub async fn retry(&self) -> AppResult<()> {
        tracing::info!("Retrying registration list");
        self.load().await
    }

    /// Apply new filters, starting from the first page
    pub async fn search(
        &self,
        name: &str,
        status: StatusFilter,
        email_verified: EmailVerifiedFilter,
    ) -> AppResult<()> {
        self.fetch(RegistrationQuery {
            page: 1,
            name: name.to_string(),
            status,
            email_verified,
        })
        .await
    }

    /// Clear every filter and reload
    pub async fn reset(&self) -> AppResult<()> {
        self.fetch(RegistrationQuery::default()).await
    }

    pub async fn go_to_page(&self, page: u32) -> AppResult<()> {
        let query = {
            let state = self.state();
            let last = state.page.total_pages.max(1);
            if page < 1 || page > last {
                return Err(AppError::Validation(format!(
                    "Page {} is out of range 1..={}",
                    page, last
                )));
            }
            state.query.with_page(page)
        };
        self.fetch(query).await
    }

    pub async fn next_page(&self) -> AppResult<()> {
        let page = self.state().query.page.saturating_add(1);
        self.go_to_page(page).await
    }

    pub async fn prev_page(&self) -> AppResult<()> {
        let page = self.state().query.page.saturating_sub(1);
        self.go_to_page(page).await
    }

    /// Page through the unfiltered list until `public_id` is displayed
    pub async fn load_containing(&self, public_id: &str) -> AppResult<()> {
        let mut query = RegistrationQuery::default();
        loop {
            self.fetch(query.clone()).await?;
            let (found, total_pages) = {
                let state = self.state();
                (state.page.find(public_id).is_some(), state.page.total_pages)
            };
            if found {
                return Ok(());
            }
            if query.page >= total_pages {
                return Err(AppError::Validation(format!(
                    "Registration {} not found",
                    public_id
                )));
            }
            query.page += 1;
        }
    }

    async fn fetch(&self, query: RegistrationQuery) -> AppResult<()> {
        let generation = {
            let mut state = self.state();
            if state.closed {
                return Ok(());
            }
            state.loading = true;
            state.error = None;
            state.query = query.clone();
            state.generation += 1;
            state.generation
        };

        let result = self.services.registry.list(&query).await;

        let mut state = self.state();
        if state.closed || state.generation != generation {
            tracing::debug!("Dropping stale registration list (load #{})", generation);
            return Ok(());
        }
        state.loading = false;

        match result {
            Ok(page) => {
                state.page = page;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load registrations: {}", e);
                state.page.records.clear();
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    pub async fn approve(&self, public_id: &str) -> AppResult<ActionOutcome> {
        self.act(public_id, RegistrationAction::Approve, None).await
    }

    pub async fn decline(&self, public_id: &str, note: Option<&str>) -> AppResult<ActionOutcome> {
        self.act(public_id, RegistrationAction::Decline, note).await
    }

    pub async fn ban(&self, public_id: &str, note: Option<&str>) -> AppResult<ActionOutcome> {
        self.act(public_id, RegistrationAction::Ban, note).await
    }

    pub async fn unban(&self, public_id: &str) -> AppResult<ActionOutcome> {
        self.act(public_id, RegistrationAction::Unban, None).await
    }

    /// Run `action` on a displayed record, then reload the current page
    pub async fn act(
        &self,
        public_id: &str,
        action: RegistrationAction,
        note: Option<&str>,
    ) -> AppResult<ActionOutcome> {
        {
            let mut state = self.state();
            if state.closed {
                return Err(AppError::Internal("registrations screen is closed".to_string()));
            }
            if state.in_flight.contains(public_id) {
                return Err(AppError::ActionInProgress(public_id.to_string()));
            }
            let record = state.page.find(public_id).ok_or_else(|| {
                AppError::Validation(format!("Registration {} is not on this page", public_id))
            })?;
            record.status.apply(action)?;

            state.in_flight.insert(public_id.to_string());
            state.message = None;
        }

        let result = self.services.actions.perform(public_id, action, note).await;

        {
            let mut state = self.state();
            state.in_flight.remove(public_id);
            if state.closed {
                return result;
            }
            let expires_at = Instant::now() + self.message_ttl;
            state.message = Some(match &result {
                Ok(outcome) => ActionMessage {
                    text: outcome.message.clone(),
                    success: true,
                    expires_at,
                },
                Err(e) => ActionMessage {
                    text: e.user_message(),
                    success: false,
                    expires_at,
                },
            });
        }

        if result.is_ok() {
            // The action already succeeded; a failed reload shows as a list error
            if let Err(e) = self.load().await {
                tracing::warn!("Reload after {} of {} failed: {}", action, public_id, e);
            }
        }

        result
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    /// Actions to offer for a record; none while one is in flight
    pub fn actions_for(&self, public_id: &str) -> Vec<RegistrationAction> {
        let state = self.state();
        if state.in_flight.contains(public_id) {
            return Vec::new();
        }
        state
            .page
            .find(public_id)
            .map(|r| r.status.available_actions().to_vec())
            .unwrap_or_default()
    }

    pub fn is_busy(&self, public_id: &str) -> bool {
        self.state().in_flight.contains(public_id)
    }

    pub fn approval_dialog(&self, public_id: &str) -> AppResult<ConfirmDialog> {
        let state = self.state();
        let record = state.page.find(public_id).ok_or_else(|| {
            AppError::Validation(format!("Registration {} is not on this page", public_id))
        })?;
        Ok(ApprovalRisk::dialog(record))
    }

    /// Action message, until it expires
    pub fn current_message(&self) -> Option<ActionMessage> {
        let mut state = self.state();
        if state
            .message
            .as_ref()
            .is_some_and(|m| Instant::now() >= m.expires_at)
        {
            state.message = None;
        }
        state.message.clone()
    }

    pub fn records(&self) -> Vec<RegistrationRecord> {
        self.state().page.records.clone()
    }

    pub fn page(&self) -> RegistrationPage {
        self.state().page.clone()
    }

    pub fn query(&self) -> RegistrationQuery {
        self.state().query.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn rows(&self) -> Vec<RegistrationRow> {
        let state = self.state();
        state
            .page
            .records
            .iter()
            .map(|record| {
                let busy = state.in_flight.contains(&record.public_id);
                let actions = if busy {
                    Vec::new()
                } else {
                    record.status.available_actions().to_vec()
                };
                RegistrationRow::new(record, actions, busy)
            })
            .collect()
    }

    /// Tear the screen down; responses arriving afterwards are ignored
    pub fn close(&self) {
        self.state().closed = true;
    }
}
