//! Action orchestrator: approve, decline, ban and unban registrations

use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use crate::{
    api::{AdminApi, ApiResponse},
    error::{AppError, AppResult},
    models::RegistrationAction,
};

pub const ADMIN_NOTE_MAX_CHARS: usize = 300;

/// Operator note attached to a decline or ban
#[derive(Debug, Clone, Default, Validate)]
pub struct AdminNote {
    #[validate(length(max = 300, message = "Note must be at most 300 characters"))]
    pub text: String,
}

impl AdminNote {
    pub fn parse(note: Option<&str>) -> AppResult<Self> {
        let note = Self {
            text: note.map(str::trim).unwrap_or_default().to_string(),
        };
        note.validate()?;
        Ok(note)
    }
}

/// Backend-confirmed result of an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub action: RegistrationAction,
    pub public_id: String,
    pub message: String,
}

/// Issues one state-transition request per call, without retries.
///
/// Callers are expected to refetch the registry on success; nothing here
/// mutates local records.
#[derive(Clone)]
pub struct ActionService {
    api: Arc<dyn AdminApi>,
}

impl ActionService {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    pub async fn approve(&self, public_id: &str) -> AppResult<ActionOutcome> {
        self.perform(public_id, RegistrationAction::Approve, None).await
    }

    pub async fn decline(&self, public_id: &str, note: Option<&str>) -> AppResult<ActionOutcome> {
        self.perform(public_id, RegistrationAction::Decline, note).await
    }

    pub async fn ban(&self, public_id: &str, note: Option<&str>) -> AppResult<ActionOutcome> {
        self.perform(public_id, RegistrationAction::Ban, note).await
    }

    pub async fn unban(&self, public_id: &str) -> AppResult<ActionOutcome> {
        self.perform(public_id, RegistrationAction::Unban, None).await
    }

    pub async fn perform(
        &self,
        public_id: &str,
        action: RegistrationAction,
        note: Option<&str>,
    ) -> AppResult<ActionOutcome> {
        let public_id = public_id.trim();
        if public_id.is_empty() {
            return Err(AppError::Validation("Registration id is required".to_string()));
        }

        let note = if action.accepts_note() {
            AdminNote::parse(note)?
        } else {
            if note.is_some_and(|n| !n.trim().is_empty()) {
                tracing::warn!("Ignoring note for {} of {}", action, public_id);
            }
            AdminNote::default()
        };

        let result = match action {
            RegistrationAction::Approve => self.api.approve_library(public_id).await,
            RegistrationAction::Decline => self.api.decline_library(public_id, &note.text).await,
            RegistrationAction::Ban => self.api.ban_library(public_id, &note.text).await,
            RegistrationAction::Unban => self.api.unban_library(public_id).await,
        };

        match result {
            Ok(ApiResponse { message, .. }) => {
                let message = message.unwrap_or_else(|| action.default_success_message().to_string());
                tracing::info!("{} of {} confirmed: {}", action, public_id, message);
                Ok(ActionOutcome {
                    action,
                    public_id: public_id.to_string(),
                    message,
                })
            }
            Err(e) => {
                tracing::warn!("{} of {} failed: {}", action, public_id, e);
                Err(e)
            }
        }
    }
}
