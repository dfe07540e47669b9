//! Registration lifecycle: states and the transitions an operator may trigger

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Review state of a library registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Approved,
    Declined,
    Banned,
}

/// Operator action on a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationAction {
    Approve,
    Decline,
    Ban,
    Unban,
}

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 4] = [
        RegistrationStatus::Pending,
        RegistrationStatus::Approved,
        RegistrationStatus::Declined,
        RegistrationStatus::Banned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "Pending",
            RegistrationStatus::Approved => "Approved",
            RegistrationStatus::Declined => "Declined",
            RegistrationStatus::Banned => "Banned",
        }
    }

    /// Actions legal from this state, in display order
    pub fn available_actions(&self) -> &'static [RegistrationAction] {
        match self {
            RegistrationStatus::Pending => &[RegistrationAction::Approve, RegistrationAction::Decline],
            RegistrationStatus::Declined => &[RegistrationAction::Approve],
            RegistrationStatus::Approved => &[RegistrationAction::Ban],
            RegistrationStatus::Banned => &[RegistrationAction::Unban],
        }
    }

    pub fn can(&self, action: RegistrationAction) -> bool {
        self.available_actions().contains(&action)
    }

    /// Resulting state of `action`, or `InvalidTransition`
    pub fn apply(&self, action: RegistrationAction) -> AppResult<RegistrationStatus> {
        if !self.can(action) {
            return Err(AppError::InvalidTransition { from: *self, action });
        }
        Ok(action.target())
    }

    /// Whether a note is shown next to the status
    pub fn shows_admin_notes(&self) -> bool {
        matches!(self, RegistrationStatus::Declined | RegistrationStatus::Banned)
    }
}

impl RegistrationAction {
    pub const ALL: [RegistrationAction; 4] = [
        RegistrationAction::Approve,
        RegistrationAction::Decline,
        RegistrationAction::Ban,
        RegistrationAction::Unban,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationAction::Approve => "approve",
            RegistrationAction::Decline => "decline",
            RegistrationAction::Ban => "ban",
            RegistrationAction::Unban => "unban",
        }
    }

    /// State every legal application of this action lands in
    pub fn target(&self) -> RegistrationStatus {
        match self {
            RegistrationAction::Approve | RegistrationAction::Unban => RegistrationStatus::Approved,
            RegistrationAction::Decline => RegistrationStatus::Declined,
            RegistrationAction::Ban => RegistrationStatus::Banned,
        }
    }

    pub fn accepts_note(&self) -> bool {
        matches!(self, RegistrationAction::Decline | RegistrationAction::Ban)
    }

    /// Message used when the backend confirms without one
    pub fn default_success_message(&self) -> &'static str {
        match self {
            RegistrationAction::Approve => "Approved",
            RegistrationAction::Decline => "Declined",
            RegistrationAction::Ban => "Banned",
            RegistrationAction::Unban => "Unbanned",
        }
    }

    pub fn default_failure_message(&self) -> &'static str {
        match self {
            RegistrationAction::Approve => "Approve failed",
            RegistrationAction::Decline => "Decline failed",
            RegistrationAction::Ban => "Ban failed",
            RegistrationAction::Unban => "Unban failed",
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for RegistrationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "declined" => Ok(RegistrationStatus::Declined),
            "banned" => Ok(RegistrationStatus::Banned),
            _ => Err(format!("Invalid registration status: {}", s)),
        }
    }
}

impl std::str::FromStr for RegistrationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Ok(RegistrationAction::Approve),
            "decline" => Ok(RegistrationAction::Decline),
            "ban" => Ok(RegistrationAction::Ban),
            "unban" => Ok(RegistrationAction::Unban),
            _ => Err(format!("Invalid registration action: {}", s)),
        }
    }
}
