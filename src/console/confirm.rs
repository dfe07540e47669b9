//! Confirmation dialog and the approval risk policy

use std::io::{self, BufRead, Write};

use crate::models::RegistrationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Danger,
}

impl Severity {
    fn label(&self) -> &'static str {
        match self {
            Severity::Info => "i",
            Severity::Warning => "!",
            Severity::Danger => "!!",
        }
    }
}

/// Operator's answer to a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

/// One parameterized confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl ConfirmDialog {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: "Confirm".to_string(),
            message: message.into(),
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn render(&self) -> String {
        format!(
            "[{}] {}\n{}\n[y] {}  [N] {}",
            self.severity.label(),
            self.title,
            self.message,
            self.confirm_text,
            self.cancel_text
        )
    }

    /// Show the dialog on `output` and read the answer from `input`.
    /// Anything other than `y`/`yes` cancels, including end of input.
    pub fn ask<R: BufRead, W: Write>(&self, input: &mut R, output: &mut W) -> io::Result<Decision> {
        write!(output, "{}\n> ", self.render())?;
        output.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        Ok(match answer.trim().to_lowercase().as_str() {
            "y" | "yes" => Decision::Confirm,
            _ => Decision::Cancel,
        })
    }
}

/// What an approval would overlook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalRisk {
    BothMissing,
    EmailUnverified,
    DocumentMissing,
    None,
}

impl ApprovalRisk {
    pub fn classify(record: &RegistrationRecord) -> Self {
        match (!record.is_email_verified, !record.has_document()) {
            (true, true) => ApprovalRisk::BothMissing,
            (true, false) => ApprovalRisk::EmailUnverified,
            (false, true) => ApprovalRisk::DocumentMissing,
            (false, false) => ApprovalRisk::None,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ApprovalRisk::BothMissing => Severity::Danger,
            ApprovalRisk::EmailUnverified | ApprovalRisk::DocumentMissing => Severity::Warning,
            ApprovalRisk::None => Severity::Info,
        }
    }

    /// Dialog shown before approving `record`
    pub fn dialog(record: &RegistrationRecord) -> ConfirmDialog {
        let risk = Self::classify(record);
        let name = if record.library_name.is_empty() {
            record.registration_number.as_str()
        } else {
            record.library_name.as_str()
        };
        let account = if record.is_google_user {
            "Google account"
        } else {
            "email account"
        };

        let (title, message) = match risk {
            ApprovalRisk::BothMissing => (
                "Approve unverified registration?",
                format!(
                    "{} has not verified its {} and has not uploaded a supporting document. \
                     Approving grants full catalog access. Approve anyway?",
                    name, account
                ),
            ),
            ApprovalRisk::EmailUnverified => (
                "Email not verified",
                format!("{} has not verified its {}. Approve anyway?", name, account),
            ),
            ApprovalRisk::DocumentMissing => (
                "No supporting document",
                format!("{} has not uploaded a supporting document. Approve anyway?", name),
            ),
            ApprovalRisk::None => ("Approve registration", format!("Approve {}?", name)),
        };

        ConfirmDialog::new(message)
            .title(title)
            .severity(risk.severity())
            .confirm_text("Approve")
    }
}
