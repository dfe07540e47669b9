//! Library registration model and query types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::RegistrationStatus;

/// One library's application to join the union catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub public_id: String,
    /// Human-readable code such as `LIB-20240131-4F2A9C`
    pub registration_number: String,
    pub library_name: String,
    pub library_type: String,
    pub owner_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone_number: String,
    pub township: String,
    pub state_division: String,
    pub address: String,
    pub document_file: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
    pub is_google_user: bool,
    pub is_email_verified: bool,
    pub status: RegistrationStatus,
    pub admin_notes: Option<String>,
}

impl RegistrationRecord {
    pub fn has_document(&self) -> bool {
        self.document_file.is_some()
    }
}

/// Server-side status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RegistrationStatus),
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// Email verification filter, applied on the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmailVerifiedFilter {
    #[default]
    All,
    Verified,
    NotVerified,
}

impl EmailVerifiedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailVerifiedFilter::All => "All",
            EmailVerifiedFilter::Verified => "Verified",
            EmailVerifiedFilter::NotVerified => "NotVerified",
        }
    }

    pub fn matches(&self, record: &RegistrationRecord) -> bool {
        match self {
            EmailVerifiedFilter::All => true,
            EmailVerifiedFilter::Verified => record.is_email_verified,
            EmailVerifiedFilter::NotVerified => !record.is_email_verified,
        }
    }
}

impl std::fmt::Display for EmailVerifiedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EmailVerifiedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "all" => Ok(EmailVerifiedFilter::All),
            "verified" => Ok(EmailVerifiedFilter::Verified),
            "notverified" | "unverified" => Ok(EmailVerifiedFilter::NotVerified),
            _ => Err(format!("Invalid email verification filter: {}", s)),
        }
    }
}

/// Registration list query (page, name, status, email verification)
#[derive(Debug, Clone, PartialEq, Eq, Validate, Serialize, Deserialize)]
pub struct RegistrationQuery {
    #[validate(range(min = 1, message = "Page number must be at least 1"))]
    pub page: u32,
    pub name: String,
    pub status: StatusFilter,
    pub email_verified: EmailVerifiedFilter,
}

impl Default for RegistrationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            name: String::new(),
            status: StatusFilter::All,
            email_verified: EmailVerifiedFilter::All,
        }
    }
}

impl RegistrationQuery {
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// One page of registrations as shown to the operator.
///
/// `total_items` and `total_pages` describe the server page before the
/// email filter, so `records.len()` may be smaller than the page size even
/// when further matches exist on other pages.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegistrationPage {
    pub records: Vec<RegistrationRecord>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

impl RegistrationPage {
    pub fn find(&self, public_id: &str) -> Option<&RegistrationRecord> {
        self.records.iter().find(|r| r.public_id == public_id)
    }
}
