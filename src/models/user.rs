//! Signed-in user and authentication request types

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::UserRole;

/// The signed-in portal user, persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub email: String,
    pub role: UserRole,
    /// Bearer token, when the backend issued one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// `Set-Cookie` values from sign-in, replayed on later runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,
}

/// Login awaiting an OTP code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLogin {
    pub username: String,
    pub user_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cookies: Vec<String>,
}

/// Combine two batches of `Set-Cookie` values. A cookie in `newer` replaces
/// one with the same name in `older`.
pub fn merge_cookies(older: &[String], newer: &[String]) -> Vec<String> {
    fn name(cookie: &str) -> &str {
        cookie.split(';').next().unwrap_or_default().split('=').next().unwrap_or_default().trim()
    }

    let mut merged: Vec<String> = older
        .iter()
        .filter(|old| !newer.iter().any(|new| name(new) == name(old)))
        .cloned()
        .collect();
    merged.extend(newer.iter().cloned());
    merged
}

/// Login request
#[derive(Debug, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub remember_me: bool,
}

/// OTP verification request
#[derive(Debug, Serialize, Validate)]
pub struct OtpRequest {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "OTPCode")]
    #[validate(length(min = 4, max = 8, message = "OTP code must be 4 to 8 characters"))]
    pub otp_code: String,
}

/// Result of a password login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn(UserSession),
    OtpRequired(PendingLogin),
}
