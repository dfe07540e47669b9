//! Shared domain enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BookType
// ---------------------------------------------------------------------------

/// Catalog collection a book belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BookType {
    #[default]
    English,
    Myanmar,
}

impl BookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookType::English => "English",
            BookType::Myanmar => "Myanmar",
        }
    }
}

impl std::fmt::Display for BookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(BookType::English),
            "myanmar" | "mm" | "my" => Ok(BookType::Myanmar),
            _ => Err(format!("Invalid book type: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Portal account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserRole {
    SuperAdmin,
    #[default]
    Library,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SuperAdmin",
            UserRole::Library => "Library",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for UserRole {
    /// Unknown user types fall back to a library account
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "superadmin" | "super_admin" => UserRole::SuperAdmin,
            _ => UserRole::Library,
        }
    }
}
