//! Data models for the Union Catalog client

pub mod book;
pub mod enums;
pub mod registration;
pub mod status;
pub mod user;

// Re-export commonly used types
pub use book::{BookForm, BookPage, BookQuery, BookRecord, CoverImage};
pub use enums::{BookType, UserRole};
pub use registration::{
    EmailVerifiedFilter, RegistrationPage, RegistrationQuery, RegistrationRecord, StatusFilter,
};
pub use status::{RegistrationAction, RegistrationStatus};
pub use user::{LoginOutcome, PendingLogin, UserSession};
