//! Operator console: confirmation prompts, tables and the registrations screen

pub mod confirm;
pub mod render;
pub mod screen;

pub use confirm::{ApprovalRisk, ConfirmDialog, Decision, Severity};
pub use render::{book_details, books_table, registrations_table, RegistrationRow};
pub use screen::{ActionMessage, RegistrationsScreen};
