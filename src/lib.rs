//! Union Catalog administration client
//!
//! Typed client for the union catalog portal backend. Super-admins review
//! library registrations (approve, decline, ban, unban); library staff browse
//! and maintain their book lists.

use std::sync::Arc;

pub mod adapter;
pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by every command
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build services over the configured backend, replaying `user`'s token
    /// and cookies when signed in
    pub fn new(config: AppConfig, user: Option<&models::UserSession>) -> AppResult<Self> {
        let client = match user {
            Some(user) => api::ApiClient::with_cookies(&config.api, &user.cookies)?
                .with_bearer(user.token.clone()),
            None => api::ApiClient::new(&config.api)?,
        };
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(client)),
        })
    }

    pub fn registrations_screen(&self) -> console::RegistrationsScreen {
        console::RegistrationsScreen::new(
            self.services.clone(),
            self.config.registrations.message_ttl(),
        )
    }
}
