//! Client-side services over the portal backend

pub mod actions;
pub mod auth;
pub mod books;
pub mod registry;

use std::sync::Arc;

use crate::api::{AdminApi, ApiClient, AuthApi, BooksApi, RestAdminApi, RestAuthApi, RestBooksApi};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub registry: registry::RegistryService,
    pub actions: actions::ActionService,
    pub auth: auth::AuthService,
    pub books: books::BooksService,
}

impl Services {
    /// Create all services over one HTTP client
    pub fn new(client: ApiClient) -> Self {
        Self::with_apis(
            Arc::new(RestAdminApi::new(client.clone())),
            Arc::new(RestAuthApi::new(client.clone())),
            Arc::new(RestBooksApi::new(client)),
        )
    }

    /// Create all services over explicit backends
    pub fn with_apis(
        admin: Arc<dyn AdminApi>,
        auth: Arc<dyn AuthApi>,
        books: Arc<dyn BooksApi>,
    ) -> Self {
        Self {
            registry: registry::RegistryService::new(admin.clone()),
            actions: actions::ActionService::new(admin),
            auth: auth::AuthService::new(auth),
            books: books::BooksService::new(books),
        }
    }
}
