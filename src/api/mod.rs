//! HTTP client for the portal backend
//!
//! `ApiClient` owns the base URL, request timeout and cookie session, and
//! turns every response into either an `ApiResponse` or an `AppError`.
//! The per-area traits (`AdminApi`, `AuthApi`, `BooksApi`) are the seams the
//! services depend on.

pub mod admin;
pub mod auth;
pub mod books;

use std::sync::Arc;

use reqwest::{cookie::Jar, header, multipart, Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::Value;

use crate::{
    adapter::envelope::{self, Envelope},
    config::ApiConfig,
    error::{AppError, AppResult},
};

pub use admin::{AdminApi, RestAdminApi};
pub use auth::{AuthApi, RestAuthApi};
pub use books::{BooksApi, RestBooksApi};

/// Successful backend reply
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub message: Option<String>,
    pub data: Value,
    /// Raw `Set-Cookie` values, kept so a later run can replay the session
    pub cookies: Vec<String>,
}

impl ApiResponse {
    pub fn new(message: Option<&str>, data: Value) -> Self {
        Self {
            status: 200,
            message: message.map(str::to_string),
            data,
            cookies: Vec::new(),
        }
    }

    pub fn with_cookies(mut self, cookies: Vec<String>) -> Self {
        self.cookies = cookies;
        self
    }
}

pub const DEFAULT_FAILURE_MESSAGE: &str = "Action failed";

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    bearer: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Self::with_cookies(config, &[])
    }

    /// Client whose cookie jar starts with `cookies` (raw `Set-Cookie` values)
    pub fn with_cookies(config: &ApiConfig, cookies: &[String]) -> AppResult<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| AppError::Config(format!("Invalid api.base_url '{}': {}", base, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("Invalid api.base_url '{}'", base)));
        }

        let jar = Arc::new(Jar::default());
        for cookie in cookies {
            jar.add_cookie_str(cookie, &base_url);
        }
        if !cookies.is_empty() {
            tracing::debug!("Restored {} session cookie(s)", cookies.len());
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .cookie_provider(jar)
            .user_agent(concat!("uc-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            bearer: None,
        })
    }

    /// Same client, authenticating with `token`
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint URL under the base. Each segment is percent-encoded on its
    /// own, so an id can never add path components.
    pub fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Invalid api.base_url '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, path: &[&str], query: &[(&str, String)]) -> AppResult<ApiResponse> {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request).await
    }

    /// POST with parameters in the query string and an empty JSON body
    pub async fn post_query(&self, path: &[&str], query: &[(&str, String)]) -> AppResult<ApiResponse> {
        let request = self
            .request(Method::POST, path)?
            .query(query)
            .json(&serde_json::json!({}));
        self.send(request).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &[&str], body: &T) -> AppResult<ApiResponse> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request).await
    }

    pub async fn post_multipart(&self, path: &[&str], form: multipart::Form) -> AppResult<ApiResponse> {
        let request = self.request(Method::POST, path)?.multipart(form);
        self.send(request).await
    }

    pub async fn put_multipart(&self, path: &[&str], form: multipart::Form) -> AppResult<ApiResponse> {
        let request = self.request(Method::PUT, path)?.multipart(form);
        self.send(request).await
    }

    pub async fn delete(&self, path: &[&str], query: &[(&str, String)]) -> AppResult<ApiResponse> {
        let request = self.request(Method::DELETE, path)?.query(query);
        self.send(request).await
    }

    fn request(&self, method: Method, path: &[&str]) -> AppResult<RequestBuilder> {
        let url = self.url(path)?;

        let mut request = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(ref token) = self.bearer {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<ApiResponse> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let text = response.text().await?;

        tracing::debug!("{} {} ({} bytes)", status.as_u16(), url, text.len());

        let body: Option<Value> = if text.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str(&text).ok()
        };

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(envelope::error_message)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            tracing::warn!("Backend rejected {} with {}: {}", url, status.as_u16(), message);
            return Err(AppError::BackendRejected {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body = body.ok_or_else(|| {
            tracing::error!("Non-JSON response body from {}", url);
            AppError::MalformedResponse(format!("non-JSON body from {}", url))
        })?;

        let envelope = Envelope::from_value(body);
        if envelope.success == Some(false) {
            let message = envelope
                .message
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            tracing::warn!("Backend reported failure for {}: {}", url, message);
            return Err(AppError::BackendRejected {
                status: Some(status.as_u16()),
                message,
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            message: envelope.message,
            data: envelope.data,
            cookies,
        })
    }
}
