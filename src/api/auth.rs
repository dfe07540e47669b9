//! Authentication endpoints (`auth/*`)

use async_trait::async_trait;

use super::{ApiClient, ApiResponse};
use crate::{
    error::AppResult,
    models::user::{LoginRequest, OtpRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> AppResult<ApiResponse>;
    async fn verify_otp(&self, request: &OtpRequest) -> AppResult<ApiResponse>;
    async fn logout(&self) -> AppResult<ApiResponse>;
}

#[derive(Clone)]
pub struct RestAuthApi {
    client: ApiClient,
}

impl RestAuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for RestAuthApi {
    async fn login(&self, request: &LoginRequest) -> AppResult<ApiResponse> {
        tracing::info!("Logging in as {}", request.username);
        self.client.post_json(&["auth", "login"], request).await
    }

    async fn verify_otp(&self, request: &OtpRequest) -> AppResult<ApiResponse> {
        tracing::info!("Verifying OTP for {}", request.username);
        self.client.post_json(&["auth", "verify-otp"], request).await
    }

    async fn logout(&self) -> AppResult<ApiResponse> {
        tracing::info!("Logging out");
        self.client.post_json(&["auth", "logout"], &serde_json::json!({})).await
    }
}
