//! Authentication service: password login, OTP verification, logout

use std::sync::Arc;

use validator::Validate;

use crate::{
    adapter,
    api::AuthApi,
    error::{AppError, AppResult},
    models::{
        user::{LoginRequest, OtpRequest},
        user::merge_cookies,
        LoginOutcome, PendingLogin, UserRole, UserSession,
    },
};

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Authenticate with email and password.
    /// Returns `OtpRequired` when the backend issued no token and expects a code.
    pub async fn login(&self, email: &str, password: &str, remember_me: bool) -> AppResult<LoginOutcome> {
        let request = LoginRequest {
            username: email.trim().to_string(),
            password: password.to_string(),
            remember_me,
        };
        request.validate()?;

        let response = self.api.login(&request).await.map_err(|e| match e {
            AppError::BackendRejected { status: Some(400), message } => {
                AppError::Authentication(if message.trim().is_empty() {
                    "Invalid credentials".to_string()
                } else {
                    message
                })
            }
            other => other,
        })?;

        let data = adapter::auth::login_data(&response.data);
        match data.token {
            Some(token) => {
                let role = data.user_type.as_deref().map(UserRole::from).unwrap_or_default();
                tracing::info!("Signed in as {} ({})", request.username, role);
                Ok(LoginOutcome::SignedIn(UserSession {
                    email: request.username,
                    role,
                    token: Some(token),
                    cookies: response.cookies,
                }))
            }
            None => {
                tracing::info!("OTP verification required for {}", request.username);
                Ok(LoginOutcome::OtpRequired(PendingLogin {
                    username: request.username,
                    user_type: data.user_type,
                    cookies: response.cookies,
                }))
            }
        }
    }

    /// Complete a login started with `login` that required a code
    pub async fn verify_otp(&self, pending: &PendingLogin, code: &str) -> AppResult<UserSession> {
        let request = OtpRequest {
            username: pending.username.clone(),
            otp_code: code.trim().to_string(),
        };
        request.validate()?;

        let response = self.api.verify_otp(&request).await?;
        let data = adapter::auth::login_data(&response.data);

        let role = data
            .user_type
            .as_deref()
            .or(pending.user_type.as_deref())
            .map(UserRole::from)
            .unwrap_or_default();

        tracing::info!("OTP verified for {} ({})", pending.username, role);
        Ok(UserSession {
            email: pending.username.clone(),
            role,
            token: data.token,
            cookies: merge_cookies(&pending.cookies, &response.cookies),
        })
    }

    pub async fn logout(&self) -> AppResult<String> {
        let response = self.api.logout().await?;
        Ok(response.message.unwrap_or_else(|| "Logged out".to_string()))
    }
}
