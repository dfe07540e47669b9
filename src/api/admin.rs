//! Library registration endpoints (`admin/*`)

use async_trait::async_trait;

use super::{ApiClient, ApiResponse};
use crate::{
    error::AppResult,
    models::{EmailVerifiedFilter, StatusFilter},
};

/// Registration review backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET admin/get-library-list`. Backends may ignore `email_verified`.
    async fn get_library_list(
        &self,
        page_number: u32,
        library_name: &str,
        status: StatusFilter,
        email_verified: EmailVerifiedFilter,
    ) -> AppResult<ApiResponse>;

    /// `POST admin/approve-library`
    async fn approve_library(&self, public_id: &str) -> AppResult<ApiResponse>;

    /// `POST admin/decline-library`
    async fn decline_library(&self, library_id: &str, admin_note: &str) -> AppResult<ApiResponse>;

    /// `POST admin/ban-library`
    async fn ban_library(&self, library_id: &str, admin_note: &str) -> AppResult<ApiResponse>;

    /// `POST admin/unban-library`
    async fn unban_library(&self, library_id: &str) -> AppResult<ApiResponse>;
}

#[derive(Clone)]
pub struct RestAdminApi {
    client: ApiClient,
}

impl RestAdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdminApi for RestAdminApi {
    async fn get_library_list(
        &self,
        page_number: u32,
        library_name: &str,
        status: StatusFilter,
        email_verified: EmailVerifiedFilter,
    ) -> AppResult<ApiResponse> {
        tracing::info!("Fetching library list page {}", page_number);
        tracing::debug!(
            "Library list filters - name: '{}', status: {}, email: {}",
            library_name,
            status,
            email_verified
        );

        let mut query = vec![
            ("pageNumber", page_number.to_string()),
            ("libraryName", library_name.to_string()),
            ("status", status.as_str().to_string()),
        ];
        if email_verified != EmailVerifiedFilter::All {
            query.push(("emailVerified", email_verified.as_str().to_string()));
        }
        self.client.get(&["admin", "get-library-list"], &query).await
    }

    async fn approve_library(&self, public_id: &str) -> AppResult<ApiResponse> {
        tracing::info!("Approving library {}", public_id);
        self.client
            .post_query(&["admin", "approve-library"], &[("publicId", public_id.to_string())])
            .await
    }

    async fn decline_library(&self, library_id: &str, admin_note: &str) -> AppResult<ApiResponse> {
        tracing::info!("Declining library {}", library_id);
        self.client
            .post_query(
                &["admin", "decline-library"],
                &[
                    ("libraryId", library_id.to_string()),
                    ("adminNote", admin_note.to_string()),
                ],
            )
            .await
    }

    async fn ban_library(&self, library_id: &str, admin_note: &str) -> AppResult<ApiResponse> {
        tracing::info!("Banning library {}", library_id);
        self.client
            .post_query(
                &["admin", "ban-library"],
                &[
                    ("libraryId", library_id.to_string()),
                    ("adminNote", admin_note.to_string()),
                ],
            )
            .await
    }

    async fn unban_library(&self, library_id: &str) -> AppResult<ApiResponse> {
        tracing::info!("Unbanning library {}", library_id);
        self.client
            .post_query(&["admin", "unban-library"], &[("libraryId", library_id.to_string())])
            .await
    }
}
