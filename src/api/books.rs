//! Book catalog endpoints (`Book/*`)

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{ApiClient, ApiResponse};
use crate::{
    error::{AppError, AppResult},
    models::{BookForm, BookQuery, BookType, CoverImage},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksApi: Send + Sync {
    async fn get_book_list(&self, query: &BookQuery) -> AppResult<ApiResponse>;
    async fn get_book_details(&self, book_id: &str, book_type: BookType) -> AppResult<ApiResponse>;
    async fn add_book(&self, form: &BookForm, cover: Option<CoverImage>) -> AppResult<ApiResponse>;
    async fn update_book(&self, book_id: &str, form: &BookForm, cover: Option<CoverImage>) -> AppResult<ApiResponse>;
    async fn delete_book(&self, book_id: &str, book_type: BookType) -> AppResult<ApiResponse>;
}

#[derive(Clone)]
pub struct RestBooksApi {
    client: ApiClient,
}

impl RestBooksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Text fields of the book form, in submission order. Empty optionals are
/// left out.
fn form_fields(form: &BookForm) -> Vec<(&'static str, String)> {
    let mut fields = vec![("ISBN", form.isbn.clone()), ("Title", form.title.clone())];
    if let Some(ref sub_title) = form.sub_title {
        fields.push(("SubTitle", sub_title.clone()));
    }
    fields.push(("Author", form.author.clone()));
    if let Some(ref edition) = form.edition {
        fields.push(("Edition", edition.clone()));
    }
    fields.push(("Publisher", form.publisher.clone()));
    if let Some(year) = form.published_year {
        fields.push(("PublishedYear", year.to_string()));
    }
    if let Some(pages) = form.number_of_pages {
        fields.push(("NumberOfPages", pages.to_string()));
    }
    if let Some(ref description) = form.description {
        fields.push(("Description", description.clone()));
    }
    fields
}

fn with_cover(body: Form, cover: Option<CoverImage>) -> AppResult<Form> {
    let Some(cover) = cover else {
        return Ok(body);
    };
    let part = Part::bytes(cover.bytes)
        .file_name(cover.file_name)
        .mime_str(cover.content_type)
        .map_err(|e| AppError::Internal(format!("Invalid cover content type: {}", e)))?;
    Ok(body.part("BookCoverFile", part))
}

fn with_fields(body: Form, form: &BookForm) -> Form {
    form_fields(form)
        .into_iter()
        .fold(body, |body, (name, value)| body.text(name, value))
}

#[async_trait]
impl BooksApi for RestBooksApi {
    async fn get_book_list(&self, query: &BookQuery) -> AppResult<ApiResponse> {
        tracing::info!("Fetching book list page {}", query.page);
        let book_type = query.book_type.map(|t| t.as_str().to_string()).unwrap_or_default();
        self.client
            .get(
                &["Book", "get-book-list"],
                &[
                    ("pageNumber", query.page.to_string()),
                    ("title", query.title.trim().to_string()),
                    ("author", query.author.trim().to_string()),
                    ("bookType", book_type),
                ],
            )
            .await
    }

    async fn get_book_details(&self, book_id: &str, book_type: BookType) -> AppResult<ApiResponse> {
        tracing::info!("Fetching {} book {}", book_type, book_id);
        self.client
            .get(
                &["Book", "get-book-details", book_id],
                &[("bookType", book_type.as_str().to_string())],
            )
            .await
    }

    async fn add_book(&self, form: &BookForm, cover: Option<CoverImage>) -> AppResult<ApiResponse> {
        tracing::info!("Adding {} book '{}'", form.book_type, form.title);
        let body = Form::new().text("BookType", form.book_type.as_str());
        let body = with_fields(with_cover(body, cover)?, form);
        self.client.post_multipart(&["Book", "add-book"], body).await
    }

    async fn update_book(&self, book_id: &str, form: &BookForm, cover: Option<CoverImage>) -> AppResult<ApiResponse> {
        tracing::info!("Updating {} book {}", form.book_type, book_id);
        let body = Form::new()
            .text("BookID", book_id.to_string())
            .text("BookType", form.book_type.as_str());
        let body = with_cover(body, cover)?.text("RemoveBookCover", form.remove_cover.to_string());
        let body = with_fields(body, form);
        self.client
            .put_multipart(&["Book", "update-book", book_id], body)
            .await
    }

    async fn delete_book(&self, book_id: &str, book_type: BookType) -> AppResult<ApiResponse> {
        tracing::info!("Deleting {} book {}", book_type, book_id);
        self.client
            .delete(
                &["Book", "delete-book", book_id],
                &[("bookType", book_type.as_str().to_string())],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_skip_empty_optionals() {
        let form = BookForm {
            isbn: "978-0".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            publisher: "Chilton".to_string(),
            published_year: Some(1965),
            ..Default::default()
        };
        let names: Vec<_> = form_fields(&form).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["ISBN", "Title", "Author", "Publisher", "PublishedYear"]);
    }

    #[test]
    fn test_cover_with_bad_mime_is_error() {
        let cover = CoverImage {
            file_name: "c.png".to_string(),
            content_type: "not a mime",
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(with_cover(Form::new(), Some(cover)), Err(AppError::Internal(_))));
    }
}
