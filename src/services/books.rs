//! Book catalog service

use std::path::Path;
use std::sync::Arc;

use validator::Validate;

use crate::{
    adapter,
    api::BooksApi,
    error::{AppError, AppResult},
    models::{BookForm, BookPage, BookQuery, BookRecord, BookType, CoverImage},
};

#[derive(Clone)]
pub struct BooksService {
    api: Arc<dyn BooksApi>,
}

impl BooksService {
    pub fn new(api: Arc<dyn BooksApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &BookQuery) -> AppResult<BookPage> {
        query.validate()?;
        let response = self.api.get_book_list(query).await?;
        let page = adapter::page::book_page(&response.data, query.page)?;
        tracing::info!("Loaded {} books (page {}/{})", page.books.len(), page.page, page.total_pages);
        Ok(page)
    }

    pub async fn details(&self, book_id: &str, book_type: BookType) -> AppResult<BookRecord> {
        let book_id = validate_book_id(book_id)?;
        let response = self.api.get_book_details(book_id, book_type).await?;

        // Details arrive either bare or wrapped in `result`
        let data = adapter::page::unwrap_result(&response.data);
        if !data.is_object() {
            return Err(AppError::MalformedResponse("book details are not an object".to_string()));
        }
        Ok(adapter::book::from_value(data))
    }

    /// Add a book, optionally uploading the cover at `cover`
    pub async fn add(&self, form: BookForm, cover: Option<&Path>) -> AppResult<String> {
        let form = form.trimmed();
        form.validate()?;
        let cover = load_cover(cover).await?;

        let response = self.api.add_book(&form, cover).await?;
        tracing::info!("Added {} book '{}'", form.book_type, form.title);
        Ok(response.message.unwrap_or_else(|| "Book added".to_string()))
    }

    /// Replace a book's details. A new cover wins over `remove_cover`.
    pub async fn update(&self, book_id: &str, form: BookForm, cover: Option<&Path>) -> AppResult<String> {
        let book_id = validate_book_id(book_id)?;
        let mut form = form.trimmed();
        form.validate()?;
        let cover = load_cover(cover).await?;
        if cover.is_some() {
            form.remove_cover = false;
        }

        let response = self.api.update_book(book_id, &form, cover).await?;
        tracing::info!("Updated {} book {}", form.book_type, book_id);
        Ok(response.message.unwrap_or_else(|| "Book updated".to_string()))
    }

    pub async fn delete(&self, book_id: &str, book_type: BookType) -> AppResult<String> {
        let book_id = validate_book_id(book_id)?;
        let response = self.api.delete_book(book_id, book_type).await?;
        tracing::info!("Deleted {} book {}", book_type, book_id);
        Ok(response.message.unwrap_or_else(|| "Book deleted".to_string()))
    }
}

/// Ids travel as one encoded path segment; `.` and `..` would be dropped by
/// URL normalization, so they are refused.
fn validate_book_id(book_id: &str) -> AppResult<&str> {
    let book_id = book_id.trim();
    if book_id.is_empty() || book_id == "." || book_id == ".." {
        return Err(AppError::Validation(format!("Invalid book id '{}'", book_id)));
    }
    Ok(book_id)
}

async fn load_cover(path: Option<&Path>) -> AppResult<Option<CoverImage>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = CoverImage::content_type_for(&file_name).ok_or_else(|| {
        AppError::Validation(format!("Cover must be a JPEG, PNG, WebP or GIF image: {}", path.display()))
    })?;
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        tracing::error!("Failed to read cover {}: {}", path.display(), e);
        AppError::Validation(format!("Cannot read cover {}: {}", path.display(), e))
    })?;

    Ok(Some(CoverImage {
        file_name,
        content_type,
        bytes,
    }))
}
