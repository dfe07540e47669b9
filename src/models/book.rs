//! Book record model, list query and edit form

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::BookType;

/// A catalog book as returned by the book backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub book_type: BookType,
    pub item_barcode_id: Option<String>,
    pub isbn: String,
    pub title: String,
    pub sub_title: Option<String>,
    pub author: String,
    pub edition: Option<String>,
    pub publisher: String,
    pub published_year: Option<i32>,
    pub number_of_pages: Option<u32>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

/// Book list query parameters
#[derive(Debug, Clone, PartialEq, Eq, Validate, Serialize, Deserialize)]
pub struct BookQuery {
    #[validate(range(min = 1, message = "Page number must be at least 1"))]
    pub page: u32,
    pub title: String,
    pub author: String,
    pub book_type: Option<BookType>,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            page: 1,
            title: String::new(),
            author: String::new(),
            book_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BookPage {
    pub books: Vec<BookRecord>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

/// Fields submitted when adding or editing a book
#[derive(Debug, Clone, PartialEq, Eq, Default, Validate)]
pub struct BookForm {
    pub book_type: BookType,
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub sub_title: Option<String>,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub edition: Option<String>,
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub publisher: String,
    #[validate(range(min = 1, max = 9999, message = "Published year must be between 1 and 9999"))]
    pub published_year: Option<i32>,
    #[validate(range(min = 1, message = "Number of pages must be at least 1"))]
    pub number_of_pages: Option<u32>,
    pub description: Option<String>,
    /// Drop the stored cover; only meaningful on update
    pub remove_cover: bool,
}

impl BookForm {
    /// Prefill from an existing book, as the edit form does
    pub fn from_record(book: &BookRecord) -> Self {
        Self {
            book_type: book.book_type,
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            sub_title: book.sub_title.clone(),
            author: book.author.clone(),
            edition: book.edition.clone(),
            publisher: book.publisher.clone(),
            published_year: book.published_year,
            number_of_pages: book.number_of_pages,
            description: book.description.clone(),
            remove_cover: false,
        }
    }

    /// Trim every text field; blank optional fields become `None`
    pub fn trimmed(self) -> Self {
        fn opt(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            isbn: self.isbn.trim().to_string(),
            title: self.title.trim().to_string(),
            sub_title: opt(self.sub_title),
            author: self.author.trim().to_string(),
            edition: opt(self.edition),
            publisher: self.publisher.trim().to_string(),
            description: opt(self.description),
            ..self
        }
    }
}

/// Cover image ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl CoverImage {
    /// MIME type for a cover file name, by extension
    pub fn content_type_for(file_name: &str) -> Option<&'static str> {
        let ext = file_name.rsplit_once('.')?.1.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            "gif" => Some("image/gif"),
            _ => None,
        }
    }
}
