//! Paginated list containers

use serde_json::Value;

use super::{book, registration, Fields};
use crate::{
    error::{AppError, AppResult},
    models::{BookPage, RegistrationPage},
};

/// Pieces of a paginated container before item mapping
#[derive(Debug)]
struct PageParts<'a> {
    items: &'a [Value],
    page: Option<u32>,
    total_pages: Option<u32>,
    total_items: Option<u64>,
}

/// `data.result` when present, else `data`
pub fn unwrap_result(data: &Value) -> &Value {
    Fields::new(data).get(&["Result"]).unwrap_or(data)
}

/// Locate the list inside `data`.
///
/// Accepted shapes: `{result: {Items, TotalItems, TotalPages, PageNumber}}`,
/// `{result: [...]}`, the container itself, or a bare array.
fn page_parts<'a>(data: &'a Value, list_keys: &[&str]) -> AppResult<PageParts<'a>> {
    let container = unwrap_result(data);

    if let Value::Array(items) = container {
        return Ok(PageParts {
            items,
            page: None,
            total_pages: None,
            total_items: None,
        });
    }

    let f = Fields::new(container);
    match f.get(list_keys) {
        Some(Value::Array(items)) => Ok(PageParts {
            items,
            page: f.u32(&["PageNumber", "Page"]),
            total_pages: f.u32(&["TotalPages"]),
            total_items: f.u64(&["TotalItems", "TotalCount"]),
        }),
        _ => Err(AppError::MalformedResponse(
            "response contains no item list".to_string(),
        )),
    }
}

fn totals(parts: &PageParts<'_>, requested_page: u32) -> (u32, u32, u64) {
    let count = parts.items.len() as u64;
    let total_items = parts.total_items.unwrap_or(count);
    let total_pages = parts
        .total_pages
        .unwrap_or(if count > 0 { 1 } else { 0 });
    let page = parts.page.filter(|p| *p >= 1).unwrap_or(requested_page);
    (page, total_pages, total_items)
}

pub fn registration_page(data: &Value, requested_page: u32) -> AppResult<RegistrationPage> {
    let parts = page_parts(data, &["Items"])?;
    let (page, total_pages, total_items) = totals(&parts, requested_page);
    Ok(RegistrationPage {
        records: parts.items.iter().map(registration::from_value).collect(),
        page,
        total_pages,
        total_items,
    })
}

pub fn book_page(data: &Value, requested_page: u32) -> AppResult<BookPage> {
    let parts = page_parts(data, &["Items", "Books"])?;
    let (page, total_pages, total_items) = totals(&parts, requested_page);
    Ok(BookPage {
        books: parts.items.iter().map(book::from_value).collect(),
        page,
        total_pages,
        total_items,
    })
}
