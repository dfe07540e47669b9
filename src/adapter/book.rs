//! Book record normalization

use serde_json::Value;

use super::Fields;
use crate::models::{BookRecord, BookType};

pub fn from_value(raw: &Value) -> BookRecord {
    let f = Fields::new(raw);

    let book_type = f
        .opt_string(&["BookType"])
        .and_then(|s| s.parse::<BookType>().ok())
        .unwrap_or_default();

    BookRecord {
        id: f.string(&["BookID", "BookId", "Id", "ID"]),
        book_type,
        item_barcode_id: f.opt_string(&["ItemBarCodeID", "ItemBarcodeId"]),
        isbn: f.string(&["ISBN", "isbn", "Isbn"]),
        title: f.string(&["Title"]),
        sub_title: f.opt_string(&["SubTitle", "Subtitle"]),
        author: f.string(&["Author"]),
        edition: f.opt_string(&["Edition"]),
        publisher: f.string(&["Publisher"]),
        published_year: f.i64(&["PublishedYear"]).and_then(|y| i32::try_from(y).ok()),
        number_of_pages: f.u32(&["NumberOfPages"]),
        description: f.opt_string(&["Description"]),
        cover_url: f.opt_string(&["BookCoverUrl", "BookCover", "CoverUrl", "BookCoverFile"]),
    }
}
