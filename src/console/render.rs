//! Text rendering of registrations and books

use chrono::Local;

use crate::models::{BookPage, BookRecord, RegistrationAction, RegistrationPage, RegistrationRecord};

pub const NO_DOCUMENT: &str = "No Document";
const MISSING: &str = "-";

/// Display-ready view of one registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRow {
    pub public_id: String,
    pub registration_number: String,
    pub library_name: String,
    pub library_type: String,
    pub owner: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    pub township: String,
    pub state_division: String,
    pub status: String,
    /// Shown only for declined or banned registrations
    pub note: Option<String>,
    pub registered_at: String,
    pub document: String,
    pub google_user: &'static str,
    pub email_verified: &'static str,
    pub actions: Vec<RegistrationAction>,
    pub busy: bool,
}

impl RegistrationRow {
    pub fn new(record: &RegistrationRecord, actions: Vec<RegistrationAction>, busy: bool) -> Self {
        Self {
            public_id: record.public_id.clone(),
            registration_number: record.registration_number.clone(),
            library_name: record.library_name.clone(),
            library_type: record.library_type.clone(),
            owner: record.owner_name.clone(),
            contact: record.contact_person.clone(),
            email: record.email.clone(),
            phone: record.phone_number.clone(),
            township: record.township.clone(),
            state_division: record.state_division.clone(),
            status: record.status.to_string(),
            note: record
                .admin_notes
                .clone()
                .filter(|_| record.status.shows_admin_notes()),
            registered_at: record
                .registered_at
                .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            document: record
                .document_file
                .clone()
                .unwrap_or_else(|| NO_DOCUMENT.to_string()),
            google_user: yes_no(record.is_google_user),
            email_verified: yes_no(record.is_email_verified),
            actions,
            busy,
        }
    }

    fn actions_label(&self) -> String {
        if self.busy {
            return "(working...)".to_string();
        }
        self.actions
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

/// Registrations table, one record per block
pub fn registrations_table(rows: &[RegistrationRow], page: &RegistrationPage) -> String {
    if rows.is_empty() {
        return "No library found".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<22} {:<28} {:<10} {:<17} {}\n",
        "Reg No", "Library", "Status", "Registered At", "Actions"
    ));
    for row in rows {
        out.push_str(&format!(
            "{:<22} {:<28} {:<10} {:<17} {}\n",
            clip(&row.registration_number, 22),
            clip(&row.library_name, 28),
            row.status,
            row.registered_at,
            row.actions_label()
        ));
        out.push_str(&format!(
            "    id: {}  type: {}  owner: {} / {}\n",
            row.public_id, row.library_type, row.owner, row.contact
        ));
        out.push_str(&format!(
            "    {} / {}  {}, {}\n",
            row.email, row.phone, row.township, row.state_division
        ));
        out.push_str(&format!(
            "    document: {}  google user: {}  email verified: {}\n",
            row.document, row.google_user, row.email_verified
        ));
        if let Some(ref note) = row.note {
            out.push_str(&format!("    note: {}\n", note));
        }
    }
    out.push_str(&format!(
        "Page {} of {} ({} total)",
        page.page,
        page.total_pages.max(1),
        page.total_items
    ));
    out
}

pub fn books_table(page: &BookPage) -> String {
    if page.books.is_empty() {
        return "No book found".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:<8} {:<36} {:<24} {}\n",
        "ID", "Type", "Title", "Author", "ISBN"
    ));
    for book in &page.books {
        out.push_str(&format!(
            "{:<8} {:<8} {:<36} {:<24} {}\n",
            clip(&book.id, 8),
            book.book_type,
            clip(&book.title, 36),
            clip(&book.author, 24),
            book.isbn
        ));
    }
    out.push_str(&format!(
        "Page {} of {} ({} total)",
        page.page,
        page.total_pages.max(1),
        page.total_items
    ));
    out
}

pub fn book_details(book: &BookRecord) -> String {
    let optional = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
    let mut lines = vec![
        format!("ID:          {}", book.id),
        format!("Collection:  {}", book.book_type),
        format!("Title:       {}", book.title),
        format!("Subtitle:    {}", optional(&book.sub_title)),
        format!("Author:      {}", book.author),
        format!("Edition:     {}", optional(&book.edition)),
        format!("Publisher:   {}", book.publisher),
        format!("ISBN:        {}", book.isbn),
    ];
    if let Some(year) = book.published_year {
        lines.push(format!("Published:   {}", year));
    }
    if let Some(pages) = book.number_of_pages {
        lines.push(format!("Pages:       {}", pages));
    }
    if let Some(ref description) = book.description {
        lines.push(format!("\n{}", description));
    }
    lines.join("\n")
}
