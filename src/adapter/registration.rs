//! Registration record normalization

use serde_json::Value;

use super::Fields;
use crate::models::{RegistrationRecord, RegistrationStatus};

/// Map a raw backend registration into a `RegistrationRecord`.
///
/// Total: missing or mistyped fields become empty strings, `false` or `None`.
pub fn from_value(raw: &Value) -> RegistrationRecord {
    let f = Fields::new(raw);

    let status = match f.opt_string(&["Status"]) {
        Some(s) => s.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown registration status '{}', treating as Pending", s);
            RegistrationStatus::Pending
        }),
        None => RegistrationStatus::Pending,
    };

    let record = RegistrationRecord {
        public_id: f.string(&["PublicId", "PublicID", "LibraryId"]),
        registration_number: f.string(&["RegistrationNumber", "RegistrationNo"]),
        library_name: f.string(&["LibraryName"]),
        library_type: f.string(&["LibraryType"]),
        owner_name: f.string(&["OwnerName"]),
        contact_person: f.string(&["ContactPerson"]),
        email: f.string(&["Email"]),
        phone_number: f.string(&["PhoneNumber"]),
        township: f.string(&["Township"]),
        state_division: f.string(&["StateDivision"]),
        address: f.string(&["Address"]),
        document_file: f.opt_string(&["DocumentFile", "DocumentFileUrl"]),
        registered_at: f.datetime(&["RegisteredAt", "CreatedAt"]),
        is_google_user: f.bool(&["IsGoogleUser"]),
        is_email_verified: f.bool(&["IsEmailVerified"]),
        status,
        admin_notes: f.opt_string(&["AdminNotes", "AdminNote"]),
    };

    if record.public_id.is_empty() {
        tracing::warn!(
            "Registration '{}' arrived without a public id",
            record.registration_number
        );
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pascal_case_record() {
        let raw = json!({
            "PublicId": "p-1",
            "RegistrationNumber": "LIB-20240131-4F2A9C",
            "LibraryName": "Yangon Central",
            "LibraryType": "Public",
            "OwnerName": "U Ba",
            "ContactPerson": "Daw Mya",
            "Email": "central@lib.mm",
            "PhoneNumber": "0912345",
            "Township": "Kamayut",
            "StateDivision": "Yangon",
            "Address": "1 Main Rd",
            "DocumentFile": "license.pdf",
            "RegisteredAt": "2024-01-31T10:00:00Z",
            "IsGoogleUser": true,
            "IsEmailVerified": true,
            "Status": "Approved",
            "AdminNotes": null
        });

        let record = from_value(&raw);
        assert_eq!(record.public_id, "p-1");
        assert_eq!(record.registration_number, "LIB-20240131-4F2A9C");
        assert_eq!(record.library_name, "Yangon Central");
        assert_eq!(record.state_division, "Yangon");
        assert_eq!(record.document_file.as_deref(), Some("license.pdf"));
        assert!(record.registered_at.is_some());
        assert!(record.is_google_user);
        assert!(record.is_email_verified);
        assert_eq!(record.status, RegistrationStatus::Approved);
        assert_eq!(record.admin_notes, None);
    }

    #[test]
    fn test_camel_case_record_matches_pascal() {
        let pascal = json!({ "PublicId": "x", "LibraryName": "L", "Status": "Declined", "AdminNotes": "dup" });
        let camel = json!({ "publicId": "x", "libraryName": "L", "status": "Declined", "adminNotes": "dup" });
        assert_eq!(from_value(&pascal), from_value(&camel));
    }

    #[test]
    fn test_missing_fields_default() {
        let record = from_value(&json!({}));
        assert_eq!(record, RegistrationRecord::default());
        assert_eq!(record.status, RegistrationStatus::Pending);

        // Not even an object
        assert_eq!(from_value(&json!("garbage")), RegistrationRecord::default());
    }

    #[test]
    fn test_blank_document_is_absent() {
        let record = from_value(&json!({ "documentFile": "  " }));
        assert!(!record.has_document());
    }
}
