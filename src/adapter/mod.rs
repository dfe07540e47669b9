//! Backend payload normalization
//!
//! The portal backend serializes the same field as `PublicId` or `publicId`
//! depending on the endpoint. Everything in this module coalesces those
//! spellings into the typed models; no other module reads raw field names.

pub mod auth;
pub mod book;
pub mod envelope;
pub mod page;
pub mod registration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Read-only view over a JSON object with case-tolerant lookups
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    object: Option<&'a serde_json::Map<String, Value>>,
}

impl<'a> Fields<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            object: value.as_object(),
        }
    }

    /// First non-null value among `names`, each tried as given and in camelCase
    pub fn get(&self, names: &[&str]) -> Option<&'a Value> {
        let object = self.object?;
        names.iter().find_map(|name| {
            let present = |key: &str| object.get(key).filter(|v| !v.is_null());
            present(*name).or_else(|| present(&camel_case(name)))
        })
    }

    /// String value, or empty string when absent
    pub fn string(&self, names: &[&str]) -> String {
        self.opt_string(names).unwrap_or_default()
    }

    /// Non-blank string value
    pub fn opt_string(&self, names: &[&str]) -> Option<String> {
        match self.get(names)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Boolean accepting `true`, `"true"`, `1` and their negatives; absent is false
    pub fn bool(&self, names: &[&str]) -> bool {
        match self.get(names) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().map(|v| v != 0).unwrap_or(false),
            Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
            _ => false,
        }
    }

    /// Integer from a JSON number or a numeric string
    pub fn i64(&self, names: &[&str]) -> Option<i64> {
        match self.get(names)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn u64(&self, names: &[&str]) -> Option<u64> {
        self.i64(names).and_then(|v| u64::try_from(v).ok())
    }

    pub fn u32(&self, names: &[&str]) -> Option<u32> {
        self.i64(names).and_then(|v| u32::try_from(v).ok())
    }

    /// Timestamp in RFC 3339, or a zone-less ISO form read as UTC
    pub fn datetime(&self, names: &[&str]) -> Option<DateTime<Utc>> {
        let raw = self.opt_string(names)?;
        parse_timestamp(&raw)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `PublicId` -> `publicId`
fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
