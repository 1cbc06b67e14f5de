//! Best-effort field readers. A missing or ill-typed field reads as `None`, never as an error.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use mongodb::bson::{Bson, Document};

pub fn identifier(document: &Document, key: &str) -> Option<String> {
    match document.get(key)? {
        Bson::String(value) => Some(value.clone()),
        Bson::ObjectId(id) => Some(id.to_hex()),
        Bson::Int32(value) => Some(value.to_string()),
        Bson::Int64(value) => Some(value.to_string()),
        _ => None,
    }
}

pub fn text(document: &Document, key: &str) -> Option<String> {
    match document.get(key)? {
        Bson::String(value) => Some(value.clone()),
        _ => None,
    }
}

pub fn number(document: &Document, key: &str) -> Option<f64> {
    let value = match document.get(key)? {
        Bson::Int32(value) => f64::from(*value),
        Bson::Int64(value) => *value as f64,
        Bson::Double(value) => *value,
        _ => return None,
    };

    value.is_finite().then_some(value)
}

pub fn timestamp(document: &Document, key: &str) -> Option<NaiveDateTime> {
    match document.get(key)? {
        Bson::DateTime(value) => {
            DateTime::from_timestamp_millis(value.timestamp_millis()).map(|utc| utc.naive_utc())
        }
        Bson::String(value) => parse_timestamp(value),
        _ => None,
    }
}

/// Category-like fields hold either a list of labels or a single label.
pub fn labels(document: &Document, key: &str) -> Vec<String> {
    match document.get(key) {
        Some(Bson::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Bson::String(value)) => vec![value.clone()],
        _ => Vec::new(),
    }
}

pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();

    if let Ok(value) = DateTime::parse_from_rfc3339(input) {
        return Some(value.naive_utc());
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(input, format) {
            return Some(value);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
