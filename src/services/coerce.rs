//! Lenient conversion of incoming JSON field values.
//!
//! Form clients send numbers and dates as strings, API clients send them as
//! JSON numbers or RFC 3339 timestamps; both are accepted here.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// A raw field value as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldInput {
    /// Blank strings count as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldInput::Text(text) => text.trim().is_empty(),
            FieldInput::Other(value) => value.is_null(),
            FieldInput::Number(_) => false,
        }
    }
}

/// Field present and not blank, or the `"<field> is required"` error.
pub fn require<'a>(
    field: &'static str,
    value: Option<&'a FieldInput>,
) -> Result<&'a FieldInput, ServiceError> {
    match value {
        Some(input) if !input.is_blank() => Ok(input),
        _ => Err(ServiceError::missing(field)),
    }
}

pub fn to_number(field: &str, input: &FieldInput) -> Result<f64, ServiceError> {
    let parsed = match input {
        FieldInput::Number(n) => Some(*n),
        FieldInput::Text(text) => text.trim().parse::<f64>().ok(),
        FieldInput::Other(_) => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| ServiceError::InvalidField(format!("{} must be a number", field)))
}

/// Dates are stored as text; four-digit years keep text order equal to time order.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC, or epoch milliseconds.
pub fn to_datetime(field: &str, input: &FieldInput) -> Result<DateTime<Utc>, ServiceError> {
    let parsed = match input {
        FieldInput::Text(text) => parse_date_text(text.trim()),
        FieldInput::Number(millis) if millis.fract() == 0.0 => {
            Utc.timestamp_millis_opt(*millis as i64).single()
        }
        _ => None,
    };
    parsed
        .filter(|at| (MIN_YEAR..=MAX_YEAR).contains(&at.year()))
        .ok_or_else(|| ServiceError::InvalidField(format!("{} must be a valid date", field)))
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Trimmed text, with blank collapsing to `None`. Numbers are rendered as
/// text so a mobile number sent as a JSON number is kept.
pub fn to_optional_text(input: Option<&FieldInput>) -> Option<String> {
    match input? {
        FieldInput::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        FieldInput::Number(n) => Some(format_number(*n)),
        FieldInput::Other(_) => None,
    }
}

pub fn to_text(field: &str, input: &FieldInput) -> Result<String, ServiceError> {
    to_optional_text(Some(input))
        .ok_or_else(|| ServiceError::InvalidField(format!("{} must be text", field)))
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse an enum-like field via `FromStr`, surfacing its message as a 400.
pub fn to_enum<T>(field: &str, input: &FieldInput) -> Result<T, ServiceError>
where
    T: std::str::FromStr<Err = String>,
{
    match input {
        FieldInput::Text(text) => text.parse::<T>().map_err(ServiceError::InvalidField),
        _ => Err(ServiceError::InvalidField(format!("{} must be text", field))),
    }
}
