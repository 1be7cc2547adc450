//
//  atlas-rest
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types shared by every product client
//!
//! This module holds the pieces of the REST core that do not depend on a
//! particular product or API version:
//!
//! - [`ApiError`] - the closed set of classified HTTP failures
//! - [`ErrorRecord`] - the diagnostics extracted from a failed response
//! - [`classify`] - the HTTP-status-to-error-kind classifier
//! - Pagination (re-exported from the [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use atlas_rest::api::common::{classify, ApiError, ErrorKind};
//!
//! let body = r#"{"errorMessages": ["Issue does not exist"], "errors": {}}"#;
//! let error = classify(404, None, body).expect("404 is an error");
//!
//! assert_eq!(error.kind(), ErrorKind::NotFound);
//! assert_eq!(error.messages(), ["Issue does not exist".to_string()]);
//! assert!(error.to_string().contains("404"));
//! ```
//!
//! # Error Body Formats
//!
//! | Product | Shape |
//! |---------|-------|
//! | Jira | `{"errorMessages": [...], "errors": {"field": "message"}}` |
//! | Confluence | `{"message": "..."}` |
//! | Bitbucket Cloud | `{"type": "error", "error": {"message": "..."}}` |
//! | Bitbucket Server | `{"errors": [{"message": "..."}]}` |

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Longest slice of a non-JSON error body kept as the diagnostic reason.
pub const REASON_PREFIX_LEN: usize = 200;

/// The kind of a classified HTTP failure.
///
/// | Kind | HTTP Status |
/// |------|-------------|
/// | `NotFound` | 404 |
/// | `PermissionDenied` | 403 |
/// | `AuthRequired` | 401 |
/// | `BadRequest` | 400 |
/// | `Conflict` | 409 |
/// | `RateLimited` | 429 |
/// | `ServerError` | 5xx |
/// | `Unclassified` | any other status >= 400 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    AuthRequired,
    BadRequest,
    Conflict,
    RateLimited,
    ServerError,
    Unclassified,
}

impl ErrorKind {
    /// Selects the kind for an HTTP status, or `None` below 400.
    pub fn from_status(status: u16) -> Option<Self> {
        let kind = match status {
            0..=399 => return None,
            400 => Self::BadRequest,
            401 => Self::AuthRequired,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unclassified,
        };
        Some(kind)
    }
}

/// Diagnostics extracted from a failed HTTP response.
///
/// `ErrorRecord` keeps everything the server told us about a failure in a
/// structured form. Its `Display` implementation always renders the status
/// code followed by the extracted messages, so printing the error is enough
/// to act on it.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `status` | HTTP status code |
/// | `reason` | Reason phrase, or the truncated raw body when it was not JSON |
/// | `messages` | Messages listed by the server |
/// | `field_errors` | Per-field validation messages |
/// | `retry_after` | Seconds to wait, from `Retry-After` (429 only) |
///
/// # Example
///
/// ```rust
/// use atlas_rest::api::common::ErrorRecord;
///
/// let record = ErrorRecord {
///     status: 400,
///     reason: "Bad Request".to_string(),
///     messages: vec!["Field 'summary' is required".to_string()],
///     ..Default::default()
/// };
///
/// assert_eq!(
///     record.to_string(),
///     "HTTP 400 Bad Request: Field 'summary' is required"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorRecord {
    /// HTTP status code of the failed response.
    pub status: u16,

    /// Reason phrase for the status.
    ///
    /// When the body could not be parsed as JSON this holds a prefix of the
    /// raw body instead, truncated to [`REASON_PREFIX_LEN`] characters.
    pub reason: String,

    /// Messages extracted from the body, in server order.
    pub messages: Vec<String>,

    /// Field name to validation message.
    pub field_errors: BTreeMap<String, String>,

    /// Retry hint in seconds, taken from the `Retry-After` header.
    pub retry_after: Option<u64>,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.reason.is_empty() {
            write!(f, " {}", self.reason)?;
        }
        if !self.messages.is_empty() {
            write!(f, ": {}", self.messages.join("; "))?;
        }
        if !self.field_errors.is_empty() {
            let fields: Vec<String> = self
                .field_errors
                .iter()
                .map(|(field, message)| format!("{field}: {message}"))
                .collect();
            write!(f, " [{}]", fields.join(", "))?;
        }
        if let Some(seconds) = self.retry_after {
            write!(f, " (retry after {seconds}s)")?;
        }
        Ok(())
    }
}

/// A classified HTTP failure.
///
/// Every non-success response that reaches the REST core is turned into one
/// of these variants by [`classify`]. Each variant carries the full
/// [`ErrorRecord`], so callers can match on the kind and still get at the
/// server's diagnostics.
///
/// # Example
///
/// ```rust
/// use atlas_rest::api::common::{classify, ApiError};
///
/// let error = classify(429, Some("30"), "").unwrap();
/// match &error {
///     ApiError::RateLimited(record) => assert_eq!(record.retry_after, Some(30)),
///     other => panic!("unexpected error: {other}"),
/// }
/// ```
///
/// # Notes
///
/// - The REST core never retries; a `RateLimited` error is handed back to
///   the caller with the server's hint
/// - Use [`ApiError::kind`] when only the category matters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The requested resource does not exist (404).
    #[error("Resource not found ({0})")]
    NotFound(ErrorRecord),

    /// The credentials are valid but lack permission (403).
    #[error("Permission denied ({0})")]
    PermissionDenied(ErrorRecord),

    /// Authentication is missing or was rejected (401).
    #[error("Authentication required ({0})")]
    AuthRequired(ErrorRecord),

    /// The request was malformed or failed validation (400).
    #[error("Bad request ({0})")]
    BadRequest(ErrorRecord),

    /// The request conflicts with the current resource state (409).
    #[error("Conflict ({0})")]
    Conflict(ErrorRecord),

    /// Too many requests (429).
    #[error("Rate limit exceeded ({0})")]
    RateLimited(ErrorRecord),

    /// The server failed to handle the request (5xx).
    #[error("Server error ({0})")]
    ServerError(ErrorRecord),

    /// Any other status >= 400.
    #[error("Unexpected response ({0})")]
    Unclassified(ErrorRecord),
}

impl ApiError {
    /// Wraps a record in the variant for `kind`.
    pub fn new(kind: ErrorKind, record: ErrorRecord) -> Self {
        match kind {
            ErrorKind::NotFound => Self::NotFound(record),
            ErrorKind::PermissionDenied => Self::PermissionDenied(record),
            ErrorKind::AuthRequired => Self::AuthRequired(record),
            ErrorKind::BadRequest => Self::BadRequest(record),
            ErrorKind::Conflict => Self::Conflict(record),
            ErrorKind::RateLimited => Self::RateLimited(record),
            ErrorKind::ServerError => Self::ServerError(record),
            ErrorKind::Unclassified => Self::Unclassified(record),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::AuthRequired(_) => ErrorKind::AuthRequired,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::ServerError(_) => ErrorKind::ServerError,
            Self::Unclassified(_) => ErrorKind::Unclassified,
        }
    }

    pub fn record(&self) -> &ErrorRecord {
        match self {
            Self::NotFound(record)
            | Self::PermissionDenied(record)
            | Self::AuthRequired(record)
            | Self::BadRequest(record)
            | Self::Conflict(record)
            | Self::RateLimited(record)
            | Self::ServerError(record)
            | Self::Unclassified(record) => record,
        }
    }

    pub fn status(&self) -> u16 {
        self.record().status
    }

    pub fn messages(&self) -> &[String] {
        &self.record().messages
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.record().field_errors
    }

    /// The server's retry hint as a [`Duration`], if one was sent.
    pub fn retry_after(&self) -> Option<Duration> {
        self.record().retry_after.map(Duration::from_secs)
    }
}

/// Classifies a raw HTTP response.
///
/// Returns `None` for any status below 400. Otherwise the kind is selected
/// by status, the body is searched for a message list and a field map, and for
/// 429 responses the `Retry-After` header value is parsed (integer seconds
/// or an HTTP-date).
///
/// # Parameters
///
/// * `status` - The HTTP status code
/// * `retry_after` - The raw `Retry-After` header value, if present
/// * `body` - The raw response body
///
/// # Example
///
/// ```rust
/// use atlas_rest::api::common::{classify, ErrorKind};
///
/// assert!(classify(200, None, "{}").is_none());
///
/// let error = classify(502, None, "<html>Bad Gateway</html>").unwrap();
/// assert_eq!(error.kind(), ErrorKind::ServerError);
/// assert_eq!(error.record().reason, "<html>Bad Gateway</html>");
/// ```
pub fn classify(status: u16, retry_after: Option<&str>, body: &str) -> Option<ApiError> {
    let kind = ErrorKind::from_status(status)?;

    let canonical = StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_default()
        .to_string();

    let mut record = ErrorRecord {
        status,
        reason: canonical,
        ..Default::default()
    };

    match extract_diagnostics(body) {
        Some((messages, field_errors)) => {
            record.messages = messages;
            record.field_errors = field_errors;
        }
        None => {
            let trimmed = body.trim();
            if !trimmed.is_empty() {
                record.reason = truncate(trimmed, REASON_PREFIX_LEN);
            }
        }
    }

    if kind == ErrorKind::RateLimited {
        record.retry_after = retry_after.and_then(parse_retry_after);
    }

    Some(ApiError::new(kind, record))
}

/// Pulls the message list and field map out of a JSON error body.
///
/// Returns `None` when the body is not JSON or not a shape that can carry
/// messages, so the caller falls back to the raw text.
fn extract_diagnostics(body: &str) -> Option<(Vec<String>, BTreeMap<String, String>)> {
    let json: Value = serde_json::from_str(body).ok()?;

    let mut messages = Vec::new();
    let mut field_errors = BTreeMap::new();

    match &json {
        Value::Object(map) => {
            // Jira: {"errorMessages": [...]}
            if let Some(Value::Array(list)) = map.get("errorMessages") {
                messages.extend(list.iter().filter_map(message_text));
            }

            // Confluence and friends: {"message": "..."}
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                messages.push(message.to_string());
            }

            // Bitbucket Cloud: {"error": {"message": "..."}}
            if let Some(error) = map.get("error") {
                if let Some(message) = error.get("message").and_then(Value::as_str) {
                    messages.push(message.to_string());
                } else if let Some(message) = error.as_str() {
                    messages.push(message.to_string());
                }
            }

            match map.get("errors") {
                Some(Value::Object(fields)) => {
                    for (field, value) in fields {
                        let text = value
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| value.to_string());
                        field_errors.insert(field.clone(), text);
                    }
                }
                // Bitbucket Server: {"errors": [{"message": "..."}]}
                Some(Value::Array(list)) => {
                    messages.extend(list.iter().filter_map(message_text));
                }
                _ => {}
            }
        }
        Value::String(message) => messages.push(message.clone()),
        _ => return None,
    }

    Some((messages, field_errors))
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Parses a `Retry-After` value: delta-seconds or an HTTP-date.
fn parse_retry_after(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds);
    }

    let when = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = when.with_timezone(&Utc) - Utc::now();
    Some(u64::try_from(delta.num_seconds()).unwrap_or(0))
}

/// Truncates to `max` characters including the trailing ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
