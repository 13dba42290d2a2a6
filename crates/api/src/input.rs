// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation of raw request values.
//!
//! Timestamps arrive as RFC 3339 strings and intervals as whole minutes.
//! Windows are checked here so that an empty or reversed window from a
//! client is a 400, not a consistency failure in the domain.

use nakki_domain::Locale;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::error::ApiError;

/// Malformed request values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The value is not an RFC 3339 timestamp.
    #[error("'{value}' is not an RFC 3339 timestamp")]
    InvalidTimestamp { field: &'static str, value: String },

    /// The locale is not supported.
    #[error("Unsupported locale '{0}'; expected 'fi' or 'en'")]
    InvalidLocale(String),

    /// The interval is not a positive number of minutes.
    #[error("Interval must be a positive number of minutes, got {0}")]
    InvalidInterval(i64),

    /// The window end is not after its start.
    #[error("End must be after start")]
    EmptyWindow,

    /// The slot count is zero.
    #[error("Count must be at least 1")]
    InvalidCount,
}

impl InputError {
    /// Returns the request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidTimestamp { field, .. } => *field,
            Self::InvalidLocale(_) => "locale",
            Self::InvalidInterval(_) => "interval_minutes",
            Self::EmptyWindow => "end",
            Self::InvalidCount => "count",
        }
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        Self::InvalidInput {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Parses an RFC 3339 timestamp and normalizes it to UTC.
///
/// # Errors
///
/// Returns `InputError::InvalidTimestamp` if the value does not parse.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<OffsetDateTime, InputError> {
    OffsetDateTime::parse(value.trim(), &Rfc3339)
        .map(|parsed| parsed.to_offset(UtcOffset::UTC))
        .map_err(|_| InputError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Parses an optional locale, falling back to `default`.
///
/// # Errors
///
/// Returns `InputError::InvalidLocale` for anything but `fi` or `en`.
pub fn parse_locale(value: Option<&str>, default: Locale) -> Result<Locale, InputError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| InputError::InvalidLocale(raw.to_string())),
    }
}

/// Parses a shift window from its request fields.
///
/// # Errors
///
/// Returns an error if a timestamp is malformed, the interval is not
/// positive, or `end <= start`.
pub fn parse_window(
    start: &str,
    end: &str,
    interval_minutes: i64,
) -> Result<(OffsetDateTime, OffsetDateTime, Duration), InputError> {
    let start: OffsetDateTime = parse_timestamp("start", start)?;
    let end: OffsetDateTime = parse_timestamp("end", end)?;
    if interval_minutes <= 0 {
        return Err(InputError::InvalidInterval(interval_minutes));
    }
    if end <= start {
        return Err(InputError::EmptyWindow);
    }
    Ok((start, end, Duration::minutes(interval_minutes)))
}
