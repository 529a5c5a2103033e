//! Field rules and their single-value checks.
//!
//! A [`FieldRule`] is the declarative constraint for one form field. Its
//! [`check`](FieldRule::check) method is pure: it never looks at other fields
//! and never performs I/O.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use catalogue_core::FieldError;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

/// The format a field's value must satisfy beyond presence and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    /// Free text; no extra check.
    Text,
    /// Exactly ten ASCII digits.
    Phone,
    /// A calendar date (`YYYY-MM-DD`, or a `datetime-local` value).
    Date,
    /// A well-formed absolute URL with a host.
    Url,
    /// A finite number.
    Numeric,
}

/// Declarative definition of one field's acceptable values.
///
/// Fields are required by default, mirroring how every form in the
/// catalogue front end treats its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// The field name.
    pub name: String,
    /// Whether an empty or whitespace-only value is rejected.
    pub required: bool,
    /// Minimum length in characters (after trimming).
    pub min_length: Option<usize>,
    /// Maximum length in characters (after trimming).
    pub max_length: Option<usize>,
    /// Format constraint.
    pub format: Option<FieldFormat>,
    /// Custom error messages keyed by [`FieldError::code`].
    pub messages: HashMap<String, String>,
}

impl FieldRule {
    /// Creates a required rule with no length or format constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            min_length: None,
            max_length: None,
            format: None,
            messages: HashMap::new(),
        }
    }

    /// Sets whether the field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the minimum length.
    #[must_use]
    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Requires exactly `len` characters.
    #[must_use]
    pub const fn exact_length(self, len: usize) -> Self {
        self.min_length(len).max_length(len)
    }

    /// Sets the format constraint.
    #[must_use]
    pub const fn format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets a custom message for an error code (e.g. `"required"`).
    #[must_use]
    pub fn message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.messages.insert(code.into(), msg.into());
        self
    }

    /// Checks a raw value against this rule.
    ///
    /// Checks run in order and stop at the first failure:
    /// 1. presence (if required)
    /// 2. length bounds
    /// 3. format
    ///
    /// An empty value on an optional field passes without further checks.
    pub fn check(&self, raw: &str) -> Result<(), FieldError> {
        let value = raw.trim();

        if value.is_empty() {
            return if self.required {
                Err(FieldError::MissingValue)
            } else {
                Ok(())
            };
        }

        let actual = value.chars().count();
        let too_short = self.min_length.is_some_and(|min| actual < min);
        let too_long = self.max_length.is_some_and(|max| actual > max);
        if too_short || too_long {
            return Err(FieldError::LengthViolation {
                min: self.min_length,
                max: self.max_length,
                actual,
            });
        }

        match self.format {
            None | Some(FieldFormat::Text) => Ok(()),
            Some(FieldFormat::Phone) => {
                if PHONE_RE.is_match(value) {
                    Ok(())
                } else {
                    Err(FieldError::InvalidPhone)
                }
            }
            Some(FieldFormat::Date) => parse_date(value).map(|_| ()).ok_or(FieldError::InvalidDate),
            Some(FieldFormat::Url) => match Url::parse(value) {
                Ok(url) if url.has_host() => Ok(()),
                _ => Err(FieldError::InvalidUrl),
            },
            Some(FieldFormat::Numeric) => match value.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(()),
                _ => Err(FieldError::InvalidNumber),
            },
        }
    }

    /// Returns the message to show for an error on this field.
    ///
    /// A custom message registered for the error's code wins over the
    /// default text.
    pub fn message_for(&self, error: &FieldError) -> String {
        self.messages
            .get(error.code())
            .cloned()
            .unwrap_or_else(|| error.to_string())
    }
}

const LOCAL_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parses a calendar date from a form value.
///
/// Accepts `YYYY-MM-DD`, the `YYYY-MM-DDTHH:MM[:SS]` values that
/// `datetime-local` inputs produce, space-separated datetimes, and RFC 3339
/// timestamps such as `2021-10-22T00:00:00.000Z`. The time part is dropped;
/// a timestamp keeps the calendar date written in its own offset.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone_rule() -> FieldRule {
        FieldRule::new("phone")
            .exact_length(10)
            .format(FieldFormat::Phone)
    }

    #[test]
    fn test_required_rejects_empty_and_whitespace() {
        let rule = FieldRule::new("name");
        assert_eq!(rule.check(""), Err(FieldError::MissingValue));
        assert_eq!(rule.check("   \t"), Err(FieldError::MissingValue));
        assert_eq!(rule.check("Jane"), Ok(()));
    }

    #[test]
    fn test_optional_empty_passes() {
        let rule = FieldRule::new("notes")
            .required(false)
            .min_length(5)
            .format(FieldFormat::Url);
        assert_eq!(rule.check(""), Ok(()));
        assert_eq!(rule.check("  "), Ok(()));
    }

    #[test]
    fn test_length_bounds_count_chars() {
        let rule = FieldRule::new("code").min_length(2).max_length(4);
        assert!(rule.check("a").is_err());
        assert!(rule.check("ab").is_ok());
        assert!(rule.check("ñøåé").is_ok());
        assert_eq!(
            rule.check("abcde"),
            Err(FieldError::LengthViolation {
                min: Some(2),
                max: Some(4),
                actual: 5
            })
        );
    }

    #[test]
    fn test_phone_rule() {
        let rule = phone_rule();
        assert_eq!(rule.check("0712345678"), Ok(()));
        assert!(matches!(
            rule.check("12345"),
            Err(FieldError::LengthViolation { actual: 5, .. })
        ));
        assert_eq!(rule.check("071234567a"), Err(FieldError::InvalidPhone));
    }

    #[test]
    fn test_phone_format_without_length_bounds() {
        let rule = FieldRule::new("phone").format(FieldFormat::Phone);
        assert_eq!(rule.check("0700000000"), Ok(()));
        assert_eq!(rule.check("12345"), Err(FieldError::InvalidPhone));
        assert_eq!(rule.check("07000000000"), Err(FieldError::InvalidPhone));
        assert_eq!(rule.check("０７００００００００"), Err(FieldError::InvalidPhone));
    }

    #[test]
    fn test_date_format() {
        let rule = FieldRule::new("from").format(FieldFormat::Date);
        assert_eq!(rule.check("2024-01-01"), Ok(()));
        assert_eq!(rule.check("2024-02-30"), Err(FieldError::InvalidDate));
        assert_eq!(rule.check("01/02/2024"), Err(FieldError::InvalidDate));
        assert_eq!(rule.check("2024-03-05T14:30"), Ok(()));
    }

    #[test]
    fn test_url_format() {
        let rule = FieldRule::new("image").format(FieldFormat::Url);
        assert_eq!(rule.check("https://img.example.com/dune.jpg"), Ok(()));
        assert_eq!(rule.check("dune.jpg"), Err(FieldError::InvalidUrl));
        assert_eq!(rule.check("/images/dune.jpg"), Err(FieldError::InvalidUrl));
        assert_eq!(rule.check("mailto:someone"), Err(FieldError::InvalidUrl));
    }

    #[test]
    fn test_numeric_format() {
        let rule = FieldRule::new("rental_fee").format(FieldFormat::Numeric);
        assert_eq!(rule.check("500"), Ok(()));
        assert_eq!(rule.check("12.50"), Ok(()));
        assert_eq!(rule.check("abc"), Err(FieldError::InvalidNumber));
        assert_eq!(rule.check("inf"), Err(FieldError::InvalidNumber));
    }

    #[test]
    fn test_custom_message() {
        let rule = FieldRule::new("name").message("required", "Name is required");
        assert_eq!(rule.message_for(&FieldError::MissingValue), "Name is required");
        assert_eq!(rule.message_for(&FieldError::InvalidUrl), "Enter a valid URL.");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_date("2024-01-05T09:15:00"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_parse_date_from_server_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2021, 10, 22);
        for raw in [
            "2021-10-22T00:00:00Z",
            "2021-10-22T00:00:00.000Z",
            "2021-10-22T23:30:00+03:00",
            "2021-10-22 00:00:00",
            "2021-10-22 18:45",
            "2021-10-22T08:00:00.250",
        ] {
            assert_eq!(parse_date(raw), expected, "{raw}");
        }
        assert_eq!(parse_date("2021-10-22T25:00:00Z"), None);
        assert_eq!(parse_date("2021-10-22Tnoon"), None);
    }
}
