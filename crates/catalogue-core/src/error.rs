//! Core error types for the catalogue workspace.
//!
//! Errors fall into two families. Local validation failures ([`FieldError`])
//! are recovered in place by re-prompting the user. Submission failures
//! ([`SubmissionError`]) are surfaced as a dismissible message while the form
//! is retained for retry. Neither family is fatal: both are scoped to a single
//! form or dialog instance. [`CatalogueError`] wraps everything else
//! (configuration, including unreadable settings files) for callers that
//! want one type.

use thiserror::Error;

/// A single field failed its rule.
///
/// Each variant has a stable short code (see [`FieldError::code`]) so that
/// rules can register custom messages per code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// A required value is empty or whitespace.
    #[error("This field is required.")]
    MissingValue,

    /// The value's character count is outside the rule's bounds.
    #[error("{}", length_message(.min, .max, .actual))]
    LengthViolation {
        /// Lower bound, if any.
        min: Option<usize>,
        /// Upper bound, if any.
        max: Option<usize>,
        /// Observed length in characters.
        actual: usize,
    },

    /// The value is not exactly ten ASCII digits.
    #[error("Enter a valid phone number of exactly 10 digits.")]
    InvalidPhone,

    /// The value is not a calendar date.
    #[error("Enter a valid date (YYYY-MM-DD).")]
    InvalidDate,

    /// The value is not a well-formed absolute URL.
    #[error("Enter a valid URL.")]
    InvalidUrl,

    /// The value is not a finite number.
    #[error("Enter a number.")]
    InvalidNumber,

    /// The end date precedes the start date.
    #[error("The end date must not be before the start date.")]
    InvalidDateRange,

    /// No rule exists for the field.
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

#[allow(clippy::ref_option)]
fn length_message(min: &Option<usize>, max: &Option<usize>, actual: &usize) -> String {
    match (*min, *max) {
        (Some(min), Some(max)) if min == max => {
            format!("Ensure this value has exactly {min} characters (it has {actual}).")
        }
        (Some(min), _) if *actual < min => {
            format!("Ensure this value has at least {min} characters (it has {actual}).")
        }
        (_, Some(max)) => {
            format!("Ensure this value has at most {max} characters (it has {actual}).")
        }
        _ => format!("Invalid length ({actual})."),
    }
}

impl FieldError {
    /// Returns the short code identifying this failure (e.g. `"required"`).
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingValue => "required",
            Self::LengthViolation { .. } => "length",
            Self::InvalidPhone => "phone",
            Self::InvalidDate => "date",
            Self::InvalidUrl => "url",
            Self::InvalidNumber => "numeric",
            Self::InvalidDateRange => "date_range",
            Self::UnknownField(_) => "unknown",
        }
    }
}

/// A booking or record submission failed.
///
/// None of these are retried automatically: the backend offers no
/// idempotency key, so a blind retry could book a subject twice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The server answered with a non-success status.
    #[error("Server rejected the request with status {status}: {body}")]
    ServerRejected {
        /// HTTP status code.
        status: u16,
        /// Response body text, verbatim.
        body: String,
    },

    /// The response body (or a form value bound for the wire) could not be
    /// decoded into the expected type.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl SubmissionError {
    /// Returns the HTTP status for [`ServerRejected`](Self::ServerRejected).
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServerRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The umbrella error type for the workspace.
#[derive(Error, Debug)]
pub enum CatalogueError {
    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A submission to the external API failed.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// A convenience type alias for `Result<T, CatalogueError>`.
pub type CatalogueResult<T> = Result<T, CatalogueError>;
