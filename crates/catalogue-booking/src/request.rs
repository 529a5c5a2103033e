//! The typed booking request built from a validated booking form.

use chrono::NaiveDate;
use thiserror::Error;

use catalogue_client::{BookingPayload, BookingTarget};
use catalogue_core::{FieldError, SubjectKind, SubmissionError};
use catalogue_forms::presets::{booking, PHONE_DIGITS};
use catalogue_forms::{parse_date, FormState};

/// The subject a booking is for, as handed to the dialog by its list.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRef {
    /// The record's server-side ID.
    pub id: i64,
    /// Title of the book or movie.
    pub name: String,
    /// Which endpoint the booking goes to.
    pub kind: SubjectKind,
    /// Booking or rental fee, shown in the dialog title.
    pub fee: Option<f64>,
    /// Already booked subjects cannot be booked again.
    pub is_booked: bool,
}

impl SubjectRef {
    /// Creates an unbooked subject with no fee.
    pub fn new(id: i64, name: impl Into<String>, kind: SubjectKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            fee: None,
            is_booked: false,
        }
    }

    /// Sets the fee shown in the title.
    #[must_use]
    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Marks the subject as already booked.
    #[must_use]
    pub fn booked(mut self, is_booked: bool) -> Self {
        self.is_booked = is_booked;
        self
    }

    /// The dialog title, e.g. `Book Dune for Kshs 500`.
    pub fn title(&self) -> String {
        match self.fee {
            Some(fee) => format!("Book {} for Kshs {fee}", self.name),
            None => format!("Book {}", self.name),
        }
    }
}

/// A booking form value that does not satisfy the request's invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid booking field '{field}': {error}")]
pub struct RequestError {
    /// The offending field.
    pub field: String,
    /// What is wrong with it.
    pub error: FieldError,
}

impl RequestError {
    fn new(field: &str, error: FieldError) -> Self {
        Self {
            field: field.to_string(),
            error,
        }
    }
}

impl From<RequestError> for SubmissionError {
    fn from(err: RequestError) -> Self {
        Self::DecodeError(err.to_string())
    }
}

fn text<'a>(state: &'a FormState, field: &str) -> &'a str {
    state.value(field).map_or("", str::trim)
}

/// A complete booking: who is renting what, and for which days.
///
/// Invariants: `from <= to` and `phone` is exactly ten ASCII digits.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    /// What is being booked.
    pub subject: SubjectRef,
    /// The renter's name, trimmed.
    pub renter_name: String,
    /// Ten ASCII digits.
    pub phone: String,
    /// First day of the booking.
    pub from: NaiveDate,
    /// Last day of the booking, inclusive.
    pub to: NaiveDate,
}

impl BookingRequest {
    /// Builds a request from booking form state.
    ///
    /// The form is expected to have passed whole-form validation; the
    /// invariants are checked again here so that no malformed request can
    /// reach the wire.
    pub fn from_form(subject: SubjectRef, state: &FormState) -> Result<Self, RequestError> {
        let renter_name = text(state, booking::NAME);
        if renter_name.is_empty() {
            return Err(RequestError::new(booking::NAME, FieldError::MissingValue));
        }

        let phone = text(state, booking::PHONE);
        let digits = phone.chars().count();
        if digits != PHONE_DIGITS {
            return Err(RequestError::new(
                booking::PHONE,
                FieldError::LengthViolation {
                    min: Some(PHONE_DIGITS),
                    max: Some(PHONE_DIGITS),
                    actual: digits,
                },
            ));
        }
        if !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RequestError::new(booking::PHONE, FieldError::InvalidPhone));
        }

        let date = |field: &str| {
            let raw = text(state, field);
            if raw.is_empty() {
                return Err(RequestError::new(field, FieldError::MissingValue));
            }
            parse_date(raw).ok_or_else(|| RequestError::new(field, FieldError::InvalidDate))
        };
        let from = date(booking::FROM)?;
        let to = date(booking::TO)?;
        if from > to {
            return Err(RequestError::new(booking::TO, FieldError::InvalidDateRange));
        }

        Ok(Self {
            subject,
            renter_name: renter_name.to_string(),
            phone: phone.to_string(),
            from,
            to,
        })
    }

    /// Maps the request onto the `POST /booking` body.
    pub fn to_payload(&self) -> BookingPayload {
        let target = match self.subject.kind {
            SubjectKind::Catalogue => BookingTarget::Catalogue {
                catalogue_id: self.subject.id,
            },
            SubjectKind::Movie => BookingTarget::Movie {
                movie_id: self.subject.id,
                movie_title: self.subject.name.clone(),
            },
        };
        BookingPayload {
            name: self.renter_name.clone(),
            phone: self.phone.clone(),
            booking_from: self.from,
            booking_to: self.to,
            target,
        }
    }
}
