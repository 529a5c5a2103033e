//! Schemas for the forms the catalogue front end ships with.
//!
//! One booking schema serves both books and movies; the add/edit schemas
//! differ only in the creator field and the fee/date field names.

use crate::rules::{FieldFormat, FieldRule};
use crate::schema::ValidationSchema;

/// Field names shared by the booking form.
pub mod booking {
    /// Renter name.
    pub const NAME: &str = "name";
    /// Renter phone number.
    pub const PHONE: &str = "phone";
    /// First day of the booking.
    pub const FROM: &str = "from";
    /// Last day of the booking.
    pub const TO: &str = "to";
}

/// The length every phone number must have.
pub const PHONE_DIGITS: usize = 10;

/// The booking form: renter name, 10-digit phone, and a date range.
pub fn booking_schema() -> ValidationSchema {
    build(vec![
        FieldRule::new(booking::NAME).message("required", "Name is required"),
        FieldRule::new(booking::PHONE)
            .exact_length(PHONE_DIGITS)
            .format(FieldFormat::Phone)
            .message("required", "Phone number is required")
            .message("length", "Phone number must be exactly 10 digits")
            .message("phone", "Phone number must contain digits only"),
        FieldRule::new(booking::FROM)
            .format(FieldFormat::Date)
            .message("required", "Booking from is required"),
        FieldRule::new(booking::TO)
            .format(FieldFormat::Date)
            .message("required", "Booking to is required"),
    ])
}

/// The add-book form.
pub fn catalogue_item_schema() -> ValidationSchema {
    build(vec![
        FieldRule::new("name").message("required", "Name is required"),
        FieldRule::new("description").message("required", "Description is required"),
        FieldRule::new("image")
            .format(FieldFormat::Url)
            .message("required", "Image is required")
            .message("url", "Enter a valid image url"),
        FieldRule::new("author").message("required", "Author is required"),
        FieldRule::new("genre_id")
            .format(FieldFormat::Numeric)
            .message("required", "Genre is required"),
        FieldRule::new("date_published")
            .format(FieldFormat::Date)
            .message("required", "Date published is required"),
        FieldRule::new("booking_fee")
            .format(FieldFormat::Numeric)
            .message("required", "Booking fee is required"),
    ])
}

/// The add/edit-movie form.
pub fn movie_schema() -> ValidationSchema {
    build(vec![
        FieldRule::new("name").message("required", "Name is required"),
        FieldRule::new("description").message("required", "Description is required"),
        FieldRule::new("image")
            .format(FieldFormat::Url)
            .message("url", "Enter a valid image URL"),
        FieldRule::new("director").message("required", "Director is required"),
        FieldRule::new("genre_id")
            .format(FieldFormat::Numeric)
            .message("required", "Genre is required"),
        FieldRule::new("release_date")
            .format(FieldFormat::Date)
            .message("required", "Release date is required"),
        FieldRule::new("rental_fee")
            .format(FieldFormat::Numeric)
            .message("required", "Rental fee is required"),
    ])
}

fn build(rules: Vec<FieldRule>) -> ValidationSchema {
    // Preset rule names are distinct literals.
    ValidationSchema::new(rules).expect("preset schema has unique field names")
}
