//! Wire models for the external catalogue/movie API.
//!
//! Record models are lenient: the API omits fields freely, so everything
//! except the identifier and name is optional. Payload models are strict and
//! carry numbers where the API expects numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A genre, as returned by `GET /genres`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// The ID records refer to as `genre_id`.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// A movie record, as returned by `GET /movies` and `GET /movies/{id}`.
///
/// Some deployments name the title `title`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Server-side ID.
    pub id: i64,
    /// Title.
    #[serde(alias = "title")]
    pub name: String,
    /// Synopsis.
    #[serde(default)]
    pub description: Option<String>,
    /// Poster URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Director's name.
    #[serde(default)]
    pub director: Option<String>,
    /// See [`Genre::id`].
    #[serde(default)]
    pub genre_id: Option<i64>,
    /// Release date as the server wrote it: a bare date or a timestamp.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Rental fee in Kshs.
    #[serde(default)]
    pub rental_fee: Option<f64>,
    /// Whether the movie is currently rented out.
    #[serde(default)]
    pub is_rented: bool,
}

/// A book record, as returned by `GET /catalogue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueItem {
    /// Server-side ID.
    pub id: i64,
    /// Title.
    pub name: String,
    /// Blurb.
    #[serde(default)]
    pub description: Option<String>,
    /// Cover URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Author's name.
    #[serde(default)]
    pub author: Option<String>,
    /// See [`Genre::id`].
    #[serde(default)]
    pub genre_id: Option<i64>,
    /// Publication date as the server wrote it.
    #[serde(default)]
    pub date_published: Option<String>,
    /// Booking fee in Kshs.
    #[serde(default)]
    pub booking_fee: Option<f64>,
    /// Whether the book is currently booked.
    #[serde(default)]
    pub is_booked: bool,
}

/// Body of `POST /movies` and `PUT /movies/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePayload {
    /// Title.
    pub name: String,
    /// Synopsis.
    pub description: String,
    /// Poster URL.
    pub image: String,
    /// Director's name.
    pub director: String,
    /// See [`Genre::id`].
    pub genre_id: i64,
    /// `YYYY-MM-DD`.
    pub release_date: String,
    /// Rental fee in Kshs.
    pub rental_fee: f64,
}

/// Body of `POST /catalogue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueItemPayload {
    /// Title.
    pub name: String,
    /// Blurb.
    pub description: String,
    /// Cover URL.
    pub image: String,
    /// Author's name.
    pub author: String,
    /// See [`Genre::id`].
    pub genre_id: i64,
    /// `YYYY-MM-DD`.
    pub date_published: String,
    /// Booking fee in Kshs.
    pub booking_fee: f64,
}

/// Identifies what a booking is for. Flattened into [`BookingPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingTarget {
    /// A movie rental carries the title alongside the ID.
    Movie {
        /// See [`Movie::id`].
        movie_id: i64,
        /// See [`Movie::name`].
        movie_title: String,
    },
    /// A book from the catalogue.
    Catalogue {
        /// See [`CatalogueItem::id`].
        catalogue_id: i64,
    },
}

/// Body of `POST /booking`.
///
/// ```
/// use catalogue_client::models::{BookingPayload, BookingTarget};
/// use chrono::NaiveDate;
///
/// let payload = BookingPayload {
///     name: "Jane".into(),
///     phone: "0700000000".into(),
///     booking_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     booking_to: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
///     target: BookingTarget::Catalogue { catalogue_id: 7 },
/// };
/// let json = serde_json::to_value(&payload).unwrap();
/// assert_eq!(json["catalogue_id"], 7);
/// assert_eq!(json["booking_from"], "2024-01-01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    /// The renter's name.
    pub name: String,
    /// Ten ASCII digits.
    pub phone: String,
    /// First day of the booking.
    pub booking_from: NaiveDate,
    /// Last day of the booking, inclusive.
    pub booking_to: NaiveDate,
    /// What is booked, flattened into the body.
    #[serde(flatten)]
    pub target: BookingTarget,
}

/// The server's confirmation of a booking, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingConfirmation(pub serde_json::Value);

impl BookingConfirmation {
    /// Returns the raw JSON body.
    pub const fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}
