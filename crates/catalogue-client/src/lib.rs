//! # catalogue-client
//!
//! An async client for the external catalogue/movie REST API, built on
//! `reqwest`. The API is contract-only: this crate sends requests and maps
//! responses, with no business logic of its own.
//!
//! ## Modules
//!
//! - [`client`] - [`ApiClient`] and its error mapping
//! - [`models`] - Records and payloads exchanged with the API

pub mod client;
pub mod models;

pub use client::ApiClient;
pub use models::{
    BookingConfirmation, BookingPayload, BookingTarget, CatalogueItem, CatalogueItemPayload,
    Genre, Movie, MoviePayload,
};
