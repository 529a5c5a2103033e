//! # catalogue-test
//!
//! Testing utilities for the catalogue workspace: a scripted fake of the
//! external catalogue/movie API, served on a random local port.

pub mod fake_api;

pub use fake_api::{FakeApi, FakeServer, RecordedRequest, Reply};
