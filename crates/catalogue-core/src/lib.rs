//! # catalogue-core
//!
//! Core types, settings, and error types for the catalogue booking workspace.
//! This crate has no workspace dependencies and provides the foundation for
//! all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and result aliases
//! - [`settings`] - Settings and the global settings instance
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`subject`] - The kinds of subject that can be booked

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod subject;

pub use error::{CatalogueError, CatalogueResult, FieldError, SubmissionError};
pub use settings::{Settings, SETTINGS};
pub use subject::SubjectKind;
