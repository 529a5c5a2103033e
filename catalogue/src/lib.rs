//! # catalogue
//!
//! The booking workflow for a catalogue and movie rental front end.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access, plus [`bootstrap`] for the one-time startup sequence: load
//! settings, install logging, and build the API client.

use std::path::Path;

use catalogue_core::settings_loader;
use catalogue_core::{CatalogueResult, Settings};

/// Core types, settings, logging, and error types.
pub use catalogue_core as core;

/// Field rules, validation schemas, binding, and coercion.
#[cfg(feature = "forms")]
pub use catalogue_forms as forms;

/// Typed signal dispatcher and the `booked` notification.
#[cfg(feature = "signals")]
pub use catalogue_signals as signals;

/// REST client for the external catalogue/movie API.
#[cfg(feature = "client")]
pub use catalogue_client as client;

/// Booking dialog, submitter, subject lists, and record editors.
#[cfg(feature = "booking")]
pub use catalogue_booking as booking;

/// Live server and fake API for tests.
#[cfg(feature = "testing")]
pub use catalogue_test as test;

/// Loads settings from a TOML or JSON file, chosen by extension, and
/// applies `CATALOGUE_*` environment overrides. With no path, settings come
/// from defaults plus the environment.
pub fn load_settings(path: Option<&Path>) -> CatalogueResult<Settings> {
    let Some(path) = path else {
        return Ok(settings_loader::from_env());
    };
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let mut settings = settings_loader::from_json_file(path)?;
        settings_loader::apply_env_overrides(&mut settings);
        Ok(settings)
    } else {
        settings_loader::from_toml_file_with_env(path)
    }
}

/// Runs the startup sequence: installs logging, builds the API client, and
/// stores `settings` as the process-wide [`SETTINGS`](catalogue_core::SETTINGS).
///
/// Fails if the base URL is invalid or settings were already configured.
#[cfg(feature = "client")]
pub fn bootstrap(settings: Settings) -> CatalogueResult<catalogue_client::ApiClient> {
    catalogue_core::logging::setup_logging(&settings);
    let client = catalogue_client::ApiClient::from_settings(&settings)?;
    tracing::info!(base_url = %client.base_url(), "Catalogue API configured");
    catalogue_core::SETTINGS.configure(settings)?;
    Ok(client)
}
