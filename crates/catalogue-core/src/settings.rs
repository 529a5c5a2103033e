//! Settings for the catalogue front end.
//!
//! The only deployment-specific value is the external API's base URL, read
//! once at startup. [`LazySettings`] holds the process-wide instance.

use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CatalogueError;

/// The complete set of settings.
///
/// # Examples
///
/// ```
/// use catalogue_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.base_url, "http://localhost:3000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the external catalogue/movie API (`BASE_URL`).
    pub base_url: String,
    /// Transport-level timeout for each API request, in seconds.
    pub request_timeout_secs: u64,
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log filter (e.g. "info", "debug", `catalogue_booking=trace`).
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            debug: true,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parses [`base_url`](Self::base_url) into an absolute URL.
    ///
    /// A trailing slash is appended when missing so that endpoint paths
    /// join underneath any path prefix the deployment uses.
    pub fn api_base(&self) -> Result<Url, CatalogueError> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|e| {
            CatalogueError::ConfigurationError(format!("Invalid base_url '{}': {e}", self.base_url))
        })?;
        if url.cannot_be_a_base() {
            return Err(CatalogueError::ConfigurationError(format!(
                "base_url '{}' cannot be used as a base",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Returns the request timeout as a [`Duration`].
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup, then use
/// [`get`](LazySettings::get) to access the settings.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings.
    ///
    /// Returns an error if settings were already configured; the first
    /// configuration wins.
    pub fn configure(&self, settings: Settings) -> Result<(), CatalogueError> {
        self.inner.set(settings).map_err(|_| {
            CatalogueError::ConfigurationError("Settings have already been configured".into())
        })
    }

    /// Returns the configured settings, if any.
    pub fn get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
