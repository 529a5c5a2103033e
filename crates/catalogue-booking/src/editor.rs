//! Add and edit forms for catalogue records.
//!
//! The add-book, add-movie, and edit-movie pages all follow one pattern:
//! a schema-bound form, a genre picker, and a save that coerces the numeric
//! fields before writing the record.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use catalogue_client::{ApiClient, CatalogueItemPayload, Genre, Movie, MoviePayload};
use catalogue_core::{FieldError, SubmissionError};
use catalogue_forms::presets::{catalogue_item_schema, movie_schema};
use catalogue_forms::{coerce_f64, coerce_i64, parse_date, BoundForm, CoercionError};

/// Which record the editor writes, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// `POST /catalogue`
    NewCatalogueItem,
    /// `POST /movies`
    NewMovie,
    /// `PUT /movies/{id}`
    EditMovie(i64),
}

/// Why a save did not go through.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// One or more fields failed validation. Nothing was sent.
    #[error("The form has {} invalid field(s)", .0.len())]
    Invalid(BTreeMap<String, FieldError>),

    /// The write failed, or a numeric field could not be converted.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// A form for creating or updating one record.
#[derive(Debug, Clone)]
pub struct SubjectEditor {
    mode: EditorMode,
    form: BoundForm,
    genres: Vec<Genre>,
}

impl SubjectEditor {
    /// An empty add-book form.
    pub fn new_catalogue_item() -> Self {
        Self::with_mode(EditorMode::NewCatalogueItem)
    }

    /// An empty add-movie form.
    pub fn new_movie() -> Self {
        Self::with_mode(EditorMode::NewMovie)
    }

    fn with_mode(mode: EditorMode) -> Self {
        let schema = match mode {
            EditorMode::NewCatalogueItem => catalogue_item_schema(),
            EditorMode::NewMovie | EditorMode::EditMovie(_) => movie_schema(),
        };
        Self {
            mode,
            form: BoundForm::new(Arc::new(schema)),
            genres: Vec::new(),
        }
    }

    /// An edit-movie form seeded from `GET /movies/{id}`.
    ///
    /// Fields the record lacks stay empty. If the fetch fails the form is
    /// left empty and the failure is logged.
    pub async fn edit_movie(client: &ApiClient, id: i64) -> Self {
        let mut editor = Self::with_mode(EditorMode::EditMovie(id));
        match client.movie(id).await {
            Ok(movie) => editor.form.reset(movie_defaults(&movie)),
            Err(e) => tracing::warn!(movie_id = id, error = %e, "Failed to fetch movie for editing"),
        }
        editor
    }

    /// Which record a save writes.
    pub const fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The bound form, for reading values and errors.
    pub const fn form(&self) -> &BoundForm {
        &self.form
    }

    /// The bound form, for bulk edits.
    pub fn form_mut(&mut self) -> &mut BoundForm {
        &mut self.form
    }

    /// Sets a field, re-validating it.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<bool, FieldError> {
        self.form.set(name, value)
    }

    /// The genre choices loaded so far.
    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// Populates the genre choices from `GET /genres`.
    ///
    /// A failure leaves no choices. Returns how many were loaded.
    pub async fn load_genres(&mut self, client: &ApiClient) -> usize {
        self.genres = client.genres().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load genres");
            Vec::new()
        });
        self.genres.len()
    }

    /// Validates the form, converts the numeric fields, and writes the
    /// record. Returns the server's response body verbatim.
    ///
    /// A numeric field that cannot be converted is flagged `InvalidNumber`
    /// on the form and reported as a `DecodeError`; no request is made.
    pub async fn save(&mut self, client: &ApiClient) -> Result<serde_json::Value, EditorError> {
        if !self.form.validate_all() {
            return Err(EditorError::Invalid(self.form.errors()));
        }

        let response = match self.mode {
            EditorMode::NewCatalogueItem => {
                let payload = self.catalogue_payload().map_err(|e| self.reject(e))?;
                client.create_catalogue_item(&payload).await
            }
            EditorMode::NewMovie => {
                let payload = self.movie_payload().map_err(|e| self.reject(e))?;
                client.create_movie(&payload).await
            }
            EditorMode::EditMovie(id) => {
                let payload = self.movie_payload().map_err(|e| self.reject(e))?;
                client.update_movie(id, &payload).await
            }
        };

        match &response {
            Ok(_) => tracing::info!(mode = ?self.mode, "Record saved"),
            Err(e) => tracing::warn!(mode = ?self.mode, error = %e, "Record save failed"),
        }
        response.map_err(EditorError::from)
    }

    fn reject(&mut self, err: CoercionError) -> EditorError {
        let flagged = self.form.add_error(&err.field, err.field_error());
        debug_assert!(flagged.is_ok(), "editor form has no `{}` field", err.field);
        EditorError::Submission(err.into())
    }

    fn text(&self, name: &str) -> String {
        self.form.value(name).unwrap_or_default().trim().to_string()
    }

    fn movie_payload(&self) -> Result<MoviePayload, CoercionError> {
        let state = self.form.state();
        Ok(MoviePayload {
            name: self.text("name"),
            description: self.text("description"),
            image: self.text("image"),
            director: self.text("director"),
            genre_id: coerce_i64(state, "genre_id")?,
            release_date: self.text("release_date"),
            rental_fee: coerce_f64(state, "rental_fee")?,
        })
    }

    fn catalogue_payload(&self) -> Result<CatalogueItemPayload, CoercionError> {
        let state = self.form.state();
        Ok(CatalogueItemPayload {
            name: self.text("name"),
            description: self.text("description"),
            image: self.text("image"),
            author: self.text("author"),
            genre_id: coerce_i64(state, "genre_id")?,
            date_published: self.text("date_published"),
            booking_fee: coerce_f64(state, "booking_fee")?,
        })
    }
}

fn movie_defaults(movie: &Movie) -> Vec<(&'static str, String)> {
    let mut defaults = vec![("name", movie.name.clone())];
    let optional = [
        ("description", movie.description.clone()),
        ("image", movie.image.clone()),
        ("director", movie.director.clone()),
        ("genre_id", movie.genre_id.map(|g| g.to_string())),
        ("release_date", movie.release_date.as_deref().map(date_input_value)),
        ("rental_fee", movie.rental_fee.map(|f| f.to_string())),
    ];
    defaults.extend(
        optional
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v))),
    );
    defaults
}

/// Timestamps from the server are cut down to the `YYYY-MM-DD` a date input
/// shows. Text that is not a date is kept so validation can flag it.
fn date_input_value(raw: &str) -> String {
    parse_date(raw).map_or_else(|| raw.to_string(), |date| date.to_string())
}
