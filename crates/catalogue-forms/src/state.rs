//! Per-form field state: current values, last validation errors, and
//! whether the user has touched each field.

use std::collections::BTreeMap;

use catalogue_core::FieldError;

use crate::schema::ValidationSchema;

/// The state of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    /// The raw text value.
    pub value: String,
    /// The failure from the last validation pass, if it failed.
    pub error: Option<FieldError>,
    /// Whether the value has been edited or validated for submission.
    pub touched: bool,
}

/// Field name to [`FieldState`] for every field in a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: BTreeMap<String, FieldState>,
}

impl FormState {
    /// Creates state for every field in `schema`, seeded from `defaults`.
    ///
    /// Fields absent from `defaults` start empty. Defaults naming a field the
    /// schema does not know are ignored.
    pub fn with_defaults<I, K, V>(schema: &ValidationSchema, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut fields: BTreeMap<String, FieldState> = schema
            .field_names()
            .map(|name| (name.to_string(), FieldState::default()))
            .collect();
        for (name, value) in defaults {
            if let Some(field) = fields.get_mut(name.as_ref()) {
                field.value = value.into();
            }
        }
        Self { fields }
    }

    /// Creates empty state for every field in `schema`.
    pub fn empty(schema: &ValidationSchema) -> Self {
        Self::with_defaults(schema, std::iter::empty::<(&str, String)>())
    }

    /// Returns a field's state.
    pub fn get(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        self.fields.get_mut(name)
    }

    /// Returns a field's current value.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|f| f.value.as_str())
    }

    /// Iterates over `(name, state)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldState)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the current per-field errors.
    pub fn errors(&self) -> BTreeMap<String, FieldError> {
        self.fields
            .iter()
            .filter_map(|(name, f)| f.error.clone().map(|e| (name.clone(), e)))
            .collect()
    }

    /// Returns `true` when any field currently carries an error.
    ///
    /// This reflects the last validation pass only; untouched fields that
    /// were never validated count as error-free.
    pub fn has_errors(&self) -> bool {
        self.fields.values().any(|f| f.error.is_some())
    }

    /// Returns `true` if any field has been touched.
    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(|f| f.touched)
    }
}
