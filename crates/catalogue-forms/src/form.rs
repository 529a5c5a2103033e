//! [`BoundForm`]: a schema, its cross-field checks, and the live form state.
//!
//! This is the unit a dialog or editor owns for its lifetime. Individual
//! inputs reach their field through [`BoundForm::field`]; submission calls
//! [`BoundForm::validate_all`] first and never sends a partially valid form.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalogue_core::FieldError;

use crate::binder::FieldBinder;
use crate::schema::ValidationSchema;
use crate::state::FormState;
use crate::validation::{self, FormCleaner};

/// A form whose fields are bound to a [`ValidationSchema`].
#[derive(Clone)]
pub struct BoundForm {
    schema: Arc<ValidationSchema>,
    cleaners: Vec<Arc<dyn FormCleaner>>,
    state: FormState,
}

impl std::fmt::Debug for BoundForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundForm")
            .field("schema", &self.schema)
            .field("cleaners", &self.cleaners.len())
            .field("state", &self.state)
            .finish()
    }
}

impl BoundForm {
    /// Creates a form with every field empty.
    pub fn new(schema: Arc<ValidationSchema>) -> Self {
        let state = FormState::empty(&schema);
        Self {
            schema,
            cleaners: Vec::new(),
            state,
        }
    }

    /// Adds a cross-field check run by [`validate_all`](Self::validate_all).
    #[must_use]
    pub fn with_cleaner(mut self, cleaner: Arc<dyn FormCleaner>) -> Self {
        self.cleaners.push(cleaner);
        self
    }

    /// Returns the schema.
    pub fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    /// Returns the current state.
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// Binds the named field for reading and editing.
    pub fn field(&mut self, name: &str) -> Result<FieldBinder<'_>, FieldError> {
        let rule = self
            .schema
            .rule(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        let state = self
            .state
            .get_mut(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        Ok(FieldBinder::new(rule, state))
    }

    /// Sets a field's value, re-validating only that field.
    ///
    /// Returns whether the new value is valid.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<bool, FieldError> {
        Ok(self.field(name)?.set(value))
    }

    /// Returns a field's current value.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.state.value(name)
    }

    /// Returns the user-facing message for a field's current error.
    pub fn message(&self, name: &str) -> Option<String> {
        let rule = self.schema.rule(name)?;
        let err = self.state.get(name)?.error.as_ref()?;
        Some(rule.message_for(err))
    }

    /// Validates every field and then runs the cross-field checks.
    ///
    /// Returns `true` if the whole form is valid.
    pub fn validate_all(&mut self) -> bool {
        validation::full_clean(&self.schema, &self.cleaners, &mut self.state).is_ok()
    }

    /// Records an error found outside the schema, such as a failed numeric
    /// coercion, on a field. The value is left as it is.
    pub fn add_error(&mut self, name: &str, error: FieldError) -> Result<(), FieldError> {
        let state = self
            .state
            .get_mut(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        state.error = Some(error);
        Ok(())
    }

    /// Returns the errors from the last validation.
    pub fn errors(&self) -> BTreeMap<String, FieldError> {
        self.state.errors()
    }

    /// Discards all state and re-seeds the fields from `defaults`.
    pub fn reset<I, K, V>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.state = FormState::with_defaults(&self.schema, defaults);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FieldFormat, FieldRule};
    use crate::validation::DateOrderCheck;

    fn make_form() -> BoundForm {
        let schema = ValidationSchema::new(vec![
            FieldRule::new("name").message("required", "Name is required"),
            FieldRule::new("phone")
                .exact_length(10)
                .format(FieldFormat::Phone),
            FieldRule::new("from").format(FieldFormat::Date),
            FieldRule::new("to").format(FieldFormat::Date),
        ])
        .unwrap();
        BoundForm::new(Arc::new(schema)).with_cleaner(Arc::new(DateOrderCheck::new("from", "to")))
    }

    #[test]
    fn test_new_form_is_empty() {
        let form = make_form();
        assert_eq!(form.value("name"), Some(""));
        assert!(form.errors().is_empty());
        assert!(!form.state().is_dirty());
    }

    #[test]
    fn test_set_validates_only_that_field() {
        let mut form = make_form();
        assert!(!form.set("phone", "123").unwrap());
        let errors = form.errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.get("phone"),
            Some(FieldError::LengthViolation { .. })
        ));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut form = make_form();
        assert_eq!(
            form.set("email", "x").unwrap_err(),
            FieldError::UnknownField("email".into())
        );
    }

    #[test]
    fn test_setting_from_after_to_does_not_cross_validate() {
        let mut form = make_form();
        form.set("to", "2024-01-01").unwrap();
        assert!(form.set("from", "2024-02-01").unwrap());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_validate_all() {
        let mut form = make_form();
        assert!(!form.validate_all());
        assert_eq!(form.message("name").as_deref(), Some("Name is required"));

        form.set("name", "Jane").unwrap();
        form.set("phone", "0700000000").unwrap();
        form.set("from", "2024-01-01").unwrap();
        form.set("to", "2024-01-05").unwrap();
        assert!(form.validate_all());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_reset() {
        let mut form = make_form();
        form.set("name", "Jane").unwrap();
        form.validate_all();
        form.reset([("phone", "0700000000")]);
        assert_eq!(form.value("name"), Some(""));
        assert_eq!(form.value("phone"), Some("0700000000"));
        assert!(form.errors().is_empty());
        assert!(!form.state().is_dirty());
    }

    #[test]
    fn test_add_error() {
        let mut form = make_form();
        form.set("name", "Jane").unwrap();
        form.add_error("name", FieldError::InvalidNumber).unwrap();
        assert_eq!(form.value("name"), Some("Jane"));
        assert_eq!(form.errors().get("name"), Some(&FieldError::InvalidNumber));
        assert!(form.add_error("email", FieldError::InvalidNumber).is_err());
    }

    #[test]
    fn test_field_binder_access() {
        let mut form = make_form();
        let mut phone = form.field("phone").unwrap();
        phone.set("071234567a");
        assert_eq!(phone.error(), Some(&FieldError::InvalidPhone));
    }
}
