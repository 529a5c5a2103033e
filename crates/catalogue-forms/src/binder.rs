//! Field binders: one field's rule paired with its live state.
//!
//! A [`FieldBinder`] is what an input control holds on to. It exposes the
//! current value, a setter, and the derived validity. Every call to
//! [`set`](FieldBinder::set) re-validates that field alone; cross-field checks
//! only run during whole-form validation.

use catalogue_core::FieldError;

use crate::rules::FieldRule;
use crate::state::FieldState;

/// A form field bound to its rule and mutable state.
pub struct FieldBinder<'a> {
    rule: &'a FieldRule,
    state: &'a mut FieldState,
}

impl<'a> FieldBinder<'a> {
    /// Binds a rule to the state it governs.
    pub fn new(rule: &'a FieldRule, state: &'a mut FieldState) -> Self {
        Self { rule, state }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.rule.name
    }

    /// Returns the current value.
    pub fn value(&self) -> &str {
        &self.state.value
    }

    /// Replaces the value and re-validates this field.
    ///
    /// Returns `true` if the new value is valid.
    pub fn set(&mut self, value: impl Into<String>) -> bool {
        self.state.value = value.into();
        self.state.touched = true;
        self.revalidate()
    }

    /// Re-runs this field's rule against its current value.
    pub fn revalidate(&mut self) -> bool {
        self.state.error = self.rule.check(&self.state.value).err();
        if let Some(err) = &self.state.error {
            tracing::trace!(field = %self.rule.name, code = err.code(), "field invalid");
        }
        self.state.error.is_none()
    }

    /// Returns the error from the last validation, if any.
    pub fn error(&self) -> Option<&FieldError> {
        self.state.error.as_ref()
    }

    /// Returns the user-facing message for the current error, if any.
    pub fn message(&self) -> Option<String> {
        self.state.error.as_ref().map(|e| self.rule.message_for(e))
    }

    /// Returns `true` if the last validation passed (or none has run).
    pub fn is_valid(&self) -> bool {
        self.state.error.is_none()
    }

    /// Returns `true` if the field has been edited or validated for submit.
    pub fn touched(&self) -> bool {
        self.state.touched
    }

    /// Returns whether the field is required.
    pub fn required(&self) -> bool {
        self.rule.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FieldFormat;

    fn phone_rule() -> FieldRule {
        FieldRule::new("phone")
            .exact_length(10)
            .format(FieldFormat::Phone)
            .message("length", "Phone number must be 10 digits")
    }

    #[test]
    fn test_binder_set_valid() {
        let rule = phone_rule();
        let mut state = FieldState::default();
        let mut binder = FieldBinder::new(&rule, &mut state);
        assert!(binder.set("0712345678"));
        assert_eq!(binder.value(), "0712345678");
        assert!(binder.is_valid());
        assert!(binder.touched());
        assert!(binder.message().is_none());
    }

    #[test]
    fn test_binder_set_invalid_then_fix() {
        let rule = phone_rule();
        let mut state = FieldState::default();
        let mut binder = FieldBinder::new(&rule, &mut state);

        assert!(!binder.set("123"));
        assert!(matches!(
            binder.error(),
            Some(FieldError::LengthViolation { actual: 3, .. })
        ));
        assert_eq!(
            binder.message().as_deref(),
            Some("Phone number must be 10 digits")
        );

        assert!(binder.set("0700000000"));
        assert!(binder.error().is_none());
    }

    #[test]
    fn test_binder_untouched_is_valid_until_checked() {
        let rule = phone_rule();
        let mut state = FieldState::default();
        let mut binder = FieldBinder::new(&rule, &mut state);
        assert!(binder.is_valid());
        assert!(!binder.touched());
        assert!(!binder.revalidate());
        assert_eq!(binder.error(), Some(&FieldError::MissingValue));
    }

    #[test]
    fn test_binder_metadata() {
        let rule = phone_rule();
        let mut state = FieldState::default();
        let binder = FieldBinder::new(&rule, &mut state);
        assert_eq!(binder.name(), "phone");
        assert!(binder.required());
    }
}
