//! Whole-form validation pipeline.
//!
//! 1. Field-level validation: every field's rule runs against its value.
//! 2. Form-level cross-field checks ([`FormCleaner`]s), run only against
//!    fields that passed step 1.
//!
//! Errors accumulate rather than short-circuiting, so all problems are
//! reported at once.

use std::collections::BTreeMap;

use catalogue_core::FieldError;

use crate::rules::parse_date;
use crate::schema::ValidationSchema;
use crate::state::FormState;

/// A cross-field check run after field-level validation.
pub trait FormCleaner: Send + Sync {
    /// Returns errors keyed by the field they should be shown on.
    fn clean(&self, state: &FormState) -> BTreeMap<String, FieldError>;
}

/// Requires the `from` date field to be on or before the `to` date field.
///
/// Unparsable dates are left to the field rules; the error lands on `to`.
#[derive(Debug, Clone)]
pub struct DateOrderCheck {
    from: String,
    to: String,
}

impl DateOrderCheck {
    /// Creates a check over two date fields.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl FormCleaner for DateOrderCheck {
    fn clean(&self, state: &FormState) -> BTreeMap<String, FieldError> {
        let mut errors = BTreeMap::new();
        let from = state.value(&self.from).and_then(parse_date);
        let to = state.value(&self.to).and_then(parse_date);
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                errors.insert(self.to.clone(), FieldError::InvalidDateRange);
            }
        }
        errors
    }
}

/// Validates every field in `state` against `schema`.
///
/// Each field is marked touched so that its error is surfaced even if the
/// user never edited it. Returns `true` if all fields pass.
pub fn clean_fields(schema: &ValidationSchema, state: &mut FormState) -> bool {
    let mut all_valid = true;
    for rule in schema.rules() {
        let Some(field) = state.get_mut(&rule.name) else {
            continue;
        };
        field.touched = true;
        field.error = rule.check(&field.value).err();
        all_valid &= field.error.is_none();
    }
    all_valid
}

/// Runs field-level validation, then every cleaner.
///
/// Cleaner errors are recorded only on fields that have no field-level error,
/// so a missing date is reported as missing rather than as out of order.
pub fn full_clean(
    schema: &ValidationSchema,
    cleaners: &[std::sync::Arc<dyn FormCleaner>],
    state: &mut FormState,
) -> Result<(), BTreeMap<String, FieldError>> {
    clean_fields(schema, state);

    for cleaner in cleaners {
        for (name, err) in cleaner.clean(state) {
            if let Some(field) = state.get_mut(&name) {
                if field.error.is_none() {
                    field.error = Some(err);
                }
            }
        }
    }

    let errors = state.errors();
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(invalid = errors.len(), "form validation failed");
        Err(errors)
    }
}
