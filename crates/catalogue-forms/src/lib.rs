//! # catalogue-forms
//!
//! Form validation for the catalogue front end: declarative field rules,
//! schemas, per-field binding with live re-validation, whole-form validation
//! with cross-field checks, and typed coercion of text inputs.

pub mod binder;
pub mod coerce;
pub mod form;
pub mod presets;
pub mod rules;
pub mod schema;
pub mod state;
pub mod validation;

pub use binder::FieldBinder;
pub use coerce::{coerce_f64, coerce_i64, CoercionError};
pub use form::BoundForm;
pub use rules::{parse_date, FieldFormat, FieldRule};
pub use schema::{SchemaError, Validation, ValidationSchema};
pub use state::{FieldState, FormState};
pub use validation::{DateOrderCheck, FormCleaner};
