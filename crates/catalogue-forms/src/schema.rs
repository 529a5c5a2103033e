//! Validation schemas: a set of field rules with one rule per field.

use std::collections::HashMap;

use thiserror::Error;

use catalogue_core::FieldError;

use crate::rules::FieldRule;

/// Errors raised while building a [`ValidationSchema`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two rules share a field name.
    #[error("Duplicate rule for field '{0}'")]
    DuplicateRule(String),

    /// A rule has an empty name.
    #[error("Field rules must have a non-empty name")]
    EmptyName,
}

/// The outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Whether the value satisfies its rule.
    pub valid: bool,
    /// The failure, if any.
    pub error: Option<FieldError>,
    /// The user-facing message for the failure, if any.
    pub message: Option<String>,
}

impl Validation {
    const fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            message: None,
        }
    }

    fn failed(error: FieldError, message: String) -> Self {
        Self {
            valid: false,
            error: Some(error),
            message: Some(message),
        }
    }
}

/// An ordered set of [`FieldRule`]s, at most one per field name.
#[derive(Debug, Clone)]
pub struct ValidationSchema {
    rules: Vec<FieldRule>,
    index: HashMap<String, usize>,
}

impl ValidationSchema {
    /// Builds a schema, rejecting duplicate or unnamed rules.
    pub fn new(rules: Vec<FieldRule>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(rules.len());
        for (pos, rule) in rules.iter().enumerate() {
            if rule.name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if index.insert(rule.name.clone(), pos).is_some() {
                return Err(SchemaError::DuplicateRule(rule.name.clone()));
            }
        }
        Ok(Self { rules, index })
    }

    /// Returns the rule for a field.
    pub fn rule(&self, field_name: &str) -> Option<&FieldRule> {
        self.index.get(field_name).map(|&pos| &self.rules[pos])
    }

    /// Returns all rules in declaration order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Validates one raw value against the named field's rule.
    ///
    /// Pure and synchronous: the same input always yields the same result.
    /// A field without a rule fails with [`FieldError::UnknownField`].
    pub fn validate(&self, field_name: &str, raw: &str) -> Validation {
        let Some(rule) = self.rule(field_name) else {
            let err = FieldError::UnknownField(field_name.to_string());
            let msg = err.to_string();
            return Validation::failed(err, msg);
        };
        match rule.check(raw) {
            Ok(()) => Validation::ok(),
            Err(err) => {
                let msg = rule.message_for(&err);
                Validation::failed(err, msg)
            }
        }
    }
}
