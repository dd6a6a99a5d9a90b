//! Request validation as ordered predicate/message rules.
//!
//! A [`Validator`] evaluates every rule eagerly and collects the failures into
//! a [`ValidationResult`]. An empty failure list means the input is valid;
//! nothing in here returns an error or panics on bad input.

pub mod requests;

pub use requests::{
    AddUsuarioRequest, AddUsuarioRequestValidator, GetByIdRequest, GetByIdRequestValidator,
    LoginRequest, LoginRequestValidator,
};

use serde::Serialize;
use std::fmt;

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
}

/// Outcome of validating a request: valid, or a non-empty ordered list of failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Failures reported for `field`, in rule order.
    pub fn failures_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.failures
            .iter()
            .filter(move |f| f.field == field)
            .map(|f| f.message.as_str())
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.failures.push(ValidationFailure {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return f.write_str("valid");
        }
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", failure.field, failure.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationResult {}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

struct Rule<T> {
    field: &'static str,
    predicate: Predicate<T>,
    message: String,
}

/// Ordered rule chain over `T`.
///
/// ```rust
/// use sgp::validation::Validator;
///
/// let validator = Validator::<String>::new()
///     .rule("nome", |s| !s.is_empty(), "must not be empty")
///     .rule("nome", |s| s.len() <= 3, "must be at most 3 characters");
///
/// assert!(validator.validate(&"abc".to_string()).is_valid());
/// assert_eq!(validator.validate(&String::new()).failures().len(), 1);
/// ```
pub struct Validator<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Validator<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule; `predicate` returns `true` when the value is acceptable.
    #[must_use]
    pub fn rule(
        mut self,
        field: &'static str,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        self.rules.push(Rule {
            field,
            predicate: Box::new(predicate),
            message: message.into(),
        });
        self
    }

    pub fn validate(&self, value: &T) -> ValidationResult {
        let mut result = ValidationResult::valid();
        for rule in &self.rules {
            if !(rule.predicate)(value) {
                result.push(rule.field, rule.message.clone());
            }
        }
        result
    }
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_every_rule_in_order() {
        let validator = Validator::<i32>::new()
            .rule("n", |n| *n > 0, "must be positive")
            .rule("n", |n| n % 2 == 0, "must be even")
            .rule("n", |n| *n < 100, "must be below 100");

        let result = validator.validate(&-3);
        let messages: Vec<_> = result.failures_for("n").collect();
        assert_eq!(messages, vec!["must be positive", "must be even"]);
        assert!(validator.validate(&42).is_valid());
    }

    #[test]
    fn display_lists_failures() {
        let mut result = ValidationResult::valid();
        assert_eq!(result.to_string(), "valid");
        result.push("id", "required");
        result.push("email", "invalid");
        assert_eq!(result.to_string(), "id: required; email: invalid");
        assert!(result.into_result().is_err());
    }
}
