//! Composable validation rules.
//!
//! A [`Rule`] checks one [`Value`]; a [`Validator`] chains rules for one
//! input; a [`Form`] maps field names to validators and collects
//! [`ValidationErrors`]. A failing check is never an `Err` of
//! [`QuarryError`](crate::QuarryError): only bad rule configuration is.
//!
//! ```ignore
//! use quarry::validator::{Alpha, Form, Length, Validator};
//!
//! let form = Form::new()
//!     .field("login", Validator::new().required().rule(Alpha::new("-_")).rule(Length::between(3, 32)?))
//!     .field("email", Validator::new().rule(Email));
//!
//! if let Err(errors) = form.validate(&record) {
//!     return Json(errors);
//! }
//! ```

mod error;
mod filter;
mod rules;

pub use error::{FieldError, MessageSource, RuleKind, ValidationErrors};
pub use filter::{Alpha, AlphaNumeric, CharFilter, Digit};
pub use rules::{Between, Callback, InList, Length, Required, Uuid};
#[cfg(feature = "validate")]
pub use rules::{Email, Pattern, Url};

use crate::record::Record;
use crate::value::Value;
use std::fmt;

/// A single validation rule. Rules are immutable once built.
pub trait Rule: Send + Sync {
    /// Whether `input` passes.
    fn validate(&self, input: &Value) -> bool;

    fn kind(&self) -> RuleKind;

    /// Human readable requirement, used as the default error message.
    fn description(&self) -> String;
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn validate(&self, input: &Value) -> bool {
        (**self).validate(input)
    }

    fn kind(&self) -> RuleKind {
        (**self).kind()
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

struct Entry {
    rule: Box<dyn Rule>,
    message: Option<String>,
}

impl Entry {
    fn message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.rule.description())
    }

    fn failure(&self, field: &str) -> FieldError {
        FieldError {
            field: field.to_string(),
            rule: self.rule.kind(),
            message: self.message(),
            source: if self.message.is_some() {
                MessageSource::Custom
            } else {
                MessageSource::Rule
            },
        }
    }
}

/// Rule chain for one input.
///
/// Unless [`required`](Validator::required) is set, empty input (`Null`, `""`,
/// empty list) passes without running any rule.
#[derive(Default)]
pub struct Validator {
    rules: Vec<Entry>,
    required: bool,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Entry {
            rule: Box::new(rule),
            message: None,
        });
        self
    }

    /// Add a rule with a custom error message.
    pub fn rule_with_message(mut self, rule: impl Rule + 'static, message: &str) -> Self {
        self.rules.push(Entry {
            rule: Box::new(rule),
            message: Some(message.to_string()),
        });
        self
    }

    /// Reject empty input.
    pub fn required(mut self) -> Self {
        if !self.required {
            self.required = true;
            self.rules.insert(
                0,
                Entry {
                    rule: Box::new(Required),
                    message: None,
                },
            );
        }
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn skips(&self, input: &Value) -> bool {
        !self.required && input.is_empty()
    }

    fn failing<'a>(&'a self, input: &'a Value) -> impl Iterator<Item = &'a Entry> + 'a {
        let skip = self.skips(input);
        self.rules
            .iter()
            .filter(move |entry| !skip && !entry.rule.validate(input))
    }

    /// Whether every rule passes.
    pub fn validate(&self, input: &Value) -> bool {
        self.failing(input).next().is_none()
    }

    /// Messages of every failing rule, in rule order.
    pub fn messages(&self, input: &Value) -> Vec<String> {
        self.failing(input).map(Entry::message).collect()
    }

    /// Failing rules as errors for `field`.
    pub fn errors(&self, field: &str, input: &Value) -> Vec<FieldError> {
        self.failing(input).map(|entry| entry.failure(field)).collect()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<String> = self.rules.iter().map(|e| e.rule.description()).collect();
        f.debug_struct("Validator")
            .field("rules", &rules)
            .field("required", &self.required)
            .finish()
    }
}

/// Named validators applied to a record.
#[derive(Debug, Default)]
pub struct Form {
    fields: Vec<(String, Validator)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, validator: Validator) -> Self {
        self.fields.push((name.to_string(), validator));
        self
    }

    /// Validate every field; a missing column is validated as `Null`.
    pub fn validate(&self, data: &Record) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (name, validator) in &self.fields {
            let value = data.get(name).unwrap_or(&Value::Null);
            for err in validator.errors(name, value) {
                errors.push(err);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
