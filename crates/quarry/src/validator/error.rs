//! Failures reported by a [`Form`](super::Form).

use serde::Serialize;
use serde::ser::SerializeMap;
use std::fmt;

/// The kind of rule that rejected an input.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    Length,
    Between,
    InList,
    Uuid,
    Pattern,
    Email,
    Url,
    Alpha,
    AlphaNumeric,
    Digit,
    Callback,
}

/// Where a failure message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    /// The rule's own description.
    Rule,
    /// A message given with [`Validator::rule_with_message`](super::Validator::rule_with_message).
    Custom,
}

/// One rule that rejected one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub rule: RuleKind,
    pub message: String,
    pub source: MessageSource,
}

/// Every failure of a form, in field then rule order.
///
/// Serializes as a map of field name to failures:
/// `{"login": [{"rule": "required", "message": "is required"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, index: usize) -> Option<&FieldError> {
        self.errors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Names of the failing fields, each once.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }

    /// Messages reported for `field`.
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Whether `field` was rejected by a rule of `kind`.
    pub fn has(&self, field: &str, kind: RuleKind) -> bool {
        self.errors.iter().any(|e| e.field == field && e.rule == kind)
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[derive(Serialize)]
struct Failure<'a> {
    rule: RuleKind,
    message: &'a str,
}

impl Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            let failures: Vec<Failure<'_>> = self
                .errors
                .iter()
                .filter(|e| e.field == field)
                .map(|e| Failure {
                    rule: e.rule,
                    message: &e.message,
                })
                .collect();
            map.serialize_entry(field, &failures)?;
        }
        map.end()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
