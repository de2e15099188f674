//! General-purpose rules.

use crate::error::{QuarryError, QuarryResult};
use crate::validator::{Rule, RuleKind};
use crate::value::Value;
use std::fmt;

/// Input must not be empty (`Null`, `""` or an empty list).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Required;

impl Rule for Required {
    fn validate(&self, input: &Value) -> bool {
        match input {
            Value::Text(s) => !s.trim().is_empty(),
            other => !other.is_empty(),
        }
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Required
    }

    fn description(&self) -> String {
        "is required".to_string()
    }
}

/// Length in characters (text) or elements (list), inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    min: Option<usize>,
    max: Option<usize>,
}

impl Length {
    pub fn new(min: Option<usize>, max: Option<usize>) -> QuarryResult<Self> {
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(QuarryError::configuration(format!(
                "{min} cannot be greater than {max} for length"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn between(min: usize, max: usize) -> QuarryResult<Self> {
        Self::new(Some(min), Some(max))
    }

    pub fn min(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn max(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }
}

impl Rule for Length {
    fn validate(&self, input: &Value) -> bool {
        let len = match input {
            Value::List(items) => items.len(),
            Value::Null => return false,
            scalar => scalar.as_text().map_or(0, |s| s.chars().count()),
        };
        self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max)
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Length
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("must have a length between {min} and {max}"),
            (Some(min), None) => format!("must have a length greater than or equal to {min}"),
            (None, Some(max)) => format!("must have a length lower than or equal to {max}"),
            (None, None) => "must have a length".to_string(),
        }
    }
}

/// Numeric value within an inclusive range; numeric text is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Between {
    min: f64,
    max: f64,
}

impl Between {
    pub fn new(min: f64, max: f64) -> QuarryResult<Self> {
        if min > max {
            return Err(QuarryError::configuration(format!(
                "{min} cannot be greater than {max} for range"
            )));
        }
        Ok(Self { min, max })
    }
}

impl Rule for Between {
    fn validate(&self, input: &Value) -> bool {
        input
            .as_f64()
            .is_some_and(|n| n >= self.min && n <= self.max)
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Between
    }

    fn description(&self) -> String {
        format!("must be between {} and {}", self.min, self.max)
    }
}

/// Value must equal one of the allowed values.
///
/// Scalars compare by their text form, so `4` matches `"4"`.
#[derive(Debug, Clone, PartialEq)]
pub struct InList {
    allowed: Vec<Value>,
}

impl InList {
    pub fn new<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for InList {
    fn validate(&self, input: &Value) -> bool {
        let Some(text) = input.as_text() else {
            return false;
        };
        self.allowed
            .iter()
            .any(|v| v.as_text().is_some_and(|a| a == text))
    }

    fn kind(&self) -> RuleKind {
        RuleKind::InList
    }

    fn description(&self) -> String {
        let items: Vec<String> = self.allowed.iter().map(ToString::to_string).collect();
        format!("must be in list ({})", items.join(", "))
    }
}

/// Value must parse as a UUID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Uuid;

impl Rule for Uuid {
    fn validate(&self, input: &Value) -> bool {
        input
            .as_str()
            .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok())
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Uuid
    }

    fn description(&self) -> String {
        "must be a valid UUID".to_string()
    }
}

/// Rule backed by a closure.
pub struct Callback<F> {
    check: F,
    description: String,
}

impl<F> Callback<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    pub fn new(description: &str, check: F) -> Self {
        Self {
            check,
            description: description.to_string(),
        }
    }
}

impl<F> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<F> Rule for Callback<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn validate(&self, input: &Value) -> bool {
        (self.check)(input)
    }

    fn kind(&self) -> RuleKind {
        RuleKind::Callback
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

#[cfg(feature = "validate")]
mod text {
    use super::*;
    use std::sync::OnceLock;

    /// Text must match a regular expression.
    #[derive(Debug, Clone)]
    pub struct Pattern {
        regex: regex::Regex,
    }

    impl Pattern {
        pub fn new(pattern: &str) -> QuarryResult<Self> {
            let regex = regex::Regex::new(pattern).map_err(|e| {
                QuarryError::configuration(format!("invalid regex pattern {pattern:?}: {e}"))
            })?;
            Ok(Self { regex })
        }
    }

    impl Rule for Pattern {
        fn validate(&self, input: &Value) -> bool {
            input.as_text().is_some_and(|s| self.regex.is_match(&s))
        }

        fn kind(&self) -> RuleKind {
            RuleKind::Pattern
        }

        fn description(&self) -> String {
            format!("must match {:?}", self.regex.as_str())
        }
    }

    /// Best-effort email check; not fully RFC-compliant.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Email;

    fn email_regex() -> Option<&'static regex::Regex> {
        static EMAIL_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();
        EMAIL_RE
            .get_or_init(|| regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
            .as_ref()
    }

    impl Rule for Email {
        fn validate(&self, input: &Value) -> bool {
            match (input.as_str(), email_regex()) {
                (Some(s), Some(re)) => re.is_match(s),
                _ => false,
            }
        }

        fn kind(&self) -> RuleKind {
            RuleKind::Email
        }

        fn description(&self) -> String {
            "must be a valid email".to_string()
        }
    }

    /// Text must parse as an absolute URL.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Url;

    impl Rule for Url {
        fn validate(&self, input: &Value) -> bool {
            input.as_str().is_some_and(|s| url::Url::parse(s).is_ok())
        }

        fn kind(&self) -> RuleKind {
            RuleKind::Url
        }

        fn description(&self) -> String {
            "must be a valid URL".to_string()
        }
    }
}

#[cfg(feature = "validate")]
pub use text::{Email, Pattern, Url};
