//! Character-class rules that ignore a configurable set of extra characters.
//!
//! Input is stringified, the extra characters are stripped, and whatever is
//! left must pass the class check. Input that is empty after stripping passes.

use crate::error::{QuarryError, QuarryResult};
use crate::validator::{Rule, RuleKind};
use crate::value::Value;

/// Set of characters removed before a clean-input check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharFilter {
    chars: String,
}

impl CharFilter {
    pub fn new(chars: &str) -> Self {
        Self {
            chars: chars.to_string(),
        }
    }

    /// Build from dynamic configuration; only text is accepted.
    pub fn from_value(value: &Value) -> QuarryResult<Self> {
        match value {
            Value::Text(chars) => Ok(Self::new(chars)),
            _ => Err(QuarryError::configuration(
                "Invalid list of additional characters to be loaded",
            )),
        }
    }

    /// Add more characters to the set.
    pub fn with_chars(mut self, chars: &str) -> Self {
        self.chars.push_str(chars);
        self
    }

    pub fn chars(&self) -> &str {
        &self.chars
    }

    /// Remove every configured character from `input`.
    pub fn filter(&self, input: &str) -> String {
        input.chars().filter(|c| !self.chars.contains(*c)).collect()
    }

    /// Non-scalar input fails; otherwise the filtered text must be empty or
    /// pass `clean_check`.
    pub fn validate_with(&self, input: &Value, clean_check: impl Fn(&str) -> bool) -> bool {
        let Some(text) = input.as_text() else {
            return false;
        };
        let clean = self.filter(&text);
        clean.is_empty() || clean_check(&clean)
    }
}

macro_rules! char_class_rule {
    ($(#[$doc:meta])* $name:ident, $code:expr, $check:expr, $description:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            filter: CharFilter,
        }

        impl $name {
            /// Allow `extra` characters in addition to the class.
            pub fn new(extra: &str) -> Self {
                Self {
                    filter: CharFilter::new(extra),
                }
            }

            /// Like `new`, from dynamic configuration.
            pub fn from_value(extra: &Value) -> QuarryResult<Self> {
                Ok(Self {
                    filter: CharFilter::from_value(extra)?,
                })
            }

            pub fn filter(&self) -> &CharFilter {
                &self.filter
            }
        }

        impl Rule for $name {
            fn validate(&self, input: &Value) -> bool {
                // whitespace is ignored like the extra characters
                self.filter
                    .validate_with(input, |clean| clean.chars().filter(|c| !c.is_whitespace()).all($check))
            }

            fn kind(&self) -> RuleKind {
                $code
            }

            fn description(&self) -> String {
                if self.filter.chars().is_empty() {
                    $description.to_string()
                } else {
                    format!(concat!($description, " and \"{}\""), self.filter.chars())
                }
            }
        }
    };
}

char_class_rule!(
    /// ASCII letters only.
    Alpha,
    RuleKind::Alpha,
    |c: char| c.is_ascii_alphabetic(),
    "must contain only letters (a-z)"
);

char_class_rule!(
    /// ASCII letters and digits only.
    AlphaNumeric,
    RuleKind::AlphaNumeric,
    |c: char| c.is_ascii_alphanumeric(),
    "must contain only letters (a-z) and digits (0-9)"
);

char_class_rule!(
    /// ASCII digits only.
    Digit,
    RuleKind::Digit,
    |c: char| c.is_ascii_digit(),
    "must contain only digits (0-9)"
);
