//! Row records and record mapping traits

use crate::error::{QuarryError, QuarryResult};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered mapping of column name to [`Value`], as returned by an executor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(column, value)` pairs, keeping their order.
    ///
    /// A repeated column overwrites the earlier value in place.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = Self::new();
        for (k, v) in pairs {
            record.set(k, v);
        }
        record
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|i| &self.values[i])
    }

    /// Set a column value, appending the column if it is new.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.position(&column) {
            Some(i) => self.values[i] = value,
            None => {
                self.columns.push(column);
                self.values.push(value);
            }
        }
    }

    /// Remove a column, returning its value.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let i = self.position(column)?;
        self.columns.remove(i);
        Some(self.values.remove(i))
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Decode a column into `T`, returning [`QuarryError::Decode`] on failure.
    pub fn try_get<T: FromValue>(&self, column: &str) -> QuarryResult<T> {
        match self.get(column) {
            Some(v) => T::from_value(v).map_err(|message| QuarryError::decode(column, message)),
            None => T::from_value(&Value::Null)
                .map_err(|_| QuarryError::decode(column, "column is missing")),
        }
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record::from_pairs(iter)
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<String>, std::vec::IntoIter<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter().zip(self.values)
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Conversion from a single [`Value`] into a Rust type.
pub trait FromValue: Sized {
    /// Convert the value, returning a human readable message on failure.
    fn from_value(value: &Value) -> Result<Self, String>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        value
            .as_i64()
            .ok_or_else(|| format!("expected integer, got {value:?}"))
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let v = i64::from_value(value)?;
        i32::try_from(v).map_err(|e| e.to_string())
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let v = i64::from_value(value)?;
        u64::try_from(v).map_err(|e| e.to_string())
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        value
            .as_f64()
            .ok_or_else(|| format!("expected number, got {value:?}"))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::Text(s) if s == "1" || s == "t" || s == "true" => Ok(true),
            Value::Text(s) if s == "0" || s == "f" || s == "false" => Ok(false),
            other => Err(format!("expected boolean, got {other:?}")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        value
            .as_text()
            .ok_or_else(|| format!("expected text, got {value:?}"))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}

/// Trait for converting a [`Record`] into a Rust struct.
///
/// # Example
///
/// ```ignore
/// use quarry::{FromRecord, QuarryResult, Record};
///
/// struct User {
///     id: i64,
///     login: String,
///     email: Option<String>,
/// }
///
/// impl FromRecord for User {
///     fn from_record(record: &Record) -> QuarryResult<Self> {
///         Ok(Self {
///             id: record.try_get("id")?,
///             login: record.try_get("login")?,
///             email: record.try_get("email")?,
///         })
///     }
/// }
/// ```
pub trait FromRecord: Sized {
    /// Convert a record into Self
    fn from_record(record: &Record) -> QuarryResult<Self>;
}

impl FromRecord for Record {
    fn from_record(record: &Record) -> QuarryResult<Self> {
        Ok(record.clone())
    }
}
