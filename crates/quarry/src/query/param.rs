//! Bind parameters: conversion of call arguments, named parameter storage and
//! placeholder substitution.

use crate::value::Value;
use std::collections::BTreeMap;

/// Arguments accepted by the `where`/`having` family.
///
/// Implemented for `()`, single scalars, tuples (one parameter per field),
/// [`Params`] and lists. A `Vec<T>` or `[T; N]` is a *single* list
/// parameter, expanded by its `?`:
///
/// ```ignore
/// select.where_("u.id = ? OR u.id = ?", (4, 5));
/// select.where_("u.id IN (?)", vec![4, 5]);
/// select.where_("u.id IN (?) AND status = ?", params![vec![4, 5], "active"]);
/// ```
pub trait IntoParams {
    fn into_params(self) -> Vec<Value>;
}

impl IntoParams for () {
    fn into_params(self) -> Vec<Value> {
        Vec::new()
    }
}

impl IntoParams for Value {
    fn into_params(self) -> Vec<Value> {
        vec![self]
    }
}

impl<T: Into<Value>> IntoParams for Vec<T> {
    fn into_params(self) -> Vec<Value> {
        vec![Value::from(self)]
    }
}

impl<T: Into<Value>, const N: usize> IntoParams for [T; N] {
    fn into_params(self) -> Vec<Value> {
        vec![Value::from(self)]
    }
}

/// Positional parameters built by [`params!`](crate::params), one per `?`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(Vec<Value>);

impl Params {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl IntoParams for Params {
    fn into_params(self) -> Vec<Value> {
        self.0
    }
}

macro_rules! impl_into_params_scalar {
    ($($ty:ty),*) => {
        $(
            impl IntoParams for $ty {
                fn into_params(self) -> Vec<Value> {
                    vec![Value::from(self)]
                }
            }
        )*
    };
}

impl_into_params_scalar!(&str, String, &String, bool, i32, i64, u32, u64, f64);

macro_rules! impl_into_params_tuple {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> IntoParams for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_params(self) -> Vec<Value> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

impl_into_params_tuple!(A);
impl_into_params_tuple!(A, B);
impl_into_params_tuple!(A, B, C);
impl_into_params_tuple!(A, B, C, D);
impl_into_params_tuple!(A, B, C, D, E);
impl_into_params_tuple!(A, B, C, D, E, F);
impl_into_params_tuple!(A, B, C, D, E, F, G);
impl_into_params_tuple!(A, B, C, D, E, F, G, H);

/// Build a heterogeneous parameter list, one parameter per argument.
///
/// ```ignore
/// let p = quarry::params![4, "active", vec![1, 2]];
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::query::Params::default()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::query::Params::new(::std::vec![$($crate::Value::from($value)),+])
    };
}

/// Expand `?` placeholders for list arguments.
///
/// Each `?` consumes one argument. A list argument turns its `?` into one `?`
/// per element (`IN (?)` with `[4, 5]` becomes `IN (?,?)`); an empty list
/// becomes `NULL`. Surplus arguments are ignored.
pub(crate) fn expand_placeholders(sql: &str, args: Vec<Value>) -> (String, Vec<Value>) {
    let mut out = String::with_capacity(sql.len());
    let mut params = Vec::with_capacity(args.len());
    let mut args = args.into_iter();

    for ch in sql.chars() {
        if ch != '?' {
            out.push(ch);
            continue;
        }
        match args.next() {
            Some(Value::List(items)) => {
                if items.is_empty() {
                    out.push_str("NULL");
                } else {
                    let marks = vec!["?"; items.len()];
                    out.push_str(&marks.join(","));
                    params.extend(items);
                }
            }
            Some(value) => {
                out.push('?');
                params.push(value);
            }
            None => out.push('?'),
        }
    }

    (out, params)
}

/// Named parameters (`:name`) set on a query.
///
/// Keys are stored with their leading colon, whichever form was given.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamedParams {
    values: BTreeMap<String, Value>,
}

impl NamedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(normalize_name(name), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn normalize_name(name: &str) -> String {
    if name.starts_with(':') {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

/// How placeholders are treated while rendering.
#[derive(Clone, Copy)]
pub(crate) struct Binder<'a> {
    quote: Option<&'a (dyn Fn(&Value) -> String + Sync)>,
    named: Option<&'a NamedParams>,
}

impl<'a> Binder<'a> {
    /// Leave every placeholder as written.
    pub(crate) fn structural() -> Self {
        Self {
            quote: None,
            named: None,
        }
    }

    /// Inline positional parameters using `quote`.
    pub(crate) fn inline(quote: &'a (dyn Fn(&Value) -> String + Sync)) -> Self {
        Self {
            quote: Some(quote),
            named: None,
        }
    }

    /// Also inline named parameters that have a value.
    pub(crate) fn with_named(mut self, named: &'a NamedParams) -> Self {
        self.named = Some(named);
        self
    }

    /// Quote a single value, or `?` in structural mode.
    pub(crate) fn value(&self, value: &Value) -> String {
        match self.quote {
            Some(quote) => quote(value),
            None => "?".to_string(),
        }
    }

    /// Substitute placeholders in a fragment with its own positional parameters.
    ///
    /// Substitution is a single pass over the template, so literal text that
    /// was inlined is never scanned again.
    pub(crate) fn bind(&self, sql: &str, params: &[Value]) -> String {
        let Some(quote) = self.quote else {
            return sql.to_string();
        };

        let mut out = String::with_capacity(sql.len() + params.len() * 4);
        let mut positional = params.iter();
        let mut chars = sql.char_indices().peekable();
        let mut prev = None;

        while let Some((start, ch)) = chars.next() {
            if ch == '?' {
                match positional.next() {
                    Some(v) => out.push_str(&quote(v)),
                    None => out.push('?'),
                }
                prev = Some(ch);
                continue;
            }

            // `::` is a cast, never a named parameter
            if ch == ':'
                && prev != Some(':')
                && let Some(named) = self.named
                && chars
                    .peek()
                    .is_some_and(|&(_, c)| c.is_ascii_alphabetic() || c == '_')
            {
                let mut end = start + 1;
                while let Some(&(idx, c)) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    end = idx + c.len_utf8();
                    chars.next();
                }
                let name = &sql[start..end];
                match named.get(name) {
                    Some(v) => out.push_str(&quote(v)),
                    None => out.push_str(name),
                }
                prev = None;
                continue;
            }

            out.push(ch);
            prev = Some(ch);
        }

        out
    }
}
