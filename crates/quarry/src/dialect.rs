//! SQL dialects: identifier quoting and literal rendering.
//!
//! The default dialect is [`Dialect::MySql`], which renders identifiers with
//! backticks and every scalar literal double-quoted:
//!
//! ```ignore
//! use quarry::{Dialect, Value};
//!
//! assert_eq!(Dialect::MySql.quote_identifier("test"), "`test`");
//! assert_eq!(Dialect::MySql.quote_literal(&Value::from(4)), "\"4\"");
//! assert_eq!(Dialect::Postgres.quote_literal(&Value::from("it's")), "'it''s'");
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
}

impl Dialect {
    /// Quote an identifier (table or column name).
    ///
    /// Dotted names are quoted part by part: `db.users` -> `` `db`.`users` ``.
    pub fn quote_identifier(&self, ident: &str) -> String {
        let (open, close, escaped_close) = match self {
            Dialect::MySql => ('`', '`', "``"),
            Dialect::Postgres => ('"', '"', "\"\""),
        };
        ident
            .split('.')
            .map(|part| {
                let mut out = String::with_capacity(part.len() + 2);
                out.push(open);
                for ch in part.chars() {
                    if ch == close {
                        out.push_str(escaped_close);
                    } else {
                        out.push(ch);
                    }
                }
                out.push(close);
                out
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Render a value as an inline SQL literal.
    ///
    /// Lists render as comma separated literals without surrounding parentheses.
    pub fn quote_literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::List(items) => {
                if items.is_empty() {
                    return "NULL".to_string();
                }
                items
                    .iter()
                    .map(|v| self.quote_literal(v))
                    .collect::<Vec<_>>()
                    .join(",")
            }
            Value::Bool(b) if *self == Dialect::Postgres => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
            scalar => {
                let text = scalar.as_text().unwrap_or_default();
                self.quote_text(&text)
            }
        }
    }

    fn quote_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        match self {
            Dialect::MySql => {
                out.push('"');
                for ch in text.chars() {
                    if ch == '"' || ch == '\\' {
                        out.push('\\');
                    }
                    out.push(ch);
                }
                out.push('"');
            }
            Dialect::Postgres => {
                out.push('\'');
                for ch in text.chars() {
                    if ch == '\'' {
                        out.push('\'');
                    }
                    out.push(ch);
                }
                out.push('\'');
            }
        }
        out
    }

    /// Whether `DELETE ... LIMIT n` is supported natively.
    pub fn supports_delete_limit(&self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// Whether `INSERT ... RETURNING` is supported.
    pub fn supports_returning(&self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(Dialect::MySql.quote_identifier("test"), "`test`");
        assert_eq!(Dialect::MySql.quote_identifier("db.test"), "`db`.`test`");
        assert_eq!(Dialect::MySql.quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(Dialect::Postgres.quote_identifier("users"), "\"users\"");
        assert_eq!(
            Dialect::Postgres.quote_identifier("public.users"),
            "\"public\".\"users\""
        );
    }

    #[test]
    fn test_quote_literal_mysql() {
        let d = Dialect::MySql;
        assert_eq!(d.quote_literal(&Value::from(4)), "\"4\"");
        assert_eq!(d.quote_literal(&Value::from("A%")), "\"A%\"");
        assert_eq!(d.quote_literal(&Value::from("say \"hi\"")), "\"say \\\"hi\\\"\"");
        assert_eq!(d.quote_literal(&Value::from(true)), "\"1\"");
        assert_eq!(d.quote_literal(&Value::Null), "NULL");
        assert_eq!(d.quote_literal(&Value::from(vec![4, 5])), "\"4\",\"5\"");
    }

    #[test]
    fn test_quote_literal_postgres() {
        let d = Dialect::Postgres;
        assert_eq!(d.quote_literal(&Value::from("it's")), "'it''s'");
        assert_eq!(d.quote_literal(&Value::from(false)), "FALSE");
        assert_eq!(d.quote_literal(&Value::from(7)), "'7'");
    }
}
