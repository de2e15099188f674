//! Typed clause lists shared by the builders and their rendering.

use crate::dialect::Dialect;
use crate::query::param::Binder;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// JOIN type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// A JOIN clause; the ON condition is a raw SQL fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: Option<String>,
    pub on: String,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " {alias}")?;
        }
        write!(f, " ON {}", self.on)
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    /// Parse `asc` / `desc` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ORDER BY entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// The FROM target of a SELECT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FromTable {
    pub table: String,
    pub alias: Option<String>,
}

impl fmt::Display for FromTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " {alias}")?;
        }
        Ok(())
    }
}

/// Non-predicate clauses of a SELECT, kept in call order within each list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClauseSet {
    pub columns: Vec<String>,
    pub from: Option<FromTable>,
    pub joins: Vec<Join>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ClauseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `SELECT <cols> FROM <from> [JOIN ...]`
    pub(crate) fn render_head(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {columns}");
        if let Some(from) = &self.from {
            sql.push_str(" FROM ");
            sql.push_str(&from.to_string());
        }
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_string());
        }
        sql
    }

    /// ` GROUP BY ...` or empty.
    pub(crate) fn render_group_by(&self) -> String {
        if self.group_by.is_empty() {
            String::new()
        } else {
            format!(" GROUP BY {}", self.group_by.join(", "))
        }
    }

    /// ` ORDER BY ...` or empty.
    pub(crate) fn render_order_by(&self) -> String {
        if self.order_by.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self.order_by.iter().map(ToString::to_string).collect();
        format!(" ORDER BY {}", parts.join(", "))
    }

    /// ` LIMIT n OFFSET m` when a limit is set; the offset defaults to 0.
    pub(crate) fn render_limit(&self) -> String {
        match self.limit {
            Some(limit) => format!(" LIMIT {} OFFSET {}", limit, self.offset.unwrap_or(0)),
            None => String::new(),
        }
    }
}

/// `column = value` pairs of an INSERT or UPDATE, in insertion order.
///
/// Setting a column twice overwrites the value but keeps its first position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignments {
    items: Vec<(String, Value)>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.items.iter_mut().find(|(c, _)| c == column) {
            Some(slot) => slot.1 = value,
            None => self.items.push((column.to_string(), value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.items.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// `` `a` = v1, `b` = v2 ``
    pub(crate) fn render_set(&self, dialect: Dialect, binder: &Binder<'_>) -> String {
        self.items
            .iter()
            .map(|(c, v)| format!("{} = {}", dialect.quote_identifier(c), binder.value(v)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `` (`a`, `b`) VALUES (v1, v2) ``
    pub(crate) fn render_values(&self, dialect: Dialect, binder: &Binder<'_>) -> String {
        let columns: Vec<String> = self
            .items
            .iter()
            .map(|(c, _)| dialect.quote_identifier(c))
            .collect();
        let values: Vec<String> = self.items.iter().map(|(_, v)| binder.value(v)).collect();
        format!("({}) VALUES ({})", columns.join(", "), values.join(", "))
    }
}
