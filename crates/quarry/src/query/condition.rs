//! Condition trees for WHERE/HAVING clauses.
//!
//! A tree grows strictly in insertion order. Each `and`/`or` call either
//! appends the new leaf to the root group (when the root already uses the same
//! combinator) or makes the current root and the new leaf the two parts of a
//! new root group. Existing groups are never re-grouped.
//!
//! ```ignore
//! use quarry::query::ConditionTree;
//!
//! let mut tree = ConditionTree::new();
//! tree.start("a = ?", 1);
//! tree.or("b = ?", 2);
//! tree.and("c = ?", 3);
//! assert_eq!(tree.to_sql(), "((a = ?) OR (b = ?)) AND (c = ?)");
//! ```

use crate::query::param::{Binder, IntoParams, expand_placeholders};
use crate::value::Value;
use std::fmt;

/// Boolean combinator joining the parts of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node of a condition tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Raw SQL fragment with its positional parameters.
    Leaf { sql: String, params: Vec<Value> },
    /// Parts joined by one combinator.
    Group {
        combinator: Combinator,
        parts: Vec<Condition>,
    },
}

impl Condition {
    /// Create a leaf, expanding `?` for list arguments.
    pub fn leaf(sql: &str, params: impl IntoParams) -> Self {
        let (sql, params) = expand_placeholders(sql, params.into_params());
        Condition::Leaf { sql, params }
    }

    /// Join `self` and `node` with `combinator`.
    pub fn combine(self, combinator: Combinator, node: Condition) -> Self {
        match self {
            Condition::Group {
                combinator: current,
                mut parts,
            } if current == combinator => {
                parts.push(node);
                Condition::Group { combinator, parts }
            }
            other => Condition::Group {
                combinator,
                parts: vec![other, node],
            },
        }
    }

    /// Positional parameters in render order.
    pub fn params(&self) -> Vec<&Value> {
        let mut out = Vec::new();
        self.collect_params(&mut out);
        out
    }

    fn collect_params<'a>(&'a self, out: &mut Vec<&'a Value>) {
        match self {
            Condition::Leaf { params, .. } => out.extend(params.iter()),
            Condition::Group { parts, .. } => {
                for part in parts {
                    part.collect_params(out);
                }
            }
        }
    }

    pub(crate) fn render(&self, binder: &Binder<'_>) -> String {
        match self {
            Condition::Leaf { sql, params } => binder.bind(sql, params),
            Condition::Group { combinator, parts } => {
                if parts.len() == 1 {
                    return parts[0].render(binder);
                }
                let rendered: Vec<String> = parts.iter().map(|p| p.render(binder)).collect();
                format!("({})", rendered.join(&format!(") {} (", combinator)))
            }
        }
    }
}

/// A WHERE or HAVING clause under construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionTree {
    root: Option<Condition>,
}

impl ConditionTree {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&Condition> {
        self.root.as_ref()
    }

    /// Replace the whole tree with a single leaf.
    pub fn start(&mut self, sql: &str, params: impl IntoParams) {
        self.root = Some(Condition::leaf(sql, params));
    }

    /// Append a leaf joined with AND.
    pub fn and(&mut self, sql: &str, params: impl IntoParams) {
        self.push(Combinator::And, Condition::leaf(sql, params));
    }

    /// Append a leaf joined with OR.
    pub fn or(&mut self, sql: &str, params: impl IntoParams) {
        self.push(Combinator::Or, Condition::leaf(sql, params));
    }

    /// Append any node; on an empty tree the node becomes the root.
    pub fn push(&mut self, combinator: Combinator, node: Condition) {
        self.root = Some(match self.root.take() {
            Some(root) => root.combine(combinator, node),
            None => node,
        });
    }

    /// Positional parameters in render order.
    pub fn params(&self) -> Vec<&Value> {
        self.root.as_ref().map(Condition::params).unwrap_or_default()
    }

    /// Structural SQL with `?` placeholders.
    pub fn to_sql(&self) -> String {
        self.render(&Binder::structural())
    }

    pub(crate) fn render(&self, binder: &Binder<'_>) -> String {
        self.root
            .as_ref()
            .map(|root| root.render(binder))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn bound(tree: &ConditionTree) -> String {
        let quote = |v: &Value| Dialect::MySql.quote_literal(v);
        tree.render(&Binder::inline(&quote))
    }

    #[test]
    fn test_single_leaf_is_unwrapped() {
        let mut tree = ConditionTree::new();
        tree.start("u.id = ? OR u.id = ?", (4, 5));
        assert_eq!(tree.to_sql(), "u.id = ? OR u.id = ?");
        assert_eq!(bound(&tree), "u.id = \"4\" OR u.id = \"5\"");
    }

    #[test]
    fn test_or_then_list() {
        let mut tree = ConditionTree::new();
        tree.start("u.id = ? OR u.id = ?", (4, 5));
        tree.or("u.id IN (?)", (vec![4, 5],));
        assert_eq!(
            bound(&tree),
            "(u.id = \"4\" OR u.id = \"5\") OR (u.id IN (\"4\",\"5\"))"
        );
    }

    #[test]
    fn test_left_associative_nesting() {
        let mut tree = ConditionTree::new();
        tree.start("a", ());
        tree.or("b", ());
        tree.and("c", ());
        tree.or("d", ());
        assert_eq!(tree.to_sql(), "(((a) OR (b)) AND (c)) OR (d)");
    }

    #[test]
    fn test_same_combinator_appends() {
        let mut tree = ConditionTree::new();
        tree.start("a", ());
        tree.and("b", ());
        tree.and("c", ());
        assert_eq!(tree.to_sql(), "(a) AND (b) AND (c)");
    }

    #[test]
    fn test_and_on_empty_tree_starts() {
        let mut tree = ConditionTree::new();
        tree.and("a = ?", 1);
        assert_eq!(tree.to_sql(), "a = ?");
        assert_eq!(tree.params(), vec![&Value::from(1)]);
    }

    #[test]
    fn test_start_replaces() {
        let mut tree = ConditionTree::new();
        tree.start("a", ());
        tree.and("b", ());
        tree.start("c", ());
        assert_eq!(tree.to_sql(), "c");
    }

    #[test]
    fn test_params_in_render_order() {
        let mut tree = ConditionTree::new();
        tree.start("a = ?", 1);
        tree.or("b IN (?)", (vec![2, 3],));
        tree.and("c = ?", 4);
        let params: Vec<_> = tree.params().into_iter().cloned().collect();
        assert_eq!(
            params,
            vec![Value::from(1), Value::from(2), Value::from(3), Value::from(4)]
        );
    }
}
