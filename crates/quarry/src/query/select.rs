//! SELECT query builder.

use crate::dialect::Dialect;
use crate::error::{QuarryError, QuarryResult};
use crate::executor::{Executor, trace_sql};
use crate::query::clause::{ClauseSet, Direction, FromTable, Join, JoinKind, OrderBy};
use crate::query::condition::ConditionTree;
use crate::query::macros::{impl_render_methods, impl_where_methods};
use crate::query::param::{Binder, IntoParams, NamedParams};
use crate::query::traits::Render;
use crate::record::{FromRecord, Record};
use crate::value::Value;

/// SELECT query builder.
///
/// Clauses are rendered in a fixed order whatever the call order:
/// `SELECT → FROM → JOIN → WHERE → GROUP BY → HAVING → ORDER BY → LIMIT/OFFSET`.
#[derive(Clone, Debug, Default)]
pub struct Select {
    clauses: ClauseSet,
    where_tree: ConditionTree,
    having_tree: ConditionTree,
    named: NamedParams,
    dialect: Dialect,
}

impl Select {
    /// Create an empty SELECT builder. `from` must be called before `get_query`.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== SELECT columns ====================

    /// Replace the SELECT column list.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clauses.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one SELECT column.
    pub fn add_select(mut self, column: &str) -> Self {
        self.clauses.columns.push(column.to_string());
        self
    }

    // ==================== FROM / JOIN ====================

    /// Set the FROM table with an optional alias.
    pub fn from<'a>(mut self, table: &str, alias: impl Into<Option<&'a str>>) -> Self {
        self.clauses.from = Some(FromTable {
            table: table.to_string(),
            alias: alias.into().map(str::to_string),
        });
        self
    }

    fn push_join<'a>(
        mut self,
        kind: JoinKind,
        table: &str,
        alias: impl Into<Option<&'a str>>,
        on: &str,
    ) -> Self {
        self.clauses.joins.push(Join {
            kind,
            table: table.to_string(),
            alias: alias.into().map(str::to_string),
            on: on.to_string(),
        });
        self
    }

    /// Add INNER JOIN.
    pub fn join<'a>(self, table: &str, alias: impl Into<Option<&'a str>>, on: &str) -> Self {
        self.push_join(JoinKind::Inner, table, alias, on)
    }

    /// Alias for `join`.
    pub fn inner_join<'a>(self, table: &str, alias: impl Into<Option<&'a str>>, on: &str) -> Self {
        self.push_join(JoinKind::Inner, table, alias, on)
    }

    /// Add LEFT JOIN.
    pub fn left_join<'a>(self, table: &str, alias: impl Into<Option<&'a str>>, on: &str) -> Self {
        self.push_join(JoinKind::Left, table, alias, on)
    }

    /// Add RIGHT JOIN.
    pub fn right_join<'a>(self, table: &str, alias: impl Into<Option<&'a str>>, on: &str) -> Self {
        self.push_join(JoinKind::Right, table, alias, on)
    }

    // ==================== WHERE ====================

    impl_where_methods!();

    // ==================== GROUP BY / HAVING ====================

    /// Replace the GROUP BY list.
    pub fn group_by(mut self, column: &str) -> Self {
        self.clauses.group_by = vec![column.to_string()];
        self
    }

    /// Append a GROUP BY column.
    pub fn add_group_by(mut self, column: &str) -> Self {
        self.clauses.group_by.push(column.to_string());
        self
    }

    /// Replace the HAVING clause with a single condition.
    pub fn having(mut self, condition: &str, params: impl IntoParams) -> Self {
        self.having_tree.start(condition, params);
        self
    }

    /// Add a HAVING condition joined with AND.
    pub fn and_having(mut self, condition: &str, params: impl IntoParams) -> Self {
        self.having_tree.and(condition, params);
        self
    }

    /// Add a HAVING condition joined with OR.
    pub fn or_having(mut self, condition: &str, params: impl IntoParams) -> Self {
        self.having_tree.or(condition, params);
        self
    }

    /// The HAVING tree built so far.
    pub fn having_tree(&self) -> &ConditionTree {
        &self.having_tree
    }

    // ==================== ORDER BY / LIMIT ====================

    /// Replace the ORDER BY list.
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.clauses.order_by = vec![OrderBy {
            column: column.to_string(),
            direction,
        }];
        self
    }

    /// Append an ORDER BY entry.
    pub fn add_order_by(mut self, column: &str, direction: Direction) -> Self {
        self.clauses.order_by.push(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    /// Set LIMIT. OFFSET defaults to 0 when not set.
    pub fn limit(mut self, limit: u64) -> Self {
        self.clauses.limit = Some(limit);
        self
    }

    /// Set OFFSET. Only rendered together with a LIMIT.
    pub fn offset(mut self, offset: u64) -> Self {
        self.clauses.offset = Some(offset);
        self
    }

    /// Set the offset for a 1-based page of `limit` rows (page clamped to >= 1).
    ///
    /// The offset saturates at `u64::MAX`.
    pub fn set_page(mut self, page: u64) -> Self {
        let page = page.max(1);
        let limit = self.clauses.limit.unwrap_or(0);
        self.clauses.offset = Some((page - 1).saturating_mul(limit));
        self
    }

    // ==================== Parameters ====================

    /// Set a named parameter (`:name` or `name`).
    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.named.set(name, value);
        self
    }

    /// Set several named parameters.
    pub fn set_parameters<K, V, I>(mut self, params: I) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in params {
            self.named.set(k.as_ref(), v);
        }
        self
    }

    /// Get a named parameter.
    pub fn get_parameter(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// The non-predicate clauses.
    pub fn clauses(&self) -> &ClauseSet {
        &self.clauses
    }

    // ==================== Build helpers ====================

    fn render_select(&self, binder: &Binder<'_>, is_count: bool) -> String {
        let mut sql = self.clauses.render_head();

        let where_sql = self.where_tree.render(binder);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        sql.push_str(&self.clauses.render_group_by());

        let having_sql = self.having_tree.render(binder);
        if !having_sql.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having_sql);
        }

        if is_count {
            return format!("SELECT COUNT(*) FROM ({sql}) AS quarry_count");
        }

        sql.push_str(&self.clauses.render_order_by());
        sql.push_str(&self.clauses.render_limit());
        sql
    }

    /// COUNT query over the same rows, ignoring ORDER BY and LIMIT/OFFSET.
    pub fn get_count_query(&self) -> QuarryResult<String> {
        self.validate()?;
        let dialect = self.dialect;
        let quote = move |v: &Value| dialect.quote_literal(v);
        Ok(self.render_select(&Binder::inline(&quote), true))
    }

    fn executable_count_sql<E: Executor>(&self, exec: &E) -> QuarryResult<String> {
        self.validate()?;
        let quote = |v: &Value| exec.quote(v);
        let binder = Binder::inline(&quote).with_named(&self.named);
        Ok(self.render_select(&binder, true))
    }

    // ==================== Execution ====================

    /// Execute and return all rows mapped to `T`.
    pub async fn fetch_all<T: FromRecord>(&self, exec: &impl Executor) -> QuarryResult<Vec<T>> {
        let sql = self.executable_sql(exec)?;
        trace_sql("select", &sql);
        let rows = exec.fetch_all(&sql).await?;
        rows.iter().map(T::from_record).collect()
    }

    /// Execute and return the first row mapped to `T`, if any.
    pub async fn fetch_opt<T: FromRecord>(&self, exec: &impl Executor) -> QuarryResult<Option<T>> {
        let sql = self.executable_sql(exec)?;
        trace_sql("select", &sql);
        let row = exec.fetch_opt(&sql).await?;
        row.as_ref().map(T::from_record).transpose()
    }

    /// Execute and return the first row mapped to `T`.
    ///
    /// Returns [`QuarryError::NotFound`] when there is no row.
    pub async fn fetch_one<T: FromRecord>(&self, exec: &impl Executor) -> QuarryResult<T> {
        let sql = self.executable_sql(exec)?;
        trace_sql("select", &sql);
        let row = exec.fetch_one(&sql).await?;
        T::from_record(&row)
    }

    /// Execute the COUNT query.
    pub async fn count(&self, exec: &impl Executor) -> QuarryResult<u64> {
        let sql = self.executable_count_sql(exec)?;
        trace_sql("count", &sql);
        let row: Record = exec.fetch_one(&sql).await?;
        match row.iter().next() {
            Some((column, value)) => value
                .as_i64()
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| QuarryError::decode(column, "expected a non-negative count")),
            None => Err(QuarryError::decode("count", "empty row")),
        }
    }
}

impl Render for Select {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn named(&self) -> Option<&NamedParams> {
        Some(&self.named)
    }

    fn validate(&self) -> QuarryResult<()> {
        if self.clauses.from.is_none() {
            return Err(QuarryError::builder("no target table"));
        }
        Ok(())
    }

    fn render(&self, _dialect: Dialect, binder: &Binder<'_>) -> String {
        self.render_select(binder, false)
    }
}

impl_render_methods!(Select);
