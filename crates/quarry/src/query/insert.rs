//! INSERT query builder.

use crate::dialect::Dialect;
use crate::error::{QuarryError, QuarryResult};
use crate::executor::{Executor, trace_sql};
use crate::query::clause::Assignments;
use crate::query::macros::impl_render_methods;
use crate::query::param::Binder;
use crate::query::traits::Render;
use crate::value::Value;

/// INSERT query builder.
///
/// MySQL renders the `SET` form, Postgres the `(cols) VALUES (...)` form.
#[derive(Clone, Debug, Default)]
pub struct Insert {
    table: Option<String>,
    values: Assignments,
    returning: Option<String>,
    dialect: Dialect,
}

impl Insert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table.
    pub fn insert(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Set a column value.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.set(column, value);
        self
    }

    /// Set several column values, in iteration order.
    pub fn set_array<K, V, I>(mut self, data: I) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (column, value) in data {
            self.values.set(column.as_ref(), value);
        }
        self
    }

    /// Add `RETURNING <column>` (Postgres only; ignored for MySQL).
    pub fn returning(mut self, column: &str) -> Self {
        self.returning = Some(column.to_string());
        self
    }

    /// The column values set so far.
    pub fn values(&self) -> &Assignments {
        &self.values
    }

    /// Execute and return the generated identifier, if the backend reports one.
    pub async fn execute(&self, exec: &impl Executor) -> QuarryResult<Option<i64>> {
        let sql = self.executable_sql(exec)?;
        trace_sql("insert", &sql);
        let result = exec.execute(&sql).await?;
        Ok(result.last_insert_id)
    }
}

impl Render for Insert {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn validate(&self) -> QuarryResult<()> {
        if self.table.is_none() {
            return Err(QuarryError::builder("no target table"));
        }
        if self.values.is_empty() {
            return Err(QuarryError::builder("nothing to set"));
        }
        Ok(())
    }

    fn render(&self, dialect: Dialect, binder: &Binder<'_>) -> String {
        let table = dialect.quote_identifier(self.table.as_deref().unwrap_or_default());
        let mut sql = match dialect {
            Dialect::MySql => format!(
                "INSERT INTO {table} SET {}",
                self.values.render_set(dialect, binder)
            ),
            Dialect::Postgres => format!(
                "INSERT INTO {table} {}",
                self.values.render_values(dialect, binder)
            ),
        };
        if dialect.supports_returning()
            && let Some(col) = &self.returning
        {
            sql.push_str(" RETURNING ");
            sql.push_str(&dialect.quote_identifier(col));
        }
        sql
    }
}

impl_render_methods!(Insert);
