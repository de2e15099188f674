//! DELETE query builder.

use crate::dialect::Dialect;
use crate::error::{QuarryError, QuarryResult};
use crate::executor::{Executor, trace_sql};
use crate::query::condition::ConditionTree;
use crate::query::macros::{impl_render_methods, impl_where_methods};
use crate::query::param::Binder;
use crate::query::traits::Render;

/// DELETE query builder. A DELETE without WHERE is allowed.
#[derive(Clone, Debug, Default)]
pub struct Delete {
    table: Option<String>,
    where_tree: ConditionTree,
    limit: Option<u64>,
    dialect: Dialect,
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table.
    pub fn delete(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    impl_where_methods!();

    /// Delete at most `limit` rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Execute and return the number of affected rows (0 is not an error).
    pub async fn execute(&self, exec: &impl Executor) -> QuarryResult<u64> {
        let sql = self.executable_sql(exec)?;
        trace_sql("delete", &sql);
        Ok(exec.execute(&sql).await?.affected_rows)
    }
}

impl Render for Delete {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn validate(&self) -> QuarryResult<()> {
        if self.table.is_none() {
            return Err(QuarryError::builder("no target table"));
        }
        Ok(())
    }

    fn render(&self, dialect: Dialect, binder: &Binder<'_>) -> String {
        let table = dialect.quote_identifier(self.table.as_deref().unwrap_or_default());
        let where_sql = self.where_tree.render(binder);
        let where_clause = if where_sql.is_empty() {
            String::new()
        } else {
            format!(" WHERE {where_sql}")
        };

        match self.limit {
            None => format!("DELETE FROM {table}{where_clause}"),
            Some(limit) if dialect.supports_delete_limit() => {
                format!("DELETE FROM {table}{where_clause} LIMIT {limit}")
            }
            // Postgres has no DELETE ... LIMIT: restrict by physical row id.
            Some(limit) => format!(
                "DELETE FROM {table} WHERE ctid IN (SELECT ctid FROM {table}{where_clause} LIMIT {limit})"
            ),
        }
    }
}

impl_render_methods!(Delete);
