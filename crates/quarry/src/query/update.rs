//! UPDATE query builder.

use crate::dialect::Dialect;
use crate::error::{QuarryError, QuarryResult};
use crate::executor::{Executor, trace_sql};
use crate::query::clause::Assignments;
use crate::query::condition::ConditionTree;
use crate::query::macros::{impl_render_methods, impl_where_methods};
use crate::query::param::Binder;
use crate::query::traits::Render;
use crate::value::Value;

/// UPDATE query builder. An UPDATE without WHERE is allowed.
#[derive(Clone, Debug, Default)]
pub struct Update {
    table: Option<String>,
    values: Assignments,
    where_tree: ConditionTree,
    dialect: Dialect,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table.
    pub fn update(mut self, table: &str) -> Self {
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

    impl_where_methods!();

    /// Execute and return the number of affected rows (0 is not an error).
    pub async fn execute(&self, exec: &impl Executor) -> QuarryResult<u64> {
        let sql = self.executable_sql(exec)?;
        trace_sql("update", &sql);
        Ok(exec.execute(&sql).await?.affected_rows)
    }
}

impl Render for Update {
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
        let mut sql = format!(
            "UPDATE {table} SET {}",
            self.values.render_set(dialect, binder)
        );
        let where_sql = self.where_tree.render(binder);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }
        sql
    }
}

impl_render_methods!(Update);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::RecordingExecutor;

    #[test]
    fn test_update() {
        let qb = Update::new()
            .update("test")
            .set("status", "disable")
            .where_("email = ?", "example@domain.com");
        assert_eq!(
            qb.get_query().unwrap(),
            "UPDATE `test` SET `status` = \"disable\" WHERE email = \"example@domain.com\""
        );
    }

    #[test]
    fn test_update_without_where() {
        let qb = Update::new().update("test").set("status", "active");
        assert_eq!(qb.get_sql(), "UPDATE `test` SET `status` = ?");
    }

    #[test]
    fn test_update_nothing_to_set() {
        let err = Update::new()
            .update("test")
            .where_("id = ?", 1)
            .get_query()
            .unwrap_err();
        assert_eq!(err.to_string(), "Builder error: nothing to set");
    }

    #[tokio::test]
    async fn test_execute_zero_rows_is_ok() {
        let exec = RecordingExecutor::new();
        let affected = Update::new()
            .update("test")
            .set("status", "disable")
            .where_("email = ?", "nobody@domain.com")
            .execute(&exec)
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_execute_uses_executor_dialect() {
        let exec = RecordingExecutor::postgres();
        Update::new()
            .update("users")
            .set("active", true)
            .where_("id = ?", 7)
            .execute(&exec)
            .await
            .unwrap();
        assert_eq!(
            exec.statements(),
            vec!["UPDATE \"users\" SET \"active\" = TRUE WHERE id = '7'".to_string()]
        );
    }
}
