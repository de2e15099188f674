//! Database executor seam.
//!
//! Query builders never talk to a database themselves: they render SQL text
//! and hand it to an [`Executor`]. Connections, transactions, retries and
//! timeouts are the executor's business.

use crate::dialect::Dialect;
use crate::error::{QuarryError, QuarryResult};
use crate::record::Record;
use crate::value::Value;

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Execution {
    /// Number of rows affected by the statement.
    pub affected_rows: u64,
    /// Identifier generated by an INSERT, when the backend reports one.
    pub last_insert_id: Option<i64>,
}

impl Execution {
    pub fn new(affected_rows: u64) -> Self {
        Self {
            affected_rows,
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

/// A trait that unifies database connections and transactions.
///
/// Builders render their SQL with the executor's [`Dialect`] and inline
/// literals through [`Executor::quote`], then call [`Executor::execute`] or
/// [`Executor::fetch_all`].
pub trait Executor: Send + Sync {
    /// SQL dialect spoken by the backend.
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    /// Render a value as an inline literal.
    fn quote(&self, value: &Value) -> String {
        self.dialect().quote_literal(value)
    }

    /// Execute a statement and report affected rows / last insert id.
    fn execute(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = QuarryResult<Execution>> + Send;

    /// Execute a query and return all rows.
    fn fetch_all(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = QuarryResult<Vec<Record>>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 or more rows: returns `Ok(Some(first_row))` (does **not** error)
    fn fetch_opt(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = QuarryResult<Option<Record>>> + Send {
        async move {
            let rows = self.fetch_all(sql).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a query and return the **first** row.
    ///
    /// Returns [`QuarryError::NotFound`] if no rows are returned.
    fn fetch_one(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = QuarryResult<Record>> + Send {
        async move {
            self.fetch_opt(sql)
                .await?
                .ok_or_else(|| QuarryError::not_found("Expected 1 row, got 0"))
        }
    }
}

impl<E: Executor> Executor for &E {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn quote(&self, value: &Value) -> String {
        (**self).quote(value)
    }

    fn execute(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = QuarryResult<Execution>> + Send {
        (**self).execute(sql)
    }

    fn fetch_all(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = QuarryResult<Vec<Record>>> + Send {
        (**self).fetch_all(sql)
    }
}

/// Truncate SQL for log output without splitting a UTF-8 character.
pub(crate) fn truncate_sql(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Emit the SQL about to be sent to an executor.
pub(crate) fn trace_sql(kind: &'static str, sql: &str) {
    tracing::debug!(
        target: "quarry.sql",
        kind,
        sql = %truncate_sql(sql, 200),
        "executing statement"
    );
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory executor used by unit tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records every statement and replays queued results.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingExecutor {
        pub dialect: Dialect,
        pub statements: Mutex<Vec<String>>,
        pub executions: Mutex<VecDeque<Execution>>,
        pub results: Mutex<VecDeque<Vec<Record>>>,
    }

    impl RecordingExecutor {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn postgres() -> Self {
            Self {
                dialect: Dialect::Postgres,
                ..Self::default()
            }
        }

        pub(crate) fn push_execution(&self, execution: Execution) {
            self.executions.lock().unwrap().push_back(execution);
        }

        pub(crate) fn push_rows(&self, rows: Vec<Record>) {
            self.results.lock().unwrap().push_back(rows);
        }

        pub(crate) fn statements(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }
    }

    impl Executor for RecordingExecutor {
        fn dialect(&self) -> Dialect {
            self.dialect
        }

        async fn execute(&self, sql: &str) -> QuarryResult<Execution> {
            self.statements.lock().unwrap().push(sql.to_string());
            Ok(self
                .executions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        }

        async fn fetch_all(&self, sql: &str) -> QuarryResult<Vec<Record>> {
            self.statements.lock().unwrap().push(sql.to_string());
            Ok(self.results.lock().unwrap().pop_front().unwrap_or_default())
        }
    }
}
