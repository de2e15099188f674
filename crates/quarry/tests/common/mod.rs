#![allow(dead_code)]

use quarry::{Dialect, Execution, Executor, QuarryResult, Record};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Executor that records SQL and replays queued results.
#[derive(Debug, Default)]
pub struct MockExecutor {
    dialect: Dialect,
    statements: Mutex<Vec<String>>,
    executions: Mutex<VecDeque<Execution>>,
    rows: Mutex<VecDeque<Vec<Record>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn push_execution(&self, execution: Execution) {
        self.executions.lock().unwrap().push_back(execution);
    }

    pub fn push_rows(&self, rows: Vec<Record>) {
        self.rows.lock().unwrap().push_back(rows);
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

impl Executor for MockExecutor {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&self, sql: &str) -> QuarryResult<Execution> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(self.executions.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn fetch_all(&self, sql: &str) -> QuarryResult<Vec<Record>> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(self.rows.lock().unwrap().pop_front().unwrap_or_default())
    }
}
