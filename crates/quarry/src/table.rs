//! Table gateway and active-record rows.
//!
//! A [`Table`] is a table name plus a primary key column. Both may be supplied
//! late; they are checked on first use, so a misconfigured table fails with a
//! [`QuarryError::Configuration`] when an operation is called, not when it is
//! built.
//!
//! ```ignore
//! use quarry::Table;
//!
//! let users = Table::named("users").with_primary_key("id");
//!
//! let row = users.find(&client, 4).await?;
//! let id = users.insert(&client, [("login", "alice")]).await?;
//! users.update(&client, 4, [("status", "disabled")]).await?;
//! users.delete(&client, 4).await?;
//! ```

use crate::error::{QuarryError, QuarryResult};
use crate::executor::Executor;
use crate::query::{Delete, Insert, Select, Update};
use crate::record::{FromRecord, Record};
use crate::value::Value;

/// Table metadata: name and primary key column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    name: Option<String>,
    primary_key: Option<String>,
}

impl Table {
    /// A table with neither name nor primary key configured yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self::new().with_name(name)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_primary_key(mut self, column: &str) -> Self {
        self.primary_key = Some(column.to_string());
        self
    }

    /// The configured table name.
    pub fn name(&self) -> QuarryResult<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| QuarryError::configuration("table name is not defined"))
    }

    /// The configured primary key column.
    pub fn primary_key(&self) -> QuarryResult<&str> {
        self.primary_key
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| QuarryError::configuration("primary key is not defined"))
    }

    /// `SELECT * FROM <name>`, ready for further clauses.
    pub fn select(&self) -> QuarryResult<Select> {
        Ok(Select::new().from(self.name()?, None))
    }

    fn select_by_id(&self, id: Value) -> QuarryResult<Select> {
        let pk = self.primary_key()?;
        Ok(self.select()?.where_(&format!("{pk} = ?"), id))
    }

    /// Find a row by primary key.
    pub async fn find(
        &self,
        exec: &impl Executor,
        id: impl Into<Value>,
    ) -> QuarryResult<Option<Record>> {
        self.find_as(exec, id).await
    }

    /// Find a row by primary key and map it to `T`.
    pub async fn find_as<T: FromRecord>(
        &self,
        exec: &impl Executor,
        id: impl Into<Value>,
    ) -> QuarryResult<Option<T>> {
        let qb = self.select_by_id(id.into())?;
        tracing::debug!(target: "quarry.table", table = self.name()?, "find by primary key");
        qb.fetch_opt(exec).await
    }

    /// Find a row by primary key as an active-record [`Row`].
    pub async fn find_row(
        &self,
        exec: &impl Executor,
        id: impl Into<Value>,
    ) -> QuarryResult<Option<Row>> {
        let record = self.find(exec, id).await?;
        Ok(record.map(|r| Row::from_record(self.clone(), r)))
    }

    /// Find rows matching every `(column, value)` pair.
    ///
    /// A list value renders `column IN (...)`, `Null` renders `column IS NULL`.
    pub async fn find_where<K, V, I>(&self, exec: &impl Executor, conditions: I) -> QuarryResult<Vec<Record>>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut qb = self.select()?;
        for (column, value) in conditions {
            let column = column.as_ref();
            qb = match value.into() {
                Value::Null => qb.and_where(&format!("{column} IS NULL"), ()),
                list @ Value::List(_) => qb.and_where(&format!("{column} IN (?)"), list),
                value => qb.and_where(&format!("{column} = ?"), value),
            };
        }
        tracing::debug!(target: "quarry.table", table = self.name()?, "find where");
        qb.fetch_all(exec).await
    }

    /// Insert a row and return the generated primary key, if reported.
    pub async fn insert<K, V, I>(&self, exec: &impl Executor, data: I) -> QuarryResult<Option<i64>>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let qb = Insert::new()
            .insert(self.name()?)
            .set_array(data)
            .returning(self.primary_key()?);
        tracing::debug!(target: "quarry.table", table = self.name()?, "insert");
        qb.execute(exec).await
    }

    /// Update the row with primary key `id`; returns affected rows.
    pub async fn update<K, V, I>(
        &self,
        exec: &impl Executor,
        id: impl Into<Value>,
        data: I,
    ) -> QuarryResult<u64>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let pk = self.primary_key()?;
        let qb = Update::new()
            .update(self.name()?)
            .set_array(data)
            .where_(&format!("{pk} = ?"), id.into());
        tracing::debug!(target: "quarry.table", table = self.name()?, "update");
        qb.execute(exec).await
    }

    /// Delete the row with primary key `id`; returns affected rows.
    pub async fn delete(&self, exec: &impl Executor, id: impl Into<Value>) -> QuarryResult<u64> {
        let pk = self.primary_key()?;
        let qb = Delete::new()
            .delete(self.name()?)
            .where_(&format!("{pk} = ?"), id.into());
        tracing::debug!(target: "quarry.table", table = self.name()?, "delete");
        qb.execute(exec).await
    }

    /// A new, unsaved row of this table.
    pub fn create_row(&self) -> Row {
        Row::new(self.clone())
    }
}

/// Active record over one table row.
///
/// Keeps the last saved state so `save` only writes columns that changed.
#[derive(Debug, Clone)]
pub struct Row {
    table: Table,
    data: Record,
    clean: Record,
    // inserted, but the executor reported no primary key for it
    unkeyed: bool,
}

impl Row {
    /// An unsaved row.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            data: Record::new(),
            clean: Record::new(),
            unkeyed: false,
        }
    }

    /// A row loaded from the database.
    pub fn from_record(table: Table, record: Record) -> Self {
        Self {
            table,
            clean: record.clone(),
            data: record,
            unkeyed: false,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn record(&self) -> &Record {
        &self.data
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.data.set(column, value);
        self
    }

    /// Whether the row has not been stored yet (no primary key value).
    pub fn is_new(&self) -> QuarryResult<bool> {
        let pk = self.table.primary_key()?;
        Ok(!self.unkeyed && self.clean.get(pk).is_none_or(Value::is_null))
    }

    fn unkeyed_error(&self) -> QuarryError {
        QuarryError::not_found("row was inserted without a primary key value; reload it to save again")
    }

    /// Columns whose value differs from the last saved state.
    pub fn changed_columns(&self) -> Vec<&str> {
        self.data
            .iter()
            .filter(|(column, value)| self.clean.get(column) != Some(*value))
            .map(|(column, _)| column)
            .collect()
    }

    /// Insert a new row, or update the changed columns of an existing one.
    pub async fn save(&mut self, exec: &impl Executor) -> QuarryResult<()> {
        let pk = self.table.primary_key()?.to_string();
        if self.unkeyed {
            return Err(self.unkeyed_error());
        }

        if self.is_new()? {
            let data: Vec<(String, Value)> = self
                .data
                .iter()
                .filter(|(column, value)| !(*column == pk && value.is_null()))
                .map(|(column, value)| (column.to_string(), value.clone()))
                .collect();
            match self.table.insert(exec, data).await? {
                Some(id) => self.data.set(pk.as_str(), id),
                None if self.data.get(&pk).is_none_or(Value::is_null) => {
                    tracing::warn!(target: "quarry.table", table = self.table.name()?, "insert reported no primary key");
                    self.clean = self.data.clone();
                    self.unkeyed = true;
                    return Err(self.unkeyed_error());
                }
                None => {}
            }
        } else {
            let changes: Vec<(String, Value)> = self
                .changed_columns()
                .into_iter()
                .filter(|column| *column != pk)
                .filter_map(|column| self.data.get(column).map(|v| (column.to_string(), v.clone())))
                .collect();
            if changes.is_empty() {
                return Ok(());
            }
            let id = self.clean.get(&pk).cloned().unwrap_or(Value::Null);
            self.table.update(exec, id, changes).await?;
        }

        self.clean = self.data.clone();
        Ok(())
    }

    /// Delete the row by its primary key; returns affected rows.
    pub async fn delete(&self, exec: &impl Executor) -> QuarryResult<u64> {
        let pk = self.table.primary_key()?;
        let id = self
            .clean
            .get(pk)
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| QuarryError::not_found("row has not been saved"))?;
        self.table.delete(exec, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Execution;
    use crate::executor::testing::RecordingExecutor;

    fn users() -> Table {
        Table::named("users").with_primary_key("id")
    }

    #[tokio::test]
    async fn test_missing_name_fails_at_use() {
        let exec = RecordingExecutor::new();
        let table = Table::new().with_primary_key("id");
        let err = table.find(&exec, 1).await.unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Configuration error: table name is not defined");
        assert!(exec.statements().is_empty());
    }

    #[tokio::test]
    async fn test_missing_primary_key_fails_at_use() {
        let exec = RecordingExecutor::new();
        let table = Table::named("wrong");
        let err = table.delete(&exec, 1).await.unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: primary key is not defined");

        // selecting does not need a primary key
        assert!(table.select().is_ok());
    }

    #[tokio::test]
    async fn test_find() {
        let exec = RecordingExecutor::new();
        exec.push_rows(vec![Record::from_pairs([("id", 4)])]);
        let row = users().find(&exec, 4).await.unwrap();
        assert_eq!(row.unwrap().get("id"), Some(&Value::from(4)));
        assert_eq!(
            exec.statements(),
            vec!["SELECT * FROM users WHERE id = \"4\"".to_string()]
        );
    }

    #[tokio::test]
    async fn test_find_where() {
        let exec = RecordingExecutor::new();
        users()
            .find_where(
                &exec,
                [
                    ("status", Value::from("active")),
                    ("id", Value::from(vec![1, 2])),
                    ("deleted", Value::Null),
                ],
            )
            .await
            .unwrap();
        assert_eq!(
            exec.statements(),
            vec![
                "SELECT * FROM users WHERE (status = \"active\") AND (id IN (\"1\",\"2\")) AND (deleted IS NULL)"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let exec = RecordingExecutor::new();
        exec.push_execution(Execution::new(1).with_last_insert_id(9));
        exec.push_execution(Execution::new(1));
        exec.push_execution(Execution::new(1));

        let table = users();
        assert_eq!(table.insert(&exec, [("login", "a")]).await.unwrap(), Some(9));
        assert_eq!(table.update(&exec, 9, [("login", "b")]).await.unwrap(), 1);
        assert_eq!(table.delete(&exec, 9).await.unwrap(), 1);
        assert_eq!(
            exec.statements(),
            vec![
                "INSERT INTO `users` SET `login` = \"a\"".to_string(),
                "UPDATE `users` SET `login` = \"b\" WHERE id = \"9\"".to_string(),
                "DELETE FROM `users` WHERE id = \"9\"".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_row_save_inserts_then_updates_changes() {
        let exec = RecordingExecutor::new();
        exec.push_execution(Execution::new(1).with_last_insert_id(5));

        let mut row = users().create_row();
        row.set("login", "alice").set("status", "new");
        assert!(row.is_new().unwrap());
        row.save(&exec).await.unwrap();
        assert_eq!(row.get("id"), Some(&Value::from(5)));
        assert!(!row.is_new().unwrap());

        // nothing changed: no statement
        row.save(&exec).await.unwrap();
        assert_eq!(exec.statements().len(), 1);

        row.set("status", "active");
        row.save(&exec).await.unwrap();
        assert_eq!(
            exec.statements()[1],
            "UPDATE `users` SET `status` = \"active\" WHERE id = \"5\""
        );
    }

    #[tokio::test]
    async fn test_row_save_without_reported_id_is_not_inserted_twice() {
        let exec = RecordingExecutor::new();
        exec.push_execution(Execution::new(1));

        let mut row = users().create_row();
        row.set("login", "alice");
        assert!(row.save(&exec).await.unwrap_err().is_not_found());
        assert!(!row.is_new().unwrap());

        row.set("login", "bob");
        assert!(row.save(&exec).await.unwrap_err().is_not_found());
        assert_eq!(
            exec.statements(),
            vec!["INSERT INTO `users` SET `login` = \"alice\"".to_string()]
        );
    }

    #[tokio::test]
    async fn test_row_save_with_explicit_key_needs_no_reported_id() {
        let exec = RecordingExecutor::new();
        exec.push_execution(Execution::new(1));
        exec.push_execution(Execution::new(1));

        let mut row = users().create_row();
        row.set("id", 7).set("login", "alice");
        row.save(&exec).await.unwrap();
        assert!(!row.is_new().unwrap());

        row.set("login", "bob");
        row.save(&exec).await.unwrap();
        assert_eq!(
            exec.statements()[1],
            "UPDATE `users` SET `login` = \"bob\" WHERE id = \"7\""
        );
    }

    #[tokio::test]
    async fn test_unsaved_row_delete_is_not_found() {
        let exec = RecordingExecutor::new();
        let row = users().create_row();
        assert!(row.delete(&exec).await.unwrap_err().is_not_found());
    }
}
