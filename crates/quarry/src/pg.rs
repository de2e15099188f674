//! [`Executor`] for `tokio-postgres` clients and transactions.
//!
//! Statements are sent as plain SQL text with literals already inlined, so no
//! bind parameters cross the wire. `INSERT ... RETURNING` statements are run
//! as queries and the first returned column becomes the last insert id.

use crate::dialect::Dialect;
use crate::error::{QuarryError, QuarryResult};
use crate::executor::{Execution, Executor};
use crate::record::Record;
use crate::value::Value;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Type};

/// Whether the statement ends with a `RETURNING` clause.
///
/// Text after the last ` RETURNING ` holding a quote belongs to a literal.
fn has_returning(sql: &str) -> bool {
    sql.to_ascii_uppercase()
        .rfind(" RETURNING ")
        .is_some_and(|pos| !sql[pos..].contains('\''))
}

fn decodes_as_text(ty: &Type) -> bool {
    <String as FromSql>::accepts(ty)
}

fn unsupported_type(column: &str, ty: &Type) -> QuarryError {
    QuarryError::decode(
        column,
        format!("unsupported column type {ty}; cast it to text in the query"),
    )
}

fn decode_column(row: &Row, idx: usize) -> QuarryResult<Value> {
    let column = &row.columns()[idx];
    let map_err = |e: tokio_postgres::Error| QuarryError::decode(column.name(), e.to_string());

    let value = match *column.type_() {
        Type::BOOL => Value::from(row.try_get::<_, Option<bool>>(idx).map_err(map_err)?),
        Type::INT2 => Value::from(row.try_get::<_, Option<i16>>(idx).map_err(map_err)?),
        Type::INT4 => Value::from(row.try_get::<_, Option<i32>>(idx).map_err(map_err)?),
        Type::INT8 => Value::from(row.try_get::<_, Option<i64>>(idx).map_err(map_err)?),
        Type::OID => Value::from(row.try_get::<_, Option<u32>>(idx).map_err(map_err)?),
        Type::FLOAT4 => Value::from(row.try_get::<_, Option<f32>>(idx).map_err(map_err)?),
        Type::FLOAT8 => Value::from(row.try_get::<_, Option<f64>>(idx).map_err(map_err)?),
        Type::UUID => Value::from(row.try_get::<_, Option<uuid::Uuid>>(idx).map_err(map_err)?),
        Type::DATE => {
            Value::from(row.try_get::<_, Option<chrono::NaiveDate>>(idx).map_err(map_err)?)
        }
        Type::TIMESTAMP => Value::from(
            row.try_get::<_, Option<chrono::NaiveDateTime>>(idx)
                .map_err(map_err)?,
        ),
        Type::TIMESTAMPTZ => Value::from(
            row.try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)
                .map_err(map_err)?,
        ),
        Type::JSON | Type::JSONB => Value::from(
            row.try_get::<_, Option<serde_json::Value>>(idx)
                .map_err(map_err)?,
        ),
        ref ty if decodes_as_text(ty) => {
            Value::from(row.try_get::<_, Option<String>>(idx).map_err(map_err)?)
        }
        ref ty => return Err(unsupported_type(column.name(), ty)),
    };
    Ok(value)
}

fn decode_row(row: &Row) -> QuarryResult<Record> {
    let mut record = Record::new();
    for (idx, column) in row.columns().iter().enumerate() {
        record.set(column.name(), decode_column(row, idx)?);
    }
    Ok(record)
}

fn returning_execution(rows: &[Row]) -> QuarryResult<Execution> {
    let mut execution = Execution::new(rows.len() as u64);
    if let Some(first) = rows.first()
        && !first.is_empty()
        && let Some(id) = decode_column(first, 0)?.as_i64()
    {
        execution = execution.with_last_insert_id(id);
    }
    Ok(execution)
}

macro_rules! impl_pg_executor {
    ($ty:ty) => {
        impl Executor for $ty {
            fn dialect(&self) -> Dialect {
                Dialect::Postgres
            }

            async fn execute(&self, sql: &str) -> QuarryResult<Execution> {
                if has_returning(sql) {
                    let rows = <$ty>::query(self, sql, &[]).await?;
                    return returning_execution(&rows);
                }
                let affected = <$ty>::execute(self, sql, &[]).await?;
                Ok(Execution::new(affected))
            }

            async fn fetch_all(&self, sql: &str) -> QuarryResult<Vec<Record>> {
                let rows = <$ty>::query(self, sql, &[]).await?;
                rows.iter().map(decode_row).collect()
            }
        }
    };
}

impl_pg_executor!(tokio_postgres::Client);
impl_pg_executor!(tokio_postgres::Transaction<'_>);
