#![cfg(feature = "postgres")]

use quarry::{QuarryResult, Record, Table, Value, query};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_postgres::NoTls;

#[tokio::test]
async fn postgres_roundtrip() -> QuarryResult<()> {
    let _ = dotenvy::dotenv();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping postgres_roundtrip");
            return Ok(());
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let table_name = format!("quarry_test_{}_{}", std::process::id(), nanos);

    client
        .batch_execute(&format!(
            "CREATE TEMP TABLE {table_name} (id BIGSERIAL PRIMARY KEY, login TEXT NOT NULL, active BOOLEAN NOT NULL DEFAULT TRUE)"
        ))
        .await?;

    let table = Table::named(&table_name).with_primary_key("id");
    let id = table
        .insert(&client, [("login", Value::from("o'brien"))])
        .await?
        .expect("RETURNING id");

    let found = table.find(&client, id).await?.expect("row exists");
    assert_eq!(found.try_get::<String>("login")?, "o'brien");
    assert!(found.try_get::<bool>("active")?);

    let updated = table.update(&client, id, [("active", false)]).await?;
    assert_eq!(updated, 1);

    let rows: Vec<Record> = query::select_from(&table_name, None)
        .where_("active = ?", false)
        .fetch_all(&client)
        .await?;
    assert_eq!(rows.len(), 1);

    // SUM(bigint) is NUMERIC, which has no mapping unless cast to text
    let err = query::select_from(&table_name, None)
        .select(["SUM(id) AS total"])
        .fetch_all::<Record>(&client)
        .await
        .unwrap_err();
    assert!(err.is_decode());
    let totals: Vec<Record> = query::select_from(&table_name, None)
        .select(["SUM(id)::text AS total"])
        .fetch_all(&client)
        .await?;
    assert_eq!(totals[0].try_get::<String>("total")?, id.to_string());

    let deleted = query::delete(&table_name)
        .where_("id = ?", id)
        .limit(1)
        .execute(&client)
        .await?;
    assert_eq!(deleted, 1);
    Ok(())
}
