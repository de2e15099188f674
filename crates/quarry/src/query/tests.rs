//! Integration tests for the query module.

use crate::dialect::Dialect;
use crate::executor::testing::RecordingExecutor;
use crate::executor::Execution;
use crate::query::{Direction, Select, delete, insert, select_from, update};
use crate::record::Record;
use crate::value::Value;

fn users_with_actions() -> Select {
    Select::new()
        .select(["u.*", "ua.*"])
        .from("users", "u")
        .left_join("users_actions", "ua", "ua.userId = u.id")
        .where_("u.id = ? OR u.id = ?", (4, 5))
        .or_where("u.id IN (?)", vec![4, 5])
        .and_where("u.status = ? OR u.status = ?", ("active", "pending"))
        .or_where("u.login LIKE (?)", "A%")
        .order_by("u.id", Direction::Asc)
        .add_order_by("u.login", Direction::Asc)
        .limit(5)
}

#[test]
fn test_select_full_query() {
    assert_eq!(
        users_with_actions().get_query().unwrap(),
        "SELECT u.*, ua.* FROM users u LEFT JOIN users_actions ua ON ua.userId = u.id \
         WHERE (((u.id = \"4\" OR u.id = \"5\") OR (u.id IN (\"4\",\"5\"))) \
         AND (u.status = \"active\" OR u.status = \"pending\")) \
         OR (u.login LIKE (\"A%\")) \
         ORDER BY u.id ASC, u.login ASC LIMIT 5 OFFSET 0"
    );
}

#[test]
fn test_get_query_is_idempotent() {
    let qb = users_with_actions();
    let first = qb.get_query().unwrap();
    let second = qb.get_query().unwrap();
    assert_eq!(first, second);
    assert_eq!(qb.get_sql(), qb.to_string());
}

#[test]
fn test_clause_order_independent_of_call_order() {
    let a = Select::new()
        .limit(5)
        .order_by("p.id", Direction::Desc)
        .where_("p.userId = ?", 1)
        .group_by("p.userId")
        .from("pages", "p")
        .select(["p.*"]);
    let b = Select::new()
        .select(["p.*"])
        .from("pages", "p")
        .where_("p.userId = ?", 1)
        .group_by("p.userId")
        .order_by("p.id", Direction::Desc)
        .limit(5);
    assert_eq!(a.get_query().unwrap(), b.get_query().unwrap());
    assert_eq!(
        a.get_sql(),
        "SELECT p.* FROM pages p WHERE p.userId = ? GROUP BY p.userId ORDER BY p.id DESC LIMIT 5 OFFSET 0"
    );
}

#[test]
fn test_having_with_named_parameters() {
    let qb = Select::new()
        .select(["p.*"])
        .from("pages", "p")
        .group_by("p.userId")
        .add_group_by("MONTH(p.created)")
        .having("MONTH(p.created) = :month1", ())
        .or_having("MONTH(p.created) = :month2", ())
        .and_having("p.userId <> 0", ())
        .set_parameters([(":month1", 2), (":month2", 4)]);

    assert_eq!(
        qb.get_query().unwrap(),
        "SELECT p.* FROM pages p GROUP BY p.userId, MONTH(p.created) \
         HAVING ((MONTH(p.created) = :month1) OR (MONTH(p.created) = :month2)) AND (p.userId <> 0)"
    );
    assert_eq!(qb.get_parameter(":month1"), Some(&Value::from(2)));
    assert_eq!(qb.get_parameter("month2"), Some(&Value::from(4)));
    assert_eq!(qb.get_parameter(":month3"), None);
}

#[test]
fn test_inner_join() {
    let qb = Select::new()
        .select(["u.*", "p.*"])
        .from("users", "u")
        .join("pages", "p", "p.userId = u.id");
    assert_eq!(
        qb.get_query().unwrap(),
        "SELECT u.*, p.* FROM users u INNER JOIN pages p ON p.userId = u.id"
    );
}

#[test]
fn test_right_join() {
    let qb = Select::new()
        .select(["u.*", "p.*"])
        .from("users", "u")
        .right_join("pages", "p", "p.userId = u.id");
    assert_eq!(
        qb.get_query().unwrap(),
        "SELECT u.*, p.* FROM users u RIGHT JOIN pages p ON p.userId = u.id"
    );
}

#[test]
fn test_display_keeps_placeholders() {
    let qb = Select::new()
        .select(["u.*", "p.*"])
        .from("users", "u")
        .join("pages", "p", "p.userId = u.id")
        .where_("u.id = ? OR u.id = ?", (4, 5));
    assert_eq!(
        qb.to_string(),
        "SELECT u.*, p.* FROM users u INNER JOIN pages p ON p.userId = u.id WHERE u.id = ? OR u.id = ?"
    );
}

#[test]
fn test_empty_list_renders_null() {
    let qb = select_from("users", None).where_("id IN (?)", Vec::<i64>::new());
    assert_eq!(qb.get_query().unwrap(), "SELECT * FROM users WHERE id IN (NULL)");
}

#[test]
fn test_list_argument_fills_one_placeholder() {
    let qb = select_from("users", "u")
        .where_("u.id IN (?)", [4, 5, 6])
        .and_where("u.role IN (?) AND u.status = ?", crate::params![vec!["a", "b"], "active"]);
    assert_eq!(
        qb.get_query().unwrap(),
        "SELECT * FROM users u WHERE (u.id IN (\"4\",\"5\",\"6\")) \
         AND (u.role IN (\"a\",\"b\") AND u.status = \"active\")"
    );
}

#[test]
fn test_quoted_literal_does_not_consume_placeholders() {
    let qb = select_from("users", None).where_("a = ? AND b = ?", ("x?", "y"));
    assert_eq!(
        qb.get_query().unwrap(),
        "SELECT * FROM users WHERE a = \"x?\" AND b = \"y\""
    );
}

#[test]
fn test_missing_parameter_keeps_placeholder() {
    let qb = select_from("users", None).where_("a = ? AND b = ?", 1);
    assert_eq!(
        qb.get_query().unwrap(),
        "SELECT * FROM users WHERE a = \"1\" AND b = ?"
    );
}

#[test]
fn test_insert_update_delete_strings() {
    assert_eq!(
        insert("test")
            .set("name", "example")
            .set("email", "example@domain.com")
            .get_query()
            .unwrap(),
        "INSERT INTO `test` SET `name` = \"example\", `email` = \"example@domain.com\""
    );
    assert_eq!(
        update("test")
            .set("status", "disable")
            .where_("email = ?", "example@domain.com")
            .get_query()
            .unwrap(),
        "UPDATE `test` SET `status` = \"disable\" WHERE email = \"example@domain.com\""
    );
    assert_eq!(
        delete("test")
            .where_("email = ?", "example@domain.com")
            .limit(1)
            .get_query()
            .unwrap(),
        "DELETE FROM `test` WHERE email = \"example@domain.com\" LIMIT 1"
    );
}

#[test]
fn test_postgres_dialect_everywhere() {
    let d = Dialect::Postgres;
    assert_eq!(
        insert("test").set("ok", false).dialect(d).get_query().unwrap(),
        "INSERT INTO \"test\" (\"ok\") VALUES (FALSE)"
    );
    assert_eq!(
        select_from("users", "u")
            .where_("u.name = ?", "it's")
            .dialect(d)
            .get_query()
            .unwrap(),
        "SELECT * FROM users u WHERE u.name = 'it''s'"
    );
}

#[tokio::test]
async fn test_executor_inlines_named_parameters() {
    let exec = RecordingExecutor::new();
    let qb = Select::new()
        .from("pages", "p")
        .having("MONTH(p.created) = :month", ())
        .set_parameter("month", 2);

    let rows: Vec<Record> = qb.fetch_all(&exec).await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(
        exec.statements(),
        vec!["SELECT * FROM pages p HAVING MONTH(p.created) = \"2\"".to_string()]
    );
}

#[tokio::test]
async fn test_fetch_one_maps_record() {
    let exec = RecordingExecutor::new();
    exec.push_rows(vec![Record::from_pairs([("id", Value::from(4)), ("login", Value::from("admin"))])]);

    let row: Record = select_from("users", None)
        .where_("id = ?", 4)
        .fetch_one(&exec)
        .await
        .unwrap();
    assert_eq!(row.try_get::<i64>("id").unwrap(), 4);
    assert_eq!(row.try_get::<String>("login").unwrap(), "admin");
}

#[tokio::test]
async fn test_fetch_one_not_found() {
    let exec = RecordingExecutor::new();
    let err = select_from("users", None)
        .fetch_one::<Record>(&exec)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_count() {
    let exec = RecordingExecutor::new();
    exec.push_rows(vec![Record::from_pairs([("count", 12)])]);

    let total = select_from("users", None)
        .where_("status = ?", "active")
        .limit(5)
        .count(&exec)
        .await
        .unwrap();
    assert_eq!(total, 12);
    assert_eq!(
        exec.statements(),
        vec![
            "SELECT COUNT(*) FROM (SELECT * FROM users WHERE status = \"active\") AS quarry_count"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_mutations_with_zero_rows() {
    let exec = RecordingExecutor::new();
    exec.push_execution(Execution::new(0));
    exec.push_execution(Execution::new(0));

    let updated = update("test")
        .set("status", "disable")
        .where_("email = ?", "example@domain.com")
        .execute(&exec)
        .await
        .unwrap();
    let deleted = delete("test")
        .where_("email = ?", "example@domain.com")
        .limit(1)
        .execute(&exec)
        .await
        .unwrap();
    assert_eq!((updated, deleted), (0, 0));
}

#[tokio::test]
async fn test_builder_error_reaches_execute() {
    let exec = RecordingExecutor::new();
    let err = Select::new().fetch_all::<Record>(&exec).await.unwrap_err();
    assert_eq!(err.to_string(), "Builder error: no target table");
    assert!(exec.statements().is_empty());
}
