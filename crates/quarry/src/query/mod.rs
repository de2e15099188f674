//! Fluent SQL query builders.
//!
//! Builders render SQL text; they never hold a connection. Execution goes
//! through an [`Executor`](crate::Executor), which also decides the dialect
//! and literal quoting used for the statement it receives.
//!
//! # Features
//!
//! - **Condition trees**: `where_`/`and_where`/`or_where` grow a left-associative
//!   AND/OR tree in call order
//! - **Fixed clause order**: SELECT clauses render in canonical order whatever
//!   the call order
//! - **Two renderings**: `get_sql()` keeps `?` placeholders, `get_query()`
//!   inlines quoted literals
//!
//! # Usage
//!
//! ```ignore
//! use quarry::query::{self, Direction};
//!
//! let users = query::select_from("users", "u")
//!     .where_("u.status = ?", "active")
//!     .and_where("u.id IN (?)", vec![4, 5])
//!     .order_by("u.id", Direction::Asc)
//!     .limit(20)
//!     .fetch_all::<User>(&client)
//!     .await?;
//!
//! let id = query::insert("users")
//!     .set("login", "alice")
//!     .execute(&client)
//!     .await?;
//!
//! query::update("users")
//!     .set("status", "disabled")
//!     .where_("id = ?", id)
//!     .execute(&client)
//!     .await?;
//!
//! query::delete("users")
//!     .where_("id = ?", id)
//!     .limit(1)
//!     .execute(&client)
//!     .await?;
//! ```

mod clause;
mod condition;
mod delete;
mod insert;
mod macros;
mod param;
mod select;
mod traits;
mod update;

#[cfg(test)]
mod tests;

pub use clause::{Assignments, ClauseSet, Direction, FromTable, Join, JoinKind, OrderBy};
pub use condition::{Combinator, Condition, ConditionTree};
pub use delete::Delete;
pub use insert::Insert;
pub use param::{IntoParams, NamedParams, Params};
pub use select::Select;
pub use update::Update;

/// Create a SELECT builder over `table` with an optional alias.
///
/// # Example
/// ```ignore
/// let qb = quarry::query::select_from("users", "u").where_("u.id = ?", 1);
/// ```
pub fn select_from<'a>(table: &str, alias: impl Into<Option<&'a str>>) -> Select {
    Select::new().from(table, alias)
}

/// Create an INSERT builder for `table`.
pub fn insert(table: &str) -> Insert {
    Insert::new().insert(table)
}

/// Create an UPDATE builder for `table`.
pub fn update(table: &str) -> Update {
    Update::new().update(table)
}

/// Create a DELETE builder for `table`.
pub fn delete(table: &str) -> Delete {
    Delete::new().delete(table)
}
