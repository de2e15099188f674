//! # quarry
//!
//! Data-access and input-validation layer for web applications.
//!
//! ## Features
//!
//! - **Query builders**: fluent SELECT / INSERT / UPDATE / DELETE with AND/OR
//!   condition trees and a fixed clause order
//! - **Executor seam**: builders render SQL text; any [`Executor`] runs it
//!   (a `tokio-postgres` implementation ships behind the `postgres` feature)
//! - **Table gateway**: find/insert/update/delete by primary key, plus an
//!   active-record [`Row`]
//! - **Grid**: whitelisted sorting and filtering with pagination
//! - **Validation**: composable rules, rule chains and forms
//!
//! ## Query Builder
//!
//! ```ignore
//! use quarry::query::{self, Direction};
//!
//! // SELECT
//! let users = query::select_from("users", "u")
//!     .where_("u.status = ?", "active")
//!     .or_where("u.id IN (?)", vec![4, 5])
//!     .order_by("u.id", Direction::Asc)
//!     .limit(10)
//!     .fetch_all::<User>(&client)
//!     .await?;
//!
//! // INSERT
//! query::insert("users")
//!     .set("login", "alice")
//!     .set("email", "alice@example.com")
//!     .execute(&client)
//!     .await?;
//!
//! // UPDATE
//! query::update("users")
//!     .set("status", "inactive")
//!     .where_("id = ?", user_id)
//!     .execute(&client)
//!     .await?;
//!
//! // DELETE
//! query::delete("users")
//!     .where_("id = ?", user_id)
//!     .execute(&client)
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! Events are emitted with `tracing` under the targets `quarry.sql` (statements
//! about to run), `quarry.table` and `quarry.grid` (rejected columns).

pub mod dialect;
pub mod error;
pub mod executor;
pub mod grid;
pub mod prelude;
pub mod query;
pub mod record;
pub mod table;
pub mod validator;
pub mod value;

#[cfg(feature = "postgres")]
pub mod pg;

pub use dialect::Dialect;
pub use error::{ExecutorError, QuarryError, QuarryResult};
pub use executor::{Execution, Executor};
pub use grid::{FilterOp, Grid, GridConfig, GridRequest, Page};
pub use query::{Delete, Direction, Insert, Select, Update, delete, insert, select_from, update};
pub use record::{FromRecord, FromValue, Record};
pub use table::{Row, Table};
pub use validator::{Form, Rule, ValidationErrors, Validator};
pub use value::Value;
