//! Convenient imports for typical `quarry` usage.
//!
//! ```ignore
//! use quarry::prelude::*;
//! ```

pub use crate::query::{self, Delete, Direction, Insert, Select, Update};
pub use crate::{Executor, FromRecord, FromValue, QuarryError, QuarryResult, Record, Value};
pub use crate::{Grid, GridConfig, GridRequest, Page, Row, Table};
pub use crate::validator::{Form, Rule, Validator};
