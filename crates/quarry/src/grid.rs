//! Grid: sorting, filtering and pagination over a SELECT, driven by untrusted input.
//!
//! Every order and filter column of a request must be whitelisted in the
//! [`GridConfig`]; anything else is rejected with [`QuarryError::Grid`] before
//! any SQL is built.
//!
//! ```ignore
//! use quarry::grid::{Grid, GridConfig, GridRequest};
//! use quarry::query::{self, Direction};
//!
//! let grid = Grid::new(GridConfig::new("sql"), query::select_from("test", None))
//!     .set_allow_orders(["name", "id", "status"])
//!     .set_allow_filters(["status", "id"])
//!     .set_default_order("name", Direction::Desc);
//!
//! let request = GridRequest::from_params("sql", [("sql-page", "2"), ("sql-filter-status", "eq-active")])?;
//! let page = grid.fetch::<User>(&client, &request).await?;
//! ```

use crate::error::{QuarryError, QuarryResult};
use crate::executor::Executor;
use crate::query::{Direction, Select};
use crate::record::{FromRecord, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a grid filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
}

impl FilterOp {
    /// Parse the short operator name used in request parameters.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Some(FilterOp::Eq),
            "ne" => Some(FilterOp::Ne),
            "gt" => Some(FilterOp::Gt),
            "ge" => Some(FilterOp::Ge),
            "lt" => Some(FilterOp::Lt),
            "le" => Some(FilterOp::Le),
            "like" => Some(FilterOp::Like),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "<>",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Like => "LIKE",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One filter of a grid request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

/// Grid settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Prefix of request parameters (`<uid>-page`, ...).
    pub uid: String,
    pub allow_orders: Vec<String>,
    pub allow_filters: Vec<String>,
    pub default_order: Option<(String, Direction)>,
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            uid: "grid".to_string(),
            allow_orders: Vec::new(),
            allow_filters: Vec::new(),
            default_order: None,
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl GridConfig {
    pub fn new(uid: &str) -> Self {
        Self {
            uid: uid.to_string(),
            ..Self::default()
        }
    }

    /// Effective page size: 0 or missing falls back to the default, then clamped.
    pub fn effective_limit(&self, requested: Option<u64>) -> u64 {
        let limit = requested
            .filter(|l| *l > 0)
            .unwrap_or(self.default_limit);
        if self.max_limit > 0 {
            limit.min(self.max_limit)
        } else {
            limit
        }
    }
}

/// Page, sort and filter input for one grid render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridRequest {
    /// 1-based page; 0 is treated as 1.
    pub page: u64,
    pub limit: Option<u64>,
    pub orders: Vec<(String, Direction)>,
    pub filters: Vec<Filter>,
}

impl GridRequest {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.orders.push((column.to_string(), direction));
        self
    }

    pub fn filter(mut self, column: &str, op: FilterOp, value: &str) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.to_string(),
        });
        self
    }

    /// Parse request parameters prefixed with `uid`:
    ///
    /// - `<uid>-page=2`
    /// - `<uid>-limit=25`
    /// - `<uid>-order-<column>=asc|desc`
    /// - `<uid>-filter-<column>=<op>-<value>` (a value without a known operator
    ///   prefix is an equality filter)
    ///
    /// Parameters with another prefix are ignored. Malformed numbers and
    /// directions are rejected with [`QuarryError::Grid`].
    pub fn from_params<K, V, I>(uid: &str, params: I) -> QuarryResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let prefix = format!("{uid}-");
        let mut request = Self::new();

        for (key, value) in params {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(name) = key.strip_prefix(&prefix) else {
                continue;
            };

            if name == "page" {
                request.page = parse_number(key, value)?;
            } else if name == "limit" {
                request.limit = Some(parse_number(key, value)?);
            } else if let Some(column) = name.strip_prefix("order-") {
                let direction = Direction::parse(value).ok_or_else(|| {
                    QuarryError::grid(format!("invalid order direction '{value}' for '{column}'"))
                })?;
                request.orders.push((column.to_string(), direction));
            } else if let Some(column) = name.strip_prefix("filter-") {
                let (op, filter_value) = match value.split_once('-') {
                    Some((op, rest)) => match FilterOp::parse(op) {
                        Some(op) => (op, rest),
                        None => (FilterOp::Eq, value),
                    },
                    None => (FilterOp::Eq, value),
                };
                request.filters.push(Filter {
                    column: column.to_string(),
                    op,
                    value: filter_value.to_string(),
                });
            }
        }

        Ok(request)
    }
}

fn parse_number(key: &str, value: &str) -> QuarryResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| QuarryError::grid(format!("invalid number '{value}' for '{key}'")))
}

/// One page of grid results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T = Record> {
    pub rows: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` rows.
    pub fn pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit)
        }
    }
}

/// A SELECT source plus its sort/filter whitelist.
#[derive(Debug, Clone)]
pub struct Grid {
    config: GridConfig,
    source: Select,
}

impl Grid {
    pub fn new(config: GridConfig, source: Select) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn uid(&self) -> &str {
        &self.config.uid
    }

    pub fn set_allow_orders<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allow_orders = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_allow_filters<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allow_filters = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_default_order(mut self, column: &str, direction: Direction) -> Self {
        self.config.default_order = Some((column.to_string(), direction));
        self
    }

    pub fn set_default_limit(mut self, limit: u64) -> Self {
        self.config.default_limit = limit;
        self
    }

    pub fn set_max_limit(mut self, limit: u64) -> Self {
        self.config.max_limit = limit;
        self
    }

    fn check_request(&self, request: &GridRequest) -> QuarryResult<()> {
        for (column, _) in &request.orders {
            if !self.config.allow_orders.iter().any(|c| c == column) {
                tracing::warn!(target: "quarry.grid", uid = %self.config.uid, column = %column, "order column is not allowed");
                return Err(QuarryError::grid(format!(
                    "order by column '{column}' is not allowed"
                )));
            }
        }
        for filter in &request.filters {
            if !self.config.allow_filters.iter().any(|c| *c == filter.column) {
                tracing::warn!(target: "quarry.grid", uid = %self.config.uid, column = %filter.column, "filter column is not allowed");
                return Err(QuarryError::grid(format!(
                    "filter by column '{}' is not allowed",
                    filter.column
                )));
            }
        }
        Ok(())
    }

    /// Build the SELECT for one page of `request`.
    pub fn query(&self, request: &GridRequest) -> QuarryResult<Select> {
        self.check_request(request)?;

        let mut select = self.source.clone();

        for filter in &request.filters {
            let condition = format!("{} {} ?", filter.column, filter.op);
            select = match filter.op {
                FilterOp::Like => select.and_where(&condition, format!("%{}%", filter.value)),
                _ => select.and_where(&condition, filter.value.as_str()),
            };
        }

        let mut orders = request.orders.iter();
        if let Some((column, direction)) = orders.next() {
            select = select.order_by(column, *direction);
            for (column, direction) in orders {
                select = select.add_order_by(column, *direction);
            }
        } else if let Some((column, direction)) = &self.config.default_order {
            select = select.order_by(column, *direction);
        }

        let limit = self.config.effective_limit(request.limit);
        let page = request.page.max(1);
        let in_range = (page - 1)
            .checked_mul(limit)
            .is_some_and(|offset| i64::try_from(offset).is_ok());
        if !in_range {
            tracing::warn!(target: "quarry.grid", uid = %self.config.uid, page, "page is out of range");
            return Err(QuarryError::grid(format!("page {page} is out of range")));
        }
        Ok(select.limit(limit).set_page(page))
    }

    /// Run the page query and the total count.
    pub async fn fetch<T: FromRecord>(
        &self,
        exec: &impl Executor,
        request: &GridRequest,
    ) -> QuarryResult<Page<T>> {
        let select = self.query(request)?;
        let total = select.count(exec).await?;
        let rows = select.fetch_all(exec).await?;
        Ok(Page {
            rows,
            total,
            page: request.page.max(1),
            limit: self.config.effective_limit(request.limit),
        })
    }
}
