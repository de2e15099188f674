//! Rendering contract shared by the statement builders.

use crate::dialect::Dialect;
use crate::error::QuarryResult;
use crate::executor::Executor;
use crate::query::param::{Binder, NamedParams};
use crate::value::Value;

/// Implemented by every statement builder.
///
/// `render` produces the SQL for one dialect; whether placeholders are kept
/// or inlined is decided by the binder.
pub(crate) trait Render {
    /// Dialect used by `get_sql` / `get_query`.
    fn dialect(&self) -> Dialect;

    /// Named parameters set on the statement.
    fn named(&self) -> Option<&NamedParams> {
        None
    }

    /// Check that mandatory clauses are present.
    fn validate(&self) -> QuarryResult<()>;

    fn render(&self, dialect: Dialect, binder: &Binder<'_>) -> String;

    /// SQL with `?` placeholders left in place.
    fn structural_sql(&self) -> String {
        self.render(self.dialect(), &Binder::structural())
    }

    /// SQL with positional parameters inlined as literals.
    fn bound_sql(&self) -> QuarryResult<String> {
        self.validate()?;
        let dialect = self.dialect();
        let quote = move |v: &Value| dialect.quote_literal(v);
        Ok(self.render(dialect, &Binder::inline(&quote)))
    }

    /// SQL for an executor: its dialect and quoting, named parameters inlined too.
    fn executable_sql<E: Executor>(&self, exec: &E) -> QuarryResult<String> {
        self.validate()?;
        let quote = |v: &Value| exec.quote(v);
        let binder = match self.named() {
            Some(named) => Binder::inline(&quote).with_named(named),
            None => Binder::inline(&quote),
        };
        Ok(self.render(exec.dialect(), &binder))
    }
}
