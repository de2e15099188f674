/// Generate the WHERE family for a builder with a `where_tree: ConditionTree` field.
macro_rules! impl_where_methods {
    () => {
        /// Replace the WHERE clause with a single condition.
        ///
        /// Each `?` consumes one parameter; a list parameter expands to one
        /// placeholder per element.
        pub fn where_(mut self, condition: &str, params: impl $crate::query::IntoParams) -> Self {
            self.where_tree.start(condition, params);
            self
        }

        /// Add a WHERE condition joined with AND.
        pub fn and_where(mut self, condition: &str, params: impl $crate::query::IntoParams) -> Self {
            self.where_tree.and(condition, params);
            self
        }

        /// Add a WHERE condition joined with OR.
        pub fn or_where(mut self, condition: &str, params: impl $crate::query::IntoParams) -> Self {
            self.where_tree.or(condition, params);
            self
        }

        /// The WHERE tree built so far.
        pub fn where_tree(&self) -> &$crate::query::ConditionTree {
            &self.where_tree
        }
    };
}

/// Generate `dialect`, `get_sql`, `get_query` and `Display` from a `Render` impl.
macro_rules! impl_render_methods {
    ($ty:ty) => {
        impl $ty {
            /// Set the dialect used by `get_sql` / `get_query`.
            ///
            /// Execution always uses the executor's dialect.
            pub fn dialect(mut self, dialect: $crate::dialect::Dialect) -> Self {
                self.dialect = dialect;
                self
            }

            /// Structural SQL with `?` placeholders left in place.
            pub fn get_sql(&self) -> String {
                $crate::query::traits::Render::structural_sql(self)
            }

            /// SQL with positional parameters inlined as quoted literals.
            ///
            /// Named placeholders (`:name`) are left as written.
            pub fn get_query(&self) -> $crate::error::QuarryResult<String> {
                $crate::query::traits::Render::bound_sql(self)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.get_sql())
            }
        }
    };
}

pub(crate) use impl_render_methods;
pub(crate) use impl_where_methods;
