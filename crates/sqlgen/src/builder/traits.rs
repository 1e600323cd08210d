//! Trait definitions for statement builders.

use tokio_postgres::types::ToSql;

use crate::error::SqlResult;
use crate::fragment::Fragment;
use crate::placeholder::PlaceholderFormat;
use crate::value::Value;

/// A complete statement: renders like any fragment, then rewrites its
/// placeholders for the target driver.
///
/// Only the outermost statement is rewritten; a statement nested inside
/// another keeps rendering `?` through [`Fragment::render`].
pub trait Statement: Fragment {
    /// Statement kind, used in logs.
    const KIND: &'static str;

    /// The format applied by [`Statement::build`].
    fn placeholder_format(&self) -> &dyn PlaceholderFormat;

    /// Render and rewrite placeholders.
    fn build(&self) -> SqlResult<BuiltQuery> {
        let (sql, args) = self.render()?;
        let sql = self.placeholder_format().replace_placeholders(&sql)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlgen.sql",
            statement = Self::KIND,
            args = args.len(),
            sql = %sql,
            "built statement"
        );

        Ok(BuiltQuery { sql, args })
    }

    /// Debug helper to get the final SQL string.
    fn to_sql(&self) -> SqlResult<String> {
        Ok(self.build()?.sql)
    }
}

/// The result of building a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, args: Vec<Value>) -> Self {
        Self { sql, args }
    }

    /// Get arguments as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    /// Split into SQL text and arguments.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}
