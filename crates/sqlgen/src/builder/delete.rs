//! DELETE builder.

use std::sync::Arc;

use crate::builder::traits::Statement;
use crate::builder::{append_tail, append_where};
use crate::error::{SqlError, SqlResult};
use crate::expr::Expr;
use crate::fragment::{Fragment, Pred};
use crate::placeholder::{PlaceholderFormat, Question};
use crate::value::{Arg, Value};

/// DELETE statement builder.
///
/// Rendering fails unless the WHERE clause renders some SQL.
#[derive(Clone, Debug)]
pub struct DeleteBuilder {
    format: Arc<dyn PlaceholderFormat>,
    table: String,
    where_parts: Vec<Pred>,
    order_bys: Vec<String>,
    limit: u64,
    offset: u64,
}

impl Default for DeleteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteBuilder {
    /// Create an empty DELETE builder with `?` placeholders.
    pub fn new() -> Self {
        Self::with_format(Arc::new(Question))
    }

    pub(crate) fn with_format(format: Arc<dyn PlaceholderFormat>) -> Self {
        Self {
            format,
            table: String::new(),
            where_parts: Vec::new(),
            order_bys: Vec::new(),
            limit: 0,
            offset: 0,
        }
    }

    /// Use a different placeholder format for [`Statement::build`].
    pub fn placeholder<F: PlaceholderFormat + 'static>(mut self, format: F) -> Self {
        self.format = Arc::new(format);
        self
    }

    /// Set the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Add a WHERE predicate (ANDed with the others).
    pub fn where_clause(mut self, pred: impl Into<Pred>) -> Self {
        self.where_parts.push(pred.into());
        self
    }

    /// Add a raw WHERE predicate with arguments for its `?` placeholders.
    ///
    /// Parenthesized when other WHERE parts render alongside it.
    pub fn where_raw(mut self, sql: &str, args: Vec<Arg>) -> Self {
        self.where_parts.push(Pred::raw(sql, args));
        self
    }

    /// Add WHERE: column = value
    pub fn eq(self, column: &str, value: impl Into<Arg>) -> Self {
        self.where_clause(Expr::eq(column, value))
    }

    /// Add WHERE: column IN (values...)
    pub fn in_list<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Arg>,
    {
        self.where_clause(Expr::in_list(column, values))
    }

    /// Append ORDER BY keys.
    pub fn order_by<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_bys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Set LIMIT (0 leaves it unset).
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Set OFFSET (0 leaves it unset).
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }
}

impl Fragment for DeleteBuilder {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        if self.table.is_empty() {
            return Err(SqlError::missing("delete", "specify a table"));
        }

        let mut sql = format!("DELETE FROM {}", self.table);
        let mut args = Vec::new();
        if !append_where(&mut sql, &mut args, &self.where_parts)? {
            return Err(SqlError::missing("delete", "have a WHERE clause"));
        }
        append_tail(&mut sql, &self.order_bys, self.limit, self.offset);

        Ok((sql, args))
    }
}

impl Statement for DeleteBuilder {
    const KIND: &'static str = "delete";

    fn placeholder_format(&self) -> &dyn PlaceholderFormat {
        self.format.as_ref()
    }
}
