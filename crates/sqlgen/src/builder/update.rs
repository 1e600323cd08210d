//! UPDATE builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builder::traits::Statement;
use crate::builder::{append_tail, append_where, render_value};
use crate::error::{SqlError, SqlResult};
use crate::expr::Expr;
use crate::fragment::{Fragment, Pred};
use crate::placeholder::{PlaceholderFormat, Question};
use crate::value::{Arg, Value};

#[derive(Clone, Debug)]
struct SetClause {
    column: String,
    value: Arg,
}

/// UPDATE statement builder.
///
/// Rendering fails unless the WHERE clause renders some SQL; updating every
/// row needs an explicit predicate such as `where_clause("1=1")`.
#[derive(Clone, Debug)]
pub struct UpdateBuilder {
    format: Arc<dyn PlaceholderFormat>,
    table: String,
    set_clauses: Vec<SetClause>,
    where_parts: Vec<Pred>,
    order_bys: Vec<String>,
    limit: u64,
    offset: u64,
}

impl Default for UpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateBuilder {
    /// Create an empty UPDATE builder with `?` placeholders.
    pub fn new() -> Self {
        Self::with_format(Arc::new(Question))
    }

    pub(crate) fn with_format(format: Arc<dyn PlaceholderFormat>) -> Self {
        Self {
            format,
            table: String::new(),
            set_clauses: Vec::new(),
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

    /// Append `column=value`. The value may be a nested fragment, e.g.
    /// `Expr::raw("count + ?", args![1])`.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.set_clauses.push(SetClause {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Append one assignment per entry, in sorted column order.
    pub fn set_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Arg>,
    {
        let sorted: BTreeMap<String, Arg> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.set_clauses.extend(
            sorted
                .into_iter()
                .map(|(column, value)| SetClause { column, value }),
        );
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

impl Fragment for UpdateBuilder {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        if self.table.is_empty() {
            return Err(SqlError::missing("update", "specify a table"));
        }
        if self.set_clauses.is_empty() {
            return Err(SqlError::missing("update", "have at least one set clause"));
        }

        let mut args = Vec::new();
        let mut sets = Vec::with_capacity(self.set_clauses.len());
        for set in &self.set_clauses {
            let value = render_value(&set.value, &mut args)?;
            sets.push(format!("{}={}", set.column, value));
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        if !append_where(&mut sql, &mut args, &self.where_parts)? {
            return Err(SqlError::missing("update", "have a WHERE clause"));
        }
        append_tail(&mut sql, &self.order_bys, self.limit, self.offset);

        Ok((sql, args))
    }
}

impl Statement for UpdateBuilder {
    const KIND: &'static str = "update";

    fn placeholder_format(&self) -> &dyn PlaceholderFormat {
        self.format.as_ref()
    }
}
