//! Statement builders.
//!
//! ## Design
//!
//! - Builders are plain values configured through consuming chain calls and
//!   rendered on demand; rendering never mutates them.
//! - Safe defaults: DELETE and UPDATE require a non-empty WHERE, INSERT
//!   requires values, SELECT requires columns and a FROM table.
//! - Placeholders are rendered as `?` and rewritten once, for the whole
//!   statement, by the builder's [`PlaceholderFormat`].
//!
//! Builders are not synchronized. Clone a builder to branch it; share only
//! finished builders across threads.

mod delete;
mod insert;
mod select;
mod traits;
mod update;

use std::sync::Arc;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::{CountBuilder, SelectBuilder};
pub use traits::{BuiltQuery, Statement};
pub use update::UpdateBuilder;

use crate::error::{SqlError, SqlResult};
use crate::expr::impl_into_pred_and_arg;
use crate::fragment::{Fragment, Pred};
use crate::placeholder::{PlaceholderFormat, PlaceholderStyle, Question};
use crate::value::{Arg, Value};

/// Produces builders that share one placeholder format.
///
/// # Example
/// ```
/// use sqlgen::{Dollar, Statement, StatementBuilder};
///
/// let pg = StatementBuilder::new(Dollar);
/// let built = pg.delete("users").eq("id", 7).build().unwrap();
/// assert_eq!(built.sql, "DELETE FROM users WHERE id = $1");
/// ```
#[derive(Clone, Debug)]
pub struct StatementBuilder {
    format: Arc<dyn PlaceholderFormat>,
}

impl Default for StatementBuilder {
    fn default() -> Self {
        Self::new(Question)
    }
}

impl StatementBuilder {
    /// Create a factory for the given placeholder format.
    pub fn new<F: PlaceholderFormat + 'static>(format: F) -> Self {
        Self {
            format: Arc::new(format),
        }
    }

    /// Create a factory from a configured [`PlaceholderStyle`].
    pub fn with_style(style: PlaceholderStyle) -> Self {
        Self {
            format: style.format(),
        }
    }

    /// The format handed to every builder created by this factory.
    pub fn placeholder_format(&self) -> &dyn PlaceholderFormat {
        self.format.as_ref()
    }

    /// Start a SELECT with the given result columns.
    pub fn select<I, S>(&self, columns: I) -> SelectBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectBuilder::with_format(Arc::clone(&self.format)).columns(columns)
    }

    /// Start an INSERT into `table`.
    pub fn insert(&self, table: &str) -> InsertBuilder {
        InsertBuilder::with_format(Arc::clone(&self.format)).table(table)
    }

    /// Start an UPDATE of `table`.
    pub fn update(&self, table: &str) -> UpdateBuilder {
        UpdateBuilder::with_format(Arc::clone(&self.format)).table(table)
    }

    /// Start a DELETE from `table`.
    pub fn delete(&self, table: &str) -> DeleteBuilder {
        DeleteBuilder::with_format(Arc::clone(&self.format)).table(table)
    }
}

/// Create a SELECT builder with `?` placeholders.
///
/// # Example
/// ```
/// use sqlgen::{Statement, select};
///
/// let built = select(["id", "name"]).from(["users"]).eq("active", true).build().unwrap();
/// assert_eq!(built.sql, "SELECT id, name FROM users WHERE active = ?");
/// ```
pub fn select<I, S>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    StatementBuilder::default().select(columns)
}

/// Create an INSERT builder with `?` placeholders.
pub fn insert(table: &str) -> InsertBuilder {
    StatementBuilder::default().insert(table)
}

/// Create an UPDATE builder with `?` placeholders.
pub fn update(table: &str) -> UpdateBuilder {
    StatementBuilder::default().update(table)
}

/// Create a DELETE builder with `?` placeholders.
pub fn delete(table: &str) -> DeleteBuilder {
    StatementBuilder::default().delete(table)
}

/// Append ` WHERE <preds joined by AND>` when the predicates render any SQL.
///
/// Raw SQL parts are parenthesized when more than one part survives, so an
/// `a = ? OR b = ?` stays grouped next to the other conditions.
/// Returns whether a WHERE clause was written.
fn append_where(sql: &mut String, args: &mut Vec<Value>, preds: &[Pred]) -> SqlResult<bool> {
    let mut rendered = Vec::with_capacity(preds.len());
    for pred in preds {
        let (part_sql, part_args) = pred.render()?;
        if !part_sql.is_empty() {
            rendered.push((matches!(pred, Pred::Raw { .. }), part_sql, part_args));
        }
    }
    if rendered.is_empty() {
        return Ok(false);
    }

    let grouped = rendered.len() > 1;
    sql.push_str(" WHERE ");
    for (i, (raw, part_sql, part_args)) in rendered.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(" AND ");
        }
        if raw && grouped {
            sql.push('(');
            sql.push_str(&part_sql);
            sql.push(')');
        } else {
            sql.push_str(&part_sql);
        }
        args.extend(part_args);
    }
    Ok(true)
}

/// Append ORDER BY / LIMIT / OFFSET. Zero limit or offset means unset.
fn append_tail(sql: &mut String, order_bys: &[String], limit: u64, offset: u64) {
    if !order_bys.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_bys.join(", "));
    }
    if limit > 0 {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if offset > 0 {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
}

/// Render one INSERT/UPDATE value: nested fragments inline their SQL, plain
/// values become a placeholder.
fn render_value(arg: &Arg, args: &mut Vec<Value>) -> SqlResult<String> {
    match arg {
        Arg::Fragment(fragment) => {
            let (sql, fragment_args) = fragment.render()?;
            if sql.is_empty() {
                return Err(SqlError::EmptyFragment("value expression"));
            }
            args.extend(fragment_args);
            Ok(sql)
        }
        other => {
            args.push(other.resolve("value")?);
            Ok("?".to_string())
        }
    }
}

/// A statement nested as a value: renders `(sql)`.
#[derive(Debug)]
pub(crate) struct Subquery<F>(pub(crate) F);

impl<F: Fragment> Fragment for Subquery<F> {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        let (sql, args) = self.0.render()?;
        if sql.is_empty() {
            return Ok((sql, args));
        }
        Ok((format!("({sql})"), args))
    }
}

impl_into_pred_and_arg!(
    subquery: SelectBuilder,
    CountBuilder,
    InsertBuilder,
    UpdateBuilder,
    DeleteBuilder,
);
