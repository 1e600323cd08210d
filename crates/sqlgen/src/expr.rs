//! Predicate expressions for WHERE clauses.
//!
//! This module provides the `Expr` enum which supports:
//! - comparisons over a column → value map (`=`, `!=`, `<`, `>`, `<=`, `>=`)
//! - `IN` / `NOT IN` membership over a column → values map
//! - AND/OR grouping with arbitrary nesting
//! - raw SQL fragments with `?` placeholders
//!
//! Column maps are ordered (`BTreeMap`), so the rendered SQL and its argument
//! list line up the same way on every render.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{SqlError, SqlResult};
use crate::fragment::{Fragment, Pred, append_to_sql, render_raw};
use crate::placeholder::placeholders;
use crate::value::{Arg, Value};

/// Comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::LtEq => "<=",
            CompareOp::GtEq => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `col OP ?` for every entry, joined with AND.
///
/// NULL renders `col IS NULL` and is only accepted with [`CompareOp::Eq`].
pub(crate) fn render_comparison(
    op: CompareOp,
    columns: &BTreeMap<String, Arg>,
) -> SqlResult<(String, Vec<Value>)> {
    let mut exprs = Vec::with_capacity(columns.len());
    let mut args = Vec::with_capacity(columns.len());
    for (column, arg) in columns {
        let value = arg.resolve_scalar("compare expr")?;
        if value.is_null() {
            if op != CompareOp::Eq {
                return Err(SqlError::NullComparison { op: op.as_str() });
            }
            exprs.push(format!("{column} IS NULL"));
        } else {
            exprs.push(format!("{column} {op} ?"));
            args.push(value);
        }
    }
    Ok((exprs.join(" AND "), args))
}

/// A comparison applied to every column of a map.
///
/// ```
/// use sqlgen::{Compare, Fragment};
///
/// let (sql, args) = Compare::eq().with("b", 2).with("a", 1).render().unwrap();
/// assert_eq!(sql, "a = ? AND b = ?");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Compare {
    op: CompareOp,
    columns: BTreeMap<String, Arg>,
}

impl Compare {
    pub fn new(op: CompareOp) -> Self {
        Self {
            op,
            columns: BTreeMap::new(),
        }
    }

    pub fn eq() -> Self {
        Self::new(CompareOp::Eq)
    }

    pub fn not_eq() -> Self {
        Self::new(CompareOp::NotEq)
    }

    pub fn lt() -> Self {
        Self::new(CompareOp::Lt)
    }

    pub fn gt() -> Self {
        Self::new(CompareOp::Gt)
    }

    pub fn lt_eq() -> Self {
        Self::new(CompareOp::LtEq)
    }

    pub fn gt_eq() -> Self {
        Self::new(CompareOp::GtEq)
    }

    /// Add (or replace) one column.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    /// Add every `(column, value)` pair.
    pub fn with_all<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Arg>,
    {
        self.columns
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Fragment for Compare {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        render_comparison(self.op, &self.columns)
    }
}

/// `IN` / `NOT IN` over every column of a map.
#[derive(Clone, Debug)]
pub struct Membership {
    negated: bool,
    columns: BTreeMap<String, Vec<Arg>>,
}

impl Membership {
    /// `col IN (...)`
    pub fn is_in() -> Self {
        Self {
            negated: false,
            columns: BTreeMap::new(),
        }
    }

    /// `col NOT IN (...)`
    pub fn not_in() -> Self {
        Self {
            negated: true,
            columns: BTreeMap::new(),
        }
    }

    /// Add (or replace) the value list for one column.
    pub fn with<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Arg>,
    {
        self.columns
            .insert(column.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl Fragment for Membership {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        let op = if self.negated { "NOT IN" } else { "IN" };
        let mut exprs = Vec::with_capacity(self.columns.len());
        let mut args = Vec::new();
        for (column, values) in &self.columns {
            if values.is_empty() {
                return Err(SqlError::EmptyInList {
                    column: column.clone(),
                });
            }
            for value in values {
                args.push(value.resolve_scalar("membership expr")?);
            }
            exprs.push(format!("{column} {op} ({})", placeholders(values.len())));
        }
        Ok((exprs.join(" AND "), args))
    }
}

/// Expression node for building WHERE clauses.
#[derive(Clone, Debug)]
pub enum Expr {
    Compare(Compare),
    In(Membership),
    /// AND group: all conditions must be true.
    And(Vec<Expr>),
    /// OR group: at least one condition must be true.
    Or(Vec<Expr>),
    /// Raw SQL with `?` placeholders.
    Raw { sql: String, args: Vec<Arg> },
    /// `(inner) AS alias`
    Alias {
        inner: Arc<dyn Fragment>,
        alias: String,
    },
    /// Any other fragment, e.g. a sub-select or a [`Pred`].
    Fragment(Arc<dyn Fragment>),
}

impl Expr {
    /// Create an AND expression from a list of expressions.
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    /// Create an OR expression from a list of expressions.
    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    /// Create an equality condition: column = value
    pub fn eq(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Compare(Compare::eq().with(column, value))
    }

    /// Create an inequality condition: column != value
    pub fn ne(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Compare(Compare::not_eq().with(column, value))
    }

    /// Create a less-than condition: column < value
    pub fn lt(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Compare(Compare::lt().with(column, value))
    }

    /// Create a greater-than condition: column > value
    pub fn gt(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Compare(Compare::gt().with(column, value))
    }

    /// Create a less-than-or-equal condition: column <= value
    pub fn lte(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Compare(Compare::lt_eq().with(column, value))
    }

    /// Create a greater-than-or-equal condition: column >= value
    pub fn gte(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Expr::Compare(Compare::gt_eq().with(column, value))
    }

    /// Equality over several columns at once, joined with AND.
    pub fn eq_map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Arg>,
    {
        Expr::Compare(Compare::eq().with_all(pairs))
    }

    /// Create an IN condition: column IN (values...)
    pub fn in_list<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Arg>,
    {
        Expr::In(Membership::is_in().with(column, values))
    }

    /// Create a NOT IN condition: column NOT IN (values...)
    pub fn not_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Arg>,
    {
        Expr::In(Membership::not_in().with(column, values))
    }

    /// Create a raw SQL expression with `?` placeholders.
    ///
    /// # Example
    /// ```
    /// use sqlgen::{Expr, args};
    ///
    /// let expr = Expr::raw("a = ? OR b = ?", args![1, 2]);
    /// ```
    pub fn raw(sql: impl Into<String>, args: Vec<Arg>) -> Self {
        Expr::Raw {
            sql: sql.into(),
            args,
        }
    }

    /// Wrap a fragment as `(fragment) AS alias`, e.g. a sub-select used as a column.
    pub fn alias<F: Fragment + 'static>(inner: F, alias: impl Into<String>) -> Self {
        Expr::Alias {
            inner: Arc::new(inner),
            alias: alias.into(),
        }
    }

    /// Embed any fragment.
    pub fn fragment<F: Fragment + 'static>(fragment: F) -> Self {
        Expr::Fragment(Arc::new(fragment))
    }
}

fn render_group(exprs: &[Expr], sep: &str) -> SqlResult<(String, Vec<Value>)> {
    let mut sql = String::new();
    let mut args = Vec::new();
    append_to_sql(&mut sql, &mut args, exprs, sep)?;
    if sql.is_empty() {
        return Ok((sql, args));
    }
    Ok((format!("({sql})"), args))
}

impl Fragment for Expr {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        match self {
            Expr::Compare(compare) => compare.render(),
            Expr::In(membership) => membership.render(),
            Expr::And(exprs) => render_group(exprs, " AND "),
            Expr::Or(exprs) => render_group(exprs, " OR "),
            Expr::Raw { sql, args } => render_raw(sql, args),
            Expr::Alias { inner, alias } => {
                let (sql, args) = inner.render()?;
                if sql.is_empty() {
                    return Err(SqlError::EmptyFragment("alias"));
                }
                Ok((format!("({sql}) AS {alias}"), args))
            }
            Expr::Fragment(fragment) => fragment.render(),
        }
    }
}

impl From<Compare> for Expr {
    fn from(compare: Compare) -> Self {
        Expr::Compare(compare)
    }
}

impl From<Membership> for Expr {
    fn from(membership: Membership) -> Self {
        Expr::In(membership)
    }
}

impl From<Pred> for Expr {
    fn from(pred: Pred) -> Self {
        Expr::Fragment(Arc::new(pred))
    }
}

macro_rules! impl_into_pred_and_arg {
    // Statements used as values are parenthesized; as predicates they stay bare.
    (subquery: $($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for $crate::fragment::Pred {
                fn from(value: $ty) -> Self {
                    $crate::fragment::Pred::Fragment(::std::sync::Arc::new(value))
                }
            }

            impl From<$ty> for $crate::value::Arg {
                fn from(value: $ty) -> Self {
                    $crate::value::Arg::Fragment(::std::sync::Arc::new(
                        $crate::builder::Subquery(value),
                    ))
                }
            }
        )*
    };
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for $crate::fragment::Pred {
                fn from(value: $ty) -> Self {
                    $crate::fragment::Pred::Fragment(::std::sync::Arc::new(value))
                }
            }

            impl From<$ty> for $crate::value::Arg {
                fn from(value: $ty) -> Self {
                    $crate::value::Arg::Fragment(::std::sync::Arc::new(value))
                }
            }
        )*
    };
}

pub(crate) use impl_into_pred_and_arg;

impl_into_pred_and_arg!(Expr, Compare, Membership);

/// A table with an alias, for FROM lists and qualified column names.
///
/// ```
/// use sqlgen::TableAlias;
///
/// let users = TableAlias::new("users", "u");
/// assert_eq!(users.to_string(), "users AS u");
/// assert_eq!(users.column("id"), "u.id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableAlias {
    table: String,
    alias: String,
}

impl TableAlias {
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
        }
    }

    /// `alias.column`
    pub fn column(&self, column: &str) -> String {
        format!("{}.{}", self.alias, column)
    }
}

impl fmt::Display for TableAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AS {}", self.table, self.alias)
    }
}

impl From<TableAlias> for String {
    fn from(alias: TableAlias) -> Self {
        alias.to_string()
    }
}

impl From<&TableAlias> for String {
    fn from(alias: &TableAlias) -> Self {
        alias.to_string()
    }
}
