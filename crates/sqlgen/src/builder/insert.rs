//! INSERT builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builder::render_value;
use crate::builder::traits::Statement;
use crate::error::{SqlError, SqlResult};
use crate::fragment::Fragment;
use crate::placeholder::{PlaceholderFormat, Question};
use crate::value::{Arg, Value};

/// INSERT statement builder.
///
/// ```
/// use sqlgen::{Fragment, args, insert};
///
/// let qb = insert("users").columns(["name", "age"]).values(args!["Ann", 30]);
/// let (sql, args) = qb.render().unwrap();
/// assert_eq!(sql, "INSERT INTO users (name,age) VALUES (?,?)");
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct InsertBuilder {
    format: Arc<dyn PlaceholderFormat>,
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<Arg>>,
}

impl Default for InsertBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InsertBuilder {
    /// Create an empty INSERT builder with `?` placeholders.
    pub fn new() -> Self {
        Self::with_format(Arc::new(Question))
    }

    pub(crate) fn with_format(format: Arc<dyn PlaceholderFormat>) -> Self {
        Self {
            format,
            table: String::new(),
            columns: Vec::new(),
            rows: Vec::new(),
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

    /// Append column names.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append one row of values. Values may be nested fragments such as
    /// `Expr::raw("NOW()", args![])` or a sub-select.
    pub fn values<I, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Arg>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// Replace columns and rows with a single row taken from a map.
    ///
    /// Columns are sorted so the column list and the value list line up.
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
        let (columns, row): (Vec<_>, Vec<_>) = sorted.into_iter().unzip();
        self.columns = columns;
        self.rows = vec![row];
        self
    }
}

impl Fragment for InsertBuilder {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        if self.table.is_empty() {
            return Err(SqlError::missing("insert", "specify a table"));
        }
        if self.rows.is_empty() {
            return Err(SqlError::missing("insert", "have at least one set of values"));
        }

        let mut sql = format!("INSERT INTO {}", self.table);
        if !self.columns.is_empty() {
            sql.push_str(" (");
            sql.push_str(&self.columns.join(","));
            sql.push(')');
        }
        sql.push_str(" VALUES ");

        let mut args = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if !self.columns.is_empty() && row.len() != self.columns.len() {
                return Err(SqlError::ColumnCountMismatch {
                    row: i,
                    expected: self.columns.len(),
                    got: row.len(),
                });
            }
            if row.is_empty() {
                return Err(SqlError::missing("insert", "have at least one set of values"));
            }
            if i > 0 {
                sql.push(',');
            }
            let values = row
                .iter()
                .map(|arg| render_value(arg, &mut args))
                .collect::<SqlResult<Vec<_>>>()?;
            sql.push('(');
            sql.push_str(&values.join(","));
            sql.push(')');
        }

        Ok((sql, args))
    }
}

impl Statement for InsertBuilder {
    const KIND: &'static str = "insert";

    fn placeholder_format(&self) -> &dyn PlaceholderFormat {
        self.format.as_ref()
    }
}
