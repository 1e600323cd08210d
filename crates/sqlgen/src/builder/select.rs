//! SELECT and SELECT COUNT(*) builders.

use std::sync::Arc;

use crate::builder::traits::Statement;
use crate::builder::{append_tail, append_where};
use crate::error::{SqlError, SqlResult};
use crate::expr::Expr;
use crate::fragment::{Fragment, Part, Pred, append_to_sql};
use crate::placeholder::{PlaceholderFormat, Question};
use crate::value::{Arg, Value};

/// SELECT statement builder.
#[derive(Clone, Debug)]
pub struct SelectBuilder {
    format: Arc<dyn PlaceholderFormat>,
    distinct: bool,
    /// Result columns (plain names, raw SQL, or fragments)
    columns: Vec<Part>,
    /// FROM tables
    from: Vec<String>,
    /// WHERE predicates, joined with AND
    where_parts: Vec<Pred>,
    group_bys: Vec<String>,
    order_bys: Vec<String>,
    /// 0 = unset
    limit: u64,
    /// 0 = unset
    offset: u64,
}

impl Default for SelectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectBuilder {
    /// Create an empty SELECT builder with `?` placeholders.
    pub fn new() -> Self {
        Self::with_format(Arc::new(Question))
    }

    pub(crate) fn with_format(format: Arc<dyn PlaceholderFormat>) -> Self {
        Self {
            format,
            distinct: false,
            columns: Vec::new(),
            from: Vec::new(),
            where_parts: Vec::new(),
            group_bys: Vec::new(),
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

    // ==================== SELECT columns ====================

    /// Add `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Append result columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(
            columns
                .into_iter()
                .map(|c| Part(Pred::raw(c, Vec::new()))),
        );
        self
    }

    /// Append a result column given as raw SQL with arguments or as a fragment.
    ///
    /// ```
    /// use sqlgen::{Expr, Fragment, args, select};
    ///
    /// let sub = select(["MAX(total)"]).from(["orders"]).where_raw("user_id = ?", args![7]);
    /// let qb = select(["id"]).column_expr(Expr::alias(sub, "max_total")).from(["users"]);
    /// let (sql, args) = qb.render().unwrap();
    /// assert_eq!(
    ///     sql,
    ///     "SELECT id, (SELECT MAX(total) FROM orders WHERE user_id = ?) AS max_total FROM users"
    /// );
    /// assert_eq!(args.len(), 1);
    /// ```
    pub fn column_expr(mut self, column: impl Into<Pred>) -> Self {
        self.columns.push(Part(column.into()));
        self
    }

    /// Append a raw result column with arguments for its `?` placeholders.
    pub fn column_raw(mut self, sql: &str, args: Vec<Arg>) -> Self {
        self.columns.push(Part(Pred::raw(sql, args)));
        self
    }

    /// Append FROM tables (comma-joined).
    pub fn from<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from.extend(tables.into_iter().map(Into::into));
        self
    }

    // ==================== WHERE ====================

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

    // ==================== Grouping, ordering, pagination ====================

    /// Append GROUP BY keys.
    pub fn group_by<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_bys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Append ORDER BY keys, e.g. `"created_at DESC"`.
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

    /// A `SELECT COUNT(*)` over the same FROM, WHERE and GROUP BY.
    pub fn count(&self) -> CountBuilder {
        CountBuilder {
            select: self.clone(),
        }
    }

    fn require_from(&self) -> SqlResult<String> {
        if self.from.is_empty() {
            return Err(SqlError::missing("select", "specify at least one FROM table"));
        }
        Ok(self.from.join(", "))
    }

    fn append_group_by(&self, sql: &mut String) {
        if !self.group_bys.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_bys.join(", "));
        }
    }
}

impl Fragment for SelectBuilder {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        if self.columns.is_empty() {
            return Err(SqlError::missing("select", "have at least one result column"));
        }
        let from = self.require_from()?;

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        let mut args = Vec::new();

        let before_columns = sql.len();
        append_to_sql(&mut sql, &mut args, &self.columns, ", ")?;
        if sql.len() == before_columns {
            return Err(SqlError::missing("select", "have at least one result column"));
        }

        sql.push_str(" FROM ");
        sql.push_str(&from);

        append_where(&mut sql, &mut args, &self.where_parts)?;
        self.append_group_by(&mut sql);
        append_tail(&mut sql, &self.order_bys, self.limit, self.offset);

        Ok((sql, args))
    }
}

impl Statement for SelectBuilder {
    const KIND: &'static str = "select";

    fn placeholder_format(&self) -> &dyn PlaceholderFormat {
        self.format.as_ref()
    }
}

/// `SELECT COUNT(*)` view of a [`SelectBuilder`].
///
/// Uses FROM, WHERE and GROUP BY; ignores result columns, DISTINCT, ORDER BY,
/// LIMIT and OFFSET.
#[derive(Clone, Debug)]
pub struct CountBuilder {
    select: SelectBuilder,
}

impl Fragment for CountBuilder {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        let from = self.select.require_from()?;

        let mut sql = format!("SELECT COUNT(*) FROM {from}");
        let mut args = Vec::new();
        append_where(&mut sql, &mut args, &self.select.where_parts)?;
        self.select.append_group_by(&mut sql);

        Ok((sql, args))
    }
}

impl Statement for CountBuilder {
    const KIND: &'static str = "count";

    fn placeholder_format(&self) -> &dyn PlaceholderFormat {
        self.select.format.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::placeholder::Dollar;

    fn users() -> SelectBuilder {
        SelectBuilder::new().columns(["id", "name"]).from(["users"])
    }

    #[test]
    fn test_simple_select() {
        let (sql, args) = users().render().unwrap();
        assert_eq!(sql, "SELECT id, name FROM users");
        assert!(args.is_empty());
    }

    #[test]
    fn test_select_requires_columns() {
        let err = SelectBuilder::new().from(["users"]).render().unwrap_err();
        assert!(err.is_missing_clause());
    }

    #[test]
    fn test_select_requires_from() {
        let err = SelectBuilder::new().columns(["1"]).render().unwrap_err();
        assert!(err.is_missing_clause());
    }

    #[test]
    fn test_columns_rendering_nothing_are_missing() {
        let err = SelectBuilder::new()
            .column_expr(Pred::None)
            .from(["users"])
            .render()
            .unwrap_err();
        assert!(err.is_missing_clause());
    }

    #[test]
    fn test_distinct_and_multiple_tables() {
        let qb = SelectBuilder::new()
            .distinct()
            .columns(["u.id"])
            .from(["users u", "orders o"]);
        assert_eq!(qb.render().unwrap().0, "SELECT DISTINCT u.id FROM users u, orders o");
    }

    #[test]
    fn test_full_clause_order() {
        let qb = users()
            .eq("status", "active")
            .where_raw("age > ?", args![18])
            .group_by(["status"])
            .order_by(["name", "id DESC"])
            .limit(10)
            .offset(20);
        let (sql, args) = qb.render().unwrap();
        assert_eq!(
            sql,
            "SELECT id, name FROM users WHERE status = ? AND (age > ?) GROUP BY status \
             ORDER BY name, id DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(args, vec![Value::Text("active".into()), Value::Int(18)]);
    }

    #[test]
    fn test_zero_limit_and_offset_are_unset() {
        let qb = users().limit(0).offset(0);
        assert_eq!(qb.render().unwrap().0, "SELECT id, name FROM users");
    }

    #[test]
    fn test_empty_where_parts_emit_no_where() {
        let qb = users().where_clause(Expr::and(vec![])).where_clause(Pred::None);
        assert_eq!(qb.render().unwrap().0, "SELECT id, name FROM users");
    }

    #[test]
    fn test_column_args_come_before_where_args() {
        let qb = SelectBuilder::new()
            .column_raw("COALESCE(nick, ?) AS nick", args!["anon"])
            .from(["users"])
            .eq("id", 3);
        let (sql, args) = qb.render().unwrap();
        assert_eq!(sql, "SELECT COALESCE(nick, ?) AS nick FROM users WHERE id = ?");
        assert_eq!(args, vec![Value::Text("anon".into()), Value::Int(3)]);
    }

    #[test]
    fn test_equality_map_column_is_rejected() {
        let qb = SelectBuilder::new()
            .column_expr(Pred::eq_map([("a", 1)]))
            .from(["t"]);
        assert!(matches!(qb.render(), Err(SqlError::InvalidPredicate(_))));
    }

    #[test]
    fn test_count() {
        let qb = users()
            .distinct()
            .eq("status", "active")
            .group_by(["status"])
            .order_by(["name"])
            .limit(5)
            .offset(5);
        let (sql, args) = qb.count().render().unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM users WHERE status = ? GROUP BY status"
        );
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_count_requires_from() {
        let err = SelectBuilder::new().columns(["id"]).count().render().unwrap_err();
        assert!(err.is_missing_clause());
    }

    #[test]
    fn test_build_with_dollar() {
        let built = users()
            .placeholder(Dollar)
            .eq("a", 1)
            .in_list("b", [2, 3])
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT id, name FROM users WHERE a = $1 AND b IN ($2,$3)"
        );
        assert_eq!(built.args.len(), 3);
    }

    #[test]
    fn test_render_is_repeatable() {
        let qb = users().in_list("id", [1, 2, 3]);
        assert_eq!(qb.render().unwrap(), qb.render().unwrap());
    }
}
