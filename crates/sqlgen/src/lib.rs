//! # sqlgen
//!
//! Composable SQL statement builders producing parameterized SQL text plus an
//! ordered argument list.
//!
//! ## Features
//!
//! - **Predicates**: comparisons, `IN` / `NOT IN`, nested AND/OR groups and
//!   raw SQL, all composable as [`Fragment`]s
//! - **Statements**: SELECT (and COUNT), INSERT, UPDATE and DELETE builders
//! - **Alignment**: the i-th argument always belongs to the i-th placeholder,
//!   including across nested sub-statements
//! - **Dialects**: `?` placeholders are rewritten once, at build time
//!   (`$1`, `:1`, `@p1`)
//! - **Safe defaults**: DELETE and UPDATE require a WHERE clause
//!
//! Execution is left to the caller; [`Value`] implements
//! `tokio_postgres::types::ToSql`, so [`BuiltQuery::params_ref`] can be passed
//! straight to a client.
//!
//! ## Example
//!
//! ```
//! use sqlgen::{Dollar, Expr, Statement, StatementBuilder};
//!
//! let pg = StatementBuilder::new(Dollar);
//! let built = pg
//!     .select(["id", "name"])
//!     .from(["users"])
//!     .where_clause(Expr::or(vec![Expr::eq("role", "admin"), Expr::gt("karma", 100)]))
//!     .order_by(["name"])
//!     .limit(10)
//!     .build()
//!     .unwrap();
//! assert_eq!(
//!     built.sql,
//!     "SELECT id, name FROM users WHERE (role = $1 OR karma > $2) ORDER BY name LIMIT 10"
//! );
//! assert_eq!(built.args.len(), 2);
//! ```

pub mod builder;
pub mod error;
pub mod expr;
pub mod fragment;
pub mod placeholder;
pub mod prelude;
pub mod value;

mod postgres;

pub use builder::{
    BuiltQuery, CountBuilder, DeleteBuilder, InsertBuilder, SelectBuilder, Statement,
    StatementBuilder, UpdateBuilder, delete, insert, select, update,
};
pub use error::{SqlError, SqlResult};
pub use expr::{Compare, CompareOp, Expr, Membership, TableAlias};
pub use fragment::{Fragment, Pred, append_to_sql};
pub use placeholder::{
    AtP, Colon, Dollar, PlaceholderFormat, PlaceholderStyle, Question, placeholders,
    replace_positional,
};
pub use value::{Arg, Value, Valuer, ValuerError};

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// use sqlgen::{Arg, args};
///
/// let list: Vec<Arg> = args!["Ann", 30, None::<i64>];
/// assert_eq!(list.len(), 3);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($value)),+]
    };
}
