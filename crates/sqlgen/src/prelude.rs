//! Convenient imports for typical `sqlgen` usage.
//!
//! ```
//! use sqlgen::prelude::*;
//!
//! let built = select(["id"]).from(["users"]).eq("id", 1).build().unwrap();
//! assert_eq!(built.sql, "SELECT id FROM users WHERE id = ?");
//! ```

pub use crate::{
    Arg, BuiltQuery, Expr, Fragment, Pred, SqlError, SqlResult, Statement, StatementBuilder,
    Value, args, delete, insert, select, update,
};
pub use crate::{Dollar, PlaceholderStyle, Question};
