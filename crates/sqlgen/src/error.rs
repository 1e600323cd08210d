//! Error types for sqlgen

use thiserror::Error;

use crate::value::ValuerError;

/// Result type alias for rendering and building statements
pub type SqlResult<T> = Result<T, SqlError>;

/// Everything that can go wrong while turning builders into SQL.
///
/// A render never returns partial output: when one of these comes back, the
/// SQL text and arguments of the enclosing statement are not produced at all.
#[derive(Debug, Error)]
pub enum SqlError {
    /// A clause the statement grammar requires was never configured
    #[error("{statement} statements must {requirement}")]
    MissingClause {
        statement: &'static str,
        requirement: &'static str,
    },

    /// A value that is not a bindable scalar was used where one is required
    #[error("cannot use {type_name} with {context}")]
    UnsupportedType {
        context: &'static str,
        type_name: &'static str,
    },

    /// NULL combined with an operator other than equality
    #[error("cannot use null with the `{op}` operator")]
    NullComparison { op: &'static str },

    /// IN / NOT IN with an empty value list
    #[error("empty value list for column '{column}' in membership expression")]
    EmptyInList { column: String },

    /// Raw SQL whose `?` count disagrees with the number of arguments
    #[error("raw SQL '{sql}' has {expected} placeholders but {got} arguments were supplied")]
    PlaceholderMismatch {
        sql: String,
        expected: usize,
        got: usize,
    },

    /// INSERT row whose length differs from the column list
    #[error("insert row {row} has {got} values but {expected} columns were given")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// A fragment rendered no SQL where SQL is required
    #[error("{0} requires a non-empty SQL fragment")]
    EmptyFragment(&'static str),

    /// A predicate form that is not allowed in this position
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    /// A valuer failed to produce its underlying value
    #[error(transparent)]
    Valuer(#[from] ValuerError),

    /// The placeholder formatter could not rewrite the statement
    #[error("placeholder error: {0}")]
    Placeholder(String),
}

impl SqlError {
    /// Create a missing clause error
    pub fn missing(statement: &'static str, requirement: &'static str) -> Self {
        Self::MissingClause {
            statement,
            requirement,
        }
    }

    /// Create an unsupported type error
    pub fn unsupported(context: &'static str, type_name: &'static str) -> Self {
        Self::UnsupportedType { context, type_name }
    }

    /// Check if this is a missing clause error
    pub fn is_missing_clause(&self) -> bool {
        matches!(self, Self::MissingClause { .. })
    }

    /// Check if this is a type error
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. } | Self::Valuer(_))
    }
}
