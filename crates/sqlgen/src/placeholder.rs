//! Placeholder formats.
//!
//! Every fragment renders positional `?` markers. A [`PlaceholderFormat`]
//! rewrites the finished statement into the syntax a driver expects, e.g.
//! `$1, $2` for PostgreSQL. Literal values are never interpolated into SQL,
//! so every `?` in a rendered statement is a placeholder.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{SqlError, SqlResult};

/// Rewrites the `?` markers of a rendered statement.
///
/// Implementations must emit exactly one token per `?`, in order, and leave
/// every other character untouched.
pub trait PlaceholderFormat: fmt::Debug + Send + Sync {
    fn replace_placeholders(&self, sql: &str) -> SqlResult<String>;
}

/// Leaves `?` as is (MySQL, SQLite).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Question;

/// `$1, $2, ...` (PostgreSQL).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dollar;

/// `:1, :2, ...` (Oracle).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Colon;

/// `@p1, @p2, ...` (SQL Server).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AtP;

impl PlaceholderFormat for Question {
    fn replace_placeholders(&self, sql: &str) -> SqlResult<String> {
        Ok(sql.to_string())
    }
}

impl PlaceholderFormat for Dollar {
    fn replace_placeholders(&self, sql: &str) -> SqlResult<String> {
        Ok(replace_positional(sql, "$"))
    }
}

impl PlaceholderFormat for Colon {
    fn replace_placeholders(&self, sql: &str) -> SqlResult<String> {
        Ok(replace_positional(sql, ":"))
    }
}

impl PlaceholderFormat for AtP {
    fn replace_placeholders(&self, sql: &str) -> SqlResult<String> {
        Ok(replace_positional(sql, "@p"))
    }
}

/// Replace the n-th `?` (1-based) with `prefix` followed by n.
///
/// Single pass over the input; usable by custom formats that only differ in
/// their prefix.
pub fn replace_positional(sql: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(sql.len() + sql.len() / 4);
    for (idx, piece) in sql.split('?').enumerate() {
        if idx > 0 {
            out.push_str(prefix);
            out.push_str(&idx.to_string());
        }
        out.push_str(piece);
    }
    out
}

/// `count` question marks separated by commas: `placeholders(3) == "?,?,?"`.
pub fn placeholders(count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    let mut out = "?,".repeat(count);
    out.pop();
    out
}

/// Named placeholder style, for selecting a format from configuration.
///
/// ```
/// use sqlgen::PlaceholderStyle;
///
/// let style: PlaceholderStyle = "dollar".parse().unwrap();
/// assert_eq!(style, PlaceholderStyle::Dollar);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    #[default]
    Question,
    Dollar,
    Colon,
    AtP,
}

impl PlaceholderStyle {
    /// The formatter for this style.
    pub fn format(self) -> Arc<dyn PlaceholderFormat> {
        match self {
            PlaceholderStyle::Question => Arc::new(Question),
            PlaceholderStyle::Dollar => Arc::new(Dollar),
            PlaceholderStyle::Colon => Arc::new(Colon),
            PlaceholderStyle::AtP => Arc::new(AtP),
        }
    }
}

impl FromStr for PlaceholderStyle {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" | "?" => Ok(Self::Question),
            "dollar" | "$" => Ok(Self::Dollar),
            "colon" | ":" => Ok(Self::Colon),
            "at_p" | "atp" | "@p" => Ok(Self::AtP),
            other => Err(SqlError::Placeholder(format!(
                "unknown placeholder style '{other}'"
            ))),
        }
    }
}
