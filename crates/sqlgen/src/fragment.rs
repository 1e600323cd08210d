//! The fragment protocol and the clause assembler shared by all statements.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::{SqlError, SqlResult};
use crate::expr::{CompareOp, render_comparison};
use crate::value::{Arg, Value};

/// Anything that renders to SQL text plus its ordered arguments.
///
/// Rendered text uses `?` for every placeholder; the i-th argument belongs to
/// the i-th `?`. Rendering has no side effects and may be repeated.
pub trait Fragment: fmt::Debug + Send + Sync {
    fn render(&self) -> SqlResult<(String, Vec<Value>)>;
}

impl<F: Fragment + ?Sized> Fragment for Arc<F> {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        (**self).render()
    }
}

impl<F: Fragment + ?Sized> Fragment for Box<F> {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        (**self).render()
    }
}

/// Render `parts` into `sql`, separated by `sep`, collecting arguments.
///
/// Parts rendering empty text are skipped entirely (no separator, no
/// arguments). The first error aborts; callers must then discard `sql` and
/// `args`.
pub fn append_to_sql<F: Fragment>(
    sql: &mut String,
    args: &mut Vec<Value>,
    parts: &[F],
    sep: &str,
) -> SqlResult<()> {
    let mut wrote_any = false;
    for part in parts {
        let (part_sql, part_args) = part.render()?;
        if part_sql.is_empty() {
            continue;
        }
        if wrote_any {
            sql.push_str(sep);
        }
        sql.push_str(&part_sql);
        args.extend(part_args);
        wrote_any = true;
    }
    Ok(())
}

/// Raw SQL with `?` placeholders and their arguments.
pub(crate) fn render_raw(sql: &str, args: &[Arg]) -> SqlResult<(String, Vec<Value>)> {
    let expected = sql.matches('?').count();
    if expected != args.len() {
        return Err(SqlError::PlaceholderMismatch {
            sql: sql.to_string(),
            expected,
            got: args.len(),
        });
    }
    let values = args
        .iter()
        .map(|arg| arg.resolve("raw sql"))
        .collect::<SqlResult<Vec<_>>>()?;
    Ok((sql.to_string(), values))
}

/// A predicate in any of the forms builders accept.
///
/// Converted once when handed to a builder; `&str`/`String` become raw SQL,
/// maps become an equality conjunction, expressions and builders become
/// fragments.
#[derive(Clone, Debug, Default)]
pub enum Pred {
    /// Renders nothing
    #[default]
    None,
    Fragment(Arc<dyn Fragment>),
    Raw { sql: String, args: Vec<Arg> },
    /// `col = ?` for every entry, joined by AND; WHERE clauses only
    Eq(BTreeMap<String, Arg>),
}

impl Pred {
    /// Raw SQL with arguments for its `?` placeholders.
    pub fn raw(sql: impl Into<String>, args: Vec<Arg>) -> Self {
        Pred::Raw {
            sql: sql.into(),
            args,
        }
    }

    /// Equality map from `(column, value)` pairs.
    pub fn eq_map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Arg>,
    {
        Pred::Eq(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wrap any fragment.
    pub fn fragment<F: Fragment + 'static>(fragment: F) -> Self {
        Pred::Fragment(Arc::new(fragment))
    }
}

impl Fragment for Pred {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        match self {
            Pred::None => Ok((String::new(), Vec::new())),
            Pred::Fragment(fragment) => fragment.render(),
            Pred::Raw { sql, args } => render_raw(sql, args),
            Pred::Eq(map) => render_comparison(CompareOp::Eq, map),
        }
    }
}

impl From<&str> for Pred {
    fn from(sql: &str) -> Self {
        Pred::raw(sql, Vec::new())
    }
}

impl From<String> for Pred {
    fn from(sql: String) -> Self {
        Pred::raw(sql, Vec::new())
    }
}

impl From<BTreeMap<String, Arg>> for Pred {
    fn from(map: BTreeMap<String, Arg>) -> Self {
        Pred::Eq(map)
    }
}

impl From<HashMap<String, Arg>> for Pred {
    fn from(map: HashMap<String, Arg>) -> Self {
        Pred::Eq(map.into_iter().collect())
    }
}

impl<P: Into<Pred>> From<Option<P>> for Pred {
    fn from(pred: Option<P>) -> Self {
        pred.map_or(Pred::None, Into::into)
    }
}

/// A predicate outside a WHERE clause (e.g. a result column), where the
/// equality-map shorthand has no meaning.
#[derive(Clone, Debug)]
pub(crate) struct Part(pub(crate) Pred);

impl Fragment for Part {
    fn render(&self) -> SqlResult<(String, Vec<Value>)> {
        match &self.0 {
            Pred::Eq(_) => Err(SqlError::InvalidPredicate(
                "expected raw SQL or a fragment, not an equality map".to_string(),
            )),
            pred => pred.render(),
        }
    }
}
