//! Bindable values and the argument slots that produce them.
//!
//! [`Value`] is what ends up in the argument list of a rendered statement.
//! [`Arg`] is what callers hand to builders: a plain value, a [`Valuer`] that
//! is resolved at render time, or a nested [`Fragment`] (only meaningful for
//! INSERT rows and UPDATE assignments).

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{SqlError, SqlResult};
use crate::fragment::Fragment;

/// A value that can be bound to a placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Date(NaiveDate),
    Uuid(Uuid),
    Json(serde_json::Value),
    /// A list of values. Not a scalar: comparisons and IN lists reject it,
    /// raw fragments may bind it (e.g. `id = ANY(?)`).
    Array(Vec<Value>),
}

impl Value {
    /// Build an array value from anything convertible to [`Value`].
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Check if this is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value can stand alone behind a single comparison placeholder.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_))
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Date(_) => "date",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
            Value::Array(_) => "array",
        }
    }
}

/// Failure reported by a [`Valuer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("valuer error: {0}")]
pub struct ValuerError(pub String);

impl ValuerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A wrapper type that knows how to turn itself into a bindable [`Value`].
///
/// Implement this for domain types (money amounts, enums, encrypted columns)
/// that should be resolved lazily, when the statement is rendered.
pub trait Valuer: fmt::Debug + Send + Sync {
    fn value(&self) -> Result<Value, ValuerError>;
}

/// An argument slot accepted by builders and expressions.
#[derive(Clone, Debug)]
pub enum Arg {
    /// A plain value
    Value(Value),
    /// Resolved through [`Valuer::value`] at render time
    Valuer(Arc<dyn Valuer>),
    /// Nested SQL whose text is substituted in place of a placeholder
    Fragment(Arc<dyn Fragment>),
}

impl Arg {
    /// Wrap a [`Valuer`].
    pub fn valuer<V: Valuer + 'static>(valuer: V) -> Self {
        Arg::Valuer(Arc::new(valuer))
    }

    /// Wrap a nested fragment.
    pub fn fragment<F: Fragment + 'static>(fragment: F) -> Self {
        Arg::Fragment(Arc::new(fragment))
    }

    /// Resolve to a bindable value. Fragments cannot be bound.
    pub(crate) fn resolve(&self, context: &'static str) -> SqlResult<Value> {
        match self {
            Arg::Value(value) => Ok(value.clone()),
            Arg::Valuer(valuer) => Ok(valuer.value()?),
            Arg::Fragment(_) => Err(SqlError::unsupported(context, "fragment")),
        }
    }

    /// Resolve and require a scalar.
    pub(crate) fn resolve_scalar(&self, context: &'static str) -> SqlResult<Value> {
        let value = self.resolve(context)?;
        if !value.is_scalar() {
            return Err(SqlError::unsupported(context, value.type_name()));
        }
        Ok(value)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        Arg::Value(value.into())
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => |$v:ident| $convert:expr;)*) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $convert
                }
            }

            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_from_value! {
    bool => |v| Value::Bool(v);
    i8 => |v| Value::Int(i64::from(v));
    i16 => |v| Value::Int(i64::from(v));
    i32 => |v| Value::Int(i64::from(v));
    i64 => |v| Value::Int(v);
    u8 => |v| Value::Int(i64::from(v));
    u16 => |v| Value::Int(i64::from(v));
    u32 => |v| Value::Int(i64::from(v));
    f32 => |v| Value::Float(f64::from(v));
    f64 => |v| Value::Float(v);
    String => |v| Value::Text(v);
    &str => |v| Value::Text(v.to_string());
    &String => |v| Value::Text(v.clone());
    Vec<u8> => |v| Value::Bytes(v);
    &[u8] => |v| Value::Bytes(v.to_vec());
    NaiveDateTime => |v| Value::Timestamp(v);
    DateTime<Utc> => |v| Value::TimestampTz(v);
    NaiveDate => |v| Value::Date(v);
    Uuid => |v| Value::Uuid(v);
    serde_json::Value => |v| Value::Json(v);
}
