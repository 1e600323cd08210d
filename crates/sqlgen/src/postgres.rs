//! `tokio-postgres` bridge: lets built arguments be passed straight to a client.

use std::error::Error;

use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type};

use crate::value::Value;

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            // Integers are stored widened; narrow to the column width the server asked for.
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::OID => u32::try_from(*v)?.to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => v.to_sql_checked(ty, out),
            Value::TimestampTz(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::Array(items) => items.to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Each variant checks the concrete type itself.
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_null() {
        let mut buf = BytesMut::new();
        let is_null = Value::Null.to_sql(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn int_narrows_to_int4() {
        let mut buf = BytesMut::new();
        Value::Int(42).to_sql(&Type::INT4, &mut buf).unwrap();
        assert_eq!(&buf[..], &42i32.to_be_bytes());
    }

    #[test]
    fn int_stays_wide_for_int8() {
        let mut buf = BytesMut::new();
        Value::Int(42).to_sql(&Type::INT8, &mut buf).unwrap();
        assert_eq!(&buf[..], &42i64.to_be_bytes());
    }

    #[test]
    fn int_overflow_is_an_error() {
        let mut buf = BytesMut::new();
        assert!(Value::Int(i64::MAX).to_sql(&Type::INT2, &mut buf).is_err());
    }

    #[test]
    fn text_into_int_column_is_rejected() {
        let mut buf = BytesMut::new();
        let result = Value::Text("x".into()).to_sql(&Type::INT4, &mut buf);
        assert!(result.is_err());
    }

    #[test]
    fn text_encodes_as_utf8() {
        let mut buf = BytesMut::new();
        Value::Text("ann".into()).to_sql(&Type::TEXT, &mut buf).unwrap();
        assert_eq!(&buf[..], b"ann");
    }
}
