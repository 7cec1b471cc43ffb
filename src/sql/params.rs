//! Convert JSON scalar values to types that sqlx can bind on MySQL.

use crate::error::StorageError;
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::mysql::{MySql, MySqlTypeInfo};
use sqlx::Database;

/// A record value in driver-bindable form. Only the JSON scalar subset is
/// representable; arrays and objects are refused before any statement runs.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
}

impl BindValue {
    pub fn from_json(value: &Value) -> Result<Self, StorageError> {
        Ok(match value {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::I64(i)
                } else if let Some(u) = n.as_u64() {
                    BindValue::U64(u)
                } else {
                    BindValue::F64(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => BindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => {
                return Err(StorageError::validation(
                    "record values must be null, boolean, number, or string",
                ))
            }
        })
    }
}

impl<'q> Encode<'q, MySql> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <MySql as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            BindValue::Null => <Option<i64> as Encode<MySql>>::encode_by_ref(&None, buf)?,
            BindValue::Bool(b) => <bool as Encode<MySql>>::encode_by_ref(b, buf)?,
            BindValue::I64(n) => <i64 as Encode<MySql>>::encode_by_ref(n, buf)?,
            BindValue::U64(n) => <u64 as Encode<MySql>>::encode_by_ref(n, buf)?,
            BindValue::F64(n) => <f64 as Encode<MySql>>::encode_by_ref(n, buf)?,
            BindValue::String(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<MySql>>::encode_by_ref(&s_ref, buf)?
            }
        })
    }

    /// The binary protocol tags every parameter with a type, so report the
    /// variant's own type instead of the blanket one from `Type`.
    fn produces(&self) -> Option<MySqlTypeInfo> {
        Some(match self {
            BindValue::Null => <str as sqlx::Type<MySql>>::type_info(),
            BindValue::Bool(_) => <bool as sqlx::Type<MySql>>::type_info(),
            BindValue::I64(_) => <i64 as sqlx::Type<MySql>>::type_info(),
            BindValue::U64(_) => <u64 as sqlx::Type<MySql>>::type_info(),
            BindValue::F64(_) => <f64 as sqlx::Type<MySql>>::type_info(),
            BindValue::String(_) => <str as sqlx::Type<MySql>>::type_info(),
        })
    }
}

impl sqlx::Type<MySql> for BindValue {
    fn type_info() -> MySqlTypeInfo {
        <str as sqlx::Type<MySql>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_scalars() {
        assert_eq!(BindValue::from_json(&Value::Null).ok(), Some(BindValue::Null));
        assert_eq!(
            BindValue::from_json(&json!(true)).ok(),
            Some(BindValue::Bool(true))
        );
        assert_eq!(
            BindValue::from_json(&json!(-7)).ok(),
            Some(BindValue::I64(-7))
        );
        assert_eq!(
            BindValue::from_json(&json!(u64::MAX)).ok(),
            Some(BindValue::U64(u64::MAX))
        );
        assert_eq!(
            BindValue::from_json(&json!(1.5)).ok(),
            Some(BindValue::F64(1.5))
        );
        assert_eq!(
            BindValue::from_json(&json!("x")).ok(),
            Some(BindValue::String("x".into()))
        );
    }

    #[test]
    fn rejects_arrays_and_objects() {
        for bad in [json!([1, 2]), json!({"nested": 1})] {
            let err = BindValue::from_json(&bad).unwrap_err();
            assert_eq!(err.code(), 400);
        }
    }
}
