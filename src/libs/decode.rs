//! Populating records from result rows by column name.

use serde_json::Value;
use sqlx::any::AnyRow;
use sqlx::{Column, Row};

use crate::libs::error::{Error, Result};

/// One result row, column name to value.
pub type RowMap = serde_json::Map<String, Value>;

/// Converts a database row into a [`RowMap`], probing each column as
/// integer, float, bool and finally text.
pub fn row_to_map(row: &AnyRow) -> RowMap {
    let mut map = RowMap::new();
    for col in row.columns() {
        let col_name = col.name();
        let value = match row.try_get::<Option<i64>, _>(col_name) {
            Ok(Some(v)) => Value::from(v),
            Ok(None) => Value::Null,
            Err(_) => match row.try_get::<Option<f64>, _>(col_name) {
                Ok(Some(v)) => Value::from(v),
                Ok(None) => Value::Null,
                Err(_) => match row.try_get::<Option<bool>, _>(col_name) {
                    Ok(Some(v)) => Value::from(v),
                    Ok(None) => Value::Null,
                    Err(_) => match row.try_get::<Option<String>, _>(col_name) {
                        Ok(Some(v)) => Value::from(v),
                        _ => Value::Null,
                    },
                },
            },
        };
        map.insert(col_name.to_string(), value);
    }
    map
}

/// A field type that can be read back from a single column value.
pub trait FromColumn: Sized {
    fn from_column(value: &Value) -> Option<Self>;
}

/// A record type that can be built from a result row.
///
/// Implemented by `#[derive(Record)]` using the same column names the
/// record was generated with.
pub trait FromColumns: Sized {
    fn from_columns(row: &RowMap) -> Result<Self>;
}

impl FromColumns for RowMap {
    fn from_columns(row: &RowMap) -> Result<Self> {
        Ok(row.clone())
    }
}

/// Reads `column` from `row` as `T`.
pub fn decode_column<T: FromColumn>(row: &RowMap, column: &str) -> Result<T> {
    let value = row
        .get(column)
        .ok_or_else(|| Error::MissingColumn(column.to_string()))?;
    T::from_column(value).ok_or_else(|| Error::Decode {
        column: column.to_string(),
        message: format!(
            "value {} does not fit {}",
            value,
            std::any::type_name::<T>()
        ),
    })
}

macro_rules! impl_from_column_int {
    ($($t:ty),+) => {
        $(
            impl FromColumn for $t {
                fn from_column(value: &Value) -> Option<Self> {
                    match value {
                        Value::Number(n) => n
                            .as_i64()
                            .and_then(|v| <$t>::try_from(v).ok())
                            .or_else(|| n.as_u64().and_then(|v| <$t>::try_from(v).ok())),
                        Value::String(s) => s.trim().parse().ok(),
                        Value::Bool(b) => Some(<$t>::from(*b)),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_from_column_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_from_column_float {
    ($($t:ty),+) => {
        $(
            impl FromColumn for $t {
                fn from_column(value: &Value) -> Option<Self> {
                    match value {
                        Value::Number(n) => n.as_f64().map(|v| v as $t),
                        Value::String(s) => s.trim().parse().ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_from_column_float!(f32, f64);

impl FromColumn for String {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl FromColumn for char {
    fn from_column(value: &Value) -> Option<Self> {
        let s = value.as_str()?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl FromColumn for bool {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            Value::String(s) => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl<T: FromColumn> FromColumn for Option<T> {
    fn from_column(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_column(other).map(Some),
        }
    }
}
