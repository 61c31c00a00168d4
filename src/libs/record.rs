//! The record capability: how a value exposes its type name, its fields,
//! their column names and their current values.
//!
//! Structs usually get this from `#[derive(Record)]`. [`JsonRecord`] covers
//! records only known at runtime.

use serde_json::Value;

/// Scalar category of a field, used for SQL type mapping and argument binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Integer,
    Real,
    Text,
    /// Anything without a dedicated SQL type, e.g. `bool`.
    Other,
    /// An untyped missing value such as JSON `null`; always bound as NULL.
    Null,
}

/// The current value of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A scalar rendered as text. An empty literal means "absent".
    Scalar { kind: ScalarKind, literal: String },
    /// A struct, map or collection; never accepted as a column.
    Composite,
}

impl FieldValue {
    pub fn scalar(kind: ScalarKind, literal: impl Into<String>) -> Self {
        FieldValue::Scalar {
            kind,
            literal: literal.into(),
        }
    }
}

/// One field of a record, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Name of the field in the source type.
    pub ident: String,
    /// Declared column name; `None` when the field is unannotated.
    pub column: Option<String>,
    pub value: FieldValue,
}

impl Field {
    pub fn annotated(ident: &str, column: &str, value: FieldValue) -> Self {
        Self {
            ident: ident.to_string(),
            column: Some(column.to_string()),
            value,
        }
    }

    pub fn unannotated(ident: &str, value: FieldValue) -> Self {
        Self {
            ident: ident.to_string(),
            column: None,
            value,
        }
    }
}

/// Shape of a value as seen by the introspector.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Struct(Vec<Field>),
    Scalar,
}

/// A value that can enumerate its own columns.
pub trait Record {
    /// Declared type name, e.g. `"Book"`.
    fn type_name(&self) -> &str;

    /// Fields with their column names and current values.
    fn layout(&self) -> Layout;

    /// Fixed table name. When set it is used verbatim instead of the
    /// pluralized type name.
    fn table_override(&self) -> Option<&str> {
        None
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }

    fn layout(&self) -> Layout {
        (**self).layout()
    }

    fn table_override(&self) -> Option<&str> {
        (**self).table_override()
    }
}

/// A scalar that can be stored in a single column.
pub trait ToColumn {
    const KIND: ScalarKind;

    /// Canonical text form. Empty means "absent".
    fn literal(&self) -> String;

    fn to_field_value(&self) -> FieldValue {
        FieldValue::scalar(Self::KIND, self.literal())
    }
}

macro_rules! impl_to_column {
    ($kind:expr => $($t:ty),+) => {
        $(
            impl ToColumn for $t {
                const KIND: ScalarKind = $kind;

                fn literal(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_to_column!(ScalarKind::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_to_column!(ScalarKind::Real => f32, f64);
impl_to_column!(ScalarKind::Text => String, &str, char);
impl_to_column!(ScalarKind::Other => bool);

impl<T: ToColumn> ToColumn for Option<T> {
    const KIND: ScalarKind = T::KIND;

    fn literal(&self) -> String {
        self.as_ref().map(ToColumn::literal).unwrap_or_default()
    }
}

/// A record whose fields come from a JSON object.
///
/// Object keys are the column names, in insertion order.
///
/// ```
/// use flatorm::{extract, Dialect, JsonRecord};
/// use serde_json::json;
///
/// let book = JsonRecord::new("Book", json!({"id": 0, "author": "Ada"}));
/// let table = extract(&book, false, Dialect::Sqlite).unwrap();
/// assert_eq!(table.table_name, "books");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    type_name: String,
    value: Value,
}

impl JsonRecord {
    pub fn new(type_name: impl Into<String>, value: Value) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

fn json_field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::scalar(ScalarKind::Null, ""),
        Value::Bool(b) => FieldValue::scalar(ScalarKind::Other, b.to_string()),
        Value::Number(n) if n.is_f64() => FieldValue::scalar(ScalarKind::Real, n.to_string()),
        Value::Number(n) => FieldValue::scalar(ScalarKind::Integer, n.to_string()),
        Value::String(s) => FieldValue::scalar(ScalarKind::Text, s.clone()),
        Value::Array(_) | Value::Object(_) => FieldValue::Composite,
    }
}

impl Record for JsonRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn layout(&self) -> Layout {
        let Some(map) = self.value.as_object() else {
            return Layout::Scalar;
        };
        let fields = map
            .iter()
            .map(|(key, value)| {
                let value = json_field_value(value);
                if key.is_empty() {
                    Field::unannotated(key, value)
                } else {
                    Field::annotated(key, key, value)
                }
            })
            .collect();
        Layout::Struct(fields)
    }
}
