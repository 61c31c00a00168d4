//! Turns a [`Record`] into a [`TableDescriptor`].

use std::collections::HashSet;

use crate::libs::dialect::Dialect;
use crate::libs::error::IntrospectError;
use crate::libs::record::{FieldValue, Layout, Record};
use crate::libs::schema::{ColumnDescriptor, IDENTITY_COLUMN, TableDescriptor, table_name_for};

/// Reads the table name and columns of `record`.
///
/// With `resolve_types` every column also gets its SQL type, and the `id`
/// column gets the dialect's auto-increment primary key clause; a record
/// without an `id` column is then rejected. Without it, no types are
/// filled in and `id` is optional.
///
/// The first violation aborts the whole call.
pub fn extract<R: Record + ?Sized>(
    record: &R,
    resolve_types: bool,
    dialect: Dialect,
) -> Result<TableDescriptor, IntrospectError> {
    let type_name = record.type_name();
    let Layout::Struct(fields) = record.layout() else {
        return Err(IntrospectError::InvalidInputKind {
            type_name: type_name.to_string(),
        });
    };

    let table_name = match record.table_override() {
        Some(name) => name.to_string(),
        None => table_name_for(type_name),
    };

    let mut seen = HashSet::with_capacity(fields.len());
    let mut columns = Vec::with_capacity(fields.len());
    let mut identity_found = false;

    for field in fields {
        let FieldValue::Scalar { kind, literal } = field.value else {
            return Err(IntrospectError::NestedFieldNotSupported {
                type_name: type_name.to_string(),
                field: field.ident,
            });
        };
        let name = match field.column {
            Some(column) if !column.is_empty() => column,
            _ => {
                return Err(IntrospectError::MissingColumnAnnotation {
                    type_name: type_name.to_string(),
                    field: field.ident,
                });
            }
        };
        if !seen.insert(name.clone()) {
            return Err(IntrospectError::DuplicateColumn {
                type_name: type_name.to_string(),
                column: name,
            });
        }

        let mut sql_type = String::new();
        if resolve_types {
            if name == IDENTITY_COLUMN {
                sql_type.push_str(dialect.auto_increment());
                identity_found = true;
            } else {
                sql_type.push_str(kind.sql_type());
            }
        }

        columns.push(ColumnDescriptor {
            name,
            sql_type,
            literal_value: literal,
            kind,
        });
    }

    if resolve_types && !identity_found {
        return Err(IntrospectError::MissingIdentityColumn {
            type_name: type_name.to_string(),
        });
    }

    Ok(TableDescriptor {
        table_name,
        columns,
    })
}
