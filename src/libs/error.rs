//! Error types for introspection, decoding and database access.

use thiserror::Error;

/// Why a value could not be turned into a [`TableDescriptor`](crate::TableDescriptor).
///
/// Every variant means the record type breaks the annotation contract, so the
/// calling operation is aborted before any SQL is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectError {
    /// The value is not a structured record.
    #[error("input of type `{type_name}` is not a struct")]
    InvalidInputKind { type_name: String },

    /// A field is itself a struct or collection.
    #[error("field `{field}` of `{type_name}` is not a scalar; only flat structs are accepted")]
    NestedFieldNotSupported { type_name: String, field: String },

    /// A field has no column name.
    #[error("field `{field}` of `{type_name}` has no column annotation, ex: #[column = \"id\"]")]
    MissingColumnAnnotation { type_name: String, field: String },

    /// Two fields map to the same column.
    #[error("column `{column}` is declared more than once on `{type_name}`")]
    DuplicateColumn { type_name: String, column: String },

    /// Schema creation needs a field mapped to `id`.
    #[error("`{type_name}` must have a field mapped to column `id`")]
    MissingIdentityColumn { type_name: String },
}

/// Errors that can occur while running operations against a database.
#[derive(Debug, Error)]
pub enum Error {
    /// The record could not be introspected.
    #[error("introspection error: {0}")]
    Introspect(#[from] IntrospectError),

    /// sqlx driver or pool failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The dialect name or connection URL scheme is not one of sqlite, postgres, mysql.
    #[error("unsupported dialect '{0}'")]
    UnsupportedDialect(String),

    /// A result row has no column the record expects.
    #[error("column '{0}' not found in result row")]
    MissingColumn(String),

    /// A result column could not be converted into the field type.
    #[error("cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
