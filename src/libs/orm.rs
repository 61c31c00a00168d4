use async_trait::async_trait;
use sqlx::any::{AnyArguments, AnyPoolOptions};
use sqlx::query::Query;
use sqlx::{Any, AnyPool};

use crate::libs::config::OrmConfig;
use crate::libs::crud;
use crate::libs::decode::{FromColumns, RowMap, row_to_map};
use crate::libs::dialect::Dialect;
use crate::libs::error::Result;
use crate::libs::record::{Record, ScalarKind};
use crate::libs::sql::{Argument, Statement};

/// Something that can run generated statements.
///
/// [`Orm`] is the sqlx implementation; the [`crud`] operations only depend
/// on this trait.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Dialect statements must be generated for.
    fn dialect(&self) -> Dialect;

    /// Runs a statement and returns the number of affected rows. An empty
    /// statement is not sent and affects nothing.
    async fn execute(&self, statement: &Statement) -> Result<u64>;

    /// Runs a query and returns its rows.
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<RowMap>>;
}

/// A connection pool plus the dialect its statements are written in.
#[derive(Debug, Clone)]
pub struct Orm {
    pool: AnyPool,
    dialect: Dialect,
}

impl Orm {
    pub async fn connect(config: OrmConfig) -> Result<Self> {
        let dialect = config.resolve_dialect()?;
        tracing::info!(%dialect, max_connections = config.max_connections, "connecting");

        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self { pool, dialect })
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: AnyPool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    // -------- Execute raw SQL --------
    pub async fn raw(&self, sql: &str) -> Result<u64> {
        self.execute(&Statement::new(sql)).await
    }

    // -------- Create table --------
    pub async fn create_table<R: Record + ?Sized>(&self, record: &R) -> Result<()> {
        crud::create_table(self, record).await
    }

    // -------- Insert records --------
    pub async fn insert_one<R: Record + ?Sized>(&self, record: &R) -> Result<u64> {
        crud::insert_one(self, record).await
    }

    pub async fn insert_many<R: Record>(&self, records: &[R]) -> Result<u64> {
        crud::insert_many(self, records).await
    }

    // -------- Find records --------
    pub async fn find_one<R, T>(&self, query: &R) -> Result<Option<T>>
    where
        R: Record + ?Sized,
        T: FromColumns,
    {
        crud::find_one(self, query).await
    }

    pub async fn find_many<R, T>(&self, query: &R) -> Result<Vec<T>>
    where
        R: Record + ?Sized,
        T: FromColumns,
    {
        crud::find_many(self, query).await
    }

    pub async fn find_many_limit_skip<R, T>(&self, query: &R, limit: u64, skip: u64) -> Result<Vec<T>>
    where
        R: Record + ?Sized,
        T: FromColumns,
    {
        crud::find_many_limit_skip(self, query, limit, skip).await
    }

    // -------- Update records --------
    pub async fn update_many<Q, D>(&self, query: &Q, data: &D) -> Result<u64>
    where
        Q: Record + ?Sized,
        D: Record + ?Sized,
    {
        crud::update_many(self, query, data).await
    }

    // -------- Delete records --------
    pub async fn delete_many<R: Record + ?Sized>(&self, query: &R) -> Result<u64> {
        crud::delete_many(self, query).await
    }

    pub async fn delete_all_rows<R: Record + ?Sized>(&self, query: &R) -> Result<u64> {
        crud::delete_all_rows(self, query).await
    }
}

/// Concrete value an [`Argument`] is bound as.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Int(Option<i64>),
    Double(Option<f64>),
    /// Postgres `REAL` is float4; a float8 parameter would never compare equal.
    Float(Option<f32>),
    Text(Option<String>),
}

/// Picks the bind type for an argument. An empty number and JSON `null`
/// bind as NULL; a number that does not parse falls back to text.
fn bind_value(arg: &Argument, dialect: Dialect) -> BindValue {
    let text = &arg.text;
    match arg.kind {
        ScalarKind::Integer if text.is_empty() => BindValue::Int(None),
        ScalarKind::Integer => match text.parse::<i64>() {
            Ok(v) => BindValue::Int(Some(v)),
            Err(_) => BindValue::Text(Some(text.clone())),
        },
        ScalarKind::Real if dialect == Dialect::Postgres => {
            if text.is_empty() {
                return BindValue::Float(None);
            }
            match text.parse::<f32>() {
                Ok(v) => BindValue::Float(Some(v)),
                Err(_) => BindValue::Text(Some(text.clone())),
            }
        }
        ScalarKind::Real if text.is_empty() => BindValue::Double(None),
        ScalarKind::Real => match text.parse::<f64>() {
            Ok(v) => BindValue::Double(Some(v)),
            Err(_) => BindValue::Text(Some(text.clone())),
        },
        ScalarKind::Null => BindValue::Text(None),
        ScalarKind::Text | ScalarKind::Other => BindValue::Text(Some(text.clone())),
    }
}

fn bind_args<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    args: &[Argument],
    dialect: Dialect,
) -> Query<'q, Any, AnyArguments<'q>> {
    for arg in args {
        query = match bind_value(arg, dialect) {
            BindValue::Int(v) => query.bind(v),
            BindValue::Double(v) => query.bind(v),
            BindValue::Float(v) => query.bind(v),
            BindValue::Text(v) => query.bind(v),
        };
    }
    query
}

#[async_trait]
impl Executor for Orm {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&self, statement: &Statement) -> Result<u64> {
        if statement.is_empty() {
            tracing::debug!("empty statement, nothing to execute");
            return Ok(0);
        }
        tracing::debug!(sql = %statement.sql, args = statement.args.len(), "execute");

        // Argument-free statements may hold several commands (postgres DDL).
        let result = if statement.args.is_empty() {
            sqlx::raw_sql(&statement.sql).execute(&self.pool).await?
        } else {
            bind_args(sqlx::query(&statement.sql), &statement.args, self.dialect)
                .execute(&self.pool)
                .await?
        };
        Ok(result.rows_affected())
    }

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<RowMap>> {
        if statement.is_empty() {
            tracing::debug!("empty statement, nothing to fetch");
            return Ok(Vec::new());
        }
        tracing::debug!(sql = %statement.sql, args = statement.args.len(), "fetch");

        let rows = bind_args(sqlx::query(&statement.sql), &statement.args, self.dialect)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_map).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(kind: ScalarKind, text: &str) -> Argument {
        Argument {
            kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn real_binds_as_float4_on_postgres() {
        assert_eq!(
            bind_value(&arg(ScalarKind::Real, "0.1"), Dialect::Postgres),
            BindValue::Float(Some(0.1f32))
        );
        assert_eq!(
            bind_value(&arg(ScalarKind::Real, ""), Dialect::Postgres),
            BindValue::Float(None)
        );
    }

    #[test]
    fn real_binds_as_double_elsewhere() {
        for dialect in [Dialect::Sqlite, Dialect::Mysql] {
            assert_eq!(
                bind_value(&arg(ScalarKind::Real, "0.1"), dialect),
                BindValue::Double(Some(0.1f64))
            );
        }
    }

    #[test]
    fn numbers_parse_or_fall_back_to_text() {
        assert_eq!(
            bind_value(&arg(ScalarKind::Integer, "42"), Dialect::Postgres),
            BindValue::Int(Some(42))
        );
        assert_eq!(
            bind_value(&arg(ScalarKind::Integer, ""), Dialect::Sqlite),
            BindValue::Int(None)
        );
        assert_eq!(
            bind_value(&arg(ScalarKind::Integer, "99999999999999999999"), Dialect::Sqlite),
            BindValue::Text(Some("99999999999999999999".into()))
        );
    }

    #[test]
    fn null_binds_as_null_and_empty_text_as_empty_string() {
        assert_eq!(
            bind_value(&arg(ScalarKind::Null, ""), Dialect::Sqlite),
            BindValue::Text(None)
        );
        assert_eq!(
            bind_value(&arg(ScalarKind::Text, ""), Dialect::Sqlite),
            BindValue::Text(Some(String::new()))
        );
        assert_eq!(
            bind_value(&arg(ScalarKind::Other, "true"), Dialect::Mysql),
            BindValue::Text(Some("true".into()))
        );
    }
}
