//! One function per operation: introspect the record(s), generate the
//! statement, hand it to an [`Executor`].

use crate::libs::decode::FromColumns;
use crate::libs::error::Result;
use crate::libs::introspect::extract;
use crate::libs::orm::Executor;
use crate::libs::record::Record;
use crate::libs::sql::{
    Statement, create_table_sql, delete_all_sql, delete_sql, find_sql, insert_sql, update_sql,
};

/// Creates the record's table unless it exists. The record must have an
/// `id` column.
pub async fn create_table<E, R>(exec: &E, record: &R) -> Result<()>
where
    E: Executor + ?Sized,
    R: Record + ?Sized,
{
    let dialect = exec.dialect();
    let table = extract(record, true, dialect)?;
    exec.execute(&Statement::new(create_table_sql(&table, dialect)))
        .await?;
    Ok(())
}

pub async fn insert_one<E, R>(exec: &E, record: &R) -> Result<u64>
where
    E: Executor + ?Sized,
    R: Record + ?Sized,
{
    let dialect = exec.dialect();
    let table = extract(record, false, dialect)?;
    exec.execute(&insert_sql(&[table], dialect)).await
}

/// Inserts all records in one statement. They must share the first
/// record's columns.
pub async fn insert_many<E, R>(exec: &E, records: &[R]) -> Result<u64>
where
    E: Executor + ?Sized,
    R: Record,
{
    let dialect = exec.dialect();
    let tables = records
        .iter()
        .map(|r| extract(r, false, dialect))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    exec.execute(&insert_sql(&tables, dialect)).await
}

/// First row matching the present fields of `query`.
pub async fn find_one<E, R, T>(exec: &E, query: &R) -> Result<Option<T>>
where
    E: Executor + ?Sized,
    R: Record + ?Sized,
    T: FromColumns,
{
    let mut rows = find_many_limit_skip::<E, R, T>(exec, query, 1, 0).await?;
    Ok(if rows.is_empty() {
        None
    } else {
        Some(rows.swap_remove(0))
    })
}

pub async fn find_many<E, R, T>(exec: &E, query: &R) -> Result<Vec<T>>
where
    E: Executor + ?Sized,
    R: Record + ?Sized,
    T: FromColumns,
{
    find_many_limit_skip(exec, query, 0, 0).await
}

/// Rows matching the present fields of `query`. A `limit` of 0 means no
/// limit, in which case `skip` is ignored.
pub async fn find_many_limit_skip<E, R, T>(
    exec: &E,
    query: &R,
    limit: u64,
    skip: u64,
) -> Result<Vec<T>>
where
    E: Executor + ?Sized,
    R: Record + ?Sized,
    T: FromColumns,
{
    let dialect = exec.dialect();
    let table = extract(query, false, dialect)?;
    let rows = exec
        .fetch_all(&find_sql(&table, limit, skip, dialect))
        .await?;
    rows.iter().map(T::from_columns).collect()
}

/// Sets the present non-`id` fields of `data` on every row matching `query`.
pub async fn update_many<E, Q, D>(exec: &E, query: &Q, data: &D) -> Result<u64>
where
    E: Executor + ?Sized,
    Q: Record + ?Sized,
    D: Record + ?Sized,
{
    let dialect = exec.dialect();
    let query = extract(query, false, dialect)?;
    let data = extract(data, false, dialect)?;
    exec.execute(&update_sql(&query, &data, dialect)).await
}

pub async fn delete_many<E, R>(exec: &E, query: &R) -> Result<u64>
where
    E: Executor + ?Sized,
    R: Record + ?Sized,
{
    let dialect = exec.dialect();
    let table = extract(query, false, dialect)?;
    exec.execute(&delete_sql(&table, dialect)).await
}

/// Deletes every row of the record's table.
pub async fn delete_all_rows<E, R>(exec: &E, query: &R) -> Result<u64>
where
    E: Executor + ?Sized,
    R: Record + ?Sized,
{
    let table = extract(query, false, exec.dialect())?;
    exec.execute(&delete_all_sql(&table)).await
}
