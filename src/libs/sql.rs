//! SQL text and argument generation from [`TableDescriptor`]s.
//!
//! Every builder is pure. An empty [`Statement`] means there is nothing to
//! execute; the reason is logged at `warn`.

use std::fmt;

use crate::libs::dialect::Dialect;
use crate::libs::record::ScalarKind;
use crate::libs::schema::{ColumnDescriptor, TableDescriptor};

/// A bound argument: the column value as text plus the kind to bind it as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub kind: ScalarKind,
    pub text: String,
}

impl Argument {
    fn from_column(column: &ColumnDescriptor) -> Self {
        Self {
            kind: column.kind,
            text: column.literal_value.clone(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Generated SQL plus its arguments in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Argument>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Argument texts, in order.
    pub fn arg_texts(&self) -> Vec<&str> {
        self.args.iter().map(|a| a.text.as_str()).collect()
    }
}

/// Running placeholder counter for one statement.
struct Placeholders {
    dialect: Dialect,
    count: usize,
}

impl Placeholders {
    fn new(dialect: Dialect) -> Self {
        Self { dialect, count: 0 }
    }

    fn next(&mut self) -> String {
        self.count += 1;
        self.dialect.placeholder(self.count)
    }
}

/// A WHERE candidate: non-empty, and not the zero identity.
fn is_filter(column: &ColumnDescriptor) -> bool {
    if column.is_identity() && column.literal_value == "0" {
        return false;
    }
    column.is_present()
}

fn conditions(
    table: &TableDescriptor,
    placeholders: &mut Placeholders,
    args: &mut Vec<Argument>,
) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| is_filter(c))
        .map(|c| {
            args.push(Argument::from_column(c));
            format!("{} = {}", c.name, placeholders.next())
        })
        .collect()
}

// -------- Create table --------
pub fn create_table_sql(table: &TableDescriptor, dialect: Dialect) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} {}", c.name, c.sql_type))
        .collect::<Vec<_>>()
        .join(",\n\t");
    let name = &table.table_name;

    match dialect {
        Dialect::Postgres => format!(
            r#"
DO
$do$
BEGIN
   IF NOT EXISTS (
      SELECT FROM pg_class c
      WHERE c.relkind = 'S'
      AND c.relname = '{name}_id_seq'
   ) THEN
      CREATE SEQUENCE {name}_id_seq;
   END IF;
END
$do$;
CREATE TABLE IF NOT EXISTS {name} (
	{columns}
);
ALTER SEQUENCE {name}_id_seq OWNED BY {name}.id;
"#
        ),
        Dialect::Mysql => format!(
            "\nCREATE TABLE IF NOT EXISTS {name} (\n\t{columns}\n) ENGINE=InnoDB DEFAULT CHARSET=utf8;"
        ),
        Dialect::Sqlite => format!("\nCREATE TABLE IF NOT EXISTS {name} (\n\t{columns}\n);"),
    }
}

// -------- Insert one or more rows --------
/// Multi-row insert. Columns come from the first descriptor, `id` excluded;
/// every descriptor is expected to have the same columns.
pub fn insert_sql(tables: &[TableDescriptor], dialect: Dialect) -> Statement {
    let Some(first) = tables.first() else {
        tracing::warn!("insert without rows, nothing to execute");
        return Statement::default();
    };

    let columns: Vec<&str> = first
        .columns
        .iter()
        .filter(|c| !c.is_identity())
        .map(|c| c.name.as_str())
        .collect();
    if columns.is_empty() {
        tracing::warn!(table = %first.table_name, "insert without columns besides id, nothing to execute");
        return Statement::default();
    }

    let mut placeholders = Placeholders::new(dialect);
    let mut args = Vec::new();
    let mut groups = Vec::with_capacity(tables.len());
    for table in tables {
        let values: Vec<String> = table
            .columns
            .iter()
            .filter(|c| !c.is_identity())
            .map(|c| {
                args.push(Argument::from_column(c));
                placeholders.next()
            })
            .collect();
        groups.push(format!("({})", values.join(", ")));
    }

    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES {};",
            first.table_name,
            columns.join(", "),
            groups.join(", ")
        ),
        args,
    }
}

// -------- Find --------
/// `SELECT *` filtered by equality on every present field. `limit == 0`
/// means unbounded, and `skip` only applies with a limit.
pub fn find_sql(table: &TableDescriptor, limit: u64, skip: u64, dialect: Dialect) -> Statement {
    let mut placeholders = Placeholders::new(dialect);
    let mut args = Vec::new();
    let conds = conditions(table, &mut placeholders, &mut args);

    let mut sql = format!("SELECT * FROM {}", table.table_name);
    if !conds.is_empty() {
        sql.push_str(&format!(" WHERE {}", conds.join(" AND ")));
    }
    if limit > 0 {
        sql.push_str(&format!(" LIMIT {}", limit));
        if skip > 0 {
            sql.push_str(&format!(" OFFSET {}", skip));
        }
    }
    sql.push(';');

    Statement { sql, args }
}

// -------- Update --------
/// SET from `data`'s present non-`id` fields, WHERE from `query`'s filters.
/// Arguments are all SET values followed by all WHERE values.
pub fn update_sql(query: &TableDescriptor, data: &TableDescriptor, dialect: Dialect) -> Statement {
    let mut placeholders = Placeholders::new(dialect);
    let mut args = Vec::new();

    let updates: Vec<String> = data
        .columns
        .iter()
        .filter(|c| !c.is_identity() && c.is_present())
        .map(|c| {
            args.push(Argument::from_column(c));
            format!("{} = {}", c.name, placeholders.next())
        })
        .collect();
    if updates.is_empty() {
        tracing::warn!(table = %data.table_name, "update without values, nothing to execute");
        return Statement::default();
    }

    let conds = conditions(query, &mut placeholders, &mut args);
    if conds.is_empty() {
        tracing::warn!(table = %data.table_name, "update without conditions, nothing to execute");
        return Statement::default();
    }

    Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {};",
            data.table_name,
            updates.join(", "),
            conds.join(" AND ")
        ),
        args,
    }
}

// -------- Delete --------
/// Deletes rows matching `query`'s filters. Without any filter nothing is
/// generated; see [`delete_all_sql`].
pub fn delete_sql(query: &TableDescriptor, dialect: Dialect) -> Statement {
    let mut placeholders = Placeholders::new(dialect);
    let mut args = Vec::new();
    let conds = conditions(query, &mut placeholders, &mut args);
    if conds.is_empty() {
        tracing::warn!(table = %query.table_name, "delete without conditions, nothing to execute");
        return Statement::default();
    }

    Statement {
        sql: format!(
            "DELETE FROM {} WHERE {};",
            query.table_name,
            conds.join(" AND ")
        ),
        args,
    }
}

pub fn delete_all_sql(query: &TableDescriptor) -> Statement {
    Statement::new(format!("DELETE FROM {};", query.table_name))
}
