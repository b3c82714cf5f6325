use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use tracing::info;

/// Offset added to schema versions before they are written to `PRAGMA user_version`,
/// so that a database created by this crate is never mistaken for a blank one.
pub const BASE_DB_VERSION: usize = 70000;

pub const DEFAULT_TIMESTAMP: &str = "(cast(strftime('%s','now') as int))";

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            #[allow(unused_mut)]
            let mut column = $crate::sqlite_persistence::Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                default_value: None,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
    /// Child rows follow their parent on delete.
    pub cascade: bool,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub default_value: Option<&'static str>,
    pub foreign_key: Option<&'static ForeignKey>,
}

impl Column {
    fn definition(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type.as_sql());
        if self.is_primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.non_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default_value) = self.default_value {
            sql.push_str(&format!(" DEFAULT {}", default_value));
        }
        if let Some(fk) = self.foreign_key {
            sql.push_str(&format!(
                " REFERENCES {}({}) ON DELETE {}",
                fk.foreign_table,
                fk.foreign_column,
                if fk.cascade { "CASCADE" } else { "NO ACTION" }
            ));
        }
        sql
    }
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// `(index name, comma separated columns)`
    pub indices: &'static [(&'static str, &'static str)],
    pub unique_constraints: &'static [&'static [&'static str]],
}

impl Table {
    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(Column::definition).collect();
        for constraint in self.unique_constraints {
            parts.push(format!("UNIQUE ({})", constraint.join(", ")));
        }
        format!("CREATE TABLE {} ({});", self.name, parts.join(", "))
    }

    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute(&self.create_sql(), params![])
            .with_context(|| format!("Failed to create table {}", self.name))?;
        for (index_name, columns) in self.indices {
            conn.execute(
                &format!("CREATE INDEX {} ON {}({});", index_name, self.name, columns),
                params![],
            )?;
        }
        Ok(())
    }

    /// Checks that the live table has the declared columns, in order, with matching types.
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", self.name))?;
        let actual: Vec<(String, String)> = stmt
            .query_map(params![], |row| Ok((row.get(1)?, row.get(2)?)))?
            .collect::<Result<_, _>>()?;

        if actual.len() != self.columns.len() {
            bail!(
                "Table {} has {} columns, expected {}",
                self.name,
                actual.len(),
                self.columns.len()
            );
        }
        for ((name, sql_type), expected) in actual.iter().zip(self.columns) {
            if name != expected.name || sql_type != expected.sql_type.as_sql() {
                bail!(
                    "Table {} column mismatch: expected {} {}, got {} {}",
                    self.name,
                    expected.name,
                    expected.sql_type.as_sql(),
                    name,
                    sql_type
                );
            }
        }
        for (index_name, _) in self.indices {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1 AND tbl_name=?2",
                    params![index_name, self.name],
                    |_| Ok(()),
                )
                .is_ok();
            if !exists {
                bail!("Table {} is missing index '{}'", self.name, index_name);
            }
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
    pub migration: Option<fn(&Connection) -> Result<()>>,
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.create(conn)?;
        }
        conn.pragma_update(None, "user_version", BASE_DB_VERSION + self.version)?;
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.validate(conn)?;
        }
        Ok(())
    }
}

/// Brings `conn` to the latest schema in `schemas`: creates it on an empty database,
/// runs pending migrations otherwise.
pub fn migrate_if_needed(
    conn: &mut Connection,
    schemas: &[VersionedSchema],
    db_name: &str,
) -> Result<()> {
    let latest = schemas
        .last()
        .context("At least one schema version is required")?;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;
    if table_count == 0 {
        info!("Creating {} db schema at version {}", db_name, latest.version);
        let tx = conn.transaction()?;
        latest.create(&tx)?;
        tx.commit()?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "{} database has unknown version {}, refusing to open it",
            db_name,
            db_version
        );
    }
    let mut current = (db_version - BASE_DB_VERSION as i64) as usize;
    if current >= latest.version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    let start = current;
    for schema in schemas.iter().filter(move |s| s.version > start) {
        if let Some(migration) = schema.migration {
            info!(
                "Migrating {} db from version {} to {}",
                db_name, current, schema.version
            );
            migration(&tx)?;
        }
        current = schema.version;
    }
    tx.pragma_update(None, "user_version", BASE_DB_VERSION + current)?;
    tx.commit()?;
    Ok(())
}
