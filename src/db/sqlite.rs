use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use crate::db::{ColumnInfo, TableProperties};
use crate::ident;
use crate::Result;

const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Open (creating if absent) the store at `path`.
pub fn open(path: &Path) -> Result<Connection> {
    debug!(path = %path.display(), "sqlite: opening");
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// User tables, engine-internal `sqlite_*` tables excluded.
pub fn fetch_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut tables = Vec::new();
    for r in rows {
        tables.push(r?);
    }
    Ok(tables)
}

/// Every table listed in `sqlite_master`, engine tables included.
pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

pub fn fetch_properties(conn: &Connection, table: &str) -> Result<TableProperties> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid",
    )?;
    let rows = stmt.query_map([table], |row| {
        Ok(ColumnInfo {
            name: row.get(0)?,
            data_type: row.get(1)?,
            nullable: row.get::<_, i64>(2)? == 0,
            default: row.get(3)?,
            pk_position: row.get(4)?,
        })
    })?;

    let mut columns = Vec::new();
    for c in rows {
        columns.push(c?);
    }
    Ok(TableProperties {
        name: table.to_string(),
        columns,
    })
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", ident::quote(table));
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}
