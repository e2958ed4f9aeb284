//! Generic per-table data access.
//!
//! Generated models are thin typed shells around [`TableModel`]; the SQL lives
//! here once instead of in every generated file.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Params, Statement, ToSql};
use tracing::debug;

use crate::db::{self, ROWID};
use crate::ident;
use crate::{Error, Result};

/// One row, keyed by column name.
pub type Row = BTreeMap<String, Value>;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Columns matched by [`TableModel::search`].
pub const SEARCH_COLUMNS: [&str; 2] = ["nom", "description"];

pub struct TableModel {
    conn: Option<Connection>,
    table: String,
    primary_key: String,
}

impl TableModel {
    pub fn open(path: impl AsRef<Path>, table: &str, primary_key: &str) -> Result<Self> {
        let conn = db::open(path.as_ref())?;
        Self::new(conn, table, primary_key)
    }

    pub fn new(conn: Connection, table: &str, primary_key: &str) -> Result<Self> {
        ident::validate(table)?;
        ident::validate(primary_key)?;
        debug!(table, primary_key, "model connected");
        Ok(Self {
            conn: Some(conn),
            table: table.to_string(),
            primary_key: primary_key.to_string(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    pub fn count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table_ref());
        Ok(self.conn()?.query_row(&sql, [], |row| row.get(0))?)
    }

    /// One page of rows in the table's natural order.
    pub fn find_all(&self, limit: u32, offset: u32) -> Result<Vec<Row>> {
        let sql = format!("SELECT * FROM {} LIMIT ?1 OFFSET ?2", self.table_ref());
        let mut stmt = self.conn()?.prepare(&sql)?;
        read_rows(&mut stmt, [i64::from(limit), i64::from(offset)])
    }

    pub fn find_by_id(&self, id: &dyn ToSql) -> Result<Option<Row>> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1",
            self.table_ref(),
            self.key_ref()
        );
        let mut stmt = self.conn()?.prepare(&sql)?;
        let names = column_names(&stmt);
        Ok(stmt
            .query_row([id], |row| to_row(&names, row))
            .optional()?)
    }

    /// Case-insensitive substring match on `nom` or `description`.
    pub fn search(&self, query: &str, limit: u32) -> Result<Vec<Row>> {
        let filter = SEARCH_COLUMNS
            .iter()
            .map(|c| format!("{c} LIKE ?1 ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!("SELECT * FROM {} WHERE {filter} LIMIT ?2", self.table_ref());
        let pattern = format!("%{}%", escape_like(query));
        let mut stmt = self.conn()?.prepare(&sql)?;
        read_rows(&mut stmt, rusqlite::params![pattern, i64::from(limit)])
    }

    /// Insert `data` and return the new row id.
    pub fn create(&self, data: &Row) -> Result<i64> {
        let conn = self.conn()?;
        if data.is_empty() {
            let sql = format!("INSERT INTO {} DEFAULT VALUES", self.table_ref());
            conn.execute(&sql, [])?;
            return Ok(conn.last_insert_rowid());
        }

        let columns = data
            .keys()
            .map(|k| ident::validate(k).map(ident::quote))
            .collect::<Result<Vec<_>>>()?;
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table_ref(),
            columns.join(", "),
            placeholders.join(", ")
        );
        let values: Vec<&dyn ToSql> = data.values().map(|v| v as &dyn ToSql).collect();
        conn.execute(&sql, values.as_slice())?;
        Ok(conn.last_insert_rowid())
    }

    /// Update the row whose `rowid` is `id`; returns the number of changed
    /// rows. Empty `data` changes nothing.
    ///
    /// Writes address `rowid` so a composite key, whose first column repeats
    /// across rows, still hits exactly one row.
    pub fn update(&self, id: &dyn ToSql, data: &Row) -> Result<usize> {
        let conn = self.conn()?;
        if data.is_empty() {
            return Ok(0);
        }

        let assignments = data
            .keys()
            .enumerate()
            .map(|(i, k)| ident::validate(k).map(|k| format!("{} = ?{}", ident::quote(k), i + 1)))
            .collect::<Result<Vec<_>>>()?;
        let sql = format!(
            "UPDATE {} SET {} WHERE {ROWID} = ?{}",
            self.table_ref(),
            assignments.join(", "),
            data.len() + 1
        );
        let mut values: Vec<&dyn ToSql> = data.values().map(|v| v as &dyn ToSql).collect();
        values.push(id);
        Ok(conn.execute(&sql, values.as_slice())?)
    }

    /// Delete the row whose `rowid` is `id`.
    pub fn delete(&self, id: &dyn ToSql) -> Result<usize> {
        let sql = format!("DELETE FROM {} WHERE {ROWID} = ?1", self.table_ref());
        Ok(self.conn()?.execute(&sql, [id])?)
    }

    /// Release the connection. Closing twice is harmless.
    pub fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => {
                debug!(table = %self.table, "model closed");
                conn.close().map_err(|(_, e)| Error::from(e))
            }
            None => Ok(()),
        }
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::Closed)
    }

    fn table_ref(&self) -> String {
        ident::quote(&self.table)
    }

    // A quoted "rowid" that names no real column would read as a string literal.
    fn key_ref(&self) -> String {
        if self.primary_key.eq_ignore_ascii_case(ROWID) {
            self.primary_key.clone()
        } else {
            ident::quote(&self.primary_key)
        }
    }
}

fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn to_row(names: &[String], row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let mut out = Row::new();
    for (i, name) in names.iter().enumerate() {
        out.insert(name.clone(), row.get::<_, Value>(i)?);
    }
    Ok(out)
}

fn read_rows(stmt: &mut Statement<'_>, params: impl Params) -> Result<Vec<Row>> {
    let names = column_names(stmt);
    let rows = stmt.query_map(params, |row| to_row(&names, row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

fn escape_like(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
