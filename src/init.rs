//! Schema initializer: create the tables, seed them, report what is there.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, ErrorKind, IsTerminal};
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db;
use crate::schema::{PILOT_TABLE, SCHEMA_SQL, SEED_SQL};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub table: String,
    pub rows: i64,
}

/// State of the store once initialization committed.
#[derive(Debug, Clone, PartialEq)]
pub struct InitReport {
    pub path: PathBuf,
    /// Every table in `sqlite_master`, ordered by name.
    pub tables: Vec<TableCount>,
    /// Pilot sites grouped by establishment type.
    pub pilots_by_type: Vec<(String, i64)>,
    /// Pilot sites with both latitude and longitude set.
    pub geolocated_pilots: i64,
    pub size_bytes: u64,
}

impl InitReport {
    pub fn rows(&self, table: &str) -> Option<i64> {
        self.tables.iter().find(|t| t.table == table).map(|t| t.rows)
    }
}

pub struct SchemaInitializer {
    path: PathBuf,
}

impl SchemaInitializer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create missing tables and seed them. Safe to run on a populated store.
    pub fn run(&self) -> Result<InitReport> {
        let parent = parent_dir(&self.path);
        create_parent(&parent)?;
        ensure_writable(&parent)?;

        info!(path = %self.path.display(), "connecting");
        let mut conn = db::open(&self.path)?;
        let result = populate(&mut conn);

        // Close regardless of how population went.
        let closed = conn.close().map_err(|(_, e)| Error::from(e));
        let (tables, pilots_by_type, geolocated_pilots) = match (result, closed) {
            (Ok(stats), Ok(())) => stats,
            (Ok(_), Err(e)) => return Err(e),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(close_err)) => {
                warn!(error = %close_err, "failed to close database after error");
                return Err(e);
            }
        };
        info!("database closed");

        let size_bytes = fs::metadata(&self.path)?.len();
        Ok(InitReport {
            path: self.path.clone(),
            tables,
            pilots_by_type,
            geolocated_pilots,
            size_bytes,
        })
    }
}

type Stats = (Vec<TableCount>, Vec<(String, i64)>, i64);

fn populate(conn: &mut Connection) -> Result<Stats> {
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    debug!(journal_mode = %mode, "journal mode set");

    info!("creating schema");
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.commit()?;

    info!("inserting seed data");
    let tx = conn.transaction()?;
    tx.execute_batch(SEED_SQL)?;
    tx.commit()?;

    let mut tables = Vec::new();
    for table in db::table_names(conn)? {
        let rows = db::count_rows(conn, &table)?;
        tables.push(TableCount { table, rows });
    }
    info!(tables = tables.len(), "schema verified");

    Ok((tables, pilots_by_type(conn)?, geolocated_pilots(conn)?))
}

fn pilots_by_type(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let sql = format!(
        "SELECT COALESCE(type, ''), COUNT(*) FROM {PILOT_TABLE} GROUP BY type ORDER BY type"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

fn geolocated_pilots(conn: &Connection) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {PILOT_TABLE} WHERE latitude IS NOT NULL AND longitude IS NOT NULL"
    );
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn create_parent(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(Error::PermissionDenied(dir.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

// Test-write a throwaway file.
fn ensure_writable(dir: &Path) -> Result<()> {
    let scratch = dir.join(format!(".nird-write-check-{}", std::process::id()));
    match OpenOptions::new().write(true).create_new(true).open(&scratch) {
        Ok(_) => {
            let _ = fs::remove_file(&scratch);
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(Error::PermissionDenied(dir.to_path_buf()))
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// `y` or `Y` confirms; anything else, including nothing, declines.
pub fn overwrite_confirmed(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}

/// Ask whether `path` may be deleted. A terminal gets a dialoguer prompt;
/// piped stdin is read as one line.
pub fn prompt_overwrite(path: &Path) -> bool {
    let question = format!("{} already exists. Overwrite? (y/N)", path.display());
    if io::stdin().is_terminal() {
        let answer = dialoguer::Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text();
        return match answer {
            Ok(answer) => overwrite_confirmed(&answer),
            Err(e) => {
                debug!(error = %e, "no interactive answer");
                false
            }
        };
    }

    println!("{question}");
    read_answer(io::stdin().lock())
}

/// One line from `input`; end of input or a read error declines.
fn read_answer(mut input: impl BufRead) -> bool {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) => overwrite_confirmed(&line),
        Err(e) => {
            debug!(error = %e, "failed to read answer");
            false
        }
    }
}

/// Delete the store file and its WAL companions.
pub fn remove_database(path: &Path) -> Result<()> {
    fs::remove_file(path)?;
    for suffix in ["-wal", "-shm"] {
        let mut companion = path.as_os_str().to_owned();
        companion.push(suffix);
        match fs::remove_file(PathBuf::from(companion)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    info!(path = %path.display(), "previous database removed");
    Ok(())
}
