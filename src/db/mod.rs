mod sqlite;

pub use sqlite::{count_rows, fetch_properties, fetch_tables, open, table_names};

/// Name SQLite gives the implicit row identifier of every rowid table.
pub const ROWID: &str = "rowid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
    /// 1-based position inside the primary key, 0 when not part of it.
    pub pk_position: u32,
}

impl ColumnInfo {
    pub fn is_primary_key(&self) -> bool {
        self.pk_position > 0
    }

    /// Declaration as SQLite reports it, e.g. `TEXT NOT NULL DEFAULT 'x'`.
    pub fn declaration(&self) -> String {
        let mut out = if self.data_type.is_empty() {
            "ANY".to_string()
        } else {
            self.data_type.clone()
        };
        if !self.nullable {
            out.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            out.push_str(" DEFAULT ");
            out.push_str(default);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProperties {
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnInfo>,
}

impl TableProperties {
    /// First column flagged as primary key, in declaration order.
    pub fn primary_key_column(&self) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.is_primary_key())
    }

    /// Lookup key for the table: the declared primary key, or `rowid`.
    pub fn primary_key(&self) -> &str {
        self.primary_key_column()
            .map_or(ROWID, |c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}
