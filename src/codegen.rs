//! Model generator.
//!
//! Reads the table list and `PRAGMA table_info` of an existing store, turns
//! each table into a [`TableSchema`], renders it into a Rust module with
//! `quote!`, formats it with `prettyplease`, and writes `<table>.rs` into the
//! output directory. Every generated type wraps [`TableModel`](crate::model::TableModel).

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::db::{self, ColumnInfo};
use crate::ident;
use crate::{Error, Result};

/// Path generated code uses to reach this crate.
const RUNTIME_CRATE: &str = "nird_schema";

/// Typed description of one table, the only input of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub primary_key: String,
}

impl TableSchema {
    /// Introspect `table`. Names outside the identifier grammar are rejected.
    pub fn load(conn: &Connection, table: &str) -> Result<Self> {
        ident::validate(table)?;
        let props = db::fetch_properties(conn, table)?;
        for column in &props.columns {
            ident::validate(&column.name)?;
        }
        Ok(Self {
            name: table.to_string(),
            primary_key: props.primary_key().to_string(),
            columns: props.columns,
        })
    }

    pub fn type_name(&self) -> String {
        format!("{}Model", ident::capitalize(&self.name))
    }

    pub fn file_name(&self) -> String {
        format!("{}.rs", self.name)
    }
}

/// Render the model module for `table`.
///
/// `database` is the connection target the generated `open()` uses.
pub fn render(table: &TableSchema, database: &Path) -> Result<String> {
    let tokens = model_tokens(table, database)?;
    let file = syn::parse2::<syn::File>(tokens).map_err(|source| Error::Render {
        table: table.name.clone(),
        source,
    })?;

    Ok(format!(
        "// @generated by nird-models from table `{}`. Do not edit.\n\n{}",
        table.name,
        prettyplease::unparse(&file)
    ))
}

fn model_tokens(table: &TableSchema, database: &Path) -> Result<TokenStream> {
    ident::validate(&table.name)?;
    ident::validate(&table.primary_key)?;

    let runtime = format_ident!("{}", RUNTIME_CRATE);
    let model = format_ident!("{}", table.type_name());
    let table_name = table.name.as_str();
    let primary_key = table.primary_key.as_str();
    let database = database.to_string_lossy().into_owned();
    let columns = table
        .columns
        .iter()
        .map(|c| ident::validate(&c.name))
        .collect::<Result<Vec<_>>>()?;
    let doc = format!(" Data access for the `{table_name}` table, keyed on `{primary_key}`.");
    let column_docs = table
        .columns
        .iter()
        .map(|c| format!(" - `{}`: {}", c.name, c.declaration()))
        .collect::<Vec<_>>();

    Ok(quote! {
        #![allow(non_snake_case)]

        use ::#runtime::model::{Row, TableModel};
        use ::#runtime::Result;
        use ::rusqlite::ToSql;

        pub const DEFAULT_DATABASE: &str = #database;

        #[doc = #doc]
        #[doc = ""]
        #[doc = " Columns:"]
        #[doc = ""]
        #(#[doc = #column_docs])*
        #[allow(non_camel_case_types)]
        pub struct #model {
            inner: TableModel,
        }

        impl #model {
            pub const TABLE_NAME: &'static str = #table_name;
            pub const PRIMARY_KEY: &'static str = #primary_key;
            pub const COLUMNS: &'static [&'static str] = &[#(#columns),*];

            pub fn open() -> Result<Self> {
                Self::open_at(DEFAULT_DATABASE)
            }

            pub fn open_at(path: impl AsRef<::std::path::Path>) -> Result<Self> {
                let inner = TableModel::open(path, Self::TABLE_NAME, Self::PRIMARY_KEY)?;
                Ok(Self { inner })
            }

            pub fn count(&self) -> Result<i64> {
                self.inner.count()
            }

            pub fn find_all(&self, limit: u32, offset: u32) -> Result<Vec<Row>> {
                self.inner.find_all(limit, offset)
            }

            pub fn find_by_id(&self, id: &dyn ToSql) -> Result<Option<Row>> {
                self.inner.find_by_id(id)
            }

            pub fn search(&self, query: &str, limit: u32) -> Result<Vec<Row>> {
                self.inner.search(query, limit)
            }

            pub fn create(&self, data: &Row) -> Result<i64> {
                self.inner.create(data)
            }

            pub fn update(&self, id: &dyn ToSql, data: &Row) -> Result<usize> {
                self.inner.update(id, data)
            }

            pub fn delete(&self, id: &dyn ToSql) -> Result<usize> {
                self.inner.delete(id)
            }

            pub fn close(&mut self) -> Result<()> {
                self.inner.close()
            }
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModel {
    pub table: String,
    pub type_name: String,
    pub primary_key: String,
    pub columns: usize,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Generated(Vec<GeneratedModel>),
    /// The source store does not exist; nothing was written.
    MissingDatabase(PathBuf),
    /// The store holds no user tables; nothing was written.
    NoTables,
}

pub struct ModelGenerator {
    database: PathBuf,
    output_dir: PathBuf,
    connection_target: PathBuf,
}

impl ModelGenerator {
    pub fn new(database: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let database = database.into();
        Self {
            connection_target: database.clone(),
            database,
            output_dir: output_dir.into(),
        }
    }

    /// Database path baked into the generated models.
    pub fn with_connection_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.connection_target = target.into();
        self
    }

    pub fn run(&self) -> Result<GenerateOutcome> {
        if !self.database.exists() {
            warn!(path = %self.database.display(), "database not found");
            return Ok(GenerateOutcome::MissingDatabase(self.database.clone()));
        }

        info!(path = %self.database.display(), "analysing database");
        let conn = db::open(&self.database)?;
        let tables = db::fetch_tables(&conn)?;
        info!(count = tables.len(), "tables found");
        if tables.is_empty() {
            warn!("no tables found in database");
            return Ok(GenerateOutcome::NoTables);
        }

        let schemas = tables
            .iter()
            .map(|t| TableSchema::load(&conn, t))
            .collect::<Result<Vec<_>>>()?;
        drop(conn);

        fs::create_dir_all(&self.output_dir)?;
        let mut generated = Vec::with_capacity(schemas.len());
        for schema in &schemas {
            generated.push(self.write(schema)?);
        }
        info!(dir = %self.output_dir.display(), count = generated.len(), "models generated");
        Ok(GenerateOutcome::Generated(generated))
    }

    fn write(&self, schema: &TableSchema) -> Result<GeneratedModel> {
        debug!(
            table = %schema.name,
            columns = schema.columns.len(),
            primary_key = %schema.primary_key,
            "rendering model"
        );
        let code = render(schema, &self.connection_target)?;
        let path = self.output_dir.join(schema.file_name());
        fs::write(&path, &code)?;

        Ok(GeneratedModel {
            table: schema.name.clone(),
            type_name: schema.type_name(),
            primary_key: schema.primary_key.clone(),
            columns: schema.columns.len(),
            path,
            bytes: code.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::SchemaInitializer;
    use crate::schema::DECLARED_TABLES;

    fn schema(name: &str, primary_key: &str) -> TableSchema {
        TableSchema {
            name: name.to_string(),
            columns: vec![ColumnInfo {
                name: "nom".to_string(),
                data_type: "TEXT".to_string(),
                nullable: false,
                default: None,
                pk_position: 0,
            }],
            primary_key: primary_key.to_string(),
        }
    }

    fn compact(code: &str) -> String {
        code.split_whitespace().collect()
    }

    #[test]
    fn type_name_capitalizes_first_letter() {
        assert_eq!(schema("Pilote", "rowid").type_name(), "PiloteModel");
        assert_eq!(schema("demarche_nird", "rowid").type_name(), "Demarche_nirdModel");
        assert_eq!(schema("Pilote", "rowid").file_name(), "Pilote.rs");
    }

    #[test]
    fn rendered_model_parses_and_exposes_every_operation() {
        let code = render(&schema("Tag", "tag_id"), Path::new("/srv/nird/database.db")).unwrap();
        syn::parse_file(&code).unwrap();

        let flat = compact(&code);
        assert!(flat.contains("pubstructTagModel"));
        assert!(flat.contains("pubconstTABLE_NAME:&'staticstr=\"Tag\""));
        assert!(flat.contains("pubconstPRIMARY_KEY:&'staticstr=\"tag_id\""));
        assert!(flat.contains("pubconstDEFAULT_DATABASE:&str=\"/srv/nird/database.db\""));
        assert!(flat.contains("&[\"nom\"]"));
        assert!(code.contains("/// - `nom`: TEXT NOT NULL\n"));
        assert!(code.contains("\n    pub fn count(&self) -> Result<i64> {\n"));
        for op in [
            "fncount",
            "fnfind_all",
            "fnfind_by_id",
            "fnsearch",
            "fncreate",
            "fnupdate",
            "fndelete",
            "fnclose",
        ] {
            assert!(flat.contains(op), "missing {op}");
        }
    }

    #[test]
    fn render_rejects_unsafe_names() {
        let err = render(&schema("Tag\"; DROP", "tag_id"), Path::new("db")).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
        let err = render(&schema("Tag", "id--"), Path::new("db")).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[test]
    fn load_resolves_declared_key_or_rowid() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Favori (favorite_id INTEGER PRIMARY KEY AUTOINCREMENT, user_id INTEGER);
             CREATE TABLE journal (message TEXT);",
        )
        .unwrap();

        let favori = TableSchema::load(&conn, "Favori").unwrap();
        assert_eq!(favori.primary_key, "favorite_id");
        assert_eq!(favori.columns.len(), 2);
        let journal = TableSchema::load(&conn, "journal").unwrap();
        assert_eq!(journal.primary_key, "rowid");

        let flat = compact(&render(&journal, Path::new("db")).unwrap());
        assert!(flat.contains("PRIMARY_KEY:&'staticstr=\"rowid\""));
    }

    #[test]
    fn load_rejects_unsafe_column_names() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (\"bad name\" TEXT)").unwrap();
        assert!(matches!(
            TableSchema::load(&conn, "t"),
            Err(Error::InvalidIdentifier(n)) if n == "bad name"
        ));
    }

    #[test]
    fn generates_one_file_per_table() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("database.db");
        SchemaInitializer::new(&database).run().unwrap();
        let out = dir.path().join("models");

        let outcome = ModelGenerator::new(&database, &out)
            .with_connection_target("/srv/nird/database.db")
            .run()
            .unwrap();
        let models = match outcome {
            GenerateOutcome::Generated(models) => models,
            other => panic!("expected generated models, got {other:?}"),
        };
        assert_eq!(models.len(), DECLARED_TABLES.len());

        let mut files: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        let mut expected: Vec<_> = DECLARED_TABLES.iter().map(|t| format!("{t}.rs")).collect();
        expected.sort();
        assert_eq!(files, expected);

        let key_of = |table: &str| {
            models
                .iter()
                .find(|m| m.table == table)
                .map(|m| m.primary_key.as_str())
        };
        assert_eq!(key_of("Utilisateur"), Some("user_id"));
        assert_eq!(key_of("LogicielTag"), Some("software_id"));
        assert_eq!(key_of("Pilote"), Some("rowid"));

        let pilote = fs::read_to_string(out.join("Pilote.rs")).unwrap();
        syn::parse_file(&pilote).unwrap();
        assert!(compact(&pilote).contains("pubstructPiloteModel"));
        assert!(pilote.contains("/srv/nird/database.db"));
    }

    #[test]
    fn missing_database_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("models");
        let outcome = ModelGenerator::new(dir.path().join("absent.db"), &out)
            .run()
            .unwrap();
        assert!(matches!(outcome, GenerateOutcome::MissingDatabase(_)));
        assert!(!out.exists());
        assert!(!dir.path().join("absent.db").exists());
    }

    #[test]
    fn empty_database_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("empty.db");
        Connection::open(&database)
            .unwrap()
            .execute_batch("PRAGMA user_version = 1")
            .unwrap();
        let out = dir.path().join("models");

        let outcome = ModelGenerator::new(&database, &out).run().unwrap();
        assert_eq!(outcome, GenerateOutcome::NoTables);
        assert!(!out.exists());
    }
}
