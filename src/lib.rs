//! Bootstrap the NIRD catalog database and generate per-table models from it.
//!
//! Two batch tools share one SQLite file: `nird-init` creates and seeds the
//! schema ([`init::SchemaInitializer`]); `nird-models` introspects it and
//! writes one Rust model per table ([`codegen::ModelGenerator`]) on top of
//! [`model::TableModel`].

pub mod codegen;
pub mod config;
pub mod db;
pub mod error;
pub mod ident;
pub mod init;
pub mod logger;
pub mod model;
pub mod report;
pub mod schema;

pub use error::{Error, Result};
