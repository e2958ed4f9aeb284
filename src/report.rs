//! Console tables for the two tools.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::codegen::GeneratedModel;
use crate::init::InitReport;

#[derive(Tabled)]
struct CountRow<'a> {
    #[tabled(rename = "table")]
    name: &'a str,
    rows: i64,
}

#[derive(Tabled)]
struct PilotRow<'a> {
    #[tabled(rename = "type")]
    kind: &'a str,
    pilots: i64,
}

#[derive(Tabled)]
struct ModelRow<'a> {
    table: &'a str,
    model: &'a str,
    #[tabled(rename = "primary key")]
    primary_key: &'a str,
    columns: usize,
    file: String,
}

pub fn init_summary(report: &InitReport) -> String {
    let counts = report.tables.iter().map(|t| CountRow {
        name: &t.table,
        rows: t.rows,
    });
    let pilots = report.pilots_by_type.iter().map(|(kind, pilots)| PilotRow {
        kind,
        pilots: *pilots,
    });

    format!(
        "Tables created: {}\n{}\n\nPilot sites\n{}\nGeolocated: {}\n\nDatabase ready: {} ({:.2} KB)",
        report.tables.len(),
        Table::new(counts).with(Style::sharp()),
        Table::new(pilots).with(Style::sharp()),
        report.geolocated_pilots,
        report.path.display(),
        report.size_bytes as f64 / 1024.0,
    )
}

pub fn models_summary(models: &[GeneratedModel]) -> String {
    let rows = models.iter().map(|m| ModelRow {
        table: &m.table,
        model: &m.type_name,
        primary_key: &m.primary_key,
        columns: m.columns,
        file: format!("{} ({} bytes)", m.path.display(), m.bytes),
    });
    format!(
        "{} model(s) generated\n{}",
        models.len(),
        Table::new(rows).with(Style::sharp())
    )
}
