//! End-to-end runs of `nird-init` and `nird-models`.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;

// Point the config lookup at an empty home so a user's own config.yaml
// never leaks into a run.
fn isolated(mut cmd: Command, root: &Path) -> Command {
    let home = root.join("home");
    cmd.env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .arg("--root")
        .arg(root)
        .args(["--log-level", "warn"]);
    cmd
}

fn nird_init(root: &Path) -> Command {
    isolated(cargo_bin_cmd!("nird-init"), root)
}

fn nird_models(root: &Path) -> Command {
    isolated(cargo_bin_cmd!("nird-models"), root)
}

fn init_with_marker(root: &Path) -> std::path::PathBuf {
    nird_init(root).assert().success();
    let path = database(root);
    Connection::open(&path)
        .unwrap()
        .execute("INSERT INTO Tag (nom) VALUES ('marker')", [])
        .unwrap();
    assert_eq!(count(&path, "Tag"), 8);
    path
}

fn database(root: &Path) -> std::path::PathBuf {
    root.join("serveur").join("database.db")
}

fn count(path: &Path, table: &str) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn init_creates_and_seeds_database() {
    let dir = tempfile::tempdir().unwrap();

    nird_init(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tables created: 13"))
        .stdout(predicate::str::contains("Geolocated: 18"));

    let path = database(dir.path());
    assert!(path.exists());
    assert_eq!(count(&path, "Pilote"), 18);
    let with_coords: i64 = Connection::open(&path)
        .unwrap()
        .query_row(
            "SELECT COUNT(*) FROM Pilote WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(with_coords, 18);
}

#[test]
fn declining_overwrite_changes_nothing() {
    for answer in ["n\n", "\n", "yes\n", ""] {
        let dir = tempfile::tempdir().unwrap();
        let path = init_with_marker(dir.path());

        nird_init(dir.path())
            .write_stdin(answer)
            .assert()
            .success()
            .stdout(predicate::str::contains("Overwrite? (y/N)"))
            .stdout(predicate::str::contains("cancelled"));

        assert_eq!(count(&path, "Tag"), 8, "answer {answer:?}");
        assert_eq!(count(&path, "Pilote"), 18);
    }
}

#[test]
fn confirming_overwrite_recreates_database() {
    for answer in ["y\n", "Y\n"] {
        let dir = tempfile::tempdir().unwrap();
        let path = init_with_marker(dir.path());

        nird_init(dir.path())
            .write_stdin(answer)
            .assert()
            .success()
            .stdout(predicate::str::contains("Tables created: 13"))
            .stdout(predicate::str::contains("cancelled").not());

        assert_eq!(count(&path, "Tag"), 7, "answer {answer:?}");
    }
}

#[test]
fn yes_flag_recreates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = init_with_marker(dir.path());

    nird_init(dir.path()).arg("--yes").assert().success();
    assert_eq!(count(&path, "Tag"), 7);
}

#[test]
fn config_is_looked_up_in_the_app_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("home").join(".config").join("nird-schema");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.yaml"), "database: elsewhere/other.db\n").unwrap();

    nird_init(dir.path()).assert().success();
    assert!(dir.path().join("elsewhere").join("other.db").exists());
    assert!(!database(dir.path()).exists());
}

#[test]
fn models_generated_for_every_table() {
    let dir = tempfile::tempdir().unwrap();
    nird_init(dir.path()).assert().success();

    nird_models(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("12 model(s) generated"))
        .stdout(predicate::str::contains("PiloteModel"));

    let models = dir.path().join("src").join("models");
    let files = fs::read_dir(&models).unwrap().count();
    assert_eq!(files, 12);

    let avis = fs::read_to_string(models.join("Avis.rs")).unwrap();
    assert!(avis.contains("AvisModel"));
    assert!(avis.contains("\"review_id\""));
}

#[test]
fn models_accepts_database_argument() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("custom.db");
    Connection::open(&db)
        .unwrap()
        .execute_batch("CREATE TABLE Tag (tag_id INTEGER PRIMARY KEY, nom TEXT)")
        .unwrap();

    nird_models(dir.path()).arg(&db).assert().success();
    assert!(dir.path().join("src").join("models").join("Tag.rs").exists());
}

#[test]
fn models_on_missing_database_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();

    nird_models(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Database not found"));
    assert!(!dir.path().join("src").exists());
}

#[test]
fn models_on_empty_database_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("empty.db");
    Connection::open(&db)
        .unwrap()
        .execute_batch("PRAGMA user_version = 3")
        .unwrap();

    nird_models(dir.path())
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("No tables found"));
    assert!(!dir.path().join("src").exists());
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    nird_init(dir.path())
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
    assert!(!database(dir.path()).exists());
}
