#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use atom_log::{facade, opt, Level, LogErrorKind, Logger};
use atom_container::Container;
use common::read_records;
use config::{File, FileFormat};
use serial_test::serial;
use std::path::Path;
use tempfile::TempDir;

fn toml_source(text: &str) -> config::Config {
    config::Config::builder()
        .add_source(File::from_str(text, FileFormat::Toml))
        .build()
        .unwrap()
}

fn log_section(path: &Path, level: &str) -> config::Config {
    toml_source(&format!(
        r#"
[log]
level = "{}"
encoding = "json"
output_paths = ["{}"]

[log.initial_fields]
service = "api"
"#,
        level,
        path.display()
    ))
}

#[test]
#[serial]
fn test_provide_reads_prefixed_section() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");

    let logger = atom_log::provide([
        opt::source(log_section(&path, "debug")),
        opt::prefix("log"),
        opt::name("provide-prefixed"),
    ])
    .unwrap();

    assert_eq!(logger.level(), Level::Debug);
    assert!(facade::is_initialized());

    atom_log::debugw!("booted", "workers" => 4);
    atom_log::sync().unwrap();

    let records = read_records(&path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "booted");
    assert_eq!(records[0]["service"], "api");
    assert_eq!(records[0]["workers"], 4);
}

#[test]
#[serial]
fn test_missing_section_uses_defaults() {
    let logger = atom_log::provide([
        opt::source(toml_source("[http]\nport = 8080\n")),
        opt::prefix("log"),
        opt::name("provide-defaults"),
    ])
    .unwrap();

    assert_eq!(logger.level(), Level::Info);
    assert!(!logger.is_development());
}

#[test]
#[serial]
fn test_invalid_config_leaves_logger_unchanged() {
    let dir = TempDir::new().unwrap();
    let kept = dir.path().join("kept.log");
    atom_log::provide([
        opt::source(log_section(&kept, "info")),
        opt::prefix("log"),
        opt::name("provide-kept"),
    ])
    .unwrap();

    let rejected = dir.path().join("rejected.log");
    let err = atom_log::provide([
        opt::source(log_section(&rejected, "chatty")),
        opt::prefix("log"),
        opt::name("provide-rejected"),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), LogErrorKind::Config);

    atom_log::infow!("still here");
    atom_log::sync().unwrap();

    assert_eq!(read_records(&kept).len(), 1);
    assert!(!rejected.exists());
    assert!(atom_container::global()
        .resolve_named::<Logger>("provide-rejected")
        .is_err());
}

#[test]
#[serial]
fn test_unknown_encoding_is_construction_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    let source = toml_source(&format!(
        "[log]\nencoding = \"xml\"\noutput_paths = [\"{}\"]\n",
        path.display()
    ));

    let err = atom_log::provide([opt::source(source), opt::prefix("log")]).unwrap_err();

    assert_eq!(err.code(), "ERR_LOGGER_CONSTRUCTION");
    assert!(!path.exists());
}

#[test]
#[serial]
fn test_unresolved_registration_yields_latest_logger() {
    let first = Container::new();
    let second = Container::new();
    let warn = toml_source("[log]\nlevel = \"warn\"\n");
    let debug = toml_source("[log]\nlevel = \"debug\"\n");

    atom_log::provide_into(&first, [opt::source(warn), opt::prefix("log")]).unwrap();
    atom_log::provide_into(&second, [opt::source(debug), opt::prefix("log")]).unwrap();

    let resolved: Logger = first.resolve().unwrap();
    assert_eq!(resolved.level(), Level::Debug);
    assert_eq!(facade::default_logger().level(), Level::Debug);
}

#[test]
#[serial]
fn test_unopenable_output_is_construction_error() {
    let dir = TempDir::new().unwrap();
    let kept = dir.path().join("kept.log");
    atom_log::provide([
        opt::source(log_section(&kept, "info")),
        opt::prefix("log"),
        opt::name("construction-kept"),
    ])
    .unwrap();

    let unreachable = dir.path().join("no-such-dir").join("app.log");
    let err = atom_log::provide([
        opt::source(log_section(&unreachable, "info")),
        opt::prefix("log"),
        opt::name("construction-rejected"),
    ])
    .unwrap_err();
    assert_eq!(err.kind(), LogErrorKind::LoggerConstruction);

    atom_log::warnf!("after {} failure", "construction");
    atom_log::sync().unwrap();
    assert_eq!(read_records(&kept)[0]["msg"], "after construction failure");
}

#[test]
#[serial]
fn test_duplicate_registration_is_registration_error() {
    let container = Container::new();
    atom_log::provide_into(&container, []).unwrap();

    let err = atom_log::provide_into(&container, []).unwrap_err();

    assert_eq!(err.kind(), LogErrorKind::Registration);
}

#[test]
#[serial]
fn test_name_and_group_together_is_registration_error() {
    let container = Container::new();

    let err = atom_log::provide_into(&container, [opt::name("a"), opt::group("b")]).unwrap_err();

    assert_eq!(err.code(), "ERR_REGISTRATION");
}

#[test]
#[serial]
fn test_container_resolves_provided_logger() {
    let container = Container::new();
    let source = toml_source("[log]\nlevel = \"warn\"\nencoding = \"console\"\n");

    atom_log::provide_into(&container, [opt::source(source), opt::prefix("log")]).unwrap();

    let resolved: Logger = container.resolve().unwrap();
    assert_eq!(resolved.level(), Level::Warn);
    assert!(resolved.enabled(Level::Error));
}

#[test]
#[serial]
fn test_group_registration_collects_loggers() {
    let container = Container::new();

    atom_log::provide_into(&container, [opt::group("sinks")]).unwrap();
    atom_log::provide_into(&container, [opt::group("sinks")]).unwrap();

    let loggers: Vec<Logger> = container.resolve_group("sinks").unwrap();
    assert_eq!(loggers.len(), 2);
}

#[test]
#[serial]
fn test_repeated_provide_replaces_facade_logger() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    atom_log::provide([
        opt::source(log_section(&first, "info")),
        opt::prefix("log"),
        opt::name("repeat-first"),
    ])
    .unwrap();
    atom_log::provide([
        opt::source(log_section(&second, "info")),
        opt::prefix("log"),
        opt::name("repeat-second"),
    ])
    .unwrap();

    atom_log::infow!("routed");
    atom_log::sync().unwrap();

    assert!(read_records(&first).is_empty());
    assert_eq!(read_records(&second).len(), 1);
}
