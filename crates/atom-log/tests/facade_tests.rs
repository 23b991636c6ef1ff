#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use atom_log::capture;
use atom_log::{facade, Config, Encoding, Field, Level, Logger};
use common::{config, file_config, read_records};
use serial_test::serial;
use std::panic::{self, AssertUnwindSafe};
use tempfile::TempDir;

fn install_capture(cfg: &Config) -> capture::Capture {
    let (logger, capture) = capture::logger(cfg).unwrap();
    facade::set_default(logger);
    capture
}

#[test]
#[serial]
fn test_infow_macro_records_key_value() {
    let capture = install_capture(&Config::default());

    atom_log::infow!("msg", "key" => "value");

    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "msg");
    assert_eq!(records[0].field("key").as_deref(), Some("value"));
}

#[test]
#[serial]
fn test_debugf_macro_formats() {
    let capture = install_capture(&config(Level::Debug, Encoding::Json, false));

    atom_log::debugf!("count={}", 5);

    capture.assert_record_exists(Level::Debug, "count=5");
}

#[test]
#[serial]
fn test_every_shape_delegates_at_its_level() {
    let capture = install_capture(&config(Level::Debug, Encoding::Json, false));

    atom_log::debug(&[&"d"]);
    atom_log::info(&[&"i", &1]);
    atom_log::warnf(format_args!("w{}", 2));
    atom_log::errorw("e", &[Field::new("n", 3)]);
    atom_log::dpanicw("dp", &[]);

    let levels: Vec<_> = capture
        .records()
        .into_iter()
        .map(|r| (r.level.unwrap(), r.message))
        .collect();
    assert_eq!(
        levels,
        vec![
            (Level::Debug, "d".to_string()),
            (Level::Info, "i1".to_string()),
            (Level::Warn, "w2".to_string()),
            (Level::Error, "e".to_string()),
            (Level::DPanic, "dp".to_string()),
        ]
    );
}

#[test]
#[serial]
fn test_structured_macros_accept_trailing_comma() {
    let capture = install_capture(&Config::default());

    atom_log::warnw!("quota", "used" => 91.5, "hard" => false,);
    atom_log::errorw!("no fields");

    let records = capture.records();
    assert_eq!(records[0].field("used").as_deref(), Some("91.5"));
    assert_eq!(records[0].field("hard").as_deref(), Some("false"));
    assert!(records[1].fields.is_empty());
}

#[test]
#[serial]
fn test_panicw_macro_panics_after_emission() {
    let capture = install_capture(&Config::default());

    let result = panic::catch_unwind(|| {
        atom_log::panicw!("corrupt index", "segment" => 12);
    });

    assert!(result.is_err());
    capture.assert_record_exists(Level::Panic, "corrupt index");
    assert_eq!(capture.records()[0].field("segment").as_deref(), Some("12"));
}

#[test]
#[serial]
fn test_positional_panic_carries_concatenated_message() {
    let capture = install_capture(&Config::default());

    let result = panic::catch_unwind(|| {
        atom_log::panic(&[&"shard ", &3, &" unreachable"]);
    });

    let payload = result.unwrap_err();
    assert_eq!(
        payload.downcast_ref::<String>().map(String::as_str),
        Some("shard 3 unreachable")
    );
    capture.assert_record_exists(Level::Panic, "shard 3 unreachable");
}

#[test]
#[serial]
fn test_panicf_panics_after_emission() {
    let capture = install_capture(&Config::default());

    let result = panic::catch_unwind(|| {
        atom_log::panicf!("queue depth {} over limit", 512);
    });

    assert!(result.is_err());
    capture.assert_record_exists(Level::Panic, "queue depth 512 over limit");
}

#[test]
#[serial]
fn test_dpanicf_in_development_panics() {
    let capture = install_capture(&config(Level::Debug, Encoding::Json, true));

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        atom_log::dpanicf!("stale cache entry {}", "k1");
    }));

    assert!(result.is_err());
    capture.assert_record_exists(Level::DPanic, "stale cache entry k1");
}

#[test]
#[serial]
fn test_set_default_returns_previous() {
    let (first, _) = capture::logger(&Config::default()).unwrap();
    let (second, _) = capture::logger(&config(Level::Error, Encoding::Json, false)).unwrap();

    facade::set_default(first);
    let previous = facade::set_default(second).unwrap();

    assert_eq!(previous.level(), Level::Info);
    assert_eq!(facade::default_logger().level(), Level::Error);
    assert!(facade::is_initialized());
}

#[test]
#[serial]
fn test_sync_flushes_file_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("facade.log");
    facade::set_default(Logger::new(&file_config(&path)).unwrap());

    for i in 0..10 {
        atom_log::infof!("line {}", i);
    }
    atom_log::sync().unwrap();

    assert_eq!(read_records(&path).len(), 10);
}

#[test]
#[serial]
fn test_concurrent_facade_calls_do_not_interleave() {
    let capture = install_capture(&Config::default());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            std::thread::spawn(move || {
                for i in 0..25 {
                    atom_log::infow!("tick", "thread" => t, "i" => i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(capture.lines().len(), 200);
    assert_eq!(capture.records().len(), 200);
}
