#![allow(clippy::unwrap_used, clippy::expect_used)]

use atom_log::capture;
use atom_log::{Config, Level, LogErrorKind};

// The global tracing dispatcher can be set once per process, so this binary
// holds a single test.
#[test]
fn test_install_global_routes_third_party_events() {
    let (logger, capture) = capture::logger(&Config::default()).unwrap();

    logger.install_global().unwrap();
    tracing::warn!(target: "hyper::proto", retries = 2, "connection reset");

    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Some(Level::Warn));
    assert_eq!(records[0].target.as_deref(), Some("hyper::proto"));
    assert_eq!(records[0].field("retries").as_deref(), Some("2"));

    let (other, _) = capture::logger(&Config::default()).unwrap();
    let err = other.install_global().unwrap_err();
    assert_eq!(err.kind(), LogErrorKind::Install);
}
