//! atom-log - leveled structured logging with a process-wide facade
//!
//! This crate provides:
//! - `Logger`, an explicitly constructed handle over a `tracing` dispatcher
//!   that encodes records as JSON or console lines
//! - `provide`, which builds a logger from provider options, installs it as
//!   the process-wide logger and registers it with the DI container
//! - The facade: `debug`..`fatal` in plain, templated (`f`) and structured
//!   (`w`) shapes, plus `sync`
//! - `LevelWriter`, an `io::Write` adapter logging one record per line
//! - `capture`, an in-memory sink for assertions in tests
//!
//! ```
//! use atom_log::{opt, Level};
//!
//! let logger = atom_log::provide([opt::name("doc-example")]).unwrap();
//! assert_eq!(logger.level(), Level::Info);
//!
//! atom_log::infow!("service started", "port" => 8080);
//! atom_log::sync().ok();
//! ```

pub mod capture;
pub mod config;
mod encoder;
pub mod facade;
pub mod logger;
pub mod provide;
pub mod sink;
pub mod writer;

pub use atom_container::opt;
pub use atom_log_errors::{LogError, LogErrorKind, Result};
pub use atom_log_types::{Field, Level, Sensitive, Value};
pub use self::config::{Config, Encoding};
pub use facade::{
    debug, debugf, debugw, dpanic, dpanicf, dpanicw, error, errorf, errorw, fatal, fatalf, fatalw,
    info, infof, infow, panic, panicf, panicw, sync, warn, warnf, warnw,
};
pub use logger::Logger;
pub use provide::{provide, provide_into};
pub use sink::Sink;
pub use writer::LevelWriter;
