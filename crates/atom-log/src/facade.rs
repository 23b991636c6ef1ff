//! Process-wide logging functions
//!
//! Every function here forwards to the process-wide logger installed by
//! `provide` (or `set_default`). Until one is installed, calls go to a
//! fallback logger that writes console records at `info` to stderr.
//!
//! The templated and structured shapes also have macro forms:
//!
//! ```
//! atom_log::infof!("listening on port {}", 8080);
//! atom_log::warnw!("slow request", "path" => "/health", "ms" => 1250);
//! ```

use crate::{Field, Logger, Result};
use std::fmt::{self, Display};
use std::sync::{OnceLock, PoisonError, RwLock};

static DEFAULT: RwLock<Option<Logger>> = RwLock::new(None);
static FALLBACK: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide logger, returning the previous one
pub fn set_default(logger: Logger) -> Option<Logger> {
    DEFAULT
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(logger)
}

/// Whether a process-wide logger has been installed
pub fn is_initialized() -> bool {
    DEFAULT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// The process-wide logger, or the fallback when none is installed
pub fn default_logger() -> Logger {
    let installed = DEFAULT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    installed.unwrap_or_else(|| FALLBACK.get_or_init(Logger::fallback).clone())
}

macro_rules! leveled_functions {
    ($($plain:ident, $templated:ident, $structured:ident;)*) => {
        $(
            #[doc = concat!("Log the concatenated arguments at `", stringify!($plain), "` level.")]
            pub fn $plain(args: &[&dyn Display]) {
                default_logger().$plain(args);
            }

            #[doc = concat!("Log a formatted message at `", stringify!($plain), "` level.")]
            pub fn $templated(args: fmt::Arguments<'_>) {
                default_logger().$templated(args);
            }

            #[doc = concat!("Log a message with structured fields at `", stringify!($plain), "` level.")]
            pub fn $structured(msg: &str, fields: &[Field]) {
                default_logger().$structured(msg, fields);
            }
        )*
    };
}

leveled_functions! {
    debug, debugf, debugw;
    info, infof, infow;
    warn, warnf, warnw;
    error, errorf, errorw;
}

/// Log the concatenated arguments at `dpanic` level. In development mode
/// the logger then panics.
pub fn dpanic(args: &[&dyn Display]) {
    default_logger().dpanic(args);
}

/// Log a formatted message at `dpanic` level. In development mode the
/// logger then panics.
pub fn dpanicf(args: fmt::Arguments<'_>) {
    default_logger().dpanicf(args);
}

/// Log a message with structured fields at `dpanic` level. In development
/// mode the logger then panics.
pub fn dpanicw(msg: &str, fields: &[Field]) {
    default_logger().dpanicw(msg, fields);
}

/// Log the concatenated arguments at `panic` level, then panic.
pub fn panic(args: &[&dyn Display]) -> ! {
    default_logger().panic(args)
}

/// Log a formatted message at `panic` level, then panic.
pub fn panicf(args: fmt::Arguments<'_>) -> ! {
    default_logger().panicf(args)
}

/// Log a message with structured fields at `panic` level, then panic.
pub fn panicw(msg: &str, fields: &[Field]) -> ! {
    default_logger().panicw(msg, fields)
}

/// Log the concatenated arguments at `fatal` level, then exit with status 1.
pub fn fatal(args: &[&dyn Display]) -> ! {
    default_logger().fatal(args)
}

/// Log a formatted message at `fatal` level, then exit with status 1.
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    default_logger().fatalf(args)
}

/// Log a message with structured fields at `fatal` level, then exit with
/// status 1.
pub fn fatalw(msg: &str, fields: &[Field]) -> ! {
    default_logger().fatalw(msg, fields)
}

/// Flush any buffered records of the process-wide logger.
pub fn sync() -> Result<()> {
    default_logger().sync()
}

#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::facade::debugf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::facade::infof(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::facade::warnf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::facade::errorf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! dpanicf {
    ($($arg:tt)+) => {
        $crate::facade::dpanicf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! panicf {
    ($($arg:tt)+) => {
        $crate::facade::panicf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::facade::fatalf(::std::format_args!($($arg)+))
    };
}

/// `debugw!(msg, key => value, ...)`
#[macro_export]
macro_rules! debugw {
    ($msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::facade::debugw($msg, &[$($crate::Field::new($key, $value)),*])
    };
}

/// `infow!(msg, key => value, ...)`
#[macro_export]
macro_rules! infow {
    ($msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::facade::infow($msg, &[$($crate::Field::new($key, $value)),*])
    };
}

/// `warnw!(msg, key => value, ...)`
#[macro_export]
macro_rules! warnw {
    ($msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::facade::warnw($msg, &[$($crate::Field::new($key, $value)),*])
    };
}

/// `errorw!(msg, key => value, ...)`
#[macro_export]
macro_rules! errorw {
    ($msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::facade::errorw($msg, &[$($crate::Field::new($key, $value)),*])
    };
}

/// `dpanicw!(msg, key => value, ...)`
#[macro_export]
macro_rules! dpanicw {
    ($msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::facade::dpanicw($msg, &[$($crate::Field::new($key, $value)),*])
    };
}

/// `panicw!(msg, key => value, ...)`
#[macro_export]
macro_rules! panicw {
    ($msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::facade::panicw($msg, &[$($crate::Field::new($key, $value)),*])
    };
}

/// `fatalw!(msg, key => value, ...)`
#[macro_export]
macro_rules! fatalw {
    ($msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::facade::fatalw($msg, &[$($crate::Field::new($key, $value)),*])
    };
}
