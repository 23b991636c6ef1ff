//! The logger handle
//!
//! A `Logger` owns one engine instance: a tracing `Dispatch` built from a
//! registry, a filter and the record-encoding layer. Cloning is cheap and
//! every clone writes through the same engine and sinks.
//!
//! Each level has three call shapes:
//!
//! - `info(&[&a, &b])` concatenates the `Display` form of its arguments
//! - `infof(format_args!(..))` formats a template
//! - `infow(msg, &[Field::new(k, v)])` attaches structured fields
//!
//! `dpanic*` panics after emission in development mode, `panic*` always
//! panics after emission and `fatal*` exits the process with status 1.

use crate::config::{Config, Encoding};
use crate::encoder::RecordLayer;
use crate::sink::{self, Sink};
use crate::writer::LevelWriter;
use crate::{LogError, Result};
use atom_log_types::field::fields_to_json;
use atom_log_types::schema::LOGGER_TARGET;
use atom_log_types::{Field, Level};
use serde_json::Value as JsonValue;
use std::fmt::{self, Display, Write as _};
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;

struct Inner {
    dispatch: Dispatch,
    level: Level,
    development: bool,
    encoding: Encoding,
    outputs: Vec<Sink>,
}

/// Shared handle to a configured logging engine
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
    context: Arc<[Field]>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.inner.level)
            .field("development", &self.inner.development)
            .field("encoding", &self.inner.encoding)
            .field("outputs", &self.inner.outputs)
            .field("context", &self.context)
            .finish()
    }
}

// Emits one event at a fixed engine level on the logger's dispatcher.
macro_rules! emit_event {
    ($tracing_level:expr, $severity:expr, $structured:expr, $message:expr) => {
        tracing::event!(
            target: LOGGER_TARGET,
            $tracing_level,
            log.severity = $severity,
            log.fields = $structured,
            "{}",
            $message
        )
    };
}

// Generates the three call shapes for a level whose emission returns.
macro_rules! leveled_methods {
    ($($level:expr => $plain:ident, $templated:ident, $structured:ident;)*) => {
        $(
            #[doc = concat!("Log the concatenated arguments at `", stringify!($plain), "` level.")]
            pub fn $plain(&self, args: &[&dyn Display]) {
                self.log($level, &sprint(args), &[]);
            }

            #[doc = concat!("Log a formatted message at `", stringify!($plain), "` level.")]
            pub fn $templated(&self, args: fmt::Arguments<'_>) {
                if self.enabled($level) || $level >= Level::DPanic {
                    self.log($level, &args.to_string(), &[]);
                }
            }

            #[doc = concat!("Log a message with structured fields at `", stringify!($plain), "` level.")]
            pub fn $structured(&self, msg: &str, fields: &[Field]) {
                self.log($level, msg, fields);
            }
        )*
    };
}

impl Logger {
    /// Build a logger from configuration, opening every output path
    pub fn new(config: &Config) -> Result<Self> {
        // Reject an unknown encoder before any output file is created
        config.resolve_encoding()?;
        let outputs = sink::open_all(&config.output_paths).map_err(|e| {
            LogError::construction(format!(
                "cannot open output paths {:?}: {}",
                config.output_paths, e
            ))
        })?;
        let error_outputs = sink::open_all(&config.error_output_paths).map_err(|e| {
            LogError::construction(format!(
                "cannot open error output paths {:?}: {}",
                config.error_output_paths, e
            ))
        })?;
        Self::with_sinks(config, outputs, error_outputs)
    }

    /// Build a logger writing to caller-supplied sinks
    ///
    /// `config.output_paths` and `config.error_output_paths` are ignored.
    pub fn with_sinks(
        config: &Config,
        outputs: Vec<Sink>,
        error_outputs: Vec<Sink>,
    ) -> Result<Self> {
        if outputs.is_empty() {
            return Err(LogError::construction("no output sinks configured"));
        }
        let encoding = config.resolve_encoding()?;
        let filter = config.build_filter()?;
        Ok(Self::assemble(config, encoding, filter, outputs, error_outputs))
    }

    /// Logger used by the facade before any logger is installed: console
    /// records to stderr at `info`
    pub(crate) fn fallback() -> Self {
        let config = Config::production();
        let filter = EnvFilter::default().add_directive(LevelFilter::INFO.into());
        Self::assemble(
            &config,
            Encoding::Console,
            filter,
            vec![Sink::stderr()],
            vec![Sink::stderr()],
        )
    }

    fn assemble(
        config: &Config,
        encoding: Encoding,
        filter: EnvFilter,
        outputs: Vec<Sink>,
        error_outputs: Vec<Sink>,
    ) -> Self {
        let layer = RecordLayer::new(
            encoding,
            &config.initial_fields,
            outputs.clone(),
            error_outputs,
        );
        let subscriber = tracing_subscriber::registry().with(filter).with(layer);

        Self {
            inner: Arc::new(Inner {
                dispatch: Dispatch::new(subscriber),
                level: config.level,
                development: config.development,
                encoding,
                outputs,
            }),
            context: Arc::from(Vec::new()),
        }
    }

    /// Child logger whose records carry `fields` ahead of per-call fields
    pub fn with(&self, fields: &[Field]) -> Self {
        let mut context = self.context.to_vec();
        context.extend_from_slice(fields);
        Self {
            inner: self.inner.clone(),
            context: Arc::from(context),
        }
    }

    /// Minimum level this logger writes
    pub fn level(&self) -> Level {
        self.inner.level
    }

    pub fn is_development(&self) -> bool {
        self.inner.development
    }

    pub fn encoding(&self) -> Encoding {
        self.inner.encoding
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.inner.level
    }

    /// The engine dispatcher, for routing other `tracing` events through
    /// this logger with `tracing::dispatcher::with_default`
    pub fn dispatch(&self) -> &Dispatch {
        &self.inner.dispatch
    }

    /// Make this logger the global `tracing` dispatcher
    ///
    /// Succeeds at most once per process.
    pub fn install_global(&self) -> Result<()> {
        tracing::dispatcher::set_global_default(self.inner.dispatch.clone())
            .map_err(LogError::install)
    }

    /// A writer that logs each line written to it at `level`
    ///
    /// Lines are recorded without the level's side effects: a writer at
    /// `Panic` or `Fatal` never panics or exits.
    pub fn level_writer(&self, level: Level) -> LevelWriter {
        LevelWriter::new(self.clone(), level)
    }

    /// Flush every output sink
    ///
    /// All sinks are attempted; the first failure is returned.
    pub fn sync(&self) -> Result<()> {
        let mut first_error = None;
        for sink in &self.inner.outputs {
            if let Err(err) = sink.sync() {
                first_error.get_or_insert_with(|| LogError::flush(sink.label(), err));
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Emit one record at `level` and apply the level's side effects
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        self.emit(level, msg, fields);
        match level {
            Level::DPanic if self.inner.development => self.panic_after_emit(msg),
            Level::Panic => self.panic_after_emit(msg),
            Level::Fatal => self.exit_after_emit(),
            _ => {}
        }
    }

    leveled_methods! {
        Level::Debug => debug, debugf, debugw;
        Level::Info => info, infof, infow;
        Level::Warn => warn, warnf, warnw;
        Level::Error => error, errorf, errorw;
        Level::DPanic => dpanic, dpanicf, dpanicw;
    }

    /// Log the concatenated arguments at `panic` level, then panic.
    pub fn panic(&self, args: &[&dyn Display]) -> ! {
        let msg = sprint(args);
        self.emit(Level::Panic, &msg, &[]);
        self.panic_after_emit(&msg)
    }

    /// Log a formatted message at `panic` level, then panic.
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        let msg = args.to_string();
        self.emit(Level::Panic, &msg, &[]);
        self.panic_after_emit(&msg)
    }

    /// Log a message with structured fields at `panic` level, then panic.
    pub fn panicw(&self, msg: &str, fields: &[Field]) -> ! {
        self.emit(Level::Panic, msg, fields);
        self.panic_after_emit(msg)
    }

    /// Log the concatenated arguments at `fatal` level, then exit.
    pub fn fatal(&self, args: &[&dyn Display]) -> ! {
        self.emit(Level::Fatal, &sprint(args), &[]);
        self.exit_after_emit()
    }

    /// Log a formatted message at `fatal` level, then exit.
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.emit(Level::Fatal, &args.to_string(), &[]);
        self.exit_after_emit()
    }

    /// Log a message with structured fields at `fatal` level, then exit.
    pub fn fatalw(&self, msg: &str, fields: &[Field]) -> ! {
        self.emit(Level::Fatal, msg, fields);
        self.exit_after_emit()
    }

    /// Write one record without the level's side effects
    pub(crate) fn emit(&self, level: Level, msg: &str, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }

        let mut structured = fields_to_json(&self.context);
        structured.extend(fields_to_json(fields));
        let structured = if structured.is_empty() {
            String::new()
        } else {
            JsonValue::Object(structured).to_string()
        };
        let severity = level.as_str();

        tracing::dispatcher::with_default(&self.inner.dispatch, || match level {
            Level::Debug => emit_event!(tracing::Level::DEBUG, severity, structured.as_str(), msg),
            Level::Info => emit_event!(tracing::Level::INFO, severity, structured.as_str(), msg),
            Level::Warn => emit_event!(tracing::Level::WARN, severity, structured.as_str(), msg),
            Level::Error | Level::DPanic | Level::Panic | Level::Fatal => {
                emit_event!(tracing::Level::ERROR, severity, structured.as_str(), msg)
            }
        });
    }

    fn panic_after_emit(&self, msg: &str) -> ! {
        let _ = self.sync();
        panic!("{}", msg)
    }

    fn exit_after_emit(&self) -> ! {
        let _ = self.sync();
        std::process::exit(1)
    }
}

/// Concatenate the `Display` form of each argument
fn sprint(args: &[&dyn Display]) -> String {
    let mut out = String::new();
    for arg in args {
        let _ = write!(out, "{}", arg);
    }
    out
}
