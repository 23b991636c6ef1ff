//! Output destinations
//!
//! A `Sink` is one place records are written to. Each record is handed over
//! as a single buffer and written with one `write_all` under the sink's
//! lock, so concurrent records never interleave within a line.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

enum Target {
    Stdout,
    Stderr,
    File(File),
    Writer(Box<dyn Write + Send>),
}

/// A shared, cloneable output destination
#[derive(Clone)]
pub struct Sink {
    label: Arc<str>,
    target: Arc<Mutex<Target>>,
}

impl Sink {
    fn from_target(label: &str, target: Target) -> Self {
        Self {
            label: Arc::from(label),
            target: Arc::new(Mutex::new(target)),
        }
    }

    pub fn stdout() -> Self {
        Self::from_target("stdout", Target::Stdout)
    }

    pub fn stderr() -> Self {
        Self::from_target("stderr", Target::Stderr)
    }

    /// Open `path` for appending, creating it if needed
    ///
    /// The parent directory must already exist.
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_target(&path.display().to_string(), Target::File(file)))
    }

    /// Open a sink from an output path as written in configuration
    pub fn open(spec: &str) -> io::Result<Self> {
        match spec {
            "stdout" => Ok(Self::stdout()),
            "stderr" => Ok(Self::stderr()),
            "" => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty output path",
            )),
            path => Self::file(path),
        }
    }

    /// Wrap an arbitrary writer
    pub fn from_writer(label: &str, writer: impl Write + Send + 'static) -> Self {
        Self::from_target(label, Target::Writer(Box::new(writer)))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Write one encoded record
    pub fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *target {
            Target::Stdout => io::stdout().lock().write_all(record),
            Target::Stderr => io::stderr().lock().write_all(record),
            Target::File(file) => file.write_all(record),
            Target::Writer(writer) => writer.write_all(record),
        }
    }

    /// Flush buffered output; files are also synced to disk
    pub fn sync(&self) -> io::Result<()> {
        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        match &mut *target {
            Target::Stdout => io::stdout().flush(),
            Target::Stderr => io::stderr().flush(),
            Target::File(file) => {
                file.flush()?;
                file.sync_data()
            }
            Target::Writer(writer) => writer.flush(),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("label", &self.label).finish()
    }
}

/// Open every configured output path
pub(crate) fn open_all(paths: &[String]) -> io::Result<Vec<Sink>> {
    paths.iter().map(|p| Sink::open(p)).collect()
}
