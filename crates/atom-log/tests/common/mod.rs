use atom_log::{Config, Encoding, Level};
use serde_json::Value as JsonValue;
use std::io::{self, Write};
use std::path::Path;

/// JSON config writing only to `path`
#[allow(dead_code)]
pub fn file_config(path: &Path) -> Config {
    Config {
        output_paths: vec![path.display().to_string()],
        ..Config::default()
    }
}

/// Config at `level` with the given encoding and development flag
#[allow(dead_code)]
pub fn config(level: Level, encoding: Encoding, development: bool) -> Config {
    Config {
        level,
        encoding: encoding.to_string(),
        development,
        ..Config::default()
    }
}

/// Parse every line of a JSON log file
#[allow(dead_code)]
pub fn read_records(path: &Path) -> Vec<JsonValue> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Writer whose every call fails
#[allow(dead_code)]
pub struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }
}
