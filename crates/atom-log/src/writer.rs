//! Level-scoped writer
//!
//! `LevelWriter` adapts stream-oriented output (a child process, a library
//! that only knows `io::Write`) into records: every complete line written
//! to it becomes one record at the writer's level. Records carry the level
//! name only: `dpanic`, `panic` and `fatal` lines neither panic nor exit, so
//! a writer is safe to hand to code that knows nothing about log severity.

use crate::Logger;
use atom_log_types::Level;
use std::io::{self, Write};
use std::mem;

/// `io::Write` sink that logs one record per line
#[derive(Debug)]
pub struct LevelWriter {
    logger: Logger,
    level: Level,
    pending: Vec<u8>,
}

impl LevelWriter {
    pub(crate) fn new(logger: Logger, level: Level) -> Self {
        Self {
            logger,
            level,
            pending: Vec::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    // Blank lines are dropped.
    fn emit_line(&self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        let text = text.trim_end_matches('\r');
        if !text.is_empty() {
            self.logger.emit(self.level, text, &[]);
        }
    }
}

impl Write for LevelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(end) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            self.emit_line(&line[..end]);
        }
        Ok(buf.len())
    }

    /// Log any unterminated trailing line, then sync the logger
    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = mem::take(&mut self.pending);
            self.emit_line(&line);
        }
        self.logger
            .sync()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl Drop for LevelWriter {
    fn drop(&mut self) {
        if !self.pending.is_empty() && !std::thread::panicking() {
            let line = mem::take(&mut self.pending);
            self.emit_line(&line);
        }
    }
}
