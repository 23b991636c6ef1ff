//! Canonical record keys
//!
//! Every encoded record starts with the same three keys; these constants
//! keep the encoders, the capture helper and the tests in agreement.

pub const FIELD_LEVEL: &str = "level";
pub const FIELD_TS: &str = "ts";
pub const FIELD_MSG: &str = "msg";
pub const FIELD_TARGET: &str = "target";

// Carried on tracing events emitted by the logger itself, consumed by the
// encoder layer and never written out under these names.
pub const EVENT_FIELD_SEVERITY: &str = "log.severity";
pub const EVENT_FIELD_STRUCTURED: &str = "log.fields";
pub const EVENT_FIELD_MESSAGE: &str = "message";

/// Target used for events the logger emits on its own dispatcher
pub const LOGGER_TARGET: &str = "atom_log";

/// Replacement text for redacted values
pub const REDACTED: &str = "***REDACTED***";
