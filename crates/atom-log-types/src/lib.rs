//! Core types shared across the atom logging crates
//!
//! This crate provides the vocabulary used by both the error facility
//! and the logger itself:
//!
//! - **Levels**: the ordered severity scale `Debug..Fatal`
//! - **Fields**: typed key/value pairs attached to records
//! - **Sensitive data**: `Sensitive<T>` marker that always redacts
//! - **Schema constants**: canonical record keys

pub mod field;
pub mod level;
pub mod schema;
pub mod sensitive;

pub use field::{Field, Value};
pub use level::{Level, ParseLevelError};
pub use sensitive::Sensitive;
