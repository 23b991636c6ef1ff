//! Minimal dependency-injection container and provider options
//!
//! Components register zero-argument factories keyed by type (and an
//! optional name, or a value group) and resolve instances by type later.
//! The `opt` module turns a list of provider options into a configuration
//! section plus the registration options for the container.

pub mod container;
pub mod opt;

pub use container::{global, Container, ContainerError, DiOption};
pub use opt::{Opt, Options};
