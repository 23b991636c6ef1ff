//! Logger provider
//!
//! `provide` builds a logger from provider options, installs it as the
//! process-wide logger used by the facade and registers it with the
//! dependency-injection container.

use crate::config::Config;
use crate::facade;
use crate::{LogError, Logger, Result};
use atom_container::{Container, Opt, Options};
use std::convert::Infallible;

/// Build, install and register a logger with the process-wide container
///
/// The registered factory returns the process-wide logger at the time it is
/// first resolved, so a later `provide` also redirects registrations that
/// have not been resolved yet.
///
/// # Errors
///
/// - `LogError::Config` when the configuration section cannot be read
/// - `LogError::LoggerConstruction` when the logger cannot be built
/// - `LogError::Registration` when the container rejects the logger
///
/// The process-wide logger is left untouched by the first two.
pub fn provide(opts: impl IntoIterator<Item = Opt>) -> Result<Logger> {
    provide_into(atom_container::global(), opts)
}

/// Same as `provide`, registering with `container`
///
/// # Errors
///
/// See `provide`.
pub fn provide_into(container: &Container, opts: impl IntoIterator<Item = Opt>) -> Result<Logger> {
    let options = Options::new(opts);

    let config: Config = options.unmarshal_config().map_err(LogError::config)?;
    let logger = Logger::new(&config)?;

    facade::set_default(logger.clone());

    // Resolves to whichever logger is process-wide when first resolved
    container
        .provide(
            || Ok::<_, Infallible>(facade::default_logger()),
            options.di_options(),
        )
        .map_err(LogError::registration)?;

    Ok(logger)
}
