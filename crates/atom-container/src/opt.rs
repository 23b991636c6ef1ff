//! Provider options
//!
//! A provider receives a list of `Opt`s. They select which configuration
//! section it reads (`Prefix`), where that configuration comes from
//! (`Source`), and how the provider is registered (`Name` or `Group`).

use crate::container::DiOption;
use config::{Config, ConfigError};
use serde::de::DeserializeOwned;

/// A single provider option
pub enum Opt {
    /// Configuration section to read, e.g. `"log"`
    Prefix(String),
    /// Register the provided value under this name
    Name(String),
    /// Register the provided value into this group
    Group(String),
    /// Configuration source to read from
    Source(Config),
}

pub fn prefix(prefix: impl Into<String>) -> Opt {
    Opt::Prefix(prefix.into())
}

pub fn name(name: impl Into<String>) -> Opt {
    Opt::Name(name.into())
}

pub fn group(group: impl Into<String>) -> Opt {
    Opt::Group(group.into())
}

pub fn source(config: Config) -> Opt {
    Opt::Source(config)
}

/// Options aggregated from a list of `Opt`s; later options win
#[derive(Default)]
pub struct Options {
    prefix: Option<String>,
    name: Option<String>,
    group: Option<String>,
    source: Option<Config>,
}

impl Options {
    pub fn new(opts: impl IntoIterator<Item = Opt>) -> Self {
        let mut options = Self::default();
        for opt in opts {
            match opt {
                Opt::Prefix(p) => options.prefix = Some(p),
                Opt::Name(n) => options.name = Some(n),
                Opt::Group(g) => options.group = Some(g),
                Opt::Source(s) => options.source = Some(s),
            }
        }
        options
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Deserialize the configured section into `T`
    ///
    /// With no source, or when the prefixed section is absent, `T::default()`
    /// is returned. A section that exists but does not match `T` is an error.
    pub fn unmarshal_config<T>(&self) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(source) = &self.source else {
            return Ok(T::default());
        };

        match self.prefix.as_deref() {
            Some(prefix) => match source.get::<T>(prefix) {
                Err(ConfigError::NotFound(_)) => Ok(T::default()),
                other => other,
            },
            None => source.clone().try_deserialize(),
        }
    }

    /// Registration options for the container
    pub fn di_options(&self) -> Vec<DiOption> {
        let mut opts = Vec::new();
        if let Some(name) = &self.name {
            opts.push(DiOption::Name(name.clone()));
        }
        if let Some(group) = &self.group {
            opts.push(DiOption::Group(group.clone()));
        }
        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_options_win() {
        let options = Options::new(vec![prefix("a"), prefix("b"), name("x")]);
        assert_eq!(options.prefix(), Some("b"));
        assert_eq!(options.name(), Some("x"));
        assert_eq!(options.group(), None);
    }

    #[test]
    fn test_di_options_follow_name_and_group() {
        assert!(Options::new(vec![prefix("log")]).di_options().is_empty());
        assert_eq!(
            Options::new(vec![group("sinks")]).di_options(),
            vec![DiOption::Group("sinks".into())]
        );
    }

    #[test]
    fn test_no_source_yields_default() {
        let value: Vec<String> = Options::new(vec![prefix("log")]).unmarshal_config().unwrap();
        assert!(value.is_empty());
    }
}
