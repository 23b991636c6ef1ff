//! Type-keyed provider registry
//!
//! Factories run lazily, at most once per registration; the produced
//! instance is cached and cloned out to every caller that resolves it.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

/// Registration options accepted by `Container::provide`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiOption {
    /// Register under a name; resolved with `resolve_named`
    Name(String),
    /// Append to a value group; resolved with `resolve_group`
    Group(String),
}

/// Errors produced by the container
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("{type_name}{} is already provided", describe_name(.name))]
    AlreadyProvided {
        type_name: &'static str,
        name: Option<String>,
    },

    #[error("invalid provide options: {reason}")]
    InvalidOptions { reason: String },

    #[error("no provider for {type_name}{}", describe_name(.name))]
    Missing {
        type_name: &'static str,
        name: Option<String>,
    },

    #[error("provider for {type_name} failed: {source}")]
    Factory {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("provider registered for {type_name} produced a different type")]
    TypeMismatch { type_name: &'static str },
}

fn describe_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" (name: {})", name),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Key {
    type_id: TypeId,
    name: Option<String>,
}

struct Provider {
    factory: Factory,
    instance: Mutex<Option<Instance>>,
}

impl Provider {
    fn new(factory: Factory) -> Self {
        Self {
            factory,
            instance: Mutex::new(None),
        }
    }

    fn instance(&self) -> Result<Instance, BoxError> {
        let mut slot = self.instance.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(instance) = slot.as_ref() {
            return Ok(instance.clone());
        }
        let instance = (self.factory)()?;
        *slot = Some(instance.clone());
        Ok(instance)
    }
}

/// Registry of lazily constructed, shared instances
#[derive(Default)]
pub struct Container {
    singles: RwLock<HashMap<Key, Arc<Provider>>>,
    groups: RwLock<HashMap<(TypeId, String), Vec<Arc<Provider>>>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zero-argument factory for `T`
    ///
    /// Without options the provider is keyed by type alone. `DiOption::Name`
    /// keys it by type and name; `DiOption::Group` appends it to a group
    /// instead. Registering the same key twice is rejected.
    pub fn provide<T, F, E>(&self, factory: F, opts: Vec<DiOption>) -> Result<(), ContainerError>
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let mut name = None;
        let mut group = None;
        for opt in opts {
            match opt {
                DiOption::Name(n) => name = Some(n),
                DiOption::Group(g) => group = Some(g),
            }
        }

        let factory: Factory = Box::new(move || {
            factory()
                .map(|value| Arc::new(value) as Instance)
                .map_err(Into::into)
        });
        let provider = Arc::new(Provider::new(factory));

        match (name, group) {
            (Some(name), Some(group)) => Err(ContainerError::InvalidOptions {
                reason: format!("name {:?} cannot be combined with group {:?}", name, group),
            }),
            (name, None) => {
                let key = Key {
                    type_id: TypeId::of::<T>(),
                    name,
                };
                let mut singles = self.singles.write().unwrap_or_else(PoisonError::into_inner);
                if singles.contains_key(&key) {
                    return Err(ContainerError::AlreadyProvided {
                        type_name: type_name::<T>(),
                        name: key.name,
                    });
                }
                singles.insert(key, provider);
                Ok(())
            }
            (None, Some(group)) => {
                self.groups
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entry((TypeId::of::<T>(), group))
                    .or_default()
                    .push(provider);
                Ok(())
            }
        }
    }

    /// Resolve the unnamed instance of `T`
    pub fn resolve<T>(&self) -> Result<T, ContainerError>
    where
        T: Any + Send + Sync + Clone,
    {
        self.resolve_key(None)
    }

    /// Resolve the instance of `T` registered under `name`
    pub fn resolve_named<T>(&self, name: &str) -> Result<T, ContainerError>
    where
        T: Any + Send + Sync + Clone,
    {
        self.resolve_key(Some(name.to_string()))
    }

    /// Resolve every instance of `T` in `group`, in registration order
    ///
    /// An unknown group resolves to an empty list.
    pub fn resolve_group<T>(&self, group: &str) -> Result<Vec<T>, ContainerError>
    where
        T: Any + Send + Sync + Clone,
    {
        let providers = self
            .groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(TypeId::of::<T>(), group.to_string()))
            .cloned()
            .unwrap_or_default();

        providers.iter().map(|p| instantiate::<T>(p)).collect()
    }

    /// Whether an unnamed provider for `T` is registered
    pub fn is_provided<T: Any>(&self) -> bool {
        self.singles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&Key {
                type_id: TypeId::of::<T>(),
                name: None,
            })
    }

    fn resolve_key<T>(&self, name: Option<String>) -> Result<T, ContainerError>
    where
        T: Any + Send + Sync + Clone,
    {
        let key = Key {
            type_id: TypeId::of::<T>(),
            name,
        };
        // The registry lock is released before the factory runs so that
        // factories may resolve their own dependencies.
        let provider = self
            .singles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        match provider {
            Some(provider) => instantiate::<T>(&provider),
            None => Err(ContainerError::Missing {
                type_name: type_name::<T>(),
                name: key.name,
            }),
        }
    }
}

fn instantiate<T>(provider: &Provider) -> Result<T, ContainerError>
where
    T: Any + Send + Sync + Clone,
{
    let instance = provider
        .instance()
        .map_err(|source| ContainerError::Factory {
            type_name: type_name::<T>(),
            source,
        })?;
    instance
        .downcast_ref::<T>()
        .cloned()
        .ok_or(ContainerError::TypeMismatch {
            type_name: type_name::<T>(),
        })
}

static GLOBAL: OnceLock<Container> = OnceLock::new();

/// The process-wide container
pub fn global() -> &'static Container {
    GLOBAL.get_or_init(Container::new)
}
