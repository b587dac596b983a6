//! Composition root.
//!
//! The application builds one [`Services`] and passes the `Rc` handles down;
//! there is no process-wide instance. An embedding application that keeps its
//! own [`ServiceRegistry`] can hand it to [`Services::use_registry`].

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::config::settings::ServicesConfig;
use crate::errors::RegistryError;
use crate::helpers::env::EnvironmentCheck;
use crate::logging::{LogBackend, LogService, LogSink, TracingSink};
use crate::storage::{BrowserStorage, TokenStorage};
use crate::tokens::TokenService;

/// At most one instance per type.
#[derive(Default)]
pub struct ServiceRegistry {
    bindings: HashMap<TypeId, Rc<dyn Any>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `service` to its type, replacing any earlier binding.
    pub fn bind<T: 'static>(&mut self, service: Rc<T>) {
        debug!(service = type_name::<T>(), "service bound");
        self.bindings.insert(TypeId::of::<T>(), service);
    }

    pub fn is_bound<T: 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<T>())
    }

    pub fn get<T: 'static>(&self) -> Result<Rc<T>, RegistryError> {
        self.bindings
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
            .ok_or(RegistryError::NotBound(type_name::<T>()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Something [`Services::get`] can resolve.
pub trait Service: 'static {
    fn resolve(services: &Services) -> Rc<Self>;
}

impl Service for LogService {
    fn resolve(services: &Services) -> Rc<Self> {
        services.log_service()
    }
}

impl Service for TokenService {
    fn resolve(services: &Services) -> Rc<Self> {
        services.token_service()
    }
}

pub struct Services {
    log: Rc<LogService>,
    tokens: Rc<TokenService>,
}

impl Services {
    /// Tracing-backed logger and `localStorage`-backed tokens, set up from `config`.
    pub fn new(config: &ServicesConfig) -> Result<Self> {
        Self::builder().config(config.clone()).build()
    }

    pub fn builder() -> ServicesBuilder {
        ServicesBuilder::default()
    }

    pub fn log_service(&self) -> Rc<LogService> {
        Rc::clone(&self.log)
    }

    pub fn token_service(&self) -> Rc<TokenService> {
        Rc::clone(&self.tokens)
    }

    pub fn get<T: Service>(&self) -> Rc<T> {
        T::resolve(self)
    }

    /// Bind the log backend and every service into `registry` unless its type
    /// is already bound, then resolve from the registry, so whatever the
    /// application bound first takes precedence. A pre-bound [`LogBackend`]
    /// replaces the backend of the library's own `LogService`, keeping its
    /// service name. Calling it again changes nothing.
    pub fn use_registry(&mut self, registry: &mut ServiceRegistry) -> Result<(), RegistryError> {
        let own_backend = self.log.logger();
        if !registry.is_bound::<LogBackend>() {
            registry.bind(Rc::new(LogBackend(Rc::clone(&own_backend))));
        }
        let backend = registry.get::<LogBackend>()?;
        if !registry.is_bound::<LogService>() && !Rc::ptr_eq(&backend.0, &own_backend) {
            self.log = Rc::new(self.log.with_logger(Rc::clone(&backend.0)));
        }

        self.log = adopt_or_bind(registry, &self.log)?;
        self.tokens = adopt_or_bind(registry, &self.tokens)?;
        Ok(())
    }
}

fn adopt_or_bind<T: 'static>(
    registry: &mut ServiceRegistry,
    own: &Rc<T>,
) -> Result<Rc<T>, RegistryError> {
    if !registry.is_bound::<T>() {
        registry.bind(Rc::clone(own));
    }
    registry.get::<T>()
}

#[derive(Default)]
pub struct ServicesBuilder {
    config: ServicesConfig,
    log_sink: Option<Rc<dyn LogSink>>,
    storage: Option<Box<dyn TokenStorage>>,
    environment: Option<EnvironmentCheck>,
}

impl ServicesBuilder {
    pub fn config(mut self, config: ServicesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.log_sink = Some(Rc::new(sink));
        self
    }

    pub fn storage(mut self, storage: impl TokenStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn environment(mut self, check: EnvironmentCheck) -> Self {
        self.environment = Some(check);
        self
    }

    pub fn build(self) -> Result<Services> {
        let config = self.config;

        let log = LogService::from_logger(self.log_sink.unwrap_or_else(|| Rc::new(TracingSink)));
        if let Some(name) = &config.service_name {
            log.set_service_name(name)
                .map_err(|e| anyhow!("service_name '{}': {}", name, e))?;
        }

        let storage = self
            .storage
            .unwrap_or_else(|| Box::new(BrowserStorage::new()));
        let mut tokens = TokenService::from_storage(storage).with_duplicate_keys(config.duplicate_keys);
        if let Some(check) = self.environment {
            tokens = tokens.with_environment(check);
        }
        tokens.register_formats(&config.token_keys)?;

        info!(
            service = %log.service_name(),
            token_keys = tokens.registered_keys().len(),
            "services ready"
        );

        Ok(Services {
            log: Rc::new(log),
            tokens: Rc::new(tokens),
        })
    }
}
