//! Service-tagged logging facade.

pub mod sink;
pub mod subscriber;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::Level;

use crate::errors::LogServiceError;

pub use sink::{LogBackend, LogRecord, LogSink, MemorySink, TracingSink};

pub const DEFAULT_SERVICE_NAME: &str = "@lst97/CommonServices.LogService";

/// Tags every message with the current service name and forwards it to a
/// [`LogSink`]. Blank messages are dropped.
pub struct LogService {
    logger: Rc<dyn LogSink>,
    service_name: RefCell<String>,
}

impl LogService {
    pub fn new(logger: impl LogSink + 'static) -> Self {
        Self::from_logger(Rc::new(logger))
    }

    pub fn from_logger(logger: Rc<dyn LogSink>) -> Self {
        Self {
            logger,
            service_name: RefCell::new(DEFAULT_SERVICE_NAME.to_owned()),
        }
    }

    /// Backed by the global `tracing` subscriber.
    pub fn tracing() -> Self {
        Self::new(TracingSink)
    }

    /// The underlying backend.
    pub fn logger(&self) -> Rc<dyn LogSink> {
        Rc::clone(&self.logger)
    }

    /// Same service name, different backend.
    pub(crate) fn with_logger(&self, logger: Rc<dyn LogSink>) -> Self {
        Self {
            logger,
            service_name: RefCell::new(self.service_name()),
        }
    }

    /// Fails on an empty or whitespace-only name; the name is kept as given.
    pub fn set_service_name(&self, service: &str) -> Result<(), LogServiceError> {
        if service.trim().is_empty() {
            return Err(LogServiceError::InvalidName);
        }
        *self.service_name.borrow_mut() = service.to_owned();
        Ok(())
    }

    pub fn service_name(&self) -> String {
        self.service_name.borrow().clone()
    }

    pub fn error(&self, message: &str) {
        self.write(Level::ERROR, message);
    }

    pub fn info(&self, message: &str) {
        self.write(Level::INFO, message);
    }

    pub fn warn(&self, message: &str) {
        self.write(Level::WARN, message);
    }

    pub fn debug(&self, message: &str) {
        self.write(Level::DEBUG, message);
    }

    fn write(&self, level: Level, message: &str) {
        if message.trim().is_empty() {
            return;
        }
        // released before the sink runs: a sink may rename the service
        let service = self.service_name();
        self.logger.write(level, &service, message);
    }
}

impl std::fmt::Debug for LogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogService")
            .field("service_name", &self.service_name())
            .finish_non_exhaustive()
    }
}

impl Default for LogService {
    fn default() -> Self {
        Self::tracing()
    }
}
