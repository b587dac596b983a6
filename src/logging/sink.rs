use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, trace, warn, Level};

/// Structured logger substrate: a severity, the `service` field and the message.
pub trait LogSink {
    fn write(&self, level: Level, service: &str, message: &str);
}

/// Forwards to the installed `tracing` subscriber; level filtering and
/// formatting are the subscriber's business (see [`crate::logging::subscriber`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, level: Level, service: &str, message: &str) {
        match level {
            Level::ERROR => error!(service = %service, "{}", message),
            Level::WARN => warn!(service = %service, "{}", message),
            Level::INFO => info!(service = %service, "{}", message),
            Level::DEBUG => debug!(service = %service, "{}", message),
            _ => trace!(service = %service, "{}", message),
        }
    }
}

/// A backend as a concrete type, so a [`crate::container::ServiceRegistry`]
/// can hold it the way it holds services.
#[derive(Clone)]
pub struct LogBackend(pub Rc<dyn LogSink>);

impl LogBackend {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self(Rc::new(sink))
    }
}

impl LogSink for LogBackend {
    fn write(&self, level: Level, service: &str, message: &str) {
        self.0.write(level, service, message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub service: String,
    pub message: String,
}

/// Keeps every entry in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Rc<RefCell<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.borrow().clone()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, level: Level, service: &str, message: &str) {
        self.records.borrow_mut().push(LogRecord {
            level,
            service: service.to_owned(),
            message: message.to_owned(),
        });
    }
}
