//! Global `tracing` subscriber setup.

use clap::ValueEnum;

use crate::config::settings::{LoggingConfig, ServicesConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "trace",
            LogLevel::DEBUG => "debug",
            LogLevel::INFO => "info",
            LogLevel::WARN => "warn",
            LogLevel::ERROR => "error",
        }
    }
}

/// Command line level first, then the config file, then `LOG_LEVEL`/`LOG_FORMAT`.
pub fn resolve_logging(
    services_config: &ServicesConfig,
    arg_log_level: Option<LogLevel>,
) -> LoggingConfig {
    let mut logging_config = services_config
        .logging
        .clone()
        .unwrap_or_else(LoggingConfig::from_env);

    if let Some(level) = arg_log_level {
        logging_config.level = level.as_str().to_owned();
    }
    logging_config
}

pub fn run(services_config: &ServicesConfig, arg_log_level: Option<LogLevel>) -> bool {
    init_logging(&resolve_logging(services_config, arg_log_level))
}

/// Install the global subscriber. Returns `false` when one was already
/// installed, in which case nothing changes.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(cfg: &LoggingConfig) -> bool {
    use crate::config::settings::LogFormat;
    use tracing_subscriber::fmt::time::UtcTime;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // exactly one of the two output layers is present
    let json = (cfg.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .flatten_event(true)
            .with_ansi(false)
    });
    let compact = (cfg.format == LogFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .with_timer(UtcTime::rfc_3339())
            .with_ansi(true)
    });

    tracing_subscriber::registry()
        .with(level_filter(&cfg.level))
        .with(json)
        .with(compact)
        .try_init()
        .is_ok()
}

/// Unknown levels fall back to the default level.
#[cfg(not(target_arch = "wasm32"))]
pub fn level_filter(level: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_new(level.trim())
        .unwrap_or_else(|_| EnvFilter::new(crate::config::settings::DEFAULT_LOG_LEVEL))
}

/// Browser console output; the format setting does not apply there.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(cfg: &LoggingConfig) -> bool {
    use std::sync::Once;

    static INIT: Once = Once::new();

    let level = cfg
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    let mut installed = false;
    INIT.call_once(|| {
        let config = tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build();
        tracing_wasm::set_as_global_default_with_config(config);
        installed = true;
    });
    installed
}
