//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * service name is not blank
//!   * logging level is a known level
//!   * token key names are non-blank and unique
//!   * token formats are usable (non-empty prefix, compilable pattern)

use std::collections::HashSet;

use tracing::{error, info};

use crate::config::settings::{LoggingConfig, ServicesConfig, TokenFormat, TokenKeyConfig};
use crate::tokens::validators;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_services_config(cfg: &ServicesConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    if let Some(name) = &cfg.service_name {
        if name.trim().is_empty() {
            errors.push("service_name must not be blank".to_string());
        }
    }

    if let Some(logging) = &cfg.logging {
        validate_logging(logging, &mut errors);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (idx, key) in cfg.token_keys.iter().enumerate() {
        validate_token_key(idx, key, &mut errors);
        if !seen.insert(key.name.as_str()) {
            errors.push(format!(
                "token_keys[{}]: duplicate key name '{}'",
                idx, key.name
            ));
        }
    }

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "logging.level '{}' invalid; allowed: {:?}",
            logging.level, LOG_LEVELS
        ));
    }
}

fn validate_token_key(idx: usize, key: &TokenKeyConfig, errors: &mut Vec<String>) {
    if key.name.trim().is_empty() {
        errors.push(format!("token_keys[{}]: name must not be blank", idx));
    }

    match &key.format {
        TokenFormat::Prefix { prefix } if prefix.is_empty() => {
            errors.push(format!(
                "token_keys['{}'].format.prefix must not be empty",
                key.name
            ));
        }
        TokenFormat::Pattern { pattern } => {
            if let Err(e) = validators::pattern(pattern) {
                errors.push(format!(
                    "token_keys['{}'].format.pattern '{}' is not a valid regex: {}",
                    key.name, pattern, e
                ));
            }
        }
        _ => {}
    }
}
