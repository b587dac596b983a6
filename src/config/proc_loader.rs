use std::{fs, path::Path};

use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::settings::{LoggingConfig, ServicesConfig};

/// Load, expand and validate config from a YAML file
pub fn file_to_config(path: &Path) -> Result<ServicesConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("cannot read config '{}': {}", path.display(), e))?;
    parse_config(&expand_env_vars(&content)?)
}

pub fn parse_config(content: &str) -> Result<ServicesConfig> {
    let mut services_config: ServicesConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if services_config.logging.is_none() {
        services_config.logging = Some(LoggingConfig::from_env());
    }

    debug!("validation config ...");
    proc_validator::validate_services_config(&services_config)
        .map_err(|errors| anyhow!("config is not valid: {}", errors.join("; ")))?;

    Ok(services_config)
}

/// Replace `${VAR}` and `${VAR:default}` with environment values. An unset
/// variable without a default becomes an empty string.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let placeholder = Regex::new(r"\$\{(?P<var>\w+)(?::(?P<default>[^}]*))?\}")?;
    let expanded = placeholder.replace_all(input, |caps: &regex::Captures| {
        std::env::var(&caps["var"]).unwrap_or_else(|_| {
            caps.name("default")
                .map(|default| default.as_str().to_owned())
                .unwrap_or_default()
        })
    });
    Ok(expanded.into_owned())
}
