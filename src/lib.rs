//! # Common Services Library
//!
//! Application support services for browser-hosted Rust:
//! a logging facade that tags every line with a service name, and a token
//! manager that validates tokens per key before keeping them in
//! `localStorage`.
//!
//! Modules:
//! - `config`: YAML configuration, defaults and validation
//! - `container`: composition root and type-keyed service registry
//! - `logging`: `LogService` facade, sinks and subscriber setup
//! - `tokens`: `TokenService` and built-in token formats
//! - `storage`: browser and in-memory key-value substrates
//! - `helpers`: environment detection, time

pub mod config;
pub mod container;
pub mod errors;
pub mod helpers;
pub mod logging;
pub mod storage;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use crate::config::settings::*;
pub use crate::container::{ServiceRegistry, Services, ServicesBuilder};
pub use crate::errors::{LogServiceError, RegistryError, TokenServiceError};
pub use crate::helpers::env::is_browser_environment;
pub use crate::logging::LogService;
pub use crate::tokens::TokenService;
