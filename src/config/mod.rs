pub mod proc_loader;
pub mod proc_validator;
pub mod settings;

pub use settings::{
    DuplicateKeyPolicy, LogFormat, LoggingConfig, ServicesConfig, TokenFormat, TokenKeyConfig,
};
