use thiserror::Error;

/// Failures raised by [`crate::tokens::TokenService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenServiceError {
    /// Storage was touched outside a browser document context.
    #[error("This method can only be used in the browser environment")]
    Environment,

    #[error("Token key '{0}' is not registered.")]
    UnregisteredKey(String),

    #[error("Invalid token for key '{0}'")]
    Validation(String),

    /// Only raised under `DuplicateKeyPolicy::Reject`.
    #[error("Token key '{0}' is already registered.")]
    DuplicateKey(String),

    /// The host storage refused the call (quota exceeded, access denied, ...).
    #[error("storage access failed: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogServiceError {
    #[error("Invalid service name")]
    InvalidName,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no service bound for type '{0}'")]
    NotBound(&'static str),
}
