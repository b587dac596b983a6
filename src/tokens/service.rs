use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

use crate::config::settings::{DuplicateKeyPolicy, TokenKeyConfig};
use crate::errors::TokenServiceError;
use crate::helpers::env::{is_browser_environment, EnvironmentCheck};
use crate::storage::{BrowserStorage, TokenStorage};
use crate::tokens::validators::Validator;

/// Registered key: name + validator. Never mutated once created.
#[derive(Clone)]
pub struct TokenKeyEntry {
    pub key_name: String,
    validate: Validator,
}

impl TokenKeyEntry {
    pub fn new(key_name: impl Into<String>, validate: Validator) -> Self {
        Self { key_name: key_name.into(), validate }
    }

    pub fn validate(&self, token: &str) -> bool {
        (self.validate)(token)
    }
}

impl std::fmt::Debug for TokenKeyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeyEntry")
            .field("key_name", &self.key_name)
            .finish_non_exhaustive()
    }
}

/// Token manager over host storage.
///
/// Validator registration and the storage key-space are independent: reads
/// and removals never consult the registry, writes always do.
///
/// ```
/// use common_services::{storage::MemoryStorage, tokens::TokenService};
///
/// let tokens = TokenService::new(MemoryStorage::new()).with_environment(|| true);
/// tokens.add_token_key("myCustomToken", |t| t.starts_with("custom_")).unwrap();
/// tokens.set_token("myCustomToken", "custom_12345").unwrap();
/// assert!(tokens.is_valid_token("myCustomToken"));
/// ```
pub struct TokenService {
    token_keys: RefCell<HashMap<String, TokenKeyEntry>>,
    storage: Box<dyn TokenStorage>,
    environment: EnvironmentCheck,
    duplicate_keys: DuplicateKeyPolicy,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("token_keys", &self.registered_keys())
            .field("duplicate_keys", &self.duplicate_keys)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        Self::from_storage(Box::new(storage))
    }

    pub fn from_storage(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            token_keys: RefCell::new(HashMap::new()),
            storage,
            environment: is_browser_environment,
            duplicate_keys: DuplicateKeyPolicy::default(),
        }
    }

    /// `window.localStorage` guarded by the real browser check.
    pub fn browser() -> Self {
        Self::new(BrowserStorage::new())
    }

    pub fn with_environment(mut self, check: EnvironmentCheck) -> Self {
        self.environment = check;
        self
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn duplicate_keys(&self) -> DuplicateKeyPolicy {
        self.duplicate_keys
    }

    /// Register `validate` for `key_name`.
    ///
    /// Under [`DuplicateKeyPolicy::Overwrite`] this never fails and replaces
    /// any earlier validator.
    pub fn add_token_key<F>(&self, key_name: &str, validate: F) -> Result<(), TokenServiceError>
    where
        F: Fn(&str) -> bool + 'static,
    {
        self.add_token_key_validator(key_name, Rc::new(validate))
    }

    pub fn add_token_key_validator(
        &self,
        key_name: &str,
        validate: Validator,
    ) -> Result<(), TokenServiceError> {
        let mut keys = self.token_keys.borrow_mut();
        if keys.contains_key(key_name) {
            match self.duplicate_keys {
                DuplicateKeyPolicy::Reject => {
                    return Err(TokenServiceError::DuplicateKey(key_name.to_owned()));
                }
                DuplicateKeyPolicy::Overwrite => {
                    warn!(key = %key_name, "token key re-registered, validator replaced");
                }
            }
        }
        keys.insert(key_name.to_owned(), TokenKeyEntry::new(key_name, validate));
        debug!(key = %key_name, "token key registered");
        Ok(())
    }

    /// Register every configured key with its built-in format.
    pub fn register_formats(&self, keys: &[TokenKeyConfig]) -> Result<()> {
        for key in keys {
            let validator = key
                .format
                .validator()
                .map_err(|e| anyhow!("token key '{}': {}", key.name, e))?;
            self.add_token_key_validator(&key.name, validator)?;
        }
        Ok(())
    }

    pub fn has_token_key(&self, key_name: &str) -> bool {
        self.token_keys.borrow().contains_key(key_name)
    }

    /// Registered key names, sorted.
    pub fn registered_keys(&self) -> Vec<String> {
        let mut names: Vec<String> = self.token_keys.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check a candidate against the registered validator. Touches neither
    /// storage nor the environment.
    pub fn validate(&self, key_name: &str, token: &str) -> Result<(), TokenServiceError> {
        let validate = self
            .validator_for(key_name)
            .ok_or_else(|| TokenServiceError::UnregisteredKey(key_name.to_owned()))?;

        if validate(token) {
            Ok(())
        } else {
            Err(TokenServiceError::Validation(key_name.to_owned()))
        }
    }

    /// Validate and persist `token` under `key_name`, overwriting any prior value.
    /// Storage is left untouched on failure.
    pub fn set_token(&self, key_name: &str, token: &str) -> Result<(), TokenServiceError> {
        self.ensure_browser()?;
        self.validate(key_name, token)?;
        self.storage.set_item(key_name, token)?;
        debug!(key = %key_name, "token stored");
        Ok(())
    }

    /// Stored value, whether or not `key_name` has a validator.
    pub fn get_token(&self, key_name: &str) -> Result<Option<String>, TokenServiceError> {
        self.ensure_browser()?;
        self.storage.get_item(key_name)
    }

    pub fn remove_token(&self, key_name: &str) -> Result<(), TokenServiceError> {
        self.ensure_browser()?;
        self.storage.remove_item(key_name)?;
        debug!(key = %key_name, "token removed");
        Ok(())
    }

    /// `false` when nothing (or an empty string) is stored, when no validator
    /// is registered, and when any failure occurs, including a missing
    /// browser context. Use [`TokenService::check_token`] to see the failure.
    pub fn is_valid_token(&self, key_name: &str) -> bool {
        self.check_token(key_name).unwrap_or(false)
    }

    /// Same answer as [`TokenService::is_valid_token`] but failures surface.
    pub fn check_token(&self, key_name: &str) -> Result<bool, TokenServiceError> {
        let token = match self.get_token(key_name)? {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(false),
        };

        Ok(self
            .validator_for(key_name)
            .is_some_and(|validate| validate(&token)))
    }

    fn validator_for(&self, key_name: &str) -> Option<Validator> {
        self.token_keys
            .borrow()
            .get(key_name)
            .map(|entry| entry.validate.clone())
    }

    fn ensure_browser(&self) -> Result<(), TokenServiceError> {
        if (self.environment)() {
            Ok(())
        } else {
            Err(TokenServiceError::Environment)
        }
    }
}
