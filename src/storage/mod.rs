//! Persistent key-value substrate behind the token store.
//!
//! Keys are the raw token key names: there is no namespacing, so any other
//! code sharing the same substrate and key names will collide.

pub mod browser;
pub mod memory;

pub use browser::BrowserStorage;
pub use memory::MemoryStorage;

use crate::errors::TokenServiceError;

/// Synchronous string storage, modelled on the DOM `Storage` interface.
pub trait TokenStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, TokenServiceError>;

    /// Overwrites any previous value under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), TokenServiceError>;

    /// No-op when nothing is stored under `key`.
    fn remove_item(&self, key: &str) -> Result<(), TokenServiceError>;
}
