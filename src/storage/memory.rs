use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::TokenServiceError;
use crate::storage::TokenStorage;

/// In-memory storage: key -> token value.
///
/// Clones share the same map, the way every script of a page shares one
/// `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing values, e.g. tokens left over from a previous session.
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<HashMap<_, _>>();
        Self { inner: Rc::new(RefCell::new(map)) }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl TokenStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, TokenServiceError> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), TokenServiceError> {
        self.inner
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), TokenServiceError> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}
