use crate::errors::TokenServiceError;
use crate::storage::TokenStorage;

/// `window.localStorage`, looked up on every call so a storage that becomes
/// unavailable (private mode, revoked permission) is reported, not cached.
///
/// On non-wasm targets there is no browser and every call fails with
/// [`TokenServiceError::Environment`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
mod host {
    use wasm_bindgen::JsValue;
    use web_sys::Storage;

    use crate::errors::TokenServiceError;

    pub fn local_storage() -> Result<Storage, TokenServiceError> {
        let window = web_sys::window().ok_or(TokenServiceError::Environment)?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| TokenServiceError::Storage("localStorage is not available".to_owned()))
    }

    pub fn js_error(err: JsValue) -> TokenServiceError {
        TokenServiceError::Storage(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, TokenServiceError> {
        host::local_storage()?.get_item(key).map_err(host::js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), TokenServiceError> {
        host::local_storage()?
            .set_item(key, value)
            .map_err(host::js_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), TokenServiceError> {
        host::local_storage()?
            .remove_item(key)
            .map_err(host::js_error)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TokenStorage for BrowserStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, TokenServiceError> {
        Err(TokenServiceError::Environment)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), TokenServiceError> {
        Err(TokenServiceError::Environment)
    }

    fn remove_item(&self, _key: &str) -> Result<(), TokenServiceError> {
        Err(TokenServiceError::Environment)
    }
}
