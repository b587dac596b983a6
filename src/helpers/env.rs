//! Host environment detection.

/// Check consulted by the token store before every storage access.
pub type EnvironmentCheck = fn() -> bool;

/// True iff the code runs inside a browser document context,
/// i.e. a global `window` exists and exposes a `document`.
#[cfg(target_arch = "wasm32")]
pub fn is_browser_environment() -> bool {
    web_sys::window()
        .and_then(|window| window.document())
        .is_some()
}

/// Native targets never have a browser document.
#[cfg(not(target_arch = "wasm32"))]
pub fn is_browser_environment() -> bool {
    false
}
