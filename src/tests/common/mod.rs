// tests/common/mod.rs
use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::storage::MemoryStorage;
use crate::tokens::TokenService;

pub fn in_browser() -> bool {
    true
}

pub fn outside_browser() -> bool {
    false
}

/// Token service that believes it runs in a page, over `storage`.
pub fn browser_tokens(storage: &MemoryStorage) -> TokenService {
    TokenService::new(storage.clone()).with_environment(in_browser)
}

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a plain-text fmt subscriber and return what it printed.
pub fn capture_tracing(f: impl FnOnce()) -> String {
    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
