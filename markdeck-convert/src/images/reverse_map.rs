//! Payload → stored id cache
//!
//! Filled by every forward conversion with the payloads it embedded, so that the reverse
//! pass can turn an `<img src="data:...">` back into `stored:<id>` without scanning the
//! whole store. It only reflects the most recent forward conversion it was passed to; a
//! miss is not authoritative and callers fall back to [`crate::images::ImageStore::find_by_data`].

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ReverseImageMap {
    entries: HashMap<String, String>,
}

impl ReverseImageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Record that `payload` was rendered from the stored image `id`.
    pub fn put(&mut self, payload: impl Into<String>, id: impl Into<String>) {
        self.entries.insert(payload.into(), id.into());
    }

    pub fn get(&self, payload: &str) -> Option<&str> {
        self.entries.get(payload).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
