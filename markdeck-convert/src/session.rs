//! Editing session
//!
//!     A session ties one image store to the reverse map its forward conversions fill, so an
//!     editor can render a document, let the user edit it, and save it back without threading
//!     the map through every call. Two documents edited side by side should each get their own
//!     session; sharing one only costs the fast path, never correctness, since a map miss falls
//!     back to scanning the store.

use crate::images::{ImageStore, ReverseImageMap};
use crate::options::ConvertOptions;

pub struct Session<'s> {
    store: &'s dyn ImageStore,
    reverse_map: ReverseImageMap,
    options: ConvertOptions,
}

impl<'s> Session<'s> {
    pub fn new(store: &'s dyn ImageStore) -> Self {
        Self::with_options(store, ConvertOptions::default())
    }

    pub fn with_options(store: &'s dyn ImageStore, options: ConvertOptions) -> Self {
        Session {
            store,
            reverse_map: ReverseImageMap::new(),
            options,
        }
    }

    pub fn store(&self) -> &'s dyn ImageStore {
        self.store
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Payloads embedded by the most recent [`Session::markdown_to_html`] call.
    pub fn reverse_map(&self) -> &ReverseImageMap {
        &self.reverse_map
    }

    /// Render markdown, replacing the session's reverse map.
    pub fn markdown_to_html(&mut self, markdown: &str) -> String {
        crate::markdown_to_html_with_options(
            markdown,
            self.store,
            &mut self.reverse_map,
            &self.options,
        )
    }

    /// Reconstruct markdown from HTML rendered (and possibly edited) in this session.
    pub fn html_to_markdown(&self, html: &str) -> String {
        crate::html_to_markdown_with_options(html, self.store, &self.reverse_map, &self.options)
    }
}
