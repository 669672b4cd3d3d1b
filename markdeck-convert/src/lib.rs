//! Markdown ↔ HTML conversion for the markdeck editor
//!
//!     This crate renders the editor's markdown into the HTML shown in the preview/WYSIWYG
//!     surface, and reconstructs markdown from that HTML after the user edits it. Content must
//!     survive any number of such cycles, which is what makes the two directions a pair rather
//!     than two independent converters: every construct the forward pass decorates (code blocks
//!     with headers, dimensioned images, images kept in the image store) carries enough markup
//!     for the reverse pass to restore the exact source.
//!
//!     This is a pure lib: no printing, no env vars, no filesystem access except the explicit
//!     image store loaders. The markdeck cli is one shell over it, the editor another.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── options.rs              # ConvertOptions
//!     ├── session.rs              # Store + reverse map bundle for an editing session
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── images                  # StoredImage, ImageStore, ReverseImageMap
//!     ├── common                  # Attribute blocks, fence info strings, text helpers
//!     └── formats
//!         ├── html
//!         │   ├── render.rs       # Code block / image fragments, COPY_SCRIPT
//!         │   ├── serializer.rs   # Markdown → HTML
//!         │   └── parser.rs       # HTML → Markdown
//!         └── markdown            # Pivot format (identity)
//!
//! Stored Images
//!
//!     Images live outside the document and are referenced as `![alt](stored:<id>)`. The forward
//!     pass embeds the record's data URL and records `payload → id` in a [`ReverseImageMap`].
//!     The map is an explicit value owned by the caller (or by a [`Session`]) and is rebuilt on
//!     every forward conversion. The reverse pass prefers the `data-stored-id` marker, then the
//!     map, then a scan of the store, so stale maps cost speed but never lose references.
//!
//! Failure Policy
//!
//!     [`markdown_to_html`] and [`html_to_markdown`] are total. Pipeline errors and panics from
//!     the underlying parsers are logged and replaced by a plain-text rendering of the input;
//!     the editor never goes blank. The fallible pipelines are available as
//!     [`formats::html::serialize_to_html`] and [`formats::html::parse_to_markdown`].
//!
//! Testing
//!     tests
//!     ├── lib.rs              # entry point, includes the modules below
//!     ├── common              # fixture image store
//!     ├── html
//!     │   ├── export.rs       # markdown → HTML
//!     │   └── import.rs       # HTML → markdown
//!     └── roundtrip.rs        # both directions, properties and fuzzing
//!
pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod images;
pub mod options;
pub mod registry;
pub mod session;

pub use error::{FormatError, ImageStoreError};
pub use format::Format;
pub use formats::html::COPY_SCRIPT;
pub use images::{ImageStore, MemoryImageStore, ReverseImageMap, StoredImage};
pub use options::ConvertOptions;
pub use registry::FormatRegistry;
pub use session::Session;

use common::escape::{normalize_blank_lines, plain_text_to_html, strip_tags};
use std::panic::{self, AssertUnwindSafe};

/// Render markdown to editor HTML with default options.
///
/// `reverse_map` is cleared and refilled with every stored image embedded.
pub fn markdown_to_html(
    markdown: &str,
    store: &dyn ImageStore,
    reverse_map: &mut ReverseImageMap,
) -> String {
    markdown_to_html_with_options(markdown, store, reverse_map, &ConvertOptions::default())
}

/// Render markdown to editor HTML.
///
/// Never fails: on error the input is returned escaped, with newlines as `<br>`.
pub fn markdown_to_html_with_options(
    markdown: &str,
    store: &dyn ImageStore,
    reverse_map: &mut ReverseImageMap,
    options: &ConvertOptions,
) -> String {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        formats::html::serialize_to_html(markdown, store, reverse_map, options)
    }));

    match result {
        Ok(Ok(html)) => html,
        Ok(Err(err)) => {
            log::error!("Markdown rendering failed, falling back to plain text: {err}");
            plain_text_to_html(markdown)
        }
        Err(_) => {
            log::error!("Markdown renderer panicked, falling back to plain text");
            plain_text_to_html(markdown)
        }
    }
}

/// Reconstruct markdown from editor HTML with default options.
pub fn html_to_markdown(html: &str, store: &dyn ImageStore, reverse_map: &ReverseImageMap) -> String {
    html_to_markdown_with_options(html, store, reverse_map, &ConvertOptions::default())
}

/// Reconstruct markdown from editor HTML.
///
/// Never fails: on error the text content of the input is returned.
pub fn html_to_markdown_with_options(
    html: &str,
    store: &dyn ImageStore,
    reverse_map: &ReverseImageMap,
    options: &ConvertOptions,
) -> String {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        formats::html::parse_to_markdown(html, store, reverse_map, options)
    }));

    match result {
        Ok(Ok(markdown)) => markdown,
        Ok(Err(err)) => {
            log::error!("HTML reconstruction failed, falling back to text content: {err}");
            normalize_blank_lines(&strip_tags(html))
        }
        Err(_) => {
            log::error!("HTML parser panicked, falling back to text content");
            normalize_blank_lines(&strip_tags(html))
        }
    }
}
