//! HTML format implementation
//!
//! This module implements bidirectional conversion between Markdown and editor HTML.
//!
//! # Library Choice
//!
//! - `comrak` renders markdown. Its AST is rewritten in place (code blocks and images) before
//!   formatting, so the rest of the document keeps comrak's GitHub-flavoured output.
//! - `html5ever` + `markup5ever_rcdom` parse HTML back. The reverse pass walks the DOM
//!   structurally, which keeps nested lists and code containing angle brackets intact.
//!
//! # Element Mapping Table
//!
//! | Markdown                    | HTML                                                          | Reverse Notes                              |
//! |-----------------------------|---------------------------------------------------------------|--------------------------------------------|
//! | Heading                     | `<hN>`                                                        | `#`×N prefix                               |
//! | Paragraph                   | `<p>`                                                         | Text followed by a blank line              |
//! | Hard break                  | `<br />`                                                      | Newline                                    |
//! | Bold / Italic / Strike      | `<strong>` / `<em>` / `<del>`                                 | Also accepts `b`, `i`, `s`                 |
//! | Inline code                 | `<code>`                                                      | Backtick span, fence grows as needed       |
//! | Link                        | `<a href title>`                                              | Bare URL when text equals href             |
//! | List                        | `<ul>` / `<ol start>`                                         | `-` / `N.`, nested levels indented         |
//! | Task item                   | `<input type="checkbox">`                                     | `[x] ` / `[ ] `                            |
//! | Blockquote / Rule           | `<blockquote>` / `<hr />`                                     | `> ` prefix / `---`                        |
//! | Table                       | `<table>` with `align`                                        | GFM pipe table with alignment row          |
//! | Fenced code `lang:file`     | `<div class="code-block-wrapper" data-language data-filename>` | Info string rebuilt from the data attributes |
//! | Image `![a](u){w=..}`       | `<img class="markdown-image" style data-width ...>`           | Suffix rebuilt from the `data-*` mirrors   |
//! | Stored image `stored:<id>`  | `<img class="... stored-image" data-stored-id>`               | See image resolution below                 |
//! | Missing stored image        | `<img src="image-not-found:<id>" class="... image-not-found">`| Back to `stored:<id>`                      |
//!
//! # Image Resolution
//!
//! The reverse pass turns each `<img>` back into a target in this order:
//! 1. `data-stored-id` attribute
//! 2. `stored-image` class (or a data URL) found in the session's reverse map
//! 3. A scan of the image store by payload (`full_scan_fallback`)
//! 4. The literal `src`, data URLs included
//!
//! # Lossy Conversions
//!
//! - Markdown escapes are not re-inserted, so literal `*` in text comes back unescaped
//! - Loose lists come back tight
//! - Attribute blocks written on the URL or title come back after the closing paren
//! - Two stored images with byte-identical payloads are told apart only by `data-stored-id`

mod parser;
mod render;
mod serializer;

pub use parser::parse_to_markdown;
pub use render::{render_code_block, render_image, ImageElement, ImageSource, COPY_SCRIPT};
pub use serializer::serialize_to_html;

use crate::error::FormatError;
use crate::format::Format;
use crate::session::Session;

/// Format implementation for editor HTML
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Editor HTML with enhanced code blocks and stored images"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, session: &mut Session<'_>) -> Result<String, FormatError> {
        Ok(session.html_to_markdown(source))
    }

    fn serialize(&self, markdown: &str, session: &mut Session<'_>) -> Result<String, FormatError> {
        Ok(session.markdown_to_html(markdown))
    }
}
