//! Markdown format implementation
//!
//! Markdown is the pivot representation, so this format passes text through unchanged.
//! Registering it lets the registry detect `.md` files and convert them like any other format.

use crate::error::FormatError;
use crate::format::Format;
use crate::session::Session;

/// Format implementation for Markdown
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "GitHub-flavoured Markdown with stored image references"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _session: &mut Session<'_>) -> Result<String, FormatError> {
        Ok(source.to_string())
    }

    fn serialize(&self, markdown: &str, _session: &mut Session<'_>) -> Result<String, FormatError> {
        Ok(markdown.to_string())
    }
}
