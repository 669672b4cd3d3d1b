//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! Markdown is the pivot representation: every format parses *to* markdown and serializes
//! *from* markdown, so converting between two formats is always `parse` then `serialize`.

use crate::error::FormatError;
use crate::session::Session;

/// Trait for document formats
///
/// Implementors convert between their own text representation and markdown. Both directions
/// receive the editing [`Session`], which carries the image store and the reverse map filled
/// by the last render.
///
/// # Examples
///
/// ```ignore
/// struct ShoutFormat;
///
/// impl Format for ShoutFormat {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, markdown: &str, _session: &mut Session<'_>) -> Result<String, FormatError> {
///         Ok(markdown.to_uppercase())
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "html")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["md", "markdown"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → markdown)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (markdown → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into markdown
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str, _session: &mut Session<'_>) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize markdown into this format
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _markdown: &str, _session: &mut Session<'_>) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
