//! Code fence info strings
//!
//! A fence info string is `language`, `language:filename`, or empty:
//!
//! ~~~text
//! ```python:app.py
//! ~~~
//!
//! The forward pass renders the filename (or language) as a header above the block. The
//! reverse pass rebuilds the info string, preferring the language token recorded at render
//! time and falling back to [`language_for_filename`] when only a filename survived.

use std::path::Path;

/// Parsed fence info string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlockInfo {
    /// Language token; empty when none was given.
    pub language: String,
    pub filename: Option<String>,
}

impl CodeBlockInfo {
    /// Parse `info := [language][":" filename]`, splitting on the first colon.
    pub fn parse(info: &str) -> Self {
        let info = info.trim();
        match info.split_once(':') {
            Some((language, filename)) => {
                let filename = filename.trim();
                Self {
                    language: language.trim().to_string(),
                    filename: (!filename.is_empty()).then(|| filename.to_string()),
                }
            }
            None => Self {
                language: info.to_string(),
                filename: None,
            },
        }
    }

    /// Text shown in the block header: filename, else language, else `text`.
    pub fn header_label(&self) -> &str {
        match &self.filename {
            Some(filename) => filename,
            None if !self.language.is_empty() => &self.language,
            None => "text",
        }
    }

    /// CSS class for the code element, from the first word of the language.
    pub fn css_class(&self) -> Option<String> {
        self.language
            .split_whitespace()
            .next()
            .map(|lang| format!("language-{lang}"))
    }

    /// Rebuild the fence info string.
    ///
    /// With a filename and no language, the language is derived from the extension.
    pub fn to_info_string(&self) -> String {
        match &self.filename {
            Some(filename) => {
                let language = if self.language.is_empty() {
                    language_for_filename(filename).unwrap_or("text")
                } else {
                    self.language.as_str()
                };
                format!("{language}:{filename}")
            }
            None => self.language.clone(),
        }
    }
}

/// Map a filename's extension to a fence language.
pub fn language_for_filename(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();

    let language = match extension.as_str() {
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "tsx",
        "vue" => "vue",
        "py" | "pyw" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "swift" => "swift",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "sh" | "bash" => "bash",
        "zsh" => "zsh",
        "ps1" => "powershell",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "less" => "less",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "md" | "markdown" => "markdown",
        "sql" => "sql",
        "dockerfile" => "dockerfile",
        "lua" => "lua",
        "r" => "r",
        "dart" => "dart",
        "scala" => "scala",
        "ex" | "exs" => "elixir",
        "hs" => "haskell",
        _ => return None,
    };
    Some(language)
}

/// Escape code for a double-quoted JS string literal inside an inline event-handler attribute.
///
/// The result still needs attribute escaping before it is placed in markup.
pub fn escape_for_handler(code: &str) -> String {
    let mut escaped = String::with_capacity(code.len());
    for ch in code.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
