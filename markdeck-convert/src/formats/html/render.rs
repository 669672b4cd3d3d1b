//! HTML fragments emitted by the markdown renderer
//!
//! Class names and `data-*` attributes written here are the contract the reverse pass
//! (see `parser.rs`) reads back, so both sides share the constants below.

use crate::common::attributes::ImageAttributes;
use crate::common::code_block::{escape_for_handler, CodeBlockInfo};
use crate::common::escape::html_escape;
use crate::options::ConvertOptions;

pub const CODE_WRAPPER_CLASS: &str = "code-block-wrapper";
pub const CODE_HEADER_CLASS: &str = "code-block-header";
pub const CODE_FILENAME_CLASS: &str = "code-block-filename";
pub const CODE_LANGUAGE_CLASS: &str = "code-block-language";
pub const COPY_BUTTON_CLASS: &str = "code-copy-button";

pub const IMAGE_CLASS: &str = "markdown-image";
pub const STORED_IMAGE_CLASS: &str = "stored-image";
pub const MISSING_IMAGE_CLASS: &str = "image-not-found";
pub const STORED_ID_ATTR: &str = "data-stored-id";
pub const DEFAULT_ALT_ATTR: &str = "data-default-alt";

/// Classes of nodes injected by interactive editing that never belong in saved markdown.
pub const TRANSIENT_CLASSES: &[&str] = &["resize-handle", "image-resize-handle"];

/// Host-page helper invoked by the copy control of every rendered code block.
pub const COPY_SCRIPT: &str = r#"function markdeckCopyCode(button, code, resetMs) {
  var label = button.getAttribute('data-label') || button.textContent;
  var settle = function (text) {
    button.textContent = text;
    setTimeout(function () { button.textContent = label; }, resetMs);
  };
  if (!navigator.clipboard) {
    settle('Failed');
    return;
  }
  navigator.clipboard.writeText(code).then(
    function () { settle('Copied!'); },
    function () { settle('Failed'); }
  );
}
"#;

/// Render a fenced code block with its header and copy control.
pub fn render_code_block(info: &CodeBlockInfo, code: &str, options: &ConvertOptions) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<div class=\"{CODE_WRAPPER_CLASS}\" data-language=\"{}\"",
        html_escape(&info.language)
    ));
    if let Some(filename) = &info.filename {
        html.push_str(&format!(" data-filename=\"{}\"", html_escape(filename)));
    }
    html.push_str(">\n");

    let label_class = if info.filename.is_some() {
        CODE_FILENAME_CLASS
    } else {
        CODE_LANGUAGE_CLASS
    };
    let copy_label = html_escape(&options.copy_label);
    html.push_str(&format!(
        "<div class=\"{CODE_HEADER_CLASS}\"><span class=\"{label_class}\">{}</span>",
        html_escape(info.header_label())
    ));
    html.push_str(&format!(
        "<button type=\"button\" class=\"{COPY_BUTTON_CLASS}\" data-label=\"{copy_label}\" \
         onclick='markdeckCopyCode(this, \"{}\", {})'>{copy_label}</button></div>\n",
        html_escape(&escape_for_handler(code)),
        options.copy_feedback_ms
    ));

    match info.css_class() {
        Some(class) => html.push_str(&format!("<pre><code class=\"{}\">", html_escape(&class))),
        None => html.push_str("<pre><code>"),
    }
    html.push_str(&html_escape(code));
    html.push_str("</code></pre>\n</div>\n");

    html
}

/// Where a rendered image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// A literal URL written in the markdown.
    Literal,
    /// A `stored:<id>` reference resolved from the image store.
    Stored { id: &'a str, default_alt: bool },
    /// A `stored:<id>` reference whose image is missing.
    Missing { id: &'a str },
}

/// Everything needed to emit one `<img>`.
#[derive(Debug, Clone)]
pub struct ImageElement<'a> {
    pub src: &'a str,
    pub alt: &'a str,
    pub title: Option<&'a str>,
    pub attributes: &'a ImageAttributes,
    pub source: ImageSource<'a>,
}

/// Render an annotated `<img>` element.
///
/// Known attributes are mirrored as `data-*` so the literal values survive the round trip.
pub fn render_image(image: &ImageElement<'_>) -> String {
    let mut html = format!(
        "<img src=\"{}\" alt=\"{}\"",
        html_escape(image.src),
        html_escape(image.alt)
    );
    if let Some(title) = image.title {
        html.push_str(&format!(" title=\"{}\"", html_escape(title)));
    }

    let class = match image.source {
        ImageSource::Literal => IMAGE_CLASS.to_string(),
        ImageSource::Stored { .. } => format!("{IMAGE_CLASS} {STORED_IMAGE_CLASS}"),
        ImageSource::Missing { .. } => format!("{IMAGE_CLASS} {MISSING_IMAGE_CLASS}"),
    };
    html.push_str(&format!(" class=\"{class}\""));

    match image.source {
        ImageSource::Stored { id, default_alt } => {
            html.push_str(&format!(" {STORED_ID_ATTR}=\"{}\"", html_escape(id)));
            if default_alt {
                html.push_str(&format!(" {DEFAULT_ALT_ATTR}=\"true\""));
            }
        }
        ImageSource::Missing { .. } | ImageSource::Literal => {}
    }

    let style = image.attributes.css_style();
    if !style.is_empty() {
        html.push_str(&format!(" style=\"{}\"", html_escape(&style)));
    }
    for (key, value) in image.attributes.known() {
        html.push_str(&format!(" data-{key}=\"{}\"", html_escape(value)));
    }

    html.push_str(" />");
    html
}
