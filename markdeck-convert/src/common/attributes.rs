//! Image dimension attributes
//!
//! Images may carry a `{key=value ...}` block directly after the markdown target:
//!
//! ```text
//! ![Diagram](diagram.png){width=600px height=400px}
//! ```
//!
//! Values are kept as the author wrote them. Unit inference only happens when a CSS
//! declaration list is synthesized from them, and the literal values travel through the
//! rendered HTML as `data-*` mirrors so the reverse pass can restore `width=400` and
//! `width=400px` to exactly what was typed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Attribute keys that influence rendering, in emission order.
pub const KNOWN_KEYS: [&str; 3] = ["width", "height", "max-width"];

static ATTRIBUTE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9_-]+)=([^\s}]+)").expect("valid attribute regex"));

static LEADING_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([^{}\n]*)\}").expect("valid leading block regex"));

static TRAILING_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}\n]*)\}\s*$").expect("valid trailing block regex"));

/// Parsed `key=value` pairs of one attribute block.
///
/// Unknown keys are retained. A repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAttributes {
    values: HashMap<String, String>,
}

impl ImageAttributes {
    /// Parse the inside of an attribute block (without the braces).
    pub fn parse(input: &str) -> Self {
        let mut values = HashMap::new();
        for caps in ATTRIBUTE_TOKEN.captures_iter(input) {
            values.insert(caps[1].to_string(), caps[2].to_string());
        }
        Self { values }
    }

    /// Build from `(key, value)` pairs, e.g. the `data-*` mirrors of a rendered image.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn width(&self) -> Option<&str> {
        self.get("width")
    }

    pub fn height(&self) -> Option<&str> {
        self.get("height")
    }

    pub fn max_width(&self) -> Option<&str> {
        self.get("max-width")
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The known keys that are present, in emission order.
    pub fn known(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        KNOWN_KEYS
            .iter()
            .filter_map(|&key| self.get(key).map(|value| (key, value)))
    }

    /// Synthesize the inline CSS declaration list.
    ///
    /// Order: width, height, max-width, implicit `max-width: 100%`, implicit `height: auto`.
    pub fn css_style(&self) -> String {
        let mut declarations = Vec::new();
        let width = self.width();

        if let Some(w) = width {
            declarations.push(format!("width: {}", with_unit(w, true)));
        }
        if let Some(h) = self.height() {
            declarations.push(format!("height: {}", with_unit(h, true)));
        }
        if let Some(m) = self.max_width() {
            declarations.push(format!("max-width: {}", with_unit(m, false)));
        }
        if let Some(w) = width {
            if w != "auto" && !w.ends_with('%') && self.max_width().is_none() {
                declarations.push("max-width: 100%".to_string());
            }
            if self.height().is_none() {
                declarations.push("height: auto".to_string());
            }
        }

        declarations.join("; ")
    }

    /// Re-emit the literal `{...}` suffix from the known keys, or an empty string.
    pub fn to_suffix(&self) -> String {
        let tokens: Vec<String> = self
            .known()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if tokens.is_empty() {
            String::new()
        } else {
            format!("{{{}}}", tokens.join(" "))
        }
    }
}

fn with_unit(value: &str, allow_auto: bool) -> String {
    let has_unit = ["px", "%", "em", "rem"]
        .iter()
        .any(|unit| value.ends_with(unit));
    if has_unit || (allow_auto && value == "auto") {
        value.to_string()
    } else {
        format!("{value}px")
    }
}

/// Split a trailing `{...}` block off `text`, returning the remainder and the block contents.
pub fn split_trailing_block(text: &str) -> Option<(&str, &str)> {
    let caps = TRAILING_BLOCK.captures(text)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1)?;
    Some((text[..whole.start()].trim_end(), inner.as_str()))
}

/// Match a `{...}` block at the very start of `text`, returning its contents and total length.
pub fn match_leading_block(text: &str) -> Option<(&str, usize)> {
    let caps = LEADING_BLOCK.captures(text)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1)?;
    Some((inner.as_str(), whole.end()))
}
