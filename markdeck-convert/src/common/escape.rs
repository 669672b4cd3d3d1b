//! Text helpers shared by both conversion directions

use once_cell::sync::Lazy;
use regex::Regex;

static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

/// Escape text for use in element content or a quoted attribute value.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Collapse any run of whitespace to a single space, as HTML rendering does.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Trim every line and drop leading/trailing blank lines.
pub fn tidy_lines(s: &str) -> String {
    let lines: Vec<&str> = s.split('\n').map(str::trim).collect();
    lines.join("\n").trim_matches('\n').to_string()
}

/// Collapse three or more consecutive newlines to two and trim the result.
pub fn normalize_blank_lines(s: &str) -> String {
    EXCESS_NEWLINES.replace_all(s, "\n\n").trim().to_string()
}

/// Fallback rendering for text that could not be converted: escaped, newlines as `<br>`.
pub fn plain_text_to_html(s: &str) -> String {
    html_escape(s).replace("\r\n", "\n").replace('\n', "<br>\n")
}

/// Strip anything that looks like a tag, keeping the text between tags.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Longest run of consecutive `ch` in `s`.
pub fn longest_run(s: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in s.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
