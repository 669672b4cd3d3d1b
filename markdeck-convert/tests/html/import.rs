//! Import tests for HTML format (HTML → Markdown)
//!
//! Inputs here are what the editing surface hands back: rendered HTML after the user (or the
//! browser) has touched it.

use crate::common::{fixture_store, CAT_DATA, DOG_DATA};
use insta::assert_snapshot;
use markdeck_convert::{
    html_to_markdown, html_to_markdown_with_options, markdown_to_html, ConvertOptions,
    MemoryImageStore, ReverseImageMap,
};

/// Helper to reconstruct markdown against an empty store
fn html_to_md(html: &str) -> String {
    let store = MemoryImageStore::new();
    let map = ReverseImageMap::new();
    html_to_markdown(html, &store, &map)
}

// ============================================================================
// STRUCTURE
// ============================================================================

#[test]
fn test_empty_and_whitespace_input() {
    assert_eq!(html_to_md(""), "");
    assert_eq!(html_to_md("  \n "), "");
}

#[test]
fn test_nested_list_in_ordered_list() {
    let md = html_to_md(
        "<ol>\n<li>First\n<ul>\n<li>Alpha</li>\n<li>Beta</li>\n</ul>\n</li>\n\
         <li>Second\n<ul>\n<li>Gamma</li>\n</ul>\n</li>\n<li>Third</li>\n</ol>",
    );
    assert_snapshot!(md, @r"
1. First
  - Alpha
  - Beta
2. Second
  - Gamma
3. Third
");
}

#[test]
fn test_three_level_list_with_inline_markup() {
    let md = html_to_md(
        "<ul><li><strong>Top</strong> level<ul><li>Middle<ol><li>Deep <em>one</em></li>\
         <li>Deep two</li></ol></li></ul></li></ul>",
    );
    assert_snapshot!(md, @r"
- **Top** level
  - Middle
    1. Deep *one*
    2. Deep two
");
}

#[test]
fn test_custom_list_indent() {
    let store = MemoryImageStore::new();
    let map = ReverseImageMap::new();
    let md = html_to_markdown_with_options(
        "<ul><li>a<ul><li>b</li></ul></li></ul>",
        &store,
        &map,
        &ConvertOptions::default().with_list_indent("    "),
    );
    assert_eq!(md, "- a\n    - b");
}

#[test]
fn test_wysiwyg_edited_paragraphs() {
    // Browsers wrap new lines in divs and sprinkle nbsp
    let md = html_to_md("<div>first line</div><div>second&nbsp;line</div><div><br></div>");
    assert_eq!(md, "first line\n\nsecond line");
}

#[test]
fn test_heading_levels() {
    let md = html_to_md("<h1>One</h1><h3>Three</h3><h6>Six</h6>");
    assert_eq!(md, "# One\n\n### Three\n\n###### Six");
}

#[test]
fn test_pasted_presentational_tags() {
    let md = html_to_md("<p><b>bold</b> <i>italic</i> <s>gone</s> <span style=\"color:red\">red</span></p>");
    assert_eq!(md, "**bold** *italic* ~~gone~~ red");
}

#[test]
fn test_malformed_html_degrades_to_text() {
    assert_eq!(html_to_md("<div><p>unclosed <em>tags"), "unclosed *tags*");
    assert_eq!(html_to_md("plain text, no tags"), "plain text, no tags");
    assert_eq!(html_to_md("<<>>"), "<<>>");
}

#[test]
fn test_deeply_nested_markup_is_reduced_to_text() {
    let divs = format!("{}x", "<div>".repeat(20_000));
    assert_eq!(html_to_md(&divs), "x");

    let spans = format!("<p>{}deep</p>", "<span><b>".repeat(5_000));
    assert!(html_to_md(&spans).contains("deep"));
}

// ============================================================================
// CODE BLOCKS
// ============================================================================

#[test]
fn test_code_block_after_wysiwyg_edit() {
    // The header label was edited away; the data attributes still carry the info string
    let md = html_to_md(
        "<div class=\"code-block-wrapper\" data-language=\"jsx\" data-filename=\"app.js\">\
         <pre><code class=\"language-jsx\">const a = &lt;App /&gt;;</code></pre></div>",
    );
    assert_eq!(md, "```jsx:app.js\nconst a = <App />;\n```");
}

#[test]
fn test_code_block_language_from_header_only() {
    let md = html_to_md(
        "<div class=\"code-block-wrapper\"><div class=\"code-block-header\">\
         <span class=\"code-block-language\">ruby</span><button>Copy</button></div>\
         <pre><code>puts 1</code></pre></div>",
    );
    assert_eq!(md, "```ruby\nputs 1\n```");
}

// ============================================================================
// IMAGES
// ============================================================================

#[test]
fn test_resize_handles_are_stripped() {
    let store = fixture_store();
    let map = ReverseImageMap::new();
    let html = format!(
        "<p><span class=\"image-container\"><img src=\"{CAT_DATA}\" alt=\"Cat\" \
         class=\"markdown-image stored-image\" data-stored-id=\"cat\" data-width=\"300\">\
         <span class=\"resize-handle resize-handle-se\"></span>\
         <div class=\"image-resize-handle\">⇲</div></span></p>"
    );
    assert_eq!(
        html_to_markdown(&html, &store, &map),
        "![Cat](stored:cat){width=300}"
    );
}

#[test]
fn test_stale_reverse_map_falls_back_to_store_scan() {
    let store = fixture_store();
    let mut map = ReverseImageMap::new();

    let html_a = markdown_to_html("![Cat](stored:cat)", &store, &mut map);
    // A second document is rendered before the first one is saved
    markdown_to_html("![Dog](stored:dog)", &store, &mut map);
    assert_eq!(map.get(CAT_DATA), None);

    // The editor dropped the id marker, leaving only the class
    let edited = html_a.replace(" data-stored-id=\"cat\"", "");
    assert!(!edited.contains("data-stored-id"));
    assert_eq!(html_to_markdown(&edited, &store, &map), "![Cat](stored:cat)");
}

#[test]
fn test_data_url_without_record_stays_literal() {
    let store = fixture_store();
    let map = ReverseImageMap::new();
    let html = "<img src=\"data:image/gif;base64,R0lGODlh\" alt=\"Pasted\">";
    assert_eq!(
        html_to_markdown(html, &store, &map),
        "![Pasted](data:image/gif;base64,R0lGODlh)"
    );
}

#[test]
fn test_scan_disabled_keeps_payload() {
    let store = fixture_store();
    let map = ReverseImageMap::new();
    let html = format!("<img src=\"{CAT_DATA}\" alt=\"Cat\" class=\"markdown-image stored-image\">");
    let md = html_to_markdown_with_options(
        &html,
        &store,
        &map,
        &ConvertOptions::default().with_full_scan_fallback(false),
    );
    assert_eq!(md, format!("![Cat]({CAT_DATA})"));
}

#[test]
fn test_identical_payloads_resolve_by_marker_only() {
    let store = fixture_store();
    let map = ReverseImageMap::new();

    let marked = format!("<img src=\"{DOG_DATA}\" alt=\"\" data-stored-id=\"dog-copy\">");
    assert_eq!(html_to_markdown(&marked, &store, &map), "![](stored:dog-copy)");

    // Without the marker the payload is ambiguous and the first record wins
    let unmarked = format!("<img src=\"{DOG_DATA}\" alt=\"\">");
    assert_eq!(html_to_markdown(&unmarked, &store, &map), "![](stored:dog)");
}

#[test]
fn test_remote_image_with_title_and_mirrors() {
    let md = html_to_md(
        "<img src=\"https://example.com/p.png\" alt=\"P\" title=\"Say &quot;hi&quot;\" \
         data-height=\"200\" data-width=\"50%\">",
    );
    assert_eq!(
        md,
        "![P](https://example.com/p.png \"Say \\\"hi\\\"\"){width=50% height=200}"
    );
}
