//! Export tests for HTML format (Markdown → HTML)
//!
//! These tests verify the markup the editor relies on: enhanced code blocks, annotated
//! images and the stored image bookkeeping.

use crate::common::{fixture_store, CAT_DATA, DOG_DATA};
use insta::assert_snapshot;
use markdeck_convert::common::code_block::CodeBlockInfo;
use markdeck_convert::formats::html::render_code_block;
use markdeck_convert::{
    markdown_to_html, markdown_to_html_with_options, ConvertOptions, MemoryImageStore,
    ReverseImageMap, COPY_SCRIPT,
};

/// Helper to render markdown against an empty store
fn md_to_html(markdown: &str) -> String {
    let store = MemoryImageStore::new();
    let mut map = ReverseImageMap::new();
    markdown_to_html(markdown, &store, &mut map)
}

// ============================================================================
// BASIC ELEMENT TESTS
// ============================================================================

#[test]
fn test_empty_and_whitespace_input() {
    assert_eq!(md_to_html(""), "");
    assert_eq!(md_to_html("   \n\n\t  "), "");
}

#[test]
fn test_heading_and_paragraph() {
    let html = md_to_html("# Title\n\nSome **bold** text.");
    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.contains("<p>Some <strong>bold</strong> text.</p>"));
}

#[test]
fn test_hard_breaks_follow_options() {
    assert!(md_to_html("one\ntwo").contains("one<br />\ntwo"));

    let store = MemoryImageStore::new();
    let mut map = ReverseImageMap::new();
    let html = markdown_to_html_with_options(
        "one\ntwo",
        &store,
        &mut map,
        &ConvertOptions::default().with_hard_breaks(false),
    );
    assert!(html.contains("<p>one\ntwo</p>"));
}

#[test]
fn test_raw_html_passes_through() {
    let html = md_to_html("<kbd>Ctrl</kbd> + C");
    assert!(html.contains("<kbd>Ctrl</kbd>"));
}

// ============================================================================
// CODE BLOCKS
// ============================================================================

#[test]
fn test_code_block_is_the_enhanced_block() {
    let html = md_to_html("```python:app.py\nprint(1)\n```");
    let expected = render_code_block(
        &CodeBlockInfo::parse("python:app.py"),
        "print(1)",
        &ConvertOptions::default(),
    );
    assert_eq!(html, expected);
    assert!(html.contains("app.py"));
    assert!(html.contains("print(1)"));
}

#[test]
fn test_code_block_header_fallbacks() {
    let with_language = md_to_html("```go\nfmt.Println()\n```");
    assert!(with_language.contains("<span class=\"code-block-language\">go</span>"));

    let bare = md_to_html("```\nplain\n```");
    assert!(bare.contains("<span class=\"code-block-language\">text</span>"));
    assert!(bare.contains("<pre><code>plain</code></pre>"));
}

#[test]
fn test_indented_code_block_is_enhanced() {
    let html = md_to_html("Intro\n\n    let x = 1;\n");
    assert!(html.contains("class=\"code-block-wrapper\""));
    assert!(html.contains("let x = 1;"));
}

#[test]
fn test_copy_handler_escapes_code() {
    let html = md_to_html("```js\nalert(\"hi\\n\")\n```");
    assert!(html.contains("onclick='markdeckCopyCode(this, \"alert(\\&quot;hi\\\\n\\&quot;)\", 2000)'"));
}

#[test]
fn test_copy_script_contract() {
    assert!(COPY_SCRIPT.contains("function markdeckCopyCode(button, code, resetMs)"));
    assert!(COPY_SCRIPT.contains("Copied!"));
    assert!(COPY_SCRIPT.contains("Failed"));
    assert!(COPY_SCRIPT.contains("data-label"));
}

#[test]
fn test_image_syntax_inside_code_is_literal() {
    let store = fixture_store();
    let mut map = ReverseImageMap::new();
    let html = markdown_to_html("```md\n![Cat](stored:cat){width=1}\n```", &store, &mut map);

    assert!(html.contains("![Cat](stored:cat){width=1}"));
    assert!(!html.contains(CAT_DATA));
    assert!(map.is_empty());
}

// ============================================================================
// IMAGES
// ============================================================================

#[test]
fn test_stored_image_markup() {
    let store = fixture_store();
    let mut map = ReverseImageMap::new();
    let html = markdown_to_html("![Cat](stored:cat){width=400}", &store, &mut map);

    assert_snapshot!(html.trim_end(), @r#"<p><img src="data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk" alt="Cat" class="markdown-image stored-image" data-stored-id="cat" style="width: 400px; max-width: 100%; height: auto" data-width="400" /></p>"#);
    assert_eq!(map.get(CAT_DATA), Some("cat"));
}

#[test]
fn test_stored_image_empty_alt_uses_name() {
    let store = fixture_store();
    let mut map = ReverseImageMap::new();
    let html = markdown_to_html("![](stored:dog)", &store, &mut map);

    assert!(html.contains("alt=\"dog.jpg\""));
    assert!(html.contains("data-default-alt=\"true\""));
    assert!(html.contains(DOG_DATA));
}

#[test]
fn test_missing_stored_image_degrades() {
    let store = fixture_store();
    let mut map = ReverseImageMap::new();
    let html = markdown_to_html("![A](stored:does-not-exist)", &store, &mut map);

    assert!(html.contains("src=\"image-not-found:does-not-exist\""));
    assert!(html.contains("class=\"markdown-image image-not-found\""));
    assert!(map.is_empty());
}

#[test]
fn test_reverse_map_is_rebuilt_each_call() {
    let store = fixture_store();
    let mut map = ReverseImageMap::new();

    markdown_to_html("![Cat](stored:cat)\n\n![Dog](stored:dog)", &store, &mut map);
    assert_eq!(map.len(), 2);

    markdown_to_html("![Dog](stored:dog)", &store, &mut map);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(CAT_DATA), None);
    assert_eq!(map.get(DOG_DATA), Some("dog"));

    markdown_to_html("", &store, &mut map);
    assert!(map.is_empty());
}

#[test]
fn test_literal_image_with_dimensions() {
    let html = md_to_html("![A](url){width=600px height=400px}");
    assert!(html.contains("src=\"url\""));
    assert!(html.contains("style=\"width: 600px; height: 400px; max-width: 100%\""));
    assert!(html.contains("data-width=\"600px\" data-height=\"400px\""));
    assert!(!html.contains('{'));
}

#[test]
fn test_literal_image_without_attributes_has_no_style() {
    let html = md_to_html("![A](a.png \"Title\")");
    assert!(html.contains("<img src=\"a.png\" alt=\"A\" title=\"Title\" class=\"markdown-image\" />"));
}

#[test]
fn test_adjacent_images_keep_their_own_attributes() {
    let html = md_to_html("![A](a.png){width=10}![B](b.png){height=5}");
    assert!(html.contains("src=\"a.png\" alt=\"A\" class=\"markdown-image\" style=\"width: 10px; max-width: 100%; height: auto\" data-width=\"10\""));
    assert!(html.contains("src=\"b.png\" alt=\"B\" class=\"markdown-image\" style=\"height: 5px\" data-height=\"5\""));
    assert!(!html.contains('{'));
}

#[test]
fn test_unknown_attribute_keys_are_not_mirrored() {
    let html = md_to_html("![A](a.png){width=10 loading=lazy}");
    assert!(html.contains("data-width=\"10\""));
    assert!(!html.contains("loading"));
}
