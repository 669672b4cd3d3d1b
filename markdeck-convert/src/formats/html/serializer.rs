//! Markdown → HTML rendering
//!
//! Pipeline: Markdown string → Comrak AST → rewrite code blocks and images in place → HTML string
//!
//! The AST is rewritten before formatting instead of pre-processing the source text, so that
//! image and attribute syntax inside code spans and fenced blocks is left alone.

use crate::common::attributes::{match_leading_block, split_trailing_block, ImageAttributes};
use crate::common::code_block::CodeBlockInfo;
use crate::error::FormatError;
use crate::formats::html::render::{
    render_code_block, render_image, ImageElement, ImageSource,
};
use crate::images::{ImageStore, ReverseImageMap, NOT_FOUND_SCHEME, STORED_SCHEME};
use crate::options::ConvertOptions;
use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use comrak::{format_html, parse_document, Arena, ComrakOptions};

/// Render markdown to HTML, repopulating `reverse_map` with every stored image embedded.
pub fn serialize_to_html(
    markdown: &str,
    store: &dyn ImageStore,
    reverse_map: &mut ReverseImageMap,
    options: &ConvertOptions,
) -> Result<String, FormatError> {
    reverse_map.clear();
    if markdown.trim().is_empty() {
        return Ok(String::new());
    }

    // Step 1: Markdown string → Comrak AST
    let arena = Arena::new();
    let comrak_options = default_comrak_options(options);
    let root = parse_document(&arena, markdown, &comrak_options);

    // Step 2: Replace code blocks and images with their annotated HTML.
    // Collect first: the rewrite detaches nodes.
    let nodes: Vec<&AstNode> = root.descendants().collect();
    for node in nodes {
        rewrite_node(node, store, reverse_map, options);
    }

    // Step 3: Comrak AST → HTML string
    let mut output = Vec::new();
    format_html(root, &comrak_options, &mut output)
        .map_err(|e| FormatError::SerializationError(format!("Comrak rendering failed: {e}")))?;

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}

fn default_comrak_options(options: &ConvertOptions) -> ComrakOptions<'static> {
    let mut comrak = ComrakOptions::default();
    comrak.extension.table = true;
    comrak.extension.strikethrough = true;
    comrak.extension.autolink = true;
    comrak.extension.tasklist = true;
    comrak.render.hardbreaks = options.hard_breaks;
    // Code blocks and images are injected as raw HTML
    comrak.render.unsafe_ = true;
    comrak
}

fn rewrite_node<'a>(
    node: &'a AstNode<'a>,
    store: &dyn ImageStore,
    reverse_map: &mut ReverseImageMap,
    options: &ConvertOptions,
) {
    let code_block = match &node.data.borrow().value {
        NodeValue::CodeBlock(block) => Some((block.info.clone(), block.literal.clone())),
        _ => None,
    };
    if let Some((info, literal)) = code_block {
        let code = literal.strip_suffix('\n').unwrap_or(&literal);
        let html = render_code_block(&CodeBlockInfo::parse(&info), code, options);
        node.data.borrow_mut().value = NodeValue::HtmlBlock(NodeHtmlBlock {
            block_type: 0,
            literal: html,
        });
        return;
    }

    let image = match &node.data.borrow().value {
        NodeValue::Image(link) => Some((link.url.clone(), link.title.clone())),
        _ => None,
    };
    if let Some((url, title)) = image {
        let html = image_html(node, url, title, store, reverse_map);
        for child in node.children().collect::<Vec<_>>() {
            child.detach();
        }
        node.data.borrow_mut().value = NodeValue::HtmlInline(html);
    }
}

fn image_html<'a>(
    node: &'a AstNode<'a>,
    url: String,
    title: String,
    store: &dyn ImageStore,
    reverse_map: &mut ReverseImageMap,
) -> String {
    let alt = collect_text(node);

    // Attribute blocks may sit on the URL, on the title, or right after the closing paren.
    let mut blocks = Vec::new();
    let (url, url_block) = strip_block(url);
    blocks.extend(url_block);
    let (title, title_block) = strip_block(title);
    blocks.extend(title_block);
    blocks.extend(take_attribute_suffix(node));
    let attributes = ImageAttributes::parse(&blocks.join(" "));

    let title = (!title.is_empty()).then_some(title.as_str());

    let Some(id) = url.strip_prefix(STORED_SCHEME).map(str::trim) else {
        return render_image(&ImageElement {
            src: &url,
            alt: &alt,
            title,
            attributes: &attributes,
            source: ImageSource::Literal,
        });
    };

    match store.get_image(id) {
        Some(image) => {
            reverse_map.put(image.data.as_str(), id);
            let default_alt = alt.is_empty() && !image.name.is_empty();
            let alt = if default_alt { image.name.as_str() } else { alt.as_str() };
            render_image(&ImageElement {
                src: &image.data,
                alt,
                title,
                attributes: &attributes,
                source: ImageSource::Stored { id, default_alt },
            })
        }
        None => {
            log::warn!("Stored image '{id}' not found, rendering placeholder");
            let src = format!("{NOT_FOUND_SCHEME}{id}");
            render_image(&ImageElement {
                src: &src,
                alt: &alt,
                title,
                attributes: &attributes,
                source: ImageSource::Missing { id },
            })
        }
    }
}

/// Split a trailing `{...}` block off an owned string.
fn strip_block(text: String) -> (String, Option<String>) {
    match split_trailing_block(&text) {
        Some((rest, inner)) => (rest.to_string(), Some(inner.to_string())),
        None => (text, None),
    }
}

/// Consume a `{...}` block written immediately after an image, returning its contents.
///
/// The block may span several adjacent text nodes; fully consumed nodes are detached.
fn take_attribute_suffix<'a>(image: &'a AstNode<'a>) -> Option<String> {
    let mut run = Vec::new();
    let mut text = String::new();
    let mut next = image.next_sibling();
    while let Some(sibling) = next {
        match &sibling.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            _ => break,
        }
        run.push(sibling);
        next = sibling.next_sibling();
    }

    let (inner, consumed) = match_leading_block(&text)?;
    let inner = inner.to_string();

    let mut remaining = consumed;
    for sibling in run {
        if remaining == 0 {
            break;
        }
        let len = match &sibling.data.borrow().value {
            NodeValue::Text(t) => t.len(),
            _ => 0,
        };
        if len <= remaining {
            remaining -= len;
            sibling.detach();
        } else {
            if let NodeValue::Text(t) = &mut sibling.data.borrow_mut().value {
                t.drain(..remaining);
            }
            remaining = 0;
        }
    }

    Some(inner)
}

/// Flatten a node's inline children to plain text (used for alt text).
fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut output = String::new();
    for child in node.children() {
        collect_text_content(child, &mut output);
    }
    output
}

fn collect_text_content<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text_content(child, output);
            }
        }
    }
}
