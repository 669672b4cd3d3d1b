//! HTML → Markdown reconstruction
//!
//! Pipeline: HTML string → RcDom → structural walk → Markdown string
//!
//! The walk recognizes the fragments emitted by `render.rs` (enhanced code blocks, annotated
//! images) and otherwise maps standard HTML elements back to their markdown syntax. Anything
//! unrecognized is reduced to its text content, so arbitrary pasted markup degrades to readable
//! text.

use crate::common::attributes::{ImageAttributes, KNOWN_KEYS};
use crate::common::code_block::CodeBlockInfo;
use crate::common::escape::{collapse_whitespace, longest_run, normalize_blank_lines, tidy_lines};
use crate::error::FormatError;
use crate::formats::html::render::{
    CODE_FILENAME_CLASS, CODE_LANGUAGE_CLASS, CODE_WRAPPER_CLASS, DEFAULT_ALT_ATTR,
    STORED_ID_ATTR, STORED_IMAGE_CLASS, TRANSIENT_CLASSES,
};
use crate::images::{ImageStore, ReverseImageMap, NOT_FOUND_SCHEME, STORED_SCHEME};
use crate::options::ConvertOptions;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::cell::Cell;

/// Elements that start a new block when met between inline content.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "ul",
];

/// Elements whose content never belongs in markdown.
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "template", "noscript", "button"];

/// Nesting depth past which a subtree is reduced to its text content.
const MAX_DEPTH: usize = 64;

/// Reconstruct markdown from HTML.
///
/// `reverse_map` is only read; a miss falls through to a scan of `store` when enabled.
pub fn parse_to_markdown(
    html: &str,
    store: &dyn ImageStore,
    reverse_map: &ReverseImageMap,
    options: &ConvertOptions,
) -> Result<String, FormatError> {
    if html.trim().is_empty() {
        return Ok(String::new());
    }

    // Step 1: HTML string → RcDom
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let body = find_element(&dom.document, "body")
        .ok_or_else(|| FormatError::ParseError("HTML document has no body".to_string()))?;

    // Step 2: RcDom → Markdown
    let walker = Walker {
        store,
        reverse_map,
        options,
        depth: Cell::new(0),
    };
    let markdown = walker.blocks(&body);

    Ok(normalize_blank_lines(&markdown))
}

struct Walker<'a> {
    store: &'a dyn ImageStore,
    reverse_map: &'a ReverseImageMap,
    options: &'a ConvertOptions,
    depth: Cell<usize>,
}

/// One piece of a list item, in document order.
enum ItemPart {
    /// Inline text, possibly over several lines.
    Text(String),
    /// A rebuilt block: fence, quote, table, rule or heading.
    Block(String),
    /// A nested list, already indented for its level.
    List(String),
}

impl Walker<'_> {
    /// Run `f` one nesting level deeper, or return `None` past [`MAX_DEPTH`].
    fn descend<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            return None;
        }
        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);
        Some(result)
    }

    /// Render the children of `parent` as a sequence of blocks, each followed by a blank line.
    fn blocks(&self, parent: &Handle) -> String {
        self.descend(|| self.block_children(parent)).unwrap_or_else(|| {
            let mut text = collapse_whitespace(&text_content(parent));
            let mut output = String::new();
            flush_paragraph(&mut text, &mut output);
            output
        })
    }

    /// Consecutive inline children are gathered into one paragraph.
    fn block_children(&self, parent: &Handle) -> String {
        let mut output = String::new();
        let mut pending = String::new();

        for child in parent.children.borrow().iter() {
            if is_skipped(child) {
                continue;
            }
            match tag_name(child) {
                Some(tag) if BLOCK_TAGS.contains(&tag) => {
                    flush_paragraph(&mut pending, &mut output);
                    self.block(child, tag, &mut output);
                }
                _ => self.inline(child, &mut pending),
            }
        }
        flush_paragraph(&mut pending, &mut output);

        output
    }

    fn block(&self, node: &Handle, tag: &str, output: &mut String) {
        if has_class(node, CODE_WRAPPER_CLASS) {
            output.push_str(&self.code_block(node));
            return;
        }

        match tag {
            "p" => {
                let text = tidy_lines(&self.inline_children(node));
                if !text.is_empty() {
                    output.push_str(&text);
                    output.push_str("\n\n");
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                let text = tidy_lines(&self.inline_children(node)).replace('\n', " ");
                output.push_str(&format!("{} {}\n\n", "#".repeat(level), text));
            }
            "ul" | "ol" => {
                output.push_str(&self.list(node, 0));
                output.push('\n');
            }
            "pre" => output.push_str(&self.plain_code_block(node)),
            "blockquote" => {
                let inner = normalize_blank_lines(&self.blocks(node));
                for line in inner.lines() {
                    if line.is_empty() {
                        output.push_str(">\n");
                    } else {
                        output.push_str(&format!("> {line}\n"));
                    }
                }
                output.push('\n');
            }
            "hr" => output.push_str("---\n\n"),
            "table" => {
                let table = self.table(node);
                if !table.is_empty() {
                    output.push_str(&table);
                    output.push('\n');
                }
            }
            _ => output.push_str(&self.blocks(node)),
        }
    }

    /// Rebuild a fenced block from an enhanced code block wrapper.
    fn code_block(&self, wrapper: &Handle) -> String {
        let code = find_element(wrapper, "code");
        let text = code.as_ref().map(text_content).unwrap_or_default();

        let filename = attr(wrapper, "data-filename")
            .or_else(|| find_class(wrapper, CODE_FILENAME_CLASS).map(|span| text_content(&span)))
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        // The recorded token wins; the header only shows a language when no filename exists.
        let language = attr(wrapper, "data-language")
            .or_else(|| code.as_ref().and_then(class_language))
            .or_else(|| {
                find_class(wrapper, CODE_LANGUAGE_CLASS)
                    .map(|span| text_content(&span))
                    .filter(|label| label.trim() != "text")
            })
            .map(|l| l.trim().to_string())
            .unwrap_or_default();

        let info = CodeBlockInfo { language, filename };
        fence(&info.to_info_string(), &text)
    }

    /// Rebuild a fenced block from a bare `<pre>`, e.g. pasted markup.
    fn plain_code_block(&self, pre: &Handle) -> String {
        let language = find_element(pre, "code")
            .as_ref()
            .and_then(class_language)
            .unwrap_or_default();
        let text = text_content(pre);
        let text = text.strip_suffix('\n').unwrap_or(&text);
        fence(&language, text)
    }

    fn list(&self, list: &Handle, level: usize) -> String {
        let indent = self.options.list_indent.repeat(level);
        self.descend(|| self.list_items(list, level, &indent))
            .unwrap_or_else(|| {
                let text = collapse_whitespace(&text_content(list));
                match text.trim() {
                    "" => String::new(),
                    text => format!("{indent}- {text}\n"),
                }
            })
    }

    fn list_items(&self, list: &Handle, level: usize, indent: &str) -> String {
        let ordered = tag_name(list) == Some("ol");
        let mut number = attr(list, "start")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(1);
        let items: Vec<Handle> = list
            .children
            .borrow()
            .iter()
            .filter(|child| tag_name(child) == Some("li"))
            .cloned()
            .collect();

        let mut output = String::new();
        for (index, item) in items.iter().enumerate() {
            let marker = if ordered {
                let marker = format!("{number}. ");
                number += 1;
                marker
            } else {
                "- ".to_string()
            };
            // Text and blocks align with the text after the marker. Nested lists are indented
            // by `list_indent` per level instead, which under `N.` does not nest on re-parse.
            let continuation = format!("{indent}{}", " ".repeat(marker.len()));

            let parts = self.list_item(item, level);
            write_item(&mut output, indent, &marker, &continuation, &parts);

            let has_block = parts.iter().any(|part| matches!(part, ItemPart::Block(_)));
            if has_block && index + 1 < items.len() {
                output.push('\n');
            }
        }

        output
    }

    /// Content of one item in document order.
    fn list_item(&self, item: &Handle, level: usize) -> Vec<ItemPart> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut task: Option<bool> = None;

        for child in item.children.borrow().iter() {
            if is_skipped(child) {
                continue;
            }
            if has_class(child, CODE_WRAPPER_CLASS) {
                flush_item_text(&mut text, &mut parts);
                let fenced = self.code_block(child);
                parts.push(ItemPart::Block(fenced.trim_end().to_string()));
                continue;
            }
            match tag_name(child) {
                Some("ul") | Some("ol") => {
                    flush_item_text(&mut text, &mut parts);
                    parts.push(ItemPart::List(self.list(child, level + 1)));
                }
                Some(
                    tag @ ("pre" | "blockquote" | "table" | "hr" | "h1" | "h2" | "h3" | "h4"
                    | "h5" | "h6"),
                ) => {
                    flush_item_text(&mut text, &mut parts);
                    let mut block = String::new();
                    self.block(child, tag, &mut block);
                    let block = block.trim_end();
                    if !block.is_empty() {
                        parts.push(ItemPart::Block(block.to_string()));
                    }
                }
                Some("input") if attr(child, "type").as_deref() == Some("checkbox") => {
                    task = Some(attr(child, "checked").is_some());
                }
                Some("p") | Some("div") => {
                    if !text.trim().is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&self.inline_children(child));
                    text.push('\n');
                }
                _ => self.inline(child, &mut text),
            }
        }
        flush_item_text(&mut text, &mut parts);

        if let Some(checked) = task {
            let mark = if checked { "[x]" } else { "[ ]" };
            match parts.first_mut() {
                Some(ItemPart::Text(first)) => *first = format!("{mark} {}", first.trim_start()),
                _ => parts.insert(0, ItemPart::Text(mark.to_string())),
            }
        }
        parts
    }

    fn table(&self, table: &Handle) -> String {
        let mut rows = Vec::new();
        collect_rows(table, &mut rows);
        let Some(header) = rows.first() else {
            return String::new();
        };

        let header_cells = cells(header);
        let columns = rows.iter().map(|row| cells(row).len()).max().unwrap_or(0);
        if columns == 0 {
            return String::new();
        }

        let mut output = String::new();
        for (index, row) in rows.iter().enumerate() {
            let mut texts: Vec<String> = cells(row)
                .iter()
                .map(|cell| {
                    tidy_lines(&self.inline_children(cell))
                        .replace('\n', " ")
                        .replace('|', "\\|")
                })
                .collect();
            texts.resize(columns, String::new());
            output.push_str(&format!("| {} |\n", texts.join(" | ")));

            if index == 0 {
                let separators: Vec<&str> = (0..columns)
                    .map(|column| match header_cells.get(column).and_then(alignment).as_deref() {
                        Some("left") => ":---",
                        Some("center") => ":---:",
                        Some("right") => "---:",
                        _ => "---",
                    })
                    .collect();
                output.push_str(&format!("| {} |\n", separators.join(" | ")));
            }
        }
        output
    }

    fn inline_children(&self, node: &Handle) -> String {
        let mut output = String::new();
        for child in node.children.borrow().iter() {
            self.inline(child, &mut output);
        }
        output
    }

    fn inline(&self, node: &Handle, output: &mut String) {
        match &node.data {
            NodeData::Text { contents } => {
                output.push_str(&collapse_whitespace(&contents.borrow()));
            }
            NodeData::Element { .. } => {
                if is_skipped(node) {
                    return;
                }
                if self.descend(|| self.inline_element(node, output)).is_none() {
                    output.push_str(&collapse_whitespace(&text_content(node)));
                }
            }
            _ => {}
        }
    }

    fn inline_element(&self, node: &Handle, output: &mut String) {
        match tag_name(node).unwrap_or_default() {
            "br" => output.push('\n'),
            "strong" | "b" => self.emphasis(node, "**", output),
            "em" | "i" => self.emphasis(node, "*", output),
            "del" | "s" | "strike" => self.emphasis(node, "~~", output),
            "code" => output.push_str(&code_span(&text_content(node))),
            "a" => output.push_str(&self.link(node)),
            "img" => output.push_str(&self.image(node)),
            "input" => {}
            _ => {
                for child in node.children.borrow().iter() {
                    self.inline(child, output);
                }
            }
        }
    }

    /// Wrap inline content in `marker`, keeping surrounding whitespace outside the markers.
    fn emphasis(&self, node: &Handle, marker: &str, output: &mut String) {
        let inner = self.inline_children(node);
        let trimmed = inner.trim();
        if trimmed.is_empty() {
            output.push_str(&inner);
            return;
        }
        let leading = &inner[..inner.len() - inner.trim_start().len()];
        let trailing = &inner[inner.trim_end().len()..];
        output.push_str(&format!("{leading}{marker}{trimmed}{marker}{trailing}"));
    }

    fn link(&self, anchor: &Handle) -> String {
        let text = self.inline_children(anchor);
        let Some(href) = attr(anchor, "href") else {
            return text;
        };
        let title = attr(anchor, "title").filter(|t| !t.is_empty());

        match title {
            None if text.trim() == href => href,
            None => format!("[{}]({href})", text.trim()),
            Some(title) => format!("[{}]({href} \"{}\")", text.trim(), title.replace('"', "\\\"")),
        }
    }

    fn image(&self, img: &Handle) -> String {
        let src = attr(img, "src").unwrap_or_default();
        let alt = if attr(img, DEFAULT_ALT_ATTR).is_some() {
            String::new()
        } else {
            attr(img, "alt").unwrap_or_default()
        };
        let target = self.resolve_image_target(img, &src);

        let mirrors: Vec<(&str, String)> = KNOWN_KEYS
            .iter()
            .filter_map(|&key| attr(img, &format!("data-{key}")).map(|value| (key, value)))
            .collect();
        let attributes =
            ImageAttributes::from_pairs(mirrors.iter().map(|(key, value)| (*key, value.as_str())));

        let mut markdown = format!("![{alt}]({target}");
        if let Some(title) = attr(img, "title").filter(|t| !t.is_empty()) {
            markdown.push_str(&format!(" \"{}\"", title.replace('"', "\\\"")));
        }
        markdown.push(')');
        markdown.push_str(&attributes.to_suffix());
        markdown
    }

    /// Decide whether an image points at a stored record or a literal URL.
    fn resolve_image_target(&self, img: &Handle, src: &str) -> String {
        if let Some(id) = attr(img, STORED_ID_ATTR).filter(|id| !id.is_empty()) {
            log::debug!("image resolved by marker attribute: {id}");
            return format!("{STORED_SCHEME}{id}");
        }

        if let Some(id) = src.strip_prefix(NOT_FOUND_SCHEME) {
            return format!("{STORED_SCHEME}{id}");
        }

        let marked = has_class(img, STORED_IMAGE_CLASS);
        let is_data_url = src.starts_with("data:");
        if !(marked || is_data_url) {
            return src.to_string();
        }

        if let Some(id) = self.reverse_map.get(src) {
            log::debug!("image resolved by reverse map: {id}");
            return format!("{STORED_SCHEME}{id}");
        }

        if self.options.full_scan_fallback {
            if let Some(id) = self.store.find_by_data(src) {
                log::debug!("image resolved by store scan: {id}");
                return format!("{STORED_SCHEME}{id}");
            }
        }

        if marked {
            log::debug!("marked image has no stored record, keeping literal source");
        }
        src.to_string()
    }
}

fn flush_paragraph(pending: &mut String, output: &mut String) {
    let text = tidy_lines(pending);
    if !text.is_empty() {
        output.push_str(&text);
        output.push_str("\n\n");
    }
    pending.clear();
}

fn flush_item_text(text: &mut String, parts: &mut Vec<ItemPart>) {
    let tidy = tidy_lines(text);
    if !tidy.is_empty() {
        parts.push(ItemPart::Text(tidy));
    }
    text.clear();
}

/// Lay out one list item: the first line follows the marker, later lines hang under it.
///
/// Blocks and text that follows a block or nested list are set off by a blank line.
fn write_item(output: &mut String, indent: &str, marker: &str, continuation: &str, parts: &[ItemPart]) {
    let mut on_marker_line = true;
    let mut needs_gap = false;

    for part in parts {
        match part {
            ItemPart::List(nested) => {
                if on_marker_line {
                    output.push_str(&format!("{indent}{}\n", marker.trim_end()));
                    on_marker_line = false;
                }
                output.push_str(nested);
                needs_gap = true;
            }
            ItemPart::Text(text) | ItemPart::Block(text) => {
                let is_block = matches!(part, ItemPart::Block(_));
                if on_marker_line && is_block {
                    // "- ---" would read as a rule, so blocks start below the marker
                    output.push_str(&format!("{indent}{}\n", marker.trim_end()));
                    on_marker_line = false;
                } else if !on_marker_line && (is_block || needs_gap) {
                    output.push('\n');
                }

                for line in text.lines() {
                    if on_marker_line {
                        output.push_str(&format!("{indent}{marker}{line}"));
                        on_marker_line = false;
                    } else if !line.is_empty() {
                        output.push_str(continuation);
                        output.push_str(line);
                    }
                    output.push('\n');
                }
                needs_gap = is_block;
            }
        }
    }

    if on_marker_line {
        output.push_str(&format!("{indent}{}\n", marker.trim_end()));
    }
}

fn fence(info: &str, code: &str) -> String {
    let fence = "`".repeat((longest_run(code, '`') + 1).max(3));
    format!("{fence}{info}\n{code}\n{fence}\n\n")
}

fn code_span(text: &str) -> String {
    let text = text.replace('\n', " ");
    let ticks = "`".repeat(longest_run(&text, '`') + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{ticks} {text} {ticks}")
    } else {
        format!("{ticks}{text}{ticks}")
    }
}

fn collect_rows(node: &Handle, rows: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        match tag_name(child) {
            Some("tr") => rows.push(child.clone()),
            Some("thead") | Some("tbody") | Some("tfoot") => collect_rows(child, rows),
            _ => {}
        }
    }
}

fn cells(row: &Handle) -> Vec<Handle> {
    row.children
        .borrow()
        .iter()
        .filter(|cell| matches!(tag_name(cell), Some("th") | Some("td")))
        .cloned()
        .collect()
}

fn alignment(cell: &Handle) -> Option<String> {
    if let Some(align) = attr(cell, "align") {
        return Some(align.trim().to_ascii_lowercase());
    }
    let style = attr(cell, "style")?;
    style.split(';').find_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        (property.trim() == "text-align").then(|| value.trim().to_ascii_lowercase())
    })
}

/// Language from a `language-x` class on a code element.
fn class_language(code: &Handle) -> Option<String> {
    attr(code, "class")?
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-").map(str::to_string))
}

fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attribute| &*attribute.name.local == name)
            .map(|attribute| attribute.value.to_string()),
        _ => None,
    }
}

fn has_class(node: &Handle, class: &str) -> bool {
    attr(node, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

fn is_skipped(node: &Handle) -> bool {
    match tag_name(node) {
        Some(tag) if SKIPPED_TAGS.contains(&tag) => true,
        Some(_) => TRANSIENT_CLASSES.iter().any(|class| has_class(node, class)),
        None => false,
    }
}

/// First descendant element named `tag` (depth-first, `node` included).
fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    find_first(node, |candidate| tag_name(candidate) == Some(tag))
}

fn find_class(node: &Handle, class: &str) -> Option<Handle> {
    find_first(node, |candidate| has_class(candidate, class))
}

/// Pre-order search with an explicit stack, so nesting depth never costs call frames.
fn find_first(node: &Handle, matches: impl Fn(&Handle) -> bool) -> Option<Handle> {
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        if matches(&current) {
            return Some(current);
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    None
}

/// Concatenated text of every descendant, entities already decoded by the parser.
fn text_content(node: &Handle) -> String {
    let mut output = String::new();
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        if let NodeData::Text { contents } = &current.data {
            output.push_str(&contents.borrow());
        }
        stack.extend(current.children.borrow().iter().rev().cloned());
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::{MemoryImageStore, StoredImage};

    fn reverse(html: &str) -> String {
        let store = MemoryImageStore::new();
        let map = ReverseImageMap::new();
        parse_to_markdown(html, &store, &map, &ConvertOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(reverse(""), "");
        assert_eq!(reverse(" \n "), "");
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let md = reverse("<h2>Title</h2>\n<p>One <strong>two</strong> <em>three</em></p>");
        assert_eq!(md, "## Title\n\nOne **two** *three*");
    }

    #[test]
    fn test_emphasis_whitespace_moves_outside() {
        assert_eq!(reverse("<p>a<b> bold </b>c</p>"), "a **bold** c");
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(reverse("<p>one<br />\ntwo</p>"), "one\ntwo");
    }

    #[test]
    fn test_inline_code_and_links() {
        let md = reverse(
            "<p><code>a`b</code> <a href=\"https://x.io\">site</a> \
             <a href=\"https://y.io\">https://y.io</a> \
             <a href=\"/t\" title=\"T\">t</a></p>",
        );
        assert_eq!(
            md,
            "``a`b`` [site](https://x.io) https://y.io [t](/t \"T\")"
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(reverse("<p><del>gone</del></p>"), "~~gone~~");
    }

    #[test]
    fn test_nested_list() {
        let md = reverse(
            "<ol><li>First<ul><li>Alpha</li><li>Beta</li></ul></li><li>Second</li></ol>",
        );
        assert_eq!(md, "1. First\n  - Alpha\n  - Beta\n2. Second");
    }

    #[test]
    fn test_ordered_list_start_and_counter_reset() {
        let md = reverse("<ol start=\"3\"><li>c</li><li>d</li></ol><ol><li>a</li></ol>");
        assert_eq!(md, "3. c\n4. d\n\n1. a");
    }

    #[test]
    fn test_list_item_break_continuation() {
        assert_eq!(reverse("<ul><li>one<br>two</li></ul>"), "- one\n  two");
    }

    #[test]
    fn test_loose_list_paragraphs() {
        let md = reverse("<ul>\n<li>\n<p>one</p>\n</li>\n<li>\n<p>two</p>\n</li>\n</ul>");
        assert_eq!(md, "- one\n- two");
    }

    #[test]
    fn test_task_list() {
        let md = reverse(
            "<ul><li><input type=\"checkbox\" checked=\"\" disabled=\"\" /> done</li>\
             <li><input type=\"checkbox\" disabled=\"\" /> todo</li></ul>",
        );
        assert_eq!(md, "- [x] done\n- [ ] todo");
    }

    #[test]
    fn test_blockquote_and_rule() {
        let md = reverse("<blockquote><p>quoted</p><p>more</p></blockquote><hr />");
        assert_eq!(md, "> quoted\n>\n> more\n\n---");
    }

    #[test]
    fn test_table_with_alignment() {
        let md = reverse(
            "<table><thead><tr><th align=\"left\">a</th><th style=\"text-align: right\">b</th>\
             <th>c</th></tr></thead><tbody><tr><td>1</td><td>2|3</td><td>4</td></tr></tbody></table>",
        );
        assert_eq!(
            md,
            "| a | b | c |\n| :--- | ---: | --- |\n| 1 | 2\\|3 | 4 |"
        );
    }

    #[test]
    fn test_enhanced_code_block() {
        let html = "<div class=\"code-block-wrapper\" data-language=\"python\" data-filename=\"app.py\">\
                    <div class=\"code-block-header\"><span class=\"code-block-filename\">app.py</span>\
                    <button class=\"code-copy-button\">Copy</button></div>\
                    <pre><code class=\"language-python\">if a &lt; b:\n    print(&quot;x&quot;)</code></pre></div>";
        assert_eq!(
            reverse(html),
            "```python:app.py\nif a < b:\n    print(\"x\")\n```"
        );
    }

    #[test]
    fn test_code_block_without_recorded_language() {
        let html = "<div class=\"code-block-wrapper\">\
                    <div class=\"code-block-header\"><span class=\"code-block-filename\">main.rs</span></div>\
                    <pre><code>fn main() {}</code></pre></div>";
        assert_eq!(reverse(html), "```rust:main.rs\nfn main() {}\n```");
    }

    #[test]
    fn test_code_block_fence_grows() {
        let html = "<div class=\"code-block-wrapper\" data-language=\"md\">\
                    <pre><code>```\ninner\n```</code></pre></div>";
        assert_eq!(reverse(html), "````md\n```\ninner\n```\n````");
    }

    #[test]
    fn test_plain_pre_block() {
        let md = reverse("<pre><code class=\"language-sh\">ls -la\n</code></pre>");
        assert_eq!(md, "```sh\nls -la\n```");
    }

    #[test]
    fn test_transient_nodes_and_scripts_dropped() {
        let md = reverse(
            "<p>keep<span class=\"resize-handle\">drag</span></p>\
             <div class=\"image-resize-handle\">x</div><script>alert(1)</script>",
        );
        assert_eq!(md, "keep");
    }

    #[test]
    fn test_image_literal_with_mirrors() {
        let md = reverse(
            "<p><img src=\"pic.png\" alt=\"A\" title=\"Cap\" class=\"markdown-image\" \
             style=\"width: 400px\" data-max-width=\"80%\" data-width=\"400\" /></p>",
        );
        assert_eq!(md, "![A](pic.png \"Cap\"){width=400 max-width=80%}");
    }

    #[test]
    fn test_image_resolution_order() {
        let store: MemoryImageStore = vec![StoredImage::new("scanned", "data:image/png;base64,SCAN")]
            .into_iter()
            .collect();
        let mut map = ReverseImageMap::new();
        map.put("data:image/png;base64,MAP", "mapped");
        let options = ConvertOptions::default();
        let run = |html: &str, options: &ConvertOptions| {
            parse_to_markdown(html, &store, &map, options).unwrap()
        };

        assert_eq!(
            run("<img src=\"data:image/png;base64,MAP\" data-stored-id=\"explicit\" alt=\"\">", &options),
            "![](stored:explicit)"
        );
        assert_eq!(
            run("<img src=\"data:image/png;base64,MAP\" class=\"stored-image\" alt=\"\">", &options),
            "![](stored:mapped)"
        );
        assert_eq!(
            run("<img src=\"data:image/png;base64,SCAN\" alt=\"\">", &options),
            "![](stored:scanned)"
        );
        assert_eq!(
            run(
                "<img src=\"data:image/png;base64,SCAN\" alt=\"\">",
                &ConvertOptions::default().with_full_scan_fallback(false)
            ),
            "![](data:image/png;base64,SCAN)"
        );
        assert_eq!(
            run("<img src=\"data:image/gif;base64,NONE\" alt=\"\">", &options),
            "![](data:image/gif;base64,NONE)"
        );
        assert_eq!(
            run("<img src=\"https://e.com/a.png\" alt=\"x\">", &options),
            "![x](https://e.com/a.png)"
        );
    }

    #[test]
    fn test_missing_image_marker_restores_reference() {
        let md = reverse("<img src=\"image-not-found:gone\" alt=\"G\" class=\"markdown-image image-not-found\">");
        assert_eq!(md, "![G](stored:gone)");
    }

    #[test]
    fn test_default_alt_is_dropped() {
        let md = reverse(
            "<img src=\"data:x\" alt=\"cat.png\" data-stored-id=\"c\" data-default-alt=\"true\">",
        );
        assert_eq!(md, "![](stored:c)");
    }

    #[test]
    fn test_unknown_markup_degrades_to_text() {
        assert_eq!(reverse("<custom-tag>hello <blink>there</blink></custom-tag>"), "hello there");
        assert_eq!(reverse("<p>unclosed <b>bold"), "unclosed **bold**");
    }

    #[test]
    fn test_code_block_inside_list_item() {
        let html = "<ul><li><p>item</p><div class=\"code-block-wrapper\" data-language=\"js\" \
                    data-filename=\"a.js\"><div class=\"code-block-header\">\
                    <span class=\"code-block-filename\">a.js</span>\
                    <button class=\"code-copy-button\">Copy</button></div>\
                    <pre><code class=\"language-js\">let a = 1;\nlet b = 2;</code></pre></div></li>\
                    <li><p>next</p></li></ul>";
        assert_eq!(
            reverse(html),
            "- item\n\n  ```js:a.js\n  let a = 1;\n  let b = 2;\n  ```\n\n- next"
        );
    }

    #[test]
    fn test_blockquote_inside_ordered_item() {
        let md = reverse(
            "<ol><li><p>step</p><blockquote><p>quoted</p></blockquote></li><li><p>next</p></li></ol>",
        );
        assert_eq!(md, "1. step\n\n   > quoted\n\n2. next");
    }

    #[test]
    fn test_loose_item_paragraphs_have_no_indented_blank_line() {
        let md = reverse("<ul><li><p>a</p><p>para two</p></li></ul>");
        assert_eq!(md, "- a\n\n  para two");
    }

    #[test]
    fn test_item_starting_with_rule() {
        assert_eq!(reverse("<ul><li><hr></li></ul>"), "-\n  ---");
    }

    #[test]
    fn test_buttons_never_reach_markdown() {
        assert_eq!(reverse("<p>save <button>Copy</button>now</p>"), "save now");
    }

    #[test]
    fn test_deep_list_nesting_is_cut_off() {
        let md = reverse(&format!("{}x", "<ul><li>".repeat(2_000)));
        assert!(md.starts_with('-'));
        assert!(md.ends_with("- x"));
    }
}
