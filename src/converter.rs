//! MDX body converter - transforms a DOM tree into the documentation dialect
//!
//! The converter walks the html5ever tree depth-first and emits Markdown-style
//! body text suitable for an MDX page: ATX headings, paragraphs, fenced code
//! blocks, inline code, links, lists, pipe tables and images.
//!
//! # Rendering Contexts
//!
//! Each element is rendered in one of three contexts. The context decides how
//! much of the element's inner markup survives:
//!
//! - **Text-only** (headings, paragraphs): inner markup is stripped. Links and
//!   inline code become their plain text, images disappear.
//! - **Inline-rich** (list items, table cells): inline code becomes
//!   `` `code` `` and links become `[text](href)`. Other markup is stripped and
//!   images disappear.
//! - **Container** (everything else): children are rendered in turn; elements
//!   without a handler (`div`, `span`, `strong`, `section`, ...) are
//!   transparent.
//!
//! `script`, `style`, `noscript`, `head` and `template` are skipped with all
//! their content.
//!
//! # Partial Conversions
//!
//! Some constructs are only converted when they carry enough information:
//!
//! - `<pre>` becomes a fenced block only when its `<code>` child has a
//!   `language-X` class. Otherwise the `<pre>` tags are emitted verbatim and
//!   the inner `<code>` renders as inline code.
//! - `<a>` without `href` keeps its raw tags around the rendered text.
//! - `<img>` becomes `![alt](src)` only when `src` precedes `alt`; otherwise
//!   the raw tag is kept.
//!
//! # Examples
//!
//! ```rust
//! use docs_mdx_migrator::converter::convert;
//!
//! let body = convert("<h1>Setup</h1><p>Do this.</p>");
//! assert_eq!(body, "# Setup\n\nDo this.\n\n");
//! ```
//!
//! # Output Normalization
//!
//! Runs of three or more newlines collapse to one blank line, leading
//! whitespace is trimmed, and a non-empty body ends with exactly one blank
//! line. Conversion never fails: empty input yields an empty body.

use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use std::sync::OnceLock;

use crate::parser::{attr, attrs, parse_html, tag_name};

/// Rendered in place of a table whose rows carry no cells
pub const TABLE_PLACEHOLDER: &str = "*[Table content could not be converted]*";

/// Elements dropped together with their content
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "head", "template"];

/// Elements without a handler whose content starts and ends a block
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "section",
    "summary",
    "tr",
];

/// Whether an element separates its text from its neighbours in inline-rich
/// context
fn breaks_inline(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
        || matches!(
            tag,
            "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "td" | "th" | "pre" | "table"
        )
}

/// Convert serialized markup into an MDX body
///
/// This is the main entry point. Empty or whitespace-only markup converts to
/// an empty body.
pub fn convert(html: &str) -> String {
    match parse_html(html) {
        Ok(dom) => MdxConverter::new().convert(&dom),
        Err(_) => String::new(),
    }
}

/// DOM to MDX body converter
///
/// Stateless; one instance can convert any number of documents.
///
/// # Examples
///
/// ```rust
/// use docs_mdx_migrator::converter::MdxConverter;
/// use docs_mdx_migrator::parser::parse_html;
///
/// let dom = parse_html("<ul><li>One</li><li>Two</li></ul>").expect("Parse failed");
/// let body = MdxConverter::new().convert(&dom);
/// assert_eq!(body, "- One\n- Two\n\n");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MdxConverter;

impl MdxConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert a parsed document into an MDX body
    pub fn convert(&self, dom: &RcDom) -> String {
        let mut output = String::with_capacity(1024);
        self.traverse_node(&dom.document, &mut output);
        self.normalize_output(&output)
    }

    /// Render a node in container context
    fn traverse_node(&self, node: &Handle, output: &mut String) {
        match node.data {
            NodeData::Document => {
                for child in node.children.borrow().iter() {
                    self.traverse_node(child, output);
                }
            }
            NodeData::Element { ref name, .. } => {
                let tag = name.local.as_ref();
                self.handle_element(node, tag, output);
            }
            NodeData::Text { ref contents } => {
                let text = contents.borrow();
                self.push_text(output, &text);
            }
            NodeData::Comment { .. }
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    /// Dispatch an element to its handler
    fn handle_element(&self, node: &Handle, tag: &str, output: &mut String) {
        if SKIPPED_ELEMENTS.contains(&tag) {
            return;
        }

        match tag {
            "h1" => self.handle_heading(node, 1, output),
            "h2" => self.handle_heading(node, 2, output),
            "h3" => self.handle_heading(node, 3, output),
            "h4" => self.handle_heading(node, 4, output),
            "h5" => self.handle_heading(node, 5, output),
            "h6" => self.handle_heading(node, 6, output),
            "p" => self.handle_paragraph(node, output),
            "pre" => self.handle_code_block(node, output),
            "code" => self.handle_inline_code(node, output),
            "a" => self.handle_link(node, output, |child, out| self.traverse_node(child, out)),
            "ul" => self.handle_list(node, output, 0, false),
            "ol" => self.handle_list(node, output, 0, true),
            "table" => self.handle_table(node, output),
            "img" => self.handle_image(node, output),
            "br" => {
                while output.ends_with(' ') {
                    output.pop();
                }
                output.push('\n');
            }
            _ if BLOCK_ELEMENTS.contains(&tag) => {
                self.ensure_blank_line(output);
                for child in node.children.borrow().iter() {
                    self.traverse_node(child, output);
                }
                self.ensure_blank_line(output);
            }
            _ => {
                for child in node.children.borrow().iter() {
                    self.traverse_node(child, output);
                }
            }
        }
    }

    /// Handle heading elements (h1-h6)
    ///
    /// Emits `#` repeated `level` times, a space and the stripped heading
    /// text, followed by a blank line. Headings without text are dropped.
    fn handle_heading(&self, node: &Handle, level: usize, output: &mut String) {
        let text = self.stripped_text(node);
        if text.is_empty() {
            return;
        }

        self.ensure_blank_line(output);
        for _ in 0..level {
            output.push('#');
        }
        output.push(' ');
        output.push_str(&text);
        output.push_str("\n\n");
    }

    /// Handle paragraph elements
    ///
    /// Paragraph content is text-only: nested links, code and formatting are
    /// flattened to their text.
    fn handle_paragraph(&self, node: &Handle, output: &mut String) {
        let text = self.stripped_text(node);
        if text.is_empty() {
            return;
        }

        self.ensure_blank_line(output);
        output.push_str(&text);
        output.push_str("\n\n");
    }

    /// Handle preformatted blocks
    ///
    /// - With a `language-X` class on the inner `<code>`: a fenced block
    ///   tagged `X`, content trimmed
    /// - Otherwise: the raw `<pre>` tags around the rendered children
    fn handle_code_block(&self, node: &Handle, output: &mut String) {
        let Some((code, language)) = self.fenced_code_child(node) else {
            output.push_str(&raw_open_tag(node));
            for child in node.children.borrow().iter() {
                self.traverse_node(child, output);
            }
            output.push_str("</pre>");
            return;
        };

        let mut content = String::new();
        collect_text(&code, &mut content);

        self.ensure_blank_line(output);
        output.push_str("```");
        output.push_str(&language);
        output.push('\n');
        output.push_str(content.trim());
        output.push_str("\n```\n\n");
    }

    /// Return the `<code>` child of a `<pre>` and its language, if tagged
    ///
    /// The `<code>` element must be the first child of the `<pre>` and its
    /// class attribute must start with `language-`.
    fn fenced_code_child(&self, pre: &Handle) -> Option<(Handle, String)> {
        let children = pre.children.borrow();
        let first = children.first()?;
        if tag_name(first).as_deref() != Some("code") {
            return None;
        }

        let class = attr(first, "class")?;
        let language = class.strip_prefix("language-")?;
        let language = language.split_whitespace().next().unwrap_or_default();
        Some((first.clone(), language.to_string()))
    }

    /// Handle inline code elements
    ///
    /// Wraps the stripped text in single backticks. Shared by container and
    /// inline-rich contexts.
    fn handle_inline_code(&self, node: &Handle, output: &mut String) {
        let mut content = String::new();
        collect_text(node, &mut content);
        output.push('`');
        output.push_str(content.trim());
        output.push('`');
    }

    /// Handle link elements
    ///
    /// A link with `href` becomes `[text](href)`; the href is copied
    /// verbatim. A link without `href` keeps its raw tags and its children are
    /// rendered with `render_child` in the caller's context.
    fn handle_link<F>(&self, node: &Handle, output: &mut String, render_child: F)
    where
        F: Fn(&Handle, &mut String),
    {
        if let Some(href) = attr(node, "href") {
            let text = self.stripped_text(node);
            output.push('[');
            output.push_str(&text);
            output.push_str("](");
            output.push_str(&href);
            output.push(')');
            return;
        }

        output.push_str(&raw_open_tag(node));
        for child in node.children.borrow().iter() {
            render_child(child, output);
        }
        output.push_str("</a>");
    }

    /// Handle list elements (ul/ol)
    ///
    /// Each `<li>` becomes one line: `- item` for unordered lists and `N. item`
    /// for ordered lists, numbered from 1 in document order. Nested lists are
    /// indented by two spaces per level and follow their parent item's line.
    fn handle_list(&self, node: &Handle, output: &mut String, depth: usize, ordered: bool) {
        if depth == 0 {
            self.ensure_blank_line(output);
        }

        let mut index = 0;
        for child in node.children.borrow().iter() {
            if tag_name(child).as_deref() != Some("li") {
                continue;
            }
            index += 1;

            let mut item = String::new();
            let mut nested: Vec<(Handle, bool)> = Vec::new();
            for item_child in child.children.borrow().iter() {
                self.render_list_item(item_child, &mut item, &mut nested);
            }

            for _ in 0..depth {
                output.push_str("  ");
            }
            if ordered {
                output.push_str(&format!("{}. ", index));
            } else {
                output.push_str("- ");
            }
            output.push_str(&self.normalize_text(&item));
            output.push('\n');

            for (list, list_ordered) in nested {
                self.handle_list(&list, output, depth + 1, list_ordered);
            }
        }

        if depth == 0 && !output.ends_with("\n\n") {
            output.push('\n');
        }
    }

    /// Handle table elements
    ///
    /// Every row becomes `| cell | cell |`. A `| --- |` separator with one
    /// dash group per header cell follows the first row. A table without rows
    /// renders nothing; a table whose rows have no cells renders
    /// [`TABLE_PLACEHOLDER`].
    fn handle_table(&self, node: &Handle, output: &mut String) {
        let mut rows: Vec<Vec<String>> = Vec::new();
        self.extract_table_rows(node, &mut rows);

        if rows.is_empty() {
            return;
        }

        self.ensure_blank_line(output);

        if rows.iter().all(|row| row.is_empty()) {
            output.push_str(TABLE_PLACEHOLDER);
            output.push_str("\n\n");
            return;
        }

        for (i, row) in rows.iter().enumerate() {
            output.push_str("| ");
            output.push_str(&row.join(" | "));
            output.push_str(" |\n");

            if i == 0 {
                let separator = vec!["---"; row.len().max(1)];
                output.push_str("| ");
                output.push_str(&separator.join(" | "));
                output.push_str(" |\n");
            }
        }
        output.push('\n');
    }

    /// Collect rows from a table and its row groups, in document order
    ///
    /// Nested tables are not searched; their cells belong to the enclosing
    /// cell.
    fn extract_table_rows(&self, node: &Handle, rows: &mut Vec<Vec<String>>) {
        for child in node.children.borrow().iter() {
            match tag_name(child).as_deref() {
                Some("thead") | Some("tbody") | Some("tfoot") => {
                    self.extract_table_rows(child, rows);
                }
                Some("tr") => {
                    let mut cells = Vec::new();
                    self.extract_table_row(child, &mut cells);
                    rows.push(cells);
                }
                _ => {}
            }
        }
    }

    /// Extract cells from a table row
    fn extract_table_row(&self, tr: &Handle, cells: &mut Vec<String>) {
        for child in tr.children.borrow().iter() {
            if matches!(tag_name(child).as_deref(), Some("td") | Some("th")) {
                let mut cell = String::new();
                for cell_child in child.children.borrow().iter() {
                    self.render_inline(cell_child, &mut cell);
                }
                cells.push(self.normalize_text(&cell));
            }
        }
    }

    /// Handle image elements in container context
    fn handle_image(&self, node: &Handle, output: &mut String) {
        let attributes = attrs(node);
        let src_at = attributes.iter().position(|(name, _)| name == "src");
        let alt_at = attributes.iter().position(|(name, _)| name == "alt");

        match (src_at, alt_at) {
            (Some(src), Some(alt)) if src < alt => {
                output.push_str("![");
                output.push_str(&attributes[alt].1);
                output.push_str("](");
                output.push_str(&attributes[src].1);
                output.push_str(")\n\n");
            }
            _ => output.push_str(&raw_open_tag(node)),
        }
    }

    /// Render a node in inline-rich context (list items, table cells)
    ///
    /// Block elements and `<br>` separate text with a space.
    fn render_inline(&self, node: &Handle, output: &mut String) {
        self.render_inline_into(node, output, None);
    }

    /// Render list item content, setting aside nested lists at any depth
    fn render_list_item(&self, node: &Handle, output: &mut String, nested: &mut Vec<(Handle, bool)>) {
        self.render_inline_into(node, output, Some(nested));
    }

    fn render_inline_into(
        &self,
        node: &Handle,
        output: &mut String,
        mut nested: Option<&mut Vec<(Handle, bool)>>,
    ) {
        match node.data {
            NodeData::Text { ref contents } => {
                output.push_str(&contents.borrow());
            }
            NodeData::Element { ref name, .. } => match name.local.as_ref() {
                tag if SKIPPED_ELEMENTS.contains(&tag) => {}
                "img" => {}
                "br" => output.push(' '),
                "code" => self.handle_inline_code(node, output),
                "a" => {
                    self.handle_link(node, output, |child, out| self.render_inline(child, out));
                }
                tag @ ("ul" | "ol") if nested.is_some() => {
                    if let Some(lists) = nested {
                        lists.push((node.clone(), tag == "ol"));
                    }
                }
                tag => {
                    let separate = breaks_inline(tag);
                    if separate {
                        output.push(' ');
                    }
                    for child in node.children.borrow().iter() {
                        self.render_inline_into(child, output, nested.as_deref_mut());
                    }
                    if separate {
                        output.push(' ');
                    }
                }
            },
            _ => {}
        }
    }

    /// Text content with all markup stripped and whitespace collapsed
    fn stripped_text(&self, node: &Handle) -> String {
        let mut text = String::new();
        collect_text(node, &mut text);
        self.normalize_text(&text)
    }

    /// Append a container-context text node
    ///
    /// Whitespace inside the node collapses to single spaces. Leading and
    /// trailing whitespace is kept as one space so that adjacent inline
    /// elements stay separated.
    fn push_text(&self, output: &mut String, text: &str) {
        let normalized = self.normalize_text(text);
        if normalized.is_empty() {
            return;
        }

        if text.starts_with(char::is_whitespace)
            && !output.is_empty()
            && !output.ends_with(char::is_whitespace)
        {
            output.push(' ');
        }
        output.push_str(&normalized);
        if text.ends_with(char::is_whitespace) {
            output.push(' ');
        }
    }

    /// Make sure the next block starts after a blank line
    fn ensure_blank_line(&self, output: &mut String) {
        while output.ends_with(' ') {
            output.pop();
        }
        if !output.is_empty() && !output.ends_with("\n\n") {
            if output.ends_with('\n') {
                output.push('\n');
            } else {
                output.push_str("\n\n");
            }
        }
    }

    /// Collapse whitespace runs to single spaces and trim
    fn normalize_text(&self, text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Final body normalization
    fn normalize_output(&self, output: &str) -> String {
        let collapsed = collapse_blank_lines(output);
        let body = collapsed.trim();
        if body.is_empty() {
            return String::new();
        }

        let mut result = String::with_capacity(body.len() + 2);
        result.push_str(body);
        result.push_str("\n\n");
        result
    }
}

/// Collapse runs of three or more newlines to a single blank line
pub fn collapse_blank_lines(text: &str) -> String {
    static BLANK_LINES_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    match BLANK_LINES_REGEX
        .get_or_init(|| Regex::new(r"\n{3,}").ok())
        .as_ref()
    {
        Some(regex) => regex.replace_all(text, "\n\n").into_owned(),
        None => text.to_string(),
    }
}

/// Collect descendant text, skipping non-content elements
fn collect_text(node: &Handle, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => {
            output.push_str(&contents.borrow());
        }
        NodeData::Element { ref name, .. } => {
            let tag = name.local.as_ref();
            if SKIPPED_ELEMENTS.contains(&tag) {
                return;
            }
            if tag == "br" {
                output.push('\n');
                return;
            }
            for child in node.children.borrow().iter() {
                collect_text(child, output);
            }
        }
        _ => {}
    }
}

/// Serialize an element's start tag as written in the source
fn raw_open_tag(node: &Handle) -> String {
    let mut tag = String::from("<");
    tag.push_str(&tag_name(node).unwrap_or_default());
    for (name, value) in attrs(node) {
        tag.push(' ');
        tag.push_str(&name);
        tag.push_str("=\"");
        tag.push_str(&value.replace('"', "&quot;"));
        tag.push('"');
    }
    tag.push('>');
    tag
}
