//! HTML5 parser using html5ever
//!
//! Page records carry the serialized document as a Rust string, so no charset
//! detection is needed: the markup is handed to html5ever as-is and parsed
//! with the WHATWG algorithm. Malformed or partial documents (missing closing
//! tags, misnested inline elements, bare fragments) still produce a tree.
//!
//! # Examples
//!
//! ```rust
//! use docs_mdx_migrator::parser::parse_html;
//!
//! let dom = parse_html("<h1>Hello").expect("malformed markup still parses");
//! ```
//!
//! # Configuration
//!
//! The parser uses default html5ever configuration:
//! - **Scripting**: Disabled (scripts are not executed)
//! - **Error Handling**: Errors are collected but parsing continues
//! - **Tree Builder**: Uses RcDom for reference-counted DOM nodes

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::MigrationError;

/// Parse an HTML string into a DOM tree
///
/// # Errors
///
/// Returns `MigrationError::InvalidInput` when the markup is empty or only
/// whitespace. html5ever itself never rejects input.
pub fn parse_html(html: &str) -> Result<RcDom, MigrationError> {
    if html.trim().is_empty() {
        return Err(MigrationError::InvalidInput(
            "HTML input is empty".to_string(),
        ));
    }

    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    Ok(dom)
}

/// Return the tag name of an element node
pub fn tag_name(node: &Handle) -> Option<String> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref().to_string()),
        _ => None,
    }
}

/// Return the value of the named attribute on an element node
pub fn attr(node: &Handle, name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = node.data {
        attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.to_string())
    } else {
        None
    }
}

/// Return `(name, value)` pairs for all attributes, in source order
pub fn attrs(node: &Handle) -> Vec<(String, String)> {
    if let NodeData::Element { ref attrs, .. } = node.data {
        attrs
            .borrow()
            .iter()
            .map(|attr| (attr.name.local.as_ref().to_string(), attr.value.to_string()))
            .collect()
    } else {
        Vec::new()
    }
}

/// Collect all descendant text of a node without any normalization
pub fn text_content(node: &Handle, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => {
            output.push_str(&contents.borrow());
        }
        NodeData::Element { .. } | NodeData::Document => {
            for child in node.children.borrow().iter() {
                text_content(child, output);
            }
        }
        _ => {}
    }
}
